//! Calendar events and their projection onto hour blocks.
//!
//! Events live independently of blocks. The [`distribute`] function cuts an
//! event into per-hour fragments; the [`sync`] functions write those fragments
//! into a [`crate::blocks::BlockSet`].

pub mod distribute;
pub mod sync;

pub use distribute::{distribute, total_minutes, Fragment};
pub use sync::{fragment_tasks, import_event, rebuild, SyncMode, SyncReport};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, EntityKind, Result};

/// Kind of calendar event. Each kind has a fixed display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Meeting,
    Appointment,
    Personal,
    Work,
    #[default]
    Other,
}

impl EventType {
    pub fn color(&self) -> &'static str {
        match self {
            EventType::Meeting => "#3b82f6",
            EventType::Appointment => "#10b981",
            EventType::Personal => "#f59e0b",
            EventType::Work => "#8b5cf6",
            EventType::Other => "#6b7280",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Meeting => "meeting",
            EventType::Appointment => "appointment",
            EventType::Personal => "personal",
            EventType::Work => "work",
            EventType::Other => "other",
        }
    }
}

/// A calendar entry with arbitrary start and end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub event_type: EventType,
    pub location: Option<String>,
    pub attendees: Vec<String>,
    pub color: String,
}

impl CalendarEvent {
    /// Day the event starts on.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date() == date
    }
}

/// Fields supplied when creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    /// Falls back to the event type's color.
    #[serde(default)]
    pub color: Option<String>,
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        event_type: EventType,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            start,
            end,
            event_type,
            location: None,
            attendees: Vec::new(),
            color: None,
        }
    }
}

/// Partial update for an event. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub event_type: Option<EventType>,
    pub location: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub color: Option<String>,
}

fn check_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<()> {
    if end <= start {
        return Err(CoreError::InvalidEventRange { start, end });
    }
    Ok(())
}

/// The set of calendar events, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    events: Vec<CalendarEvent>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn get(&self, event_id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    pub fn add(&mut self, draft: EventDraft) -> Result<String> {
        check_range(draft.start, draft.end)?;
        let id = uuid::Uuid::new_v4().to_string();
        let color = draft
            .color
            .unwrap_or_else(|| draft.event_type.color().to_string());
        self.events.push(CalendarEvent {
            id: id.clone(),
            title: draft.title,
            description: draft.description,
            start: draft.start,
            end: draft.end,
            event_type: draft.event_type,
            location: draft.location,
            attendees: draft.attendees,
            color,
        });
        Ok(id)
    }

    /// Apply a patch. The merged range is validated before anything changes.
    pub fn update(&mut self, event_id: &str, patch: EventPatch) -> Result<()> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Event, event_id))?;
        check_range(
            patch.start.unwrap_or(event.start),
            patch.end.unwrap_or(event.end),
        )?;

        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(start) = patch.start {
            event.start = start;
        }
        if let Some(end) = patch.end {
            event.end = end;
        }
        if let Some(event_type) = patch.event_type {
            event.event_type = event_type;
        }
        if let Some(location) = patch.location {
            event.location = Some(location);
        }
        if let Some(attendees) = patch.attendees {
            event.attendees = attendees;
        }
        if let Some(color) = patch.color {
            event.color = color;
        }
        Ok(())
    }

    pub fn remove(&mut self, event_id: &str) -> Result<CalendarEvent> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == event_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Event, event_id))?;
        Ok(self.events.remove(idx))
    }

    /// Events starting on `date`.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.is_on(date)).collect()
    }

    /// Events starting on any day in `from..=to`, ordered by start.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&CalendarEvent> {
        let mut found: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|e| (from..=to).contains(&e.date()))
            .collect();
        found.sort_by_key(|e| e.start);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn add_defaults_color_from_type() {
        let mut cal = Calendar::new();
        let id = cal
            .add(EventDraft::new("Dentist", at(19, 9, 0), at(19, 10, 0), EventType::Appointment))
            .unwrap();
        assert_eq!(cal.get(&id).unwrap().color, "#10b981");
    }

    #[test]
    fn add_rejects_empty_or_inverted_range() {
        let mut cal = Calendar::new();
        let err = cal
            .add(EventDraft::new("Zero", at(19, 9, 0), at(19, 9, 0), EventType::Other))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidEventRange { .. }));
        assert!(cal.events().is_empty());
    }

    #[test]
    fn update_validates_merged_range() {
        let mut cal = Calendar::new();
        let id = cal
            .add(EventDraft::new("Review", at(19, 14, 0), at(19, 15, 0), EventType::Work))
            .unwrap();
        let err = cal
            .update(
                &id,
                EventPatch {
                    start: Some(at(19, 16, 0)),
                    title: Some("Moved".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidEventRange { .. }));
        assert_eq!(cal.get(&id).unwrap().title, "Review");
    }

    #[test]
    fn date_queries() {
        let mut cal = Calendar::new();
        cal.add(EventDraft::new("B", at(20, 11, 0), at(20, 12, 0), EventType::Work))
            .unwrap();
        cal.add(EventDraft::new("A", at(19, 9, 0), at(19, 10, 0), EventType::Work))
            .unwrap();
        cal.add(EventDraft::new("C", at(25, 9, 0), at(25, 10, 0), EventType::Work))
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(cal.on_date(today).len(), 1);

        let week: Vec<&str> = cal
            .between(today, NaiveDate::from_ymd_opt(2026, 10, 24).unwrap())
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(week, ["A", "B"]);
    }

    #[test]
    fn remove_unknown_event() {
        let mut cal = Calendar::new();
        assert!(matches!(
            cal.remove("missing"),
            Err(CoreError::NotFound { kind: EntityKind::Event, .. })
        ));
    }
}
