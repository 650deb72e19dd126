//! Writing calendar fragments into the hour blocks.
//!
//! A rebuild strips every calendar-derived task and re-derives all of today's
//! fragments from scratch. Fragment ids are deterministic, so rebuilding an
//! unchanged calendar leaves the blocks byte-for-byte identical.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{distribute, CalendarEvent};
use crate::blocks::{BlockSet, Task, TaskOrigin};
use crate::error::{CoreError, Result};

/// When calendar changes reach the blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Rebuild after every calendar mutation.
    #[default]
    Auto,
    /// Rebuild only on request; single events can be imported.
    Manual,
}

/// What a rebuild touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub events: usize,
    pub removed: usize,
    pub inserted: usize,
}

/// Tasks for every fragment of `event`, paired with their hour.
pub fn fragment_tasks(event: &CalendarEvent) -> Result<Vec<(u8, Task)>> {
    let fragments = distribute(event.start, event.end, &event.title)?;
    Ok(fragments
        .into_iter()
        .enumerate()
        .map(|(index, fragment)| {
            let task = Task {
                id: format!("calendar-task-{}-{index}", event.id),
                title: fragment.label,
                duration_min: fragment.minutes,
                color: event.color.clone(),
                tag: event.event_type.as_str().to_string(),
                completed: false,
                started_at: None,
                ended_at: None,
                origin: TaskOrigin::CalendarFragment {
                    event_id: event.id.clone(),
                },
            };
            (fragment.hour, task)
        })
        .collect())
}

/// Strip all calendar fragments, then re-insert fragments for every event
/// starting on `today`, in calendar order.
pub fn rebuild(blocks: &mut BlockSet, events: &[CalendarEvent], today: NaiveDate) -> SyncReport {
    let mut report = SyncReport {
        removed: blocks.strip_fragments(),
        ..Default::default()
    };

    for event in events.iter().filter(|e| e.is_on(today)) {
        match fragment_tasks(event) {
            Ok(tasks) => {
                report.events += 1;
                report.inserted += tasks.len();
                for (hour, task) in tasks {
                    blocks.insert_fragment(hour, task);
                }
            }
            Err(e) => {
                tracing::warn!(event_id = %event.id, error = %e, "skipping event during rebuild");
            }
        }
    }

    tracing::info!(
        %today,
        events = report.events,
        removed = report.removed,
        inserted = report.inserted,
        "calendar rebuilt into blocks"
    );
    report
}

/// Insert one event's fragments, replacing only that event's earlier ones.
///
/// Returns the number of fragments inserted.
pub fn import_event(blocks: &mut BlockSet, event: &CalendarEvent, today: NaiveDate) -> Result<usize> {
    if !event.is_on(today) {
        return Err(CoreError::ImportRestricted {
            event_id: event.id.clone(),
            date: event.date(),
        });
    }
    let tasks = fragment_tasks(event)?;
    blocks.strip_fragments_of(&event.id);
    let inserted = tasks.len();
    for (hour, task) in tasks {
        blocks.insert_fragment(hour, task);
    }
    tracing::info!(event_id = %event.id, inserted, "calendar event imported");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{CapacitySeverity, TaskDraft};
    use crate::calendar::{Calendar, EventDraft, EventType};
    use chrono::NaiveDateTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn calendar() -> Calendar {
        let mut cal = Calendar::new();
        cal.add(EventDraft::new("Planning", at(19, 9, 30), at(19, 11, 0), EventType::Meeting))
            .unwrap();
        cal.add(EventDraft::new("Gym", at(19, 18, 0), at(19, 18, 45), EventType::Personal))
            .unwrap();
        cal.add(EventDraft::new("Tomorrow", at(20, 9, 0), at(20, 10, 0), EventType::Work))
            .unwrap();
        cal
    }

    #[test]
    fn fragments_carry_provenance() {
        let cal = calendar();
        let event = &cal.events()[0];
        let tasks = fragment_tasks(event).unwrap();
        assert_eq!(tasks.len(), 2);
        let (hour, first) = &tasks[0];
        assert_eq!(*hour, 9);
        assert_eq!(first.id, format!("calendar-task-{}-0", event.id));
        assert_eq!(first.title, "Planning (1/2)");
        assert_eq!(first.tag, "meeting");
        assert_eq!(first.event_id(), Some(event.id.as_str()));
    }

    #[test]
    fn rebuild_only_uses_todays_events() {
        let cal = calendar();
        let mut blocks = BlockSet::new();
        let report = rebuild(&mut blocks, cal.events(), today());
        assert_eq!(report.events, 2);
        assert_eq!(report.inserted, 3);
        assert_eq!(blocks.block(9).unwrap().used_minutes(), 30);
        assert_eq!(blocks.block(10).unwrap().used_minutes(), 60);
        assert_eq!(blocks.block(18).unwrap().used_minutes(), 45);
    }

    #[test]
    fn rebuild_is_idempotent_and_keeps_manual_tasks() {
        let cal = calendar();
        let mut blocks = BlockSet::new();
        blocks.add_task(9, TaskDraft::new("Inbox", 20)).unwrap();

        rebuild(&mut blocks, cal.events(), today());
        let first = blocks.clone();
        let report = rebuild(&mut blocks, cal.events(), today());

        assert_eq!(blocks, first);
        assert_eq!(report.removed, 3);
        assert_eq!(blocks.block(9).unwrap().tasks()[0].title, "Inbox");
    }

    #[test]
    fn rebuild_allows_overbooking() {
        let cal = calendar();
        let mut blocks = BlockSet::new();
        blocks.add_task(10, TaskDraft::new("Focus", 30)).unwrap();
        rebuild(&mut blocks, cal.events(), today());
        assert_eq!(
            blocks.block(10).unwrap().severity(),
            CapacitySeverity::Overbooked { by: 30 }
        );
    }

    #[test]
    fn import_rejects_other_days() {
        let cal = calendar();
        let mut blocks = BlockSet::new();
        let err = import_event(&mut blocks, &cal.events()[2], today()).unwrap_err();
        assert!(matches!(err, CoreError::ImportRestricted { .. }));
        assert_eq!(blocks.tasks().count(), 0);
    }

    #[test]
    fn import_leaves_other_events_alone_and_does_not_duplicate() {
        let cal = calendar();
        let mut blocks = BlockSet::new();
        import_event(&mut blocks, &cal.events()[1], today()).unwrap();
        import_event(&mut blocks, &cal.events()[0], today()).unwrap();
        import_event(&mut blocks, &cal.events()[0], today()).unwrap();

        assert_eq!(blocks.fragments_of(&cal.events()[0].id).count(), 2);
        assert_eq!(blocks.fragments_of(&cal.events()[1].id).count(), 1);
    }
}
