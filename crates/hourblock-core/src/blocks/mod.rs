//! Hour blocks and the tasks they hold.
//!
//! A day is 24 fixed blocks, one per hour. Each block has a nominal capacity
//! of [`BLOCK_CAPACITY_MIN`] minutes. Manual scheduling never exceeds it;
//! calendar fragments may, and the overflow is reported through
//! [`CapacitySeverity`].

mod capacity;

pub use capacity::{BlockSet, QuickFill};

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Number of blocks in a day.
pub const HOURS_PER_DAY: u8 = 24;

/// Nominal minutes per block.
pub const BLOCK_CAPACITY_MIN: u32 = 60;

/// Color used for tasks created without an explicit one.
pub const DEFAULT_TASK_COLOR: &str = "#3b82f6";

/// Tag used for tasks created without an explicit one.
pub const DEFAULT_TASK_TAG: &str = "General";

/// Where a task came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskOrigin {
    /// Added by hand, by quick-fill, or by scheduling a todo.
    Manual,
    /// Derived from a calendar event. `event_id` is a lookup key only.
    CalendarFragment { event_id: String },
}

/// A unit of work living in exactly one hour block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub duration_min: u32,
    pub color: String,
    pub tag: String,
    pub completed: bool,
    #[serde(default)]
    pub started_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub ended_at: Option<NaiveDateTime>,
    pub origin: TaskOrigin,
}

impl Task {
    pub(crate) fn from_draft(id: String, draft: TaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            duration_min: draft.duration_min,
            color: draft.color,
            tag: draft.tag,
            completed: false,
            started_at: None,
            ended_at: None,
            origin: TaskOrigin::Manual,
        }
    }

    pub fn is_calendar_fragment(&self) -> bool {
        matches!(self.origin, TaskOrigin::CalendarFragment { .. })
    }

    /// Id of the calendar event this task was cut from, if any.
    pub fn event_id(&self) -> Option<&str> {
        match &self.origin {
            TaskOrigin::CalendarFragment { event_id } => Some(event_id),
            TaskOrigin::Manual => None,
        }
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub duration_min: u32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_tag")]
    pub tag: String,
}

fn default_color() -> String {
    DEFAULT_TASK_COLOR.to_string()
}

fn default_tag() -> String {
    DEFAULT_TASK_TAG.to_string()
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, duration_min: u32) -> Self {
        Self {
            title: title.into(),
            duration_min,
            color: default_color(),
            tag: default_tag(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Partial update for a task. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub duration_min: Option<u32>,
    pub color: Option<String>,
    pub tag: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(duration) = self.duration_min {
            task.duration_min = duration;
        }
        if let Some(color) = self.color {
            task.color = color;
        }
        if let Some(tag) = self.tag {
            task.tag = tag;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// One of the 24 fixed blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBlock {
    hour: u8,
    tasks: Vec<Task>,
}

impl HourBlock {
    pub(crate) fn new(hour: u8) -> Self {
        Self {
            hour,
            tasks: Vec::new(),
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    /// Saturates at `u32::MAX`.
    pub fn used_minutes(&self) -> u32 {
        self.tasks
            .iter()
            .fold(0u32, |acc, t| acc.saturating_add(t.duration_min))
    }

    pub fn remaining_minutes(&self) -> u32 {
        BLOCK_CAPACITY_MIN.saturating_sub(self.used_minutes())
    }

    pub fn severity(&self) -> CapacitySeverity {
        CapacitySeverity::from_used(self.used_minutes())
    }
}

/// Position of a block relative to the current hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    Past,
    Present,
    Future,
}

impl BlockStatus {
    pub fn classify(hour: u8, current_hour: u8) -> Self {
        use std::cmp::Ordering;
        match hour.cmp(&current_hour) {
            Ordering::Less => BlockStatus::Past,
            Ordering::Equal => BlockStatus::Present,
            Ordering::Greater => BlockStatus::Future,
        }
    }
}

/// How full a block is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum CapacitySeverity {
    Open { remaining: u32 },
    Full,
    /// Only reachable through calendar fragments.
    Overbooked { by: u32 },
}

impl CapacitySeverity {
    pub fn from_used(used: u32) -> Self {
        if used < BLOCK_CAPACITY_MIN {
            CapacitySeverity::Open {
                remaining: BLOCK_CAPACITY_MIN - used,
            }
        } else if used == BLOCK_CAPACITY_MIN {
            CapacitySeverity::Full
        } else {
            CapacitySeverity::Overbooked {
                by: used - BLOCK_CAPACITY_MIN,
            }
        }
    }

    pub fn is_overbooked(&self) -> bool {
        matches!(self, CapacitySeverity::Overbooked { .. })
    }

    /// Human-readable label, e.g. "Overbooked by 15 minutes".
    pub fn label(&self) -> String {
        match self {
            CapacitySeverity::Open { remaining } => format!("{remaining} minutes free"),
            CapacitySeverity::Full => "Full".to_string(),
            CapacitySeverity::Overbooked { by } => format!("Overbooked by {by} minutes"),
        }
    }
}

/// Read-only view of a block at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub hour: u8,
    pub status: BlockStatus,
    pub used_minutes: u32,
    pub remaining_minutes: u32,
    pub severity: CapacitySeverity,
    pub tasks: Vec<Task>,
}

/// Progress through the current wall-clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourProgress {
    pub hour: u8,
    /// 0.0 .. 100.0
    pub elapsed_pct: f64,
    pub remaining_minutes: u32,
}

impl HourProgress {
    pub fn at(now: NaiveDateTime) -> Self {
        let minute = now.minute();
        Self {
            hour: now.hour() as u8,
            elapsed_pct: minute as f64 / 60.0 * 100.0,
            remaining_minutes: 60 - minute,
        }
    }
}

pub(crate) fn check_hour(hour: u8) -> Result<()> {
    if hour >= HOURS_PER_DAY {
        return Err(ValidationError::HourOutOfRange(hour).into());
    }
    Ok(())
}

pub(crate) fn check_duration(duration_min: u32) -> Result<()> {
    if duration_min == 0 {
        return Err(ValidationError::ZeroDuration.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn status_follows_current_hour() {
        assert_eq!(BlockStatus::classify(8, 10), BlockStatus::Past);
        assert_eq!(BlockStatus::classify(10, 10), BlockStatus::Present);
        assert_eq!(BlockStatus::classify(23, 10), BlockStatus::Future);
    }

    #[test]
    fn severity_levels() {
        assert_eq!(
            CapacitySeverity::from_used(45),
            CapacitySeverity::Open { remaining: 15 }
        );
        assert_eq!(CapacitySeverity::from_used(60), CapacitySeverity::Full);
        let over = CapacitySeverity::from_used(75);
        assert_eq!(over, CapacitySeverity::Overbooked { by: 15 });
        assert_eq!(over.label(), "Overbooked by 15 minutes");
    }

    #[test]
    fn patch_leaves_unset_fields() {
        let mut task = Task::from_draft("t1".into(), TaskDraft::new("Write", 20).with_tag("Work"));
        TaskPatch {
            title: Some("Write docs".into()),
            ..Default::default()
        }
        .apply(&mut task);
        assert_eq!(task.title, "Write docs");
        assert_eq!(task.duration_min, 20);
        assert_eq!(task.tag, "Work");
    }

    #[test]
    fn hour_progress_midway() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 15, 0)
            .unwrap();
        let progress = HourProgress::at(now);
        assert_eq!(progress.hour, 14);
        assert_eq!(progress.remaining_minutes, 45);
        assert!((progress.elapsed_pct - 25.0).abs() < f64::EPSILON);
    }
}
