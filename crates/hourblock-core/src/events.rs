use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calendar::{SyncMode, SyncReport};

/// Every state change in the planner produces an Event.
/// The presentation layer polls for them with `DayPlanner::drain_events`.
///
/// `at` is local wall-clock time read from the planner's clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        hour: u8,
        task_id: String,
        at: NaiveDateTime,
    },
    TaskUpdated {
        hour: u8,
        task_id: String,
        at: NaiveDateTime,
    },
    TaskDeleted {
        hour: u8,
        task_id: String,
        at: NaiveDateTime,
    },
    TaskCompleted {
        hour: u8,
        task_id: String,
        at: NaiveDateTime,
    },
    BlockQuickFilled {
        hour: u8,
        task_ids: Vec<String>,
        at: NaiveDateTime,
    },
    /// Todo moved out of the ledger into a block.
    TodoScheduled {
        todo_id: String,
        hour: u8,
        task_id: String,
        at: NaiveDateTime,
    },
    /// Todo moved out of the ledger into a goal's subtasks.
    TodoAssigned {
        todo_id: String,
        goal_id: String,
        subtask_id: String,
        at: NaiveDateTime,
    },
    CalendarEventAdded {
        event_id: String,
        at: NaiveDateTime,
    },
    CalendarEventUpdated {
        event_id: String,
        at: NaiveDateTime,
    },
    CalendarEventDeleted {
        event_id: String,
        fragments_removed: usize,
        at: NaiveDateTime,
    },
    CalendarEventImported {
        event_id: String,
        fragments: usize,
        at: NaiveDateTime,
    },
    CalendarSynced {
        report: SyncReport,
        at: NaiveDateTime,
    },
    SyncModeChanged {
        mode: SyncMode,
        at: NaiveDateTime,
    },
    SessionStarted {
        task_id: String,
        duration_secs: u64,
        at: NaiveDateTime,
    },
    SessionPaused {
        task_id: String,
        remaining_secs: u64,
        at: NaiveDateTime,
    },
    SessionResumed {
        task_id: String,
        remaining_secs: u64,
        at: NaiveDateTime,
    },
    /// Countdown hit zero. The caller must answer with complete or continue.
    SessionExpired {
        task_id: String,
        at: NaiveDateTime,
    },
    /// Expired session restarted for another full duration.
    SessionExtended {
        task_id: String,
        duration_secs: u64,
        at: NaiveDateTime,
    },
    /// Session ended. Remaining time is dropped, never credited.
    SessionCleared {
        task_id: String,
        discarded_secs: u64,
        at: NaiveDateTime,
    },
    /// Wall clock crossed into a new hour; block statuses shifted.
    HourChanged {
        hour: u8,
        at: NaiveDateTime,
    },
}
