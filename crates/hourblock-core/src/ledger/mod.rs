//! Unscheduled work: the todo backlog and the day's goals.
//!
//! Neither list schedules anything on its own. Todos leave the ledger when
//! they are placed into a block or attached to a goal.

mod goals;
mod todos;

pub use goals::{DailyGoal, GoalBook};
pub use todos::{Priority, TodoDraft, TodoLedger, UnscheduledTodo};
