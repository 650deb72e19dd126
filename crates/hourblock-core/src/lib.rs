//! # Hourblock Core Library
//!
//! This library provides the business logic for Hourblock, a day planner that
//! splits the day into 24 one-hour blocks of 60 minutes each. The CLI binary is
//! a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Blocks**: the 24 hour buckets and the 60-minute capacity rule
//! - **Calendar**: events, their distribution into per-hour fragments, and
//!   auto/manual sync into the blocks
//! - **Timer**: a single-slot, tick-driven session countdown
//! - **Ledger**: daily goals with subtasks and the unscheduled-todo list
//! - **Stats**: per-day completion and time roll-ups
//! - **Storage**: TOML-based configuration (day state is in-memory only)
//!
//! ## Key Components
//!
//! - [`DayPlanner`]: owns all day state and is the only way to mutate it
//! - [`BlockSet`]: the hour blocks
//! - [`SessionTimer`]: session state machine
//! - [`Config`]: application configuration management

pub mod blocks;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod events;
pub mod ledger;
pub mod planner;
pub mod presets;
pub mod stats;
pub mod storage;
pub mod timer;

pub use blocks::{
    BlockSet, BlockSnapshot, BlockStatus, CapacitySeverity, HourBlock, HourProgress, QuickFill,
    Task, TaskDraft, TaskOrigin, TaskPatch,
};
pub use calendar::{CalendarEvent, EventDraft, EventPatch, EventType, SyncMode, SyncReport};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, EntityKind, ValidationError};
pub use events::Event;
pub use ledger::{DailyGoal, Priority, TodoDraft, UnscheduledTodo};
pub use planner::DayPlanner;
pub use presets::DurationPresets;
pub use stats::DailyAnalytics;
pub use storage::Config;
pub use timer::{ExpiryDecision, SessionSnapshot, SessionState, SessionTimer};
