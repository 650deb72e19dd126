//! Core error types for hourblock-core.
//!
//! Every engine operation reports failure synchronously through [`CoreError`].
//! Nothing is retried internally; the caller decides whether to edit the input
//! and resubmit.

use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Core error type for hourblock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Insertion or edit would push a block past its 60-minute capacity.
    #[error(
        "Cannot schedule {requested} minutes at {hour:02}:00: only {remaining} minutes remaining in this hour block"
    )]
    CapacityExceeded {
        hour: u8,
        requested: u32,
        remaining: u32,
    },

    /// Operation referenced a missing record.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    /// Manual import is only allowed for events starting today.
    #[error("Can only import today's events to time blocks (event '{event_id}' is on {date})")]
    ImportRestricted { event_id: String, date: NaiveDate },

    /// Event end is not after its start.
    #[error("Invalid event range: end ({end}) must be after start ({start})")]
    InvalidEventRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Session command not valid in the current session state.
    #[error("Cannot {action} while session is {state}")]
    InvalidTransition { state: String, action: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CoreError {
    pub(crate) fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Kind of record a [`CoreError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Event,
    Goal,
    Subtask,
    Todo,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Task => "Task",
            EntityKind::Event => "Calendar event",
            EntityKind::Goal => "Goal",
            EntityKind::Subtask => "Subtask",
            EntityKind::Todo => "Todo",
        };
        f.write_str(name)
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be resolved or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Hour index outside 0..=23
    #[error("Hour {0} is out of range (expected 0-23)")]
    HourOutOfRange(u8),

    /// Durations are positive minutes
    #[error("Duration must be a positive number of minutes")]
    ZeroDuration,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_carries_remaining_minutes() {
        let err = CoreError::CapacityExceeded {
            hour: 9,
            requested: 30,
            remaining: 15,
        };
        assert_eq!(
            err.to_string(),
            "Cannot schedule 30 minutes at 09:00: only 15 minutes remaining in this hour block"
        );
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = CoreError::not_found(EntityKind::Event, "event-1");
        assert_eq!(err.to_string(), "Calendar event 'event-1' not found");
    }

    /// Disk and parse failures surface as `ConfigError`; the engine itself
    /// never touches I/O.
    #[test]
    fn every_variant_is_produced_by_the_engine() {
        fn origin(err: &CoreError) -> &'static str {
            match err {
                CoreError::CapacityExceeded { .. } => "blocks",
                CoreError::NotFound { .. } => "lookup",
                CoreError::ImportRestricted { .. } => "calendar",
                CoreError::InvalidEventRange { .. } => "calendar",
                CoreError::InvalidTransition { .. } => "timer",
                CoreError::Validation(_) => "input",
                CoreError::Config(_) => "storage",
            }
        }

        let err: CoreError = ConfigError::UnknownKey("ui.dark_mode".into()).into();
        assert_eq!(origin(&err), "storage");
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: ui.dark_mode"
        );

        let err: CoreError = ValidationError::HourOutOfRange(24).into();
        assert_eq!(origin(&err), "input");
    }
}
