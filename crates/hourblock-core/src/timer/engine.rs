//! Session timer implementation.
//!
//! The session timer is a tick-driven countdown. It does not use internal
//! threads - the caller is responsible for calling `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!         Expired --complete--> Idle
//!            |
//!            +-----continue---> Running
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::new();
//! timer.start(&task, clock.now());
//! // Once per second:
//! if let Some(Event::SessionExpired { .. }) = timer.tick(clock.now()) {
//!     timer.resolve(ExpiryDecision::Continue, clock.now())?;
//! }
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blocks::Task;
use crate::error::{CoreError, Result};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Paused,
    /// Countdown reached zero; waiting for an [`ExpiryDecision`].
    Expired,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// Answer to an expired session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryDecision {
    /// Mark the task completed and end the session.
    Complete,
    /// Run the full duration again.
    Continue,
}

/// The task a session is counting down for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTask {
    pub task_id: String,
    pub title: String,
    pub duration_min: u32,
}

impl ActiveTask {
    fn duration_secs(&self) -> u64 {
        self.duration_min as u64 * 60
    }
}

/// Read-only view of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub task: Option<ActiveTask>,
    pub remaining_secs: u64,
    pub total_secs: u64,
    /// 0.0 .. 1.0 of the session elapsed.
    pub progress: f64,
    /// `HH:MM:SS` countdown.
    pub display: String,
}

/// Single-slot session countdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimer {
    state: SessionState,
    active: Option<ActiveTask>,
    remaining_secs: u64,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn active(&self) -> Option<&ActiveTask> {
        self.active.as_ref()
    }

    pub fn is_active_task(&self, task_id: &str) -> bool {
        self.active.as_ref().is_some_and(|a| a.task_id == task_id)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.active.as_ref().map(ActiveTask::duration_secs).unwrap_or(0)
    }

    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            task: self.active.clone(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            progress: self.progress(),
            display: format_hms(self.remaining_secs),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down `task`. Any current session is replaced.
    pub fn start(&mut self, task: &Task, now: NaiveDateTime) -> Event {
        if let Some(previous) = &self.active {
            tracing::debug!(task_id = %previous.task_id, "session replaced");
        }
        let active = ActiveTask {
            task_id: task.id.clone(),
            title: task.title.clone(),
            duration_min: task.duration_min,
        };
        self.remaining_secs = active.duration_secs();
        self.state = SessionState::Running;
        let event = Event::SessionStarted {
            task_id: active.task_id.clone(),
            duration_secs: self.remaining_secs,
            at: now,
        };
        self.active = Some(active);
        event
    }

    pub fn pause(&mut self, now: NaiveDateTime) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.state = SessionState::Paused;
        Some(Event::SessionPaused {
            task_id: self.active.as_ref()?.task_id.clone(),
            remaining_secs: self.remaining_secs,
            at: now,
        })
    }

    pub fn resume(&mut self, now: NaiveDateTime) -> Option<Event> {
        if self.state != SessionState::Paused {
            return None;
        }
        self.state = SessionState::Running;
        Some(Event::SessionResumed {
            task_id: self.active.as_ref()?.task_id.clone(),
            remaining_secs: self.remaining_secs,
            at: now,
        })
    }

    /// Running <-> Paused. No-op in other states.
    pub fn toggle(&mut self, now: NaiveDateTime) -> Option<Event> {
        match self.state {
            SessionState::Running => self.pause(now),
            SessionState::Paused => self.resume(now),
            _ => None,
        }
    }

    /// Call once per second. Returns `Some(Event::SessionExpired)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.state = SessionState::Expired;
        let task_id = self.active.as_ref()?.task_id.clone();
        tracing::info!(%task_id, "session expired");
        Some(Event::SessionExpired {
            task_id,
            at: now,
        })
    }

    /// Answer an expired session. Only valid in `Expired`.
    ///
    /// `Complete` ends the session and returns `SessionCleared`; the caller is
    /// responsible for marking the task done. `Continue` restarts the full
    /// duration and returns `SessionExtended`.
    pub fn resolve(&mut self, decision: ExpiryDecision, now: NaiveDateTime) -> Result<Event> {
        if self.state != SessionState::Expired {
            return Err(CoreError::InvalidTransition {
                state: self.state.to_string(),
                action: "resolve expiry".into(),
            });
        }
        match decision {
            ExpiryDecision::Complete => self.clear(now).ok_or_else(|| CoreError::InvalidTransition {
                state: self.state.to_string(),
                action: "complete without a task".into(),
            }),
            ExpiryDecision::Continue => {
                let active = self.active.as_ref().ok_or_else(|| CoreError::InvalidTransition {
                    state: self.state.to_string(),
                    action: "continue without a task".into(),
                })?;
                self.remaining_secs = active.duration_secs();
                self.state = SessionState::Running;
                Ok(Event::SessionExtended {
                    task_id: active.task_id.clone(),
                    duration_secs: self.remaining_secs,
                    at: now,
                })
            }
        }
    }

    /// Drop the session, discarding any remaining time.
    pub fn clear(&mut self, now: NaiveDateTime) -> Option<Event> {
        let active = self.active.take()?;
        let discarded_secs = std::mem::take(&mut self.remaining_secs);
        self.state = SessionState::Idle;
        Some(Event::SessionCleared {
            task_id: active.task_id,
            discarded_secs,
            at: now,
        })
    }
}

/// Format seconds as `HH:MM:SS`.
pub fn format_hms(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
