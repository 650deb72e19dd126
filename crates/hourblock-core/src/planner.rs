//! The day planner: one owner for every piece of day state.
//!
//! All mutations go through `&mut DayPlanner`, so a calendar rebuild can never
//! interleave with a manual edit. Each state change is recorded as an
//! [`Event`] for the caller to pick up with [`DayPlanner::drain_events`].

use chrono::NaiveDate;

use crate::blocks::{BlockSet, BlockSnapshot, HourProgress, QuickFill, TaskDraft, TaskPatch};
use crate::calendar::{self, Calendar, CalendarEvent, EventDraft, EventPatch, SyncMode, SyncReport};
use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, EntityKind, Result};
use crate::events::Event;
use crate::ledger::{GoalBook, TodoDraft, TodoLedger, UnscheduledTodo};
use crate::presets::DurationPresets;
use crate::stats::DailyAnalytics;
use crate::storage::Config;
use crate::timer::{ExpiryDecision, SessionSnapshot, SessionState, SessionTimer};

pub struct DayPlanner<C: Clock = SystemClock> {
    clock: C,
    blocks: BlockSet,
    calendar: Calendar,
    todos: TodoLedger,
    goals: GoalBook,
    session: SessionTimer,
    sync_mode: SyncMode,
    quick_fill_minutes: u32,
    presets: DurationPresets,
    observed_hour: u8,
    pending: Vec<Event>,
}

impl Default for DayPlanner<SystemClock> {
    fn default() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> DayPlanner<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_config(clock, &Config::default())
    }

    pub fn with_config(clock: C, config: &Config) -> Self {
        let observed_hour = clock.current_hour();
        Self {
            clock,
            blocks: BlockSet::new(),
            calendar: Calendar::new(),
            todos: TodoLedger::new(),
            goals: GoalBook::new(),
            session: SessionTimer::new(),
            sync_mode: config.sync_mode(),
            quick_fill_minutes: config.planner.quick_fill_minutes,
            presets: config.presets(),
            observed_hour,
            pending: Vec::new(),
        }
    }

    fn emit(&mut self, event: Event) {
        self.pending.push(event);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }

    /// Snapshot of all 24 blocks with status relative to the current hour.
    pub fn blocks(&self) -> Vec<BlockSnapshot> {
        self.blocks.snapshots(self.clock.current_hour())
    }

    pub fn block_set(&self) -> &BlockSet {
        &self.blocks
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn todos(&self) -> &TodoLedger {
        &self.todos
    }

    pub fn goals(&self) -> &GoalBook {
        &self.goals
    }

    pub fn session(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn analytics(&self) -> DailyAnalytics {
        DailyAnalytics::compute(self.blocks.tasks(), self.goals.list())
    }

    pub fn events_for_date(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.calendar.on_date(date)
    }

    pub fn events_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&CalendarEvent> {
        self.calendar.between(from, to)
    }

    pub fn hour_progress(&self) -> HourProgress {
        HourProgress::at(self.clock.now())
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    pub fn durations(&self) -> Vec<u32> {
        self.presets.all()
    }

    pub fn add_duration_preset(&mut self, minutes: u32) -> bool {
        self.presets.add(minutes)
    }

    pub fn remove_duration_preset(&mut self, minutes: u32) -> bool {
        self.presets.remove(minutes)
    }

    /// Take every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    // ── Ticks ────────────────────────────────────────────────────────

    /// The one-second tick: advances a running session and notices hour
    /// changes. Returns the events it produced (they are also queued).
    pub fn tick(&mut self) -> Vec<Event> {
        let mut produced = Vec::new();

        let hour = self.clock.current_hour();
        if hour != self.observed_hour {
            self.observed_hour = hour;
            tracing::debug!(hour, "hour changed");
            produced.push(Event::HourChanged {
                hour,
                at: self.clock.now(),
            });
        }

        if let Some(event) = self.session.tick(self.clock.now()) {
            produced.push(event);
        }

        self.pending.extend(produced.iter().cloned());
        produced
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, hour: u8, draft: TaskDraft) -> Result<String> {
        let task_id = self.blocks.add_task(hour, draft)?;
        self.emit(Event::TaskAdded {
            hour,
            task_id: task_id.clone(),
            at: self.clock.now(),
        });
        Ok(task_id)
    }

    pub fn update_task(&mut self, hour: u8, task_id: &str, patch: TaskPatch) -> Result<()> {
        self.blocks.update_task(hour, task_id, patch)?;
        self.emit(Event::TaskUpdated {
            hour,
            task_id: task_id.to_string(),
            at: self.clock.now(),
        });
        Ok(())
    }

    /// Remove a task. Deleting the session's task also ends the session.
    pub fn delete_task(&mut self, hour: u8, task_id: &str) -> Result<()> {
        self.blocks.delete_task(hour, task_id)?;
        self.emit(Event::TaskDeleted {
            hour,
            task_id: task_id.to_string(),
            at: self.clock.now(),
        });
        if self.session.is_active_task(task_id) {
            if let Some(event) = self.session.clear(self.clock.now()) {
                self.emit(event);
            }
        }
        Ok(())
    }

    /// Mark a task completed. If it is the session's task the session ends
    /// and its remaining time is discarded.
    pub fn complete_task(&mut self, task_id: &str) -> Result<()> {
        let hour = self.blocks.complete_task(task_id, self.clock.now())?;
        self.emit(Event::TaskCompleted {
            hour,
            task_id: task_id.to_string(),
            at: self.clock.now(),
        });
        if self.session.is_active_task(task_id) {
            if let Some(event) = self.session.clear(self.clock.now()) {
                self.emit(event);
            }
        }
        Ok(())
    }

    pub fn quick_fill(&mut self, hour: u8, chunk_min: u32) -> Result<QuickFill> {
        let outcome = self.blocks.quick_fill(hour, chunk_min)?;
        if let QuickFill::Filled { task_ids } = &outcome {
            self.emit(Event::BlockQuickFilled {
                hour,
                task_ids: task_ids.clone(),
                at: self.clock.now(),
            });
        }
        Ok(outcome)
    }

    /// Quick-fill with the configured chunk size.
    pub fn quick_fill_default(&mut self, hour: u8) -> Result<QuickFill> {
        self.quick_fill(hour, self.quick_fill_minutes)
    }

    // ── Todos ────────────────────────────────────────────────────────

    pub fn add_todo(&mut self, draft: TodoDraft) -> Result<String> {
        self.todos.add(draft)
    }

    pub fn remove_todo(&mut self, todo_id: &str) -> Result<UnscheduledTodo> {
        self.todos.remove(todo_id)
    }

    /// Move a todo into a block. The todo stays in the ledger if the block
    /// has no room.
    pub fn schedule_todo(&mut self, todo_id: &str, hour: u8) -> Result<String> {
        let draft = self
            .todos
            .get(todo_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Todo, todo_id))?
            .to_draft();
        let task_id = self.blocks.add_task(hour, draft)?;
        self.todos.remove(todo_id)?;
        self.emit(Event::TodoScheduled {
            todo_id: todo_id.to_string(),
            hour,
            task_id: task_id.clone(),
            at: self.clock.now(),
        });
        Ok(task_id)
    }

    /// Move a todo into a goal's subtasks.
    pub fn assign_todo_to_goal(&mut self, todo_id: &str, goal_id: &str) -> Result<String> {
        let draft = self
            .todos
            .get(todo_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Todo, todo_id))?
            .to_draft();
        let subtask_id = self.goals.add_subtask(goal_id, draft)?;
        self.todos.remove(todo_id)?;
        self.emit(Event::TodoAssigned {
            todo_id: todo_id.to_string(),
            goal_id: goal_id.to_string(),
            subtask_id: subtask_id.clone(),
            at: self.clock.now(),
        });
        Ok(subtask_id)
    }

    // ── Goals ────────────────────────────────────────────────────────

    pub fn add_goal(&mut self, title: impl Into<String>) -> String {
        self.goals.add(title)
    }

    pub fn toggle_goal(&mut self, goal_id: &str) -> Result<bool> {
        self.goals.toggle(goal_id)
    }

    pub fn add_subtask(&mut self, goal_id: &str, draft: TaskDraft) -> Result<String> {
        self.goals.add_subtask(goal_id, draft)
    }

    pub fn toggle_subtask(&mut self, goal_id: &str, subtask_id: &str) -> Result<bool> {
        self.goals.toggle_subtask(goal_id, subtask_id)
    }

    // ── Calendar ─────────────────────────────────────────────────────

    pub fn add_event(&mut self, draft: EventDraft) -> Result<String> {
        let event_id = self.calendar.add(draft)?;
        self.emit(Event::CalendarEventAdded {
            event_id: event_id.clone(),
            at: self.clock.now(),
        });
        self.auto_sync();
        Ok(event_id)
    }

    pub fn update_event(&mut self, event_id: &str, patch: EventPatch) -> Result<()> {
        self.calendar.update(event_id, patch)?;
        self.emit(Event::CalendarEventUpdated {
            event_id: event_id.to_string(),
            at: self.clock.now(),
        });
        self.auto_sync();
        Ok(())
    }

    /// Remove an event and its fragments, whatever the sync mode.
    pub fn delete_event(&mut self, event_id: &str) -> Result<()> {
        self.calendar.remove(event_id)?;
        let fragments_removed = self.blocks.strip_fragments_of(event_id);
        self.emit(Event::CalendarEventDeleted {
            event_id: event_id.to_string(),
            fragments_removed,
            at: self.clock.now(),
        });
        self.auto_sync();
        self.drop_orphaned_session();
        Ok(())
    }

    /// Switching into auto mode rebuilds immediately.
    pub fn set_sync_mode(&mut self, mode: SyncMode) {
        if mode == self.sync_mode {
            return;
        }
        self.sync_mode = mode;
        self.emit(Event::SyncModeChanged {
            mode,
            at: self.clock.now(),
        });
        self.auto_sync();
    }

    /// Strip and rebuild every calendar fragment for today.
    pub fn sync_now(&mut self) -> SyncReport {
        let today = self.today();
        let report = calendar::rebuild(&mut self.blocks, self.calendar.events(), today);
        self.emit(Event::CalendarSynced {
            report,
            at: self.clock.now(),
        });
        self.drop_orphaned_session();
        report
    }

    /// Insert one of today's events without touching other fragments.
    pub fn import_event(&mut self, event_id: &str) -> Result<usize> {
        let today = self.today();
        let event = self
            .calendar
            .get(event_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Event, event_id))?;
        let fragments = calendar::import_event(&mut self.blocks, event, today)?;
        self.emit(Event::CalendarEventImported {
            event_id: event_id.to_string(),
            fragments,
            at: self.clock.now(),
        });
        self.drop_orphaned_session();
        Ok(fragments)
    }

    fn auto_sync(&mut self) {
        if self.sync_mode == SyncMode::Auto {
            self.sync_now();
        }
    }

    /// Clear the session if its task no longer sits in any block.
    fn drop_orphaned_session(&mut self) {
        let orphaned = self
            .session
            .active()
            .is_some_and(|a| self.blocks.find_task(&a.task_id).is_none());
        if !orphaned {
            return;
        }
        if let Some(event) = self.session.clear(self.clock.now()) {
            tracing::debug!("session task removed by calendar change");
            self.emit(event);
        }
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Start counting down a scheduled task, replacing any current session.
    pub fn start_session(&mut self, task_id: &str) -> Result<()> {
        let (_, task) = self
            .blocks
            .find_task(task_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, task_id))?;
        let event = self.session.start(task, self.clock.now());
        self.blocks.mark_started(task_id, self.clock.now());
        self.emit(event);
        Ok(())
    }

    /// Running <-> Paused. Returns the new state.
    pub fn toggle_pause(&mut self) -> Result<SessionState> {
        let event = self
            .session
            .toggle(self.clock.now())
            .ok_or_else(|| CoreError::InvalidTransition {
                state: self.session.state().to_string(),
                action: "pause or resume".into(),
            })?;
        self.emit(event);
        Ok(self.session.state())
    }

    /// Answer an expired session.
    pub fn resolve_expiry(&mut self, decision: ExpiryDecision) -> Result<()> {
        let task_id = self.session.active().map(|a| a.task_id.clone());
        let event = self.session.resolve(decision, self.clock.now())?;
        self.emit(event);

        if let (ExpiryDecision::Complete, Some(task_id)) = (decision, task_id) {
            match self.blocks.complete_task(&task_id, self.clock.now()) {
                Ok(hour) => self.emit(Event::TaskCompleted {
                    hour,
                    task_id,
                    at: self.clock.now(),
                }),
                Err(e) => tracing::warn!(%task_id, error = %e, "expired session task no longer scheduled"),
            }
        }
        Ok(())
    }
}
