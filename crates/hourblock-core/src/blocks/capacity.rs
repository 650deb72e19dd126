//! Capacity-checked mutations over the 24 hour blocks.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{
    check_duration, check_hour, BlockSnapshot, BlockStatus, HourBlock, Task, TaskDraft,
    TaskPatch, BLOCK_CAPACITY_MIN, HOURS_PER_DAY,
};
use crate::error::{CoreError, EntityKind, Result, ValidationError};

/// Outcome of [`BlockSet::quick_fill`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QuickFill {
    Filled { task_ids: Vec<String> },
    /// Not enough room left for a single chunk.
    NoRoom,
}

/// The day's 24 blocks, indexed by hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSet {
    blocks: Vec<HourBlock>,
}

impl Default for BlockSet {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockSet {
    pub fn new() -> Self {
        Self {
            blocks: (0..HOURS_PER_DAY).map(HourBlock::new).collect(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn block(&self, hour: u8) -> Result<&HourBlock> {
        check_hour(hour)?;
        Ok(&self.blocks[hour as usize])
    }

    pub fn iter(&self) -> impl Iterator<Item = &HourBlock> {
        self.blocks.iter()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.blocks.iter().flat_map(|b| b.tasks().iter())
    }

    /// Locate a task anywhere in the day.
    pub fn find_task(&self, task_id: &str) -> Option<(u8, &Task)> {
        self.blocks.iter().find_map(|block| {
            block
                .tasks()
                .iter()
                .find(|t| t.id == task_id)
                .map(|t| (block.hour(), t))
        })
    }

    pub fn fragments_of<'a>(&'a self, event_id: &'a str) -> impl Iterator<Item = (u8, &'a Task)> {
        self.blocks.iter().flat_map(move |block| {
            block
                .tasks()
                .iter()
                .filter(move |t| t.event_id() == Some(event_id))
                .map(move |t| (block.hour(), t))
        })
    }

    pub fn snapshots(&self, current_hour: u8) -> Vec<BlockSnapshot> {
        self.blocks
            .iter()
            .map(|block| BlockSnapshot {
                hour: block.hour(),
                status: BlockStatus::classify(block.hour(), current_hour),
                used_minutes: block.used_minutes(),
                remaining_minutes: block.remaining_minutes(),
                severity: block.severity(),
                tasks: block.tasks().to_vec(),
            })
            .collect()
    }

    // ── Capacity-checked commands ────────────────────────────────────

    /// Append a manual task. Returns the new task id.
    pub fn add_task(&mut self, hour: u8, draft: TaskDraft) -> Result<String> {
        check_hour(hour)?;
        check_duration(draft.duration_min)?;
        let block = &mut self.blocks[hour as usize];
        ensure_fits(hour, block.used_minutes(), draft.duration_min)?;

        let id = uuid::Uuid::new_v4().to_string();
        block
            .tasks_mut()
            .push(Task::from_draft(id.clone(), draft));
        tracing::debug!(hour, task_id = %id, "task added");
        Ok(id)
    }

    /// Edit a task in place. The capacity check excludes the task itself.
    pub fn update_task(&mut self, hour: u8, task_id: &str, patch: TaskPatch) -> Result<()> {
        check_hour(hour)?;
        if let Some(duration) = patch.duration_min {
            check_duration(duration)?;
        }
        let block = &mut self.blocks[hour as usize];
        let idx = block
            .tasks()
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, task_id))?;

        let others = block
            .tasks()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .fold(0u32, |acc, (_, t)| acc.saturating_add(t.duration_min));
        let duration = patch
            .duration_min
            .unwrap_or(block.tasks()[idx].duration_min);
        ensure_fits(hour, others, duration)?;

        patch.apply(&mut block.tasks_mut()[idx]);
        tracing::debug!(hour, task_id, "task updated");
        Ok(())
    }

    pub fn delete_task(&mut self, hour: u8, task_id: &str) -> Result<Task> {
        check_hour(hour)?;
        let tasks = self.blocks[hour as usize].tasks_mut();
        let idx = tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, task_id))?;
        Ok(tasks.remove(idx))
    }

    /// Mark a task done wherever it lives. Returns the hour it was found in.
    pub fn complete_task(&mut self, task_id: &str, at: NaiveDateTime) -> Result<u8> {
        for block in &mut self.blocks {
            let hour = block.hour();
            if let Some(task) = block.tasks_mut().iter_mut().find(|t| t.id == task_id) {
                task.completed = true;
                task.ended_at = Some(at);
                return Ok(hour);
            }
        }
        Err(CoreError::not_found(EntityKind::Task, task_id))
    }

    pub(crate) fn mark_started(&mut self, task_id: &str, at: NaiveDateTime) {
        if let Some(task) = self
            .blocks
            .iter_mut()
            .flat_map(|b| b.tasks_mut().iter_mut())
            .find(|t| t.id == task_id)
        {
            task.started_at.get_or_insert(at);
        }
    }

    /// Fill the block's free minutes with generic `chunk_min`-minute tasks.
    pub fn quick_fill(&mut self, hour: u8, chunk_min: u32) -> Result<QuickFill> {
        check_hour(hour)?;
        if chunk_min == 0 {
            return Err(ValidationError::InvalidValue {
                field: "chunk_min".into(),
                message: "quick-fill chunk must be at least one minute".into(),
            }
            .into());
        }
        let block = &mut self.blocks[hour as usize];
        let slots = block.remaining_minutes() / chunk_min;
        if slots == 0 {
            return Ok(QuickFill::NoRoom);
        }

        let task_ids: Vec<String> = (1..=slots)
            .map(|n| {
                let id = uuid::Uuid::new_v4().to_string();
                block.tasks_mut().push(Task::from_draft(
                    id.clone(),
                    TaskDraft::new(format!("Task {n}"), chunk_min),
                ));
                id
            })
            .collect();
        tracing::debug!(hour, count = task_ids.len(), chunk_min, "block quick-filled");
        Ok(QuickFill::Filled { task_ids })
    }

    // ── Calendar fragment path (no capacity check) ───────────────────

    pub(crate) fn insert_fragment(&mut self, hour: u8, task: Task) {
        debug_assert!(task.is_calendar_fragment());
        let block = &mut self.blocks[(hour % HOURS_PER_DAY) as usize];
        block.tasks_mut().push(task);
        if block.severity().is_overbooked() {
            tracing::warn!(
                hour = block.hour(),
                used = block.used_minutes(),
                "calendar fragments overbook block"
            );
        }
    }

    /// Drop every calendar-derived task. Returns how many were removed.
    pub(crate) fn strip_fragments(&mut self) -> usize {
        self.retain_all(|t| !t.is_calendar_fragment())
    }

    /// Drop the fragments of one event. Returns how many were removed.
    pub(crate) fn strip_fragments_of(&mut self, event_id: &str) -> usize {
        self.retain_all(|t| t.event_id() != Some(event_id))
    }

    fn retain_all(&mut self, keep: impl Fn(&Task) -> bool) -> usize {
        let mut removed = 0;
        for block in &mut self.blocks {
            let before = block.tasks().len();
            block.tasks_mut().retain(|t| keep(t));
            removed += before - block.tasks().len();
        }
        removed
    }
}

fn ensure_fits(hour: u8, used: u32, requested: u32) -> Result<()> {
    let remaining = BLOCK_CAPACITY_MIN.saturating_sub(used);
    if requested > remaining {
        tracing::warn!(hour, requested, remaining, "capacity exceeded");
        return Err(CoreError::CapacityExceeded {
            hour,
            requested,
            remaining,
        });
    }
    Ok(())
}
