use serde::{Deserialize, Serialize};

use crate::blocks::{check_duration, Task, TaskDraft};
use crate::error::{CoreError, EntityKind, Result};

/// A goal for the day with its own subtasks.
///
/// Subtasks are never also block tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub subtasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalBook {
    goals: Vec<DailyGoal>,
}

impl GoalBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[DailyGoal] {
        &self.goals
    }

    pub fn get(&self, goal_id: &str) -> Option<&DailyGoal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    fn get_mut(&mut self, goal_id: &str) -> Result<&mut DailyGoal> {
        self.goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Goal, goal_id))
    }

    pub fn add(&mut self, title: impl Into<String>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.goals.push(DailyGoal {
            id: id.clone(),
            title: title.into(),
            completed: false,
            subtasks: Vec::new(),
        });
        id
    }

    /// Flip the goal's completed flag. Returns the new value.
    pub fn toggle(&mut self, goal_id: &str) -> Result<bool> {
        let goal = self.get_mut(goal_id)?;
        goal.completed = !goal.completed;
        Ok(goal.completed)
    }

    pub fn add_subtask(&mut self, goal_id: &str, draft: TaskDraft) -> Result<String> {
        check_duration(draft.duration_min)?;
        let goal = self.get_mut(goal_id)?;
        let id = uuid::Uuid::new_v4().to_string();
        goal.subtasks.push(Task::from_draft(id.clone(), draft));
        Ok(id)
    }

    /// Flip a subtask's completed flag. Returns the new value.
    pub fn toggle_subtask(&mut self, goal_id: &str, subtask_id: &str) -> Result<bool> {
        let goal = self.get_mut(goal_id)?;
        let subtask = goal
            .subtasks
            .iter_mut()
            .find(|t| t.id == subtask_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Subtask, subtask_id))?;
        subtask.completed = !subtask.completed;
        Ok(subtask.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_goal_and_subtask() {
        let mut book = GoalBook::new();
        let goal = book.add("Ship release");
        let sub = book
            .add_subtask(&goal, TaskDraft::new("Changelog", 20))
            .unwrap();

        assert!(book.toggle(&goal).unwrap());
        assert!(!book.toggle(&goal).unwrap());
        assert!(book.toggle_subtask(&goal, &sub).unwrap());
        assert!(book.get(&goal).unwrap().subtasks[0].completed);
    }

    #[test]
    fn unknown_ids() {
        let mut book = GoalBook::new();
        assert!(matches!(
            book.toggle("nope"),
            Err(CoreError::NotFound { kind: EntityKind::Goal, .. })
        ));
        let goal = book.add("Read");
        assert!(matches!(
            book.toggle_subtask(&goal, "nope"),
            Err(CoreError::NotFound { kind: EntityKind::Subtask, .. })
        ));
    }
}
