use serde::{Deserialize, Serialize};

use crate::blocks::{check_duration, TaskDraft, DEFAULT_TASK_COLOR, DEFAULT_TASK_TAG};
use crate::error::{CoreError, EntityKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A piece of work not yet placed in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledTodo {
    pub id: String,
    pub title: String,
    pub duration_min: u32,
    pub color: String,
    pub tag: String,
    pub priority: Priority,
    /// Goal this todo is earmarked for (lookup key only).
    pub assigned_goal: Option<String>,
}

impl UnscheduledTodo {
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            duration_min: self.duration_min,
            color: self.color.clone(),
            tag: self.tag.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDraft {
    pub title: String,
    pub duration_min: u32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_goal: Option<String>,
}

fn default_color() -> String {
    DEFAULT_TASK_COLOR.to_string()
}

fn default_tag() -> String {
    DEFAULT_TASK_TAG.to_string()
}

impl TodoDraft {
    pub fn new(title: impl Into<String>, duration_min: u32, priority: Priority) -> Self {
        Self {
            title: title.into(),
            duration_min,
            color: default_color(),
            tag: default_tag(),
            priority,
            assigned_goal: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// Backlog of unscheduled todos, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoLedger {
    todos: Vec<UnscheduledTodo>,
}

impl TodoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[UnscheduledTodo] {
        &self.todos
    }

    pub fn get(&self, todo_id: &str) -> Option<&UnscheduledTodo> {
        self.todos.iter().find(|t| t.id == todo_id)
    }

    /// Todos earmarked for `goal_id`.
    pub fn for_goal<'a>(&'a self, goal_id: &'a str) -> impl Iterator<Item = &'a UnscheduledTodo> {
        self.todos
            .iter()
            .filter(move |t| t.assigned_goal.as_deref() == Some(goal_id))
    }

    pub fn add(&mut self, draft: TodoDraft) -> Result<String> {
        check_duration(draft.duration_min)?;
        let id = uuid::Uuid::new_v4().to_string();
        self.todos.push(UnscheduledTodo {
            id: id.clone(),
            title: draft.title,
            duration_min: draft.duration_min,
            color: draft.color,
            tag: draft.tag,
            priority: draft.priority,
            assigned_goal: draft.assigned_goal,
        });
        Ok(id)
    }

    pub fn remove(&mut self, todo_id: &str) -> Result<UnscheduledTodo> {
        let idx = self
            .todos
            .iter()
            .position(|t| t.id == todo_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Todo, todo_id))?;
        Ok(self.todos.remove(idx))
    }
}
