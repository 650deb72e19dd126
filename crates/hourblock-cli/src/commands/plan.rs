//! `plan`: load a day description into a fresh planner and print the result.
//!
//! ```toml
//! sync = "manual"            # optional, defaults to the configured mode
//!
//! [[goals]]
//! title = "Ship release"
//!
//! [[tasks]]
//! hour = 9
//! title = "Inbox"
//! duration_min = 15
//! tag = "Admin"
//!
//! [[events]]
//! title = "Standup"
//! start = "2026-10-19T10:00"
//! end = "2026-10-19T10:15"
//! type = "meeting"
//!
//! [[todos]]
//! title = "Changelog"
//! duration_min = 20
//! goal = "Ship release"      # or `hour = 11` to schedule it
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use hourblock_core::{
    Config, DayPlanner, EventDraft, EventType, ManualClock, Priority, SyncMode, TaskDraft,
    TodoDraft,
};
use serde::Deserialize;

use super::parse_local;

#[derive(Args)]
pub struct PlanArgs {
    /// Day description file
    file: PathBuf,
    /// Pretend the current local time is this (e.g. "2026-10-19T08:00")
    #[arg(long)]
    at: Option<String>,
    /// Include empty blocks in the output
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DayFile {
    sync: Option<SyncMode>,
    goals: Vec<GoalEntry>,
    tasks: Vec<TaskEntry>,
    events: Vec<EventEntry>,
    todos: Vec<TodoEntry>,
}

#[derive(Debug, Deserialize)]
struct GoalEntry {
    title: String,
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Deserialize)]
struct TaskEntry {
    hour: u8,
    title: String,
    duration_min: u32,
    tag: Option<String>,
    color: Option<String>,
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    title: String,
    start: String,
    end: String,
    #[serde(default, rename = "type")]
    event_type: EventType,
    description: Option<String>,
    location: Option<String>,
    #[serde(default)]
    attendees: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TodoEntry {
    title: String,
    duration_min: u32,
    tag: Option<String>,
    #[serde(default)]
    priority: Priority,
    /// Schedule into this block.
    hour: Option<u8>,
    /// Assign to the goal with this title.
    goal: Option<String>,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.file)?;
    let day: DayFile = toml::from_str(&content)?;

    let now = match &args.at {
        Some(at) => parse_local(at)?,
        None => Local::now().naive_local(),
    };
    let config = Config::load_or_default();
    let mut planner = DayPlanner::with_config(ManualClock::new(now), &config);
    if let Some(mode) = day.sync {
        planner.set_sync_mode(mode);
    }

    let mut goal_ids = HashMap::new();
    for goal in day.goals {
        let id = planner.add_goal(goal.title.clone());
        if goal.completed {
            planner.toggle_goal(&id)?;
        }
        goal_ids.insert(goal.title, id);
    }

    for entry in day.tasks {
        let mut draft = TaskDraft::new(entry.title, entry.duration_min);
        if let Some(tag) = entry.tag {
            draft = draft.with_tag(tag);
        }
        if let Some(color) = entry.color {
            draft = draft.with_color(color);
        }
        let id = planner.add_task(entry.hour, draft)?;
        if entry.completed {
            planner.complete_task(&id)?;
        }
    }

    for entry in day.events {
        let mut draft = EventDraft::new(
            entry.title,
            parse_local(&entry.start)?,
            parse_local(&entry.end)?,
            entry.event_type,
        );
        draft.description = entry.description;
        draft.location = entry.location;
        draft.attendees = entry.attendees;
        planner.add_event(draft)?;
    }

    for entry in day.todos {
        let mut draft = TodoDraft::new(entry.title, entry.duration_min, entry.priority);
        if let Some(tag) = entry.tag {
            draft = draft.with_tag(tag);
        }
        let todo_id = planner.add_todo(draft)?;
        if let Some(hour) = entry.hour {
            planner.schedule_todo(&todo_id, hour)?;
        } else if let Some(goal) = entry.goal {
            let goal_id = goal_ids
                .get(&goal)
                .ok_or_else(|| format!("todo refers to unknown goal '{goal}'"))?;
            planner.assign_todo_to_goal(&todo_id, goal_id)?;
        }
    }

    let report = planner.sync_now();

    let blocks: Vec<_> = planner
        .blocks()
        .into_iter()
        .filter(|b| args.all || !b.tasks.is_empty())
        .collect();
    let output = serde_json::json!({
        "date": planner.today(),
        "sync_mode": planner.sync_mode(),
        "sync": report,
        "hour_progress": planner.hour_progress(),
        "blocks": blocks,
        "todos": planner.todos().list(),
        "goals": planner.goals().list(),
        "analytics": planner.analytics(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
