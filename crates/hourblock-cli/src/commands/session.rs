use chrono::Local;
use clap::{Args, ValueEnum};
use hourblock_core::clock::Clock;
use hourblock_core::{Config, DayPlanner, Event, ExpiryDecision, ManualClock, TaskDraft};

#[derive(Clone, Copy, ValueEnum)]
enum Resolve {
    Complete,
    Continue,
}

impl From<Resolve> for ExpiryDecision {
    fn from(value: Resolve) -> Self {
        match value {
            Resolve::Complete => ExpiryDecision::Complete,
            Resolve::Continue => ExpiryDecision::Continue,
        }
    }
}

#[derive(Args)]
pub struct SessionArgs {
    /// Session length in minutes (must fit in the current hour block)
    #[arg(long)]
    minutes: u32,
    /// Number of one-second ticks to simulate (default: the full session)
    #[arg(long)]
    ticks: Option<u64>,
    /// Pause after this many ticks and stay paused
    #[arg(long)]
    pause_after: Option<u64>,
    /// How to answer if the session expires
    #[arg(long, value_enum)]
    resolve: Option<Resolve>,
    /// Task title
    #[arg(long, default_value = "Session")]
    title: String,
}

pub fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut planner = DayPlanner::with_config(ManualClock::new(Local::now().naive_local()), &config);

    let hour = planner.clock().current_hour();
    let task_id = planner.add_task(hour, TaskDraft::new(args.title, args.minutes))?;
    planner.start_session(&task_id)?;

    let ticks = args.ticks.unwrap_or(args.minutes as u64 * 60);
    for n in 1..=ticks {
        let expired = planner
            .tick()
            .iter()
            .any(|e| matches!(e, Event::SessionExpired { .. }));
        if !expired && args.pause_after == Some(n) {
            planner.toggle_pause()?;
        }
        if expired {
            if let Some(decision) = args.resolve {
                planner.resolve_expiry(decision.into())?;
            }
            break;
        }
    }

    let events: Vec<_> = planner.drain_events();
    let output = serde_json::json!({
        "session": planner.session(),
        "task": planner.block_set().find_task(&task_id).map(|(_, task)| task),
        "events": events,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
