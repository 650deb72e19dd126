use clap::Args;
use hourblock_core::calendar::{distribute, total_minutes};

use super::parse_local;

#[derive(Args)]
pub struct FragmentsArgs {
    /// Event start, local time (e.g. "2026-10-19T23:30")
    #[arg(long)]
    start: String,
    /// Event end, local time
    #[arg(long)]
    end: String,
    /// Event title used for fragment labels
    #[arg(long)]
    title: String,
}

pub fn run(args: FragmentsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start = parse_local(&args.start)?;
    let end = parse_local(&args.end)?;
    let fragments = distribute(start, end, &args.title)?;

    tracing::debug!(
        total_minutes = total_minutes(start, end),
        count = fragments.len(),
        "distributed"
    );
    println!("{}", serde_json::to_string_pretty(&fragments)?);
    Ok(())
}
