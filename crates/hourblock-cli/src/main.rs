use clap::{Parser, Subcommand};
use hourblock_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hourblock-cli", version, about = "Hourblock CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a time range into hour-block fragments
    Fragments(commands::fragments::FragmentsArgs),
    /// Lay out a day described in a TOML file
    Plan(commands::plan::PlanArgs),
    /// Run a session countdown with simulated ticks
    Session(commands::session::SessionArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// `RUST_LOG` wins; otherwise the level from an existing config file.
fn init_logging() {
    let level = Config::path()
        .ok()
        .filter(|path| path.exists())
        .and_then(|path| Config::load_from(&path).ok())
        .map(|config| config.logging.level)
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Fragments(args) => commands::fragments::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Session(args) => commands::session::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
