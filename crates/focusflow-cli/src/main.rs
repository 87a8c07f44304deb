use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "focusflow", version, about = "FocusFlow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session planning and listing
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Distraction logging
    Distraction {
        #[command(subcommand)]
        action: commands::distraction::DistractionAction,
    },
    /// Light/dark theme preference
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
    /// Session history and statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOCUSFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Distraction { action } => commands::distraction::run(action),
        Commands::Theme { action } => commands::theme::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
