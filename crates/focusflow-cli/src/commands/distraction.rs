use clap::Subcommand;
use focusflow_core::Config;

use crate::context::{open_oneshot, print_json, CliResult};

#[derive(Subcommand)]
pub enum DistractionAction {
    /// Log a distraction against today's latest session
    Log {
        /// One of the configured distraction kinds
        kind: String,
    },
    /// List the configured distraction kinds
    Kinds,
}

pub fn run(action: DistractionAction) -> CliResult {
    let config = Config::load_or_default();

    match action {
        DistractionAction::Log { kind } => {
            check_kind(&config, &kind)?;
            let mut app = open_oneshot(&config)?;
            let event = app.log_distraction(&kind)?;
            print_json(&event)?;
        }
        DistractionAction::Kinds => {
            for kind in &config.distraction_kinds {
                println!("{kind}");
            }
        }
    }
    Ok(())
}

pub fn check_kind(config: &Config, kind: &str) -> CliResult {
    if config.allows_distraction(kind) {
        Ok(())
    } else {
        Err(format!(
            "unknown distraction kind '{kind}' (expected one of: {})",
            config.distraction_kinds.join(", ")
        )
        .into())
    }
}
