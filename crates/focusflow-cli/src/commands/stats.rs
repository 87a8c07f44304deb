use clap::Subcommand;
use focusflow_core::Config;

use crate::context::{open_oneshot, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Completed sessions, one row each
    History,
    /// Focused minutes per subject
    Subjects,
}

pub fn run(action: StatsAction) -> CliResult {
    let config = Config::load_or_default();
    let app = open_oneshot(&config)?;

    match action {
        StatsAction::History => print_json(&app.history())?,
        StatsAction::Subjects => print_json(&app.subject_totals())?,
    }
    Ok(())
}
