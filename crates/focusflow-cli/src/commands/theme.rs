use clap::Subcommand;
use focusflow_core::{Config, Theme};

use crate::context::{open_oneshot, print_json, CliResult};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Get,
    /// Set the theme
    Set {
        /// light or dark
        theme: String,
    },
    /// Switch between light and dark
    Toggle,
}

pub fn run(action: ThemeAction) -> CliResult {
    let config = Config::load_or_default();
    let mut app = open_oneshot(&config)?;

    match action {
        ThemeAction::Get => println!("{}", app.theme()),
        ThemeAction::Set { theme } => {
            let theme: Theme = theme.parse()?;
            print_json(&app.set_theme(theme))?;
        }
        ThemeAction::Toggle => print_json(&app.toggle_theme())?,
    }
    Ok(())
}
