//! Wiring shared by every command: config, on-disk store, controller.

use focusflow_core::{Config, Database, FocusFlow, ManualScheduler, SystemClock, TickScheduler};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Open the controller over the on-disk store with a real clock.
pub fn open_app(config: &Config, scheduler: Box<dyn TickScheduler>) -> CliResult<FocusFlow> {
    let db = Database::open()?;
    Ok(FocusFlow::new(Box::new(db), Box::new(SystemClock), scheduler)
        .with_default_theme(config.ui.default_theme))
}

/// Controller for one-shot commands that never run the tick.
pub fn open_oneshot(config: &Config) -> CliResult<FocusFlow> {
    open_app(config, Box::new(ManualScheduler::new()))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
