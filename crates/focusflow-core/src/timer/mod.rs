mod engine;
mod scheduler;
mod transition;

pub use engine::{TimerEngine, TimerState};
pub use scheduler::{IntervalScheduler, ManualScheduler, TickReceiver, TickScheduler};
pub use transition::{transition, Effect, Input, Phase, Transition};
