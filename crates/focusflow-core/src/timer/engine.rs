//! Timer engine implementation.
//!
//! The engine is a tick-counting state machine. It does not own a thread:
//! it asks its [`TickScheduler`] for a recurring one-second tick and the
//! owner calls `tick()` each time one arrives. Drift between ticks and the
//! wall clock is not compensated.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Focus -> (Break) -> Idle
//! ```
//!
//! Every phase change is looked up in [`transition`](super::transition) and
//! its effects applied in order, so "focus finished, break pending" is a
//! single step rather than a nested restart.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Box::new(ManualScheduler::new()));
//! engine.bind(Some(&mut session));
//! engine.start(Some(&mut session))?;
//! // On every tick:
//! let events = engine.tick(Some(&mut session));
//! ```

use serde::{Deserialize, Serialize};

use super::scheduler::TickScheduler;
use super::transition::{transition, Effect, Input, Phase};
use crate::error::CommandError;
use crate::events::Event;
use crate::session::Session;

/// Display state of the timer. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: Phase,
    /// Countdown for the current phase.
    pub remaining_seconds: u64,
    pub planned_focus_seconds: u64,
    pub planned_break_seconds: u64,
    /// Accumulated focus time of the bound session.
    pub elapsed_seconds: u64,
    /// Whether the recurring tick is scheduled.
    pub running: bool,
}

/// Core timer engine.
pub struct TimerEngine {
    state: TimerState,
    scheduler: Box<dyn TickScheduler>,
}

impl TimerEngine {
    /// Create an idle engine bound to nothing.
    pub fn new(scheduler: Box<dyn TickScheduler>) -> Self {
        Self {
            state: TimerState::default(),
            scheduler,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// 0.0 ..= 1.0 progress within the current phase.
    ///
    /// Focus progress is accumulated focus over planned focus; break and idle
    /// progress is the consumed share of the countdown.
    pub fn progress(&self) -> f64 {
        let s = &self.state;
        match s.phase {
            Phase::Focus => ratio(s.elapsed_seconds, s.planned_focus_seconds),
            Phase::Break => ratio(
                s.planned_break_seconds.saturating_sub(s.remaining_seconds),
                s.planned_break_seconds,
            ),
            Phase::Idle => ratio(
                s.planned_focus_seconds.saturating_sub(s.remaining_seconds),
                s.planned_focus_seconds,
            ),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Rebind to `session` (or nothing): stop the tick and reset to idle,
    /// seeded from the session's plan and stored focus time.
    pub fn bind(&mut self, session: Option<&mut Session>) {
        self.apply(Input::Rebind, session);
    }

    /// Start or resume the countdown of the current phase.
    ///
    /// Returns no events when the tick is already running.
    pub fn start(&mut self, session: Option<&mut Session>) -> Result<Vec<Event>, CommandError> {
        let session = session.ok_or(CommandError::NoActiveSession)?;
        if session.completed {
            return Err(CommandError::SessionCompleted {
                id: session.id.clone(),
            });
        }
        if self.state.running {
            return Ok(Vec::new());
        }
        Ok(self.apply(Input::Start, Some(session)))
    }

    /// Stop the tick without touching phase or remainders. A second call is a no-op.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.apply(Input::Pause, None).into_iter().next()
    }

    /// Complete the bound session now, whatever the phase.
    pub fn end_early(&mut self, session: Option<&mut Session>) -> Result<Vec<Event>, CommandError> {
        let session = session.ok_or(CommandError::NoActiveSession)?;
        if session.completed {
            return Err(CommandError::SessionCompleted {
                id: session.id.clone(),
            });
        }
        Ok(self.apply(Input::EndEarly, Some(session)))
    }

    /// Advance one second. Ignored unless the tick is scheduled.
    pub fn tick(&mut self, session: Option<&mut Session>) -> Vec<Event> {
        if !self.state.running {
            return Vec::new();
        }
        let session = match session {
            Some(session) if !session.completed => session,
            _ => {
                tracing::warn!("tick without a live session; resetting timer");
                return self.apply(Input::Rebind, None);
            }
        };

        match self.state.phase {
            Phase::Focus => {
                if self.state.remaining_seconds > 0 {
                    self.state.remaining_seconds -= 1;
                    self.state.elapsed_seconds += 1;
                    session.focused_seconds = self.state.elapsed_seconds;
                }
                if self.state.remaining_seconds == 0 {
                    let break_pending = session.break_secs() > 0;
                    return self.apply(Input::FocusElapsed { break_pending }, Some(session));
                }
                Vec::new()
            }
            Phase::Break => {
                self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
                if self.state.remaining_seconds == 0 {
                    return self.apply(Input::BreakElapsed, Some(session));
                }
                Vec::new()
            }
            Phase::Idle => {
                self.scheduler.cancel();
                self.state.running = false;
                Vec::new()
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, input: Input, mut session: Option<&mut Session>) -> Vec<Event> {
        let from = self.state.phase;
        let Some(step) = transition(from, input) else {
            return Vec::new();
        };

        for effect in step.effects {
            match effect {
                Effect::SeedFocus => {
                    if self.state.remaining_seconds == 0 {
                        self.state.remaining_seconds = self
                            .state
                            .planned_focus_seconds
                            .saturating_sub(self.state.elapsed_seconds);
                    }
                }
                Effect::SeedBreak => {
                    if let Some(s) = session.as_deref() {
                        self.state.planned_break_seconds = s.break_secs();
                    }
                    self.state.remaining_seconds = self.state.planned_break_seconds;
                }
                Effect::ScheduleTick => self.scheduler.schedule(),
                Effect::CancelTick => self.scheduler.cancel(),
                Effect::CompleteSession => {
                    if let Some(s) = session.as_deref_mut() {
                        s.completed = true;
                        s.focused_seconds = self.state.elapsed_seconds;
                    }
                }
                Effect::ClearRemaining => self.state.remaining_seconds = 0,
                Effect::ResetForSession => self.reset_for(session.as_deref()),
            }
        }
        self.state.phase = step.phase;
        self.state.running = self.scheduler.is_scheduled();

        if from != step.phase {
            tracing::debug!(from = from.label(), to = step.phase.label(), ?input, "timer transition");
        }

        let session_id = session.as_deref().map(|s| s.id.clone()).unwrap_or_default();
        match input {
            Input::Start => vec![Event::TimerStarted {
                session_id,
                phase: self.state.phase,
                remaining_seconds: self.state.remaining_seconds,
            }],
            Input::Pause => vec![Event::TimerPaused {
                phase: self.state.phase,
                remaining_seconds: self.state.remaining_seconds,
            }],
            Input::FocusElapsed { break_pending: true } => vec![Event::BreakStarted {
                session_id,
                break_seconds: self.state.remaining_seconds,
            }],
            Input::FocusElapsed { break_pending: false } | Input::BreakElapsed => {
                vec![self.completed(session_id, false)]
            }
            Input::EndEarly => vec![self.completed(session_id, true)],
            Input::Rebind => Vec::new(),
        }
    }

    fn completed(&self, session_id: String, ended_early: bool) -> Event {
        tracing::info!(%session_id, focused_seconds = self.state.elapsed_seconds, ended_early, "session completed");
        Event::SessionCompleted {
            session_id,
            focused_seconds: self.state.elapsed_seconds,
            ended_early,
        }
    }

    fn reset_for(&mut self, session: Option<&Session>) {
        self.state = match session {
            Some(s) => TimerState {
                phase: Phase::Idle,
                remaining_seconds: s.focus_secs().saturating_sub(s.focused_seconds),
                planned_focus_seconds: s.focus_secs(),
                planned_break_seconds: s.break_secs(),
                elapsed_seconds: s.focused_seconds,
                running: false,
            },
            None => TimerState::default(),
        };
    }
}

/// `done / total` clamped to `[0, 1]`; a zero total counts as one.
fn ratio(done: u64, total: u64) -> f64 {
    let total = total.max(1);
    (done as f64 / total as f64).clamp(0.0, 1.0)
}
