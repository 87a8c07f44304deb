//! Phase transition table.
//!
//! Every phase change goes through [`transition`]: a pure lookup from
//! `(Phase, Input)` to the next phase plus the ordered side effects the
//! engine must apply. Inputs that mean nothing in a phase map to `None`.
//!
//! ```text
//! Idle  --Start-->                     Focus  [seed focus, schedule tick]
//! Focus --FocusElapsed(break)-->       Break  [seed break, schedule tick]
//! Focus --FocusElapsed(no break)-->    Idle   [complete]
//! Break --BreakElapsed-->              Idle   [complete]
//! *     --EndEarly-->                  Idle   [complete]
//! *     --Rebind-->                    Idle   [cancel tick, reset]
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Focus,
    Break,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Focus => "Focus",
            Phase::Break => "Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Start,
    Pause,
    /// Focus countdown hit zero. `break_pending` is false when the session
    /// has no break, which collapses straight into completion.
    FocusElapsed { break_pending: bool },
    BreakElapsed,
    EndEarly,
    Rebind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Load the unconsumed share of the planned focus unless a paused
    /// remainder is left.
    SeedFocus,
    SeedBreak,
    ScheduleTick,
    CancelTick,
    /// Mark the bound session completed and freeze its focused time.
    CompleteSession,
    ClearRemaining,
    /// Re-seed planned lengths and elapsed time from the bound session.
    ResetForSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub phase: Phase,
    pub effects: &'static [Effect],
}

const COMPLETE: &[Effect] = &[Effect::CancelTick, Effect::CompleteSession, Effect::ClearRemaining];

pub fn transition(phase: Phase, input: Input) -> Option<Transition> {
    use Effect::*;

    let to = |phase: Phase, effects: &'static [Effect]| Transition { phase, effects };

    let next = match (phase, input) {
        (Phase::Idle, Input::Start) => to(Phase::Focus, &[SeedFocus, ScheduleTick]),
        (Phase::Focus, Input::Start) => to(Phase::Focus, &[ScheduleTick]),
        (Phase::Break, Input::Start) => to(Phase::Break, &[ScheduleTick]),

        (current, Input::Pause) => to(current, &[CancelTick]),

        (Phase::Focus, Input::FocusElapsed { break_pending: true }) => {
            to(Phase::Break, &[SeedBreak, ScheduleTick])
        }
        (Phase::Focus, Input::FocusElapsed { break_pending: false }) => to(Phase::Idle, COMPLETE),
        (Phase::Break, Input::BreakElapsed) => to(Phase::Idle, COMPLETE),

        (_, Input::EndEarly) => to(Phase::Idle, COMPLETE),
        (_, Input::Rebind) => to(Phase::Idle, &[CancelTick, ResetForSession]),

        (_, Input::FocusElapsed { .. }) | (_, Input::BreakElapsed) => return None,
    };

    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_from_idle_enters_focus_and_schedules() {
        let t = transition(Phase::Idle, Input::Start).unwrap();
        assert_eq!(t.phase, Phase::Focus);
        assert_eq!(t.effects, &[Effect::SeedFocus, Effect::ScheduleTick]);
    }

    #[test]
    fn focus_end_with_break_is_one_atomic_step() {
        let t = transition(Phase::Focus, Input::FocusElapsed { break_pending: true }).unwrap();
        assert_eq!(t.phase, Phase::Break);
        assert_eq!(t.effects, &[Effect::SeedBreak, Effect::ScheduleTick]);
    }

    #[test]
    fn focus_end_without_break_completes() {
        let t = transition(Phase::Focus, Input::FocusElapsed { break_pending: false }).unwrap();
        assert_eq!(t.phase, Phase::Idle);
        assert!(t.effects.contains(&Effect::CompleteSession));
        assert!(!t.effects.contains(&Effect::SeedBreak));
    }

    #[test]
    fn end_early_completes_from_every_phase() {
        for phase in [Phase::Idle, Phase::Focus, Phase::Break] {
            let t = transition(phase, Input::EndEarly).unwrap();
            assert_eq!(t.phase, Phase::Idle);
            assert_eq!(t.effects, COMPLETE);
        }
    }

    #[test]
    fn pause_keeps_phase() {
        for phase in [Phase::Idle, Phase::Focus, Phase::Break] {
            let t = transition(phase, Input::Pause).unwrap();
            assert_eq!(t.phase, phase);
            assert_eq!(t.effects, &[Effect::CancelTick]);
        }
    }

    #[test]
    fn elapsed_inputs_outside_their_phase_are_ignored() {
        assert!(transition(Phase::Idle, Input::BreakElapsed).is_none());
        assert!(transition(Phase::Focus, Input::BreakElapsed).is_none());
        assert!(transition(Phase::Break, Input::FocusElapsed { break_pending: true }).is_none());
        assert!(transition(Phase::Idle, Input::FocusElapsed { break_pending: false }).is_none());
    }

    #[test]
    fn labels() {
        assert_eq!(Phase::Break.label(), "Break");
        assert_eq!(serde_json::to_string(&Phase::Focus).unwrap(), "\"focus\"");
    }
}
