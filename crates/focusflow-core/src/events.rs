use serde::{Deserialize, Serialize};

use crate::session::{Distraction, Reflection, SessionId};
use crate::theme::Theme;
use crate::timer::Phase;

/// Every state change in the core produces an Event.
/// The presentation layer re-reads state after each one; nothing is pushed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The active binding changed. `None` means nothing is bound.
    SessionActivated {
        session_id: Option<SessionId>,
    },
    TimerStarted {
        session_id: SessionId,
        phase: Phase,
        remaining_seconds: u64,
    },
    TimerPaused {
        phase: Phase,
        remaining_seconds: u64,
    },
    /// Focus ran out and the break countdown began without user action.
    BreakStarted {
        session_id: SessionId,
        break_seconds: u64,
    },
    SessionCompleted {
        session_id: SessionId,
        focused_seconds: u64,
        ended_early: bool,
    },
    DistractionLogged {
        session_id: SessionId,
        distraction: Distraction,
    },
    ReflectionOpened {
        session_id: SessionId,
    },
    ReflectionSaved {
        session_id: SessionId,
        reflection: Reflection,
    },
    ReflectionSkipped {
        session_id: SessionId,
    },
    ThemeChanged {
        theme: Theme,
    },
    StateSnapshot {
        session_id: Option<SessionId>,
        title: Option<String>,
        phase: Phase,
        phase_label: String,
        remaining_seconds: u64,
        remaining_display: String,
        elapsed_seconds: u64,
        running: bool,
        progress: f64,
        completed: bool,
        reflection_pending: Option<SessionId>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let json = serde_json::to_value(Event::TimerPaused {
            phase: Phase::Break,
            remaining_seconds: 12,
        })
        .unwrap();
        assert_eq!(json["type"], "TimerPaused");
        assert_eq!(json["phase"], "break");
    }
}
