//! The application controller.
//!
//! [`FocusFlow`] is the one place that owns application state: the session
//! repository, the timer engine, the reflection prompt and the clock. The
//! presentation layer calls its operations and re-reads state afterwards.
//!
//! Rejected commands return [`CommandError`] and leave state untouched.

use crate::clock::Clock;
use crate::error::CommandError;
use crate::events::Event;
use crate::reflection::{ReflectionCapture, ReflectionInput};
use crate::repository::SessionRepository;
use crate::session::{NewSession, Session};
use crate::stats::{self, HistoryRow, SubjectTotal};
use crate::storage::{persistence, KeyValueStore};
use crate::theme::Theme;
use crate::timer::{Phase, TickScheduler, TimerEngine, TimerState};

pub struct FocusFlow {
    repo: SessionRepository,
    engine: TimerEngine,
    reflection: ReflectionCapture,
    clock: Box<dyn Clock>,
    default_theme: Theme,
}

impl FocusFlow {
    /// Load stored sessions and rebind to the most recent session of today,
    /// idle. Timer state from earlier runs is never restored.
    pub fn new(
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        scheduler: Box<dyn TickScheduler>,
    ) -> Self {
        let mut app = Self {
            repo: SessionRepository::load(store),
            engine: TimerEngine::new(scheduler),
            reflection: ReflectionCapture::new(),
            clock,
            default_theme: Theme::default(),
        };
        let latest = app
            .repo
            .list_today(app.clock.today())
            .last()
            .map(|s| s.id.clone());
        if let Some(id) = latest {
            app.set_active(Some(&id));
        }
        app
    }

    /// Theme reported when none is stored.
    pub fn with_default_theme(mut self, theme: Theme) -> Self {
        self.default_theme = theme;
        self
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Create a session dated today, make it active and seed the timer for it.
    pub fn create_session(&mut self, fields: NewSession) -> Session {
        let now = self.clock.now_utc();
        let today = self.clock.today();
        let session = self.repo.create(fields, now, today).clone();
        self.engine.bind(self.repo.active_mut());
        session
    }

    pub fn active(&self) -> Option<&Session> {
        self.repo.active()
    }

    /// Rebind the active session. An unknown id (or `None`) clears the binding.
    /// Either way the timer stops and returns to idle.
    pub fn set_active(&mut self, id: Option<&str>) -> Event {
        self.repo.set_active(id);
        self.engine.bind(self.repo.active_mut());
        Event::SessionActivated {
            session_id: self.repo.active_id().map(String::from),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.repo.get(id)
    }

    pub fn sessions(&self) -> &[Session] {
        self.repo.all()
    }

    pub fn list_today(&self) -> Vec<&Session> {
        self.repo.list_today(self.clock.today())
    }

    pub fn list_completed(&self) -> Vec<&Session> {
        self.repo.list_completed()
    }

    pub fn history(&self) -> Vec<HistoryRow> {
        stats::history(self.repo.all())
    }

    pub fn subject_totals(&self) -> Vec<SubjectTotal> {
        stats::subject_totals(self.repo.all())
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn timer(&self) -> &TimerState {
        self.engine.state()
    }

    pub fn progress(&self) -> f64 {
        self.engine.progress()
    }

    /// Start or resume the current phase of the active session.
    pub fn start(&mut self) -> Result<Vec<Event>, CommandError> {
        self.engine
            .start(self.repo.active_mut())
            .inspect_err(log_rejection)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.engine.pause()
    }

    /// Complete the active session immediately and open its reflection.
    pub fn end_early(&mut self) -> Result<Vec<Event>, CommandError> {
        let mut events = self
            .engine
            .end_early(self.repo.active_mut())
            .inspect_err(log_rejection)?;
        self.repo.flush();
        self.open_reflections(&mut events);
        Ok(events)
    }

    /// Advance the running phase by one second.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.engine.is_running() {
            return Vec::new();
        }
        let accruing = self.engine.phase() == Phase::Focus;
        let mut events = self.engine.tick(self.repo.active_mut());
        let completed = events
            .iter()
            .any(|e| matches!(e, Event::SessionCompleted { .. }));
        if accruing || completed {
            self.repo.flush();
        }
        self.open_reflections(&mut events);
        events
    }

    // ── Distractions ─────────────────────────────────────────────────

    /// Append a distraction to the active session. Every call appends.
    pub fn log_distraction(&mut self, kind: &str) -> Result<Event, CommandError> {
        let at = self.clock.now_utc();
        let session = self
            .repo
            .active_mut()
            .ok_or(CommandError::NoActiveSession)
            .inspect_err(log_rejection)?;
        let distraction = session.push_distraction(kind, at).clone();
        let session_id = session.id.clone();
        tracing::debug!(%session_id, kind, "distraction logged");
        self.repo.flush();
        Ok(Event::DistractionLogged {
            session_id,
            distraction,
        })
    }

    // ── Reflection ───────────────────────────────────────────────────

    /// Session awaiting a reflection, if any.
    pub fn reflection_target(&self) -> Option<&str> {
        self.reflection.target()
    }

    pub fn submit_reflection(&mut self, input: ReflectionInput) -> Result<Event, CommandError> {
        let target = self.reflection.target().map(String::from);
        let session = match target.as_deref() {
            Some(id) => self.repo.get_mut(id),
            None => None,
        };
        let reflection = self
            .reflection
            .submit(input, session)
            .inspect_err(log_rejection)?
            .clone();
        self.repo.flush();
        Ok(Event::ReflectionSaved {
            session_id: target.unwrap_or_default(),
            reflection,
        })
    }

    pub fn skip_reflection(&mut self) -> Option<Event> {
        self.reflection
            .skip()
            .map(|session_id| Event::ReflectionSkipped { session_id })
    }

    // ── Theme ────────────────────────────────────────────────────────

    pub fn theme(&self) -> Theme {
        match persistence::load_theme(self.repo.store()) {
            Ok(Some(theme)) => theme,
            Ok(None) => self.default_theme,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read theme");
                self.default_theme
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Event {
        if let Err(e) = persistence::save_theme(self.repo.store_mut(), theme) {
            tracing::error!(error = %e, "failed to save theme");
        }
        Event::ThemeChanged { theme }
    }

    pub fn toggle_theme(&mut self) -> Event {
        let next = self.theme().toggled();
        self.set_theme(next)
    }

    // ── Snapshot ─────────────────────────────────────────────────────

    /// Everything a view needs to render the timer panel.
    pub fn snapshot(&self) -> Event {
        let timer = self.engine.state();
        let active = self.repo.active();
        Event::StateSnapshot {
            session_id: active.map(|s| s.id.clone()),
            title: active.map(|s| s.title.clone()),
            phase: timer.phase,
            phase_label: timer.phase.label().to_string(),
            remaining_seconds: timer.remaining_seconds,
            remaining_display: stats::format_clock(timer.remaining_seconds),
            elapsed_seconds: timer.elapsed_seconds,
            running: timer.running,
            progress: self.engine.progress(),
            completed: active.is_some_and(|s| s.completed),
            reflection_pending: self.reflection.target().map(String::from),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn open_reflections(&mut self, events: &mut Vec<Event>) {
        let completed: Vec<String> = events
            .iter()
            .filter_map(|e| match e {
                Event::SessionCompleted { session_id, .. } => Some(session_id.clone()),
                _ => None,
            })
            .collect();
        for session_id in completed {
            self.reflection.open(&session_id);
            events.push(Event::ReflectionOpened { session_id });
        }
    }
}

fn log_rejection(err: &CommandError) {
    tracing::warn!(%err, "command rejected");
}
