//! In-memory session collection with write-through persistence.
//!
//! The collection is the system of record while the process runs. Every
//! mutation is followed by a full-collection overwrite of the stored blob;
//! a failed write is logged and the in-memory change stands.

use chrono::{DateTime, NaiveDate, Utc};

use crate::session::{NewSession, Session, SessionId};
use crate::storage::persistence;
use crate::storage::KeyValueStore;

pub struct SessionRepository {
    sessions: Vec<Session>,
    active: Option<SessionId>,
    store: Box<dyn KeyValueStore>,
}

impl SessionRepository {
    /// Load the stored collection. Corrupt or unreadable data yields an
    /// empty collection rather than an error.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let sessions = match persistence::load_sessions(&*store) {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load sessions; starting empty");
                Vec::new()
            }
        };
        tracing::debug!(count = sessions.len(), "sessions loaded");
        Self {
            sessions,
            active: None,
            store,
        }
    }

    /// Append a new session, make it active and persist.
    pub fn create(&mut self, fields: NewSession, now: DateTime<Utc>, today: NaiveDate) -> &Session {
        let session = Session::new(fields, now, today);
        tracing::info!(id = %session.id, title = %session.title, "session created");
        self.active = Some(session.id.clone());
        self.sessions.push(session);
        self.flush();
        &self.sessions[self.sessions.len() - 1]
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The bound session, if the binding still resolves.
    pub fn active(&self) -> Option<&Session> {
        self.get(self.active.as_deref()?)
    }

    pub fn active_mut(&mut self) -> Option<&mut Session> {
        let id = self.active.clone()?;
        self.get_mut(&id)
    }

    /// Rebind the active id. An id that does not resolve clears the binding.
    pub fn set_active(&mut self, id: Option<&str>) -> Option<&Session> {
        self.active = id.filter(|id| self.get(id).is_some()).map(String::from);
        self.active()
    }

    /// Sessions bucketed under `today`, in creation order.
    pub fn list_today(&self, today: NaiveDate) -> Vec<&Session> {
        self.sessions.iter().filter(|s| s.date_key == today).collect()
    }

    /// Completed sessions across all days, in creation order.
    pub fn list_completed(&self) -> Vec<&Session> {
        self.sessions.iter().filter(|s| s.completed).collect()
    }

    pub fn all(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Write the whole collection to the store. Returns whether it landed.
    pub fn flush(&mut self) -> bool {
        match persistence::save_sessions(&mut *self.store, &self.sessions) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to save sessions");
                false
            }
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        &mut *self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SESSIONS_KEY};
    use chrono::TimeZone;

    fn fields(title: &str) -> NewSession {
        NewSession {
            title: title.into(),
            subject: "Biology".into(),
            duration_min: 25,
            break_min: 5,
            tasks: vec!["flashcards".into()],
        }
    }

    fn day(d: u32) -> (DateTime<Utc>, NaiveDate) {
        let at = Utc.with_ymd_and_hms(2026, 2, d, 12, 0, 0).unwrap();
        (at, at.date_naive())
    }

    #[test]
    fn create_appends_activates_and_persists() {
        let mut repo = SessionRepository::load(Box::new(MemoryStore::new()));
        let (now, today) = day(3);
        let id = repo.create(fields("cells"), now, today).id.clone();

        assert_eq!(repo.active_id(), Some(id.as_str()));
        assert_eq!(repo.len(), 1);
        let stored = persistence::load_sessions(repo.store()).unwrap();
        assert_eq!(stored, repo.all());
    }

    #[test]
    fn corrupt_store_degrades_to_empty() {
        let store = MemoryStore::with_entries([(SESSIONS_KEY, "[{\"id\":")]);
        let repo = SessionRepository::load(Box::new(store));
        assert!(repo.is_empty());
    }

    #[test]
    fn set_active_to_unknown_id_clears_binding() {
        let mut repo = SessionRepository::load(Box::new(MemoryStore::new()));
        let (now, today) = day(3);
        repo.create(fields("a"), now, today);
        assert!(repo.set_active(Some("nope")).is_none());
        assert!(repo.active_id().is_none());
        assert!(repo.active().is_none());
    }

    #[test]
    fn list_today_filters_by_date_key_in_creation_order() {
        let mut repo = SessionRepository::load(Box::new(MemoryStore::new()));
        let (yesterday_at, yesterday) = day(2);
        let (now, today) = day(3);
        repo.create(fields("old"), yesterday_at, yesterday);
        repo.create(fields("first"), now, today);
        repo.create(fields("second"), now, today);

        let titles: Vec<_> = repo.list_today(today).iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn list_completed_spans_days() {
        let mut repo = SessionRepository::load(Box::new(MemoryStore::new()));
        let (then, earlier) = day(1);
        let (now, today) = day(3);
        let old = repo.create(fields("old"), then, earlier).id.clone();
        repo.create(fields("open"), now, today);
        repo.get_mut(&old).unwrap().completed = true;

        let done = repo.list_completed();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, old);
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let mut store = MemoryStore::new();
        store.set_read_only(true);
        let mut repo = SessionRepository::load(Box::new(store));
        let (now, today) = day(3);
        repo.create(fields("unsaved"), now, today);

        assert_eq!(repo.len(), 1);
        assert!(!repo.flush());
        assert!(repo.store().get(SESSIONS_KEY).unwrap().is_none());
    }
}
