//! Session data model.
//!
//! Field names serialize in camelCase so the stored blob matches the
//! persisted layout: `id`, `title`, `subject`, `durationMin`, `breakMin`,
//! `tasks`, `createdAt`, `dateKey`, `distractions`, `focusedSeconds`,
//! `reflection`, `completed`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SessionId = String;

/// One planned focus block and everything recorded against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    pub subject: String,
    pub duration_min: u32,
    pub break_min: u32,
    #[serde(default)]
    pub tasks: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub date_key: NaiveDate,
    #[serde(default)]
    pub distractions: Vec<Distraction>,
    #[serde(default)]
    pub focused_seconds: u64,
    #[serde(default)]
    pub reflection: Option<Reflection>,
    #[serde(default)]
    pub completed: bool,
}

/// Caller-supplied fields for a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub title: String,
    pub subject: String,
    pub duration_min: u32,
    pub break_min: u32,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distraction {
    pub id: String,
    pub kind: String,
    pub at: DateTime<Utc>,
}

/// Post-session notes. A missing reflection means the prompt was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub rating: Option<u8>,
    pub went_well: String,
    pub improve: String,
}

impl Session {
    /// Build a fresh, uncompleted session created at `now` and bucketed
    /// under `date_key`.
    pub fn new(fields: NewSession, now: DateTime<Utc>, date_key: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            subject: fields.subject,
            duration_min: fields.duration_min,
            break_min: fields.break_min,
            tasks: fields.tasks,
            created_at: now,
            date_key,
            distractions: Vec::new(),
            focused_seconds: 0,
            reflection: None,
            completed: false,
        }
    }

    /// Planned focus length in seconds.
    pub fn focus_secs(&self) -> u64 {
        u64::from(self.duration_min).saturating_mul(60)
    }

    /// Planned break length in seconds.
    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_min).saturating_mul(60)
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Completed"
        } else {
            "Planned"
        }
    }

    pub(crate) fn push_distraction(&mut self, kind: &str, at: DateTime<Utc>) -> &Distraction {
        self.distractions.push(Distraction {
            id: Uuid::new_v4().to_string(),
            kind: kind.to_string(),
            at,
        });
        &self.distractions[self.distractions.len() - 1]
    }
}

/// Split a free-text checklist into tasks: one per line, trimmed, blanks dropped.
pub fn parse_tasks(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
