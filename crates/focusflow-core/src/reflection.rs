//! One-shot reflection prompt bound to a just-completed session.

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::session::{Reflection, Session, SessionId};

/// Caller-supplied reflection fields, stored exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionInput {
    pub rating: Option<u8>,
    pub went_well: String,
    pub improve: String,
}

impl From<ReflectionInput> for Reflection {
    fn from(input: ReflectionInput) -> Self {
        Reflection {
            rating: input.rating,
            went_well: input.went_well,
            improve: input.improve,
        }
    }
}

/// Capture-mode flag. Has no timer interaction.
#[derive(Debug, Clone, Default)]
pub struct ReflectionCapture {
    target: Option<SessionId>,
}

impl ReflectionCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, session_id: &str) {
        tracing::debug!(session_id, "reflection opened");
        self.target = Some(session_id.to_string());
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    /// Write `input` onto the bound session and close capture.
    ///
    /// `session` is the caller's lookup of [`target`](Self::target). If it
    /// no longer resolves, capture closes without writing anything. A session
    /// that already has a reflection is overwritten.
    pub fn submit<'a>(
        &mut self,
        input: ReflectionInput,
        session: Option<&'a mut Session>,
    ) -> Result<&'a Reflection, CommandError> {
        let id = self.target.take().ok_or(CommandError::NoReflectionTarget)?;
        let session = session
            .filter(|s| s.id == id)
            .ok_or_else(|| CommandError::ReflectionTargetMissing { id: id.clone() })?;
        let reflection = session.reflection.insert(input.into());
        tracing::info!(session_id = %id, rating = ?reflection.rating, "reflection saved");
        Ok(reflection)
    }

    /// Close capture without recording anything. Returns the closed target.
    pub fn skip(&mut self) -> Option<SessionId> {
        self.target.take()
    }
}
