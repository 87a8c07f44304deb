//! Persistence adapter: the session collection and theme preference as
//! blobs under two fixed keys.
//!
//! Nothing here validates content beyond JSON decoding. Callers decide how
//! to degrade when a read fails.

use crate::error::StorageError;
use crate::session::Session;
use crate::theme::Theme;

use super::kv::KeyValueStore;

pub const SESSIONS_KEY: &str = "focusflow_sessions";
pub const THEME_KEY: &str = "focusflow_theme";

/// Read the stored session collection. A missing key is an empty collection.
pub fn load_sessions<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<Session>, StorageError> {
    match store.get(SESSIONS_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Overwrite the stored session collection with `sessions`.
pub fn save_sessions<S: KeyValueStore + ?Sized>(
    store: &mut S,
    sessions: &[Session],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(sessions)?;
    store.set(SESSIONS_KEY, &json)
}

/// Read the stored theme. Unknown literals read as `None`.
pub fn load_theme<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<Theme>, StorageError> {
    Ok(store.get(THEME_KEY)?.and_then(|raw| raw.parse().ok()))
}

pub fn save_theme<S: KeyValueStore + ?Sized>(store: &mut S, theme: Theme) -> Result<(), StorageError> {
    store.set(THEME_KEY, theme.as_str())
}
