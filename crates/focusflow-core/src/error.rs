//! Core error types for focusflow-core.
//!
//! Storage and configuration failures are real errors. Rejected commands
//! (starting without an active session, ending a finished one, submitting a
//! reflection with nothing bound) are reported through [`CommandError`] and
//! never change state.

use std::path::PathBuf;
use thiserror::Error;

/// Key-value store and serialization errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the SQLite store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),

    /// Stored value could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Store refuses writes (quota, read-only medium)
    #[error("Store is not writable: {0}")]
    Unwritable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// A command that was refused because its preconditions did not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("no active session")]
    NoActiveSession,

    #[error("session {id} is already completed")]
    SessionCompleted { id: String },

    #[error("no reflection is awaiting input")]
    NoReflectionTarget,

    /// The bound reflection target no longer resolves; capture was closed.
    #[error("reflection target {id} no longer exists")]
    ReflectionTargetMissing { id: String },
}
