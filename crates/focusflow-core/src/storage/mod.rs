mod config;
pub mod database;
pub mod kv;
pub mod persistence;

pub use config::{Config, SessionDefaults, UiConfig};
pub use database::Database;
pub use kv::{KeyValueStore, MemoryStore};
pub use persistence::{SESSIONS_KEY, THEME_KEY};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `FOCUSFLOW_DATA_DIR` wins outright. Otherwise `~/.config/focusflow[-dev]/`
/// based on FOCUSFLOW_ENV (set FOCUSFLOW_ENV=dev to use the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSFLOW_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("focusflow-dev")
            } else {
                base_dir.join("focusflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
