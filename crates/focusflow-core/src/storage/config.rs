//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default focus and break lengths offered for new sessions
//! - The theme used when none has been chosen yet
//! - The distraction tags offered while a session runs
//!
//! Configuration is stored at `~/.config/focusflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::theme::Theme;

/// Defaults for newly created sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default = "default_duration_min")]
    pub duration_min: u32,
    #[serde(default = "default_break_min")]
    pub break_min: u32,
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub default_theme: Theme,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusflow/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: SessionDefaults,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default = "default_distraction_kinds")]
    pub distraction_kinds: Vec<String>,
}

// Default functions
fn default_duration_min() -> u32 {
    25
}
fn default_break_min() -> u32 {
    5
}
fn default_distraction_kinds() -> Vec<String> {
    ["phone", "social", "notification", "noise", "people", "other"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            duration_min: default_duration_min(),
            break_min: default_break_min(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_theme: Theme::Light,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: SessionDefaults::default(),
            ui: UiConfig::default(),
            distraction_kinds: default_distraction_kinds(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Array(_) => serde_json::Value::Array(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| serde_json::Value::String(s.to_string()))
                            .collect(),
                    ),
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default config path inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk or return default when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| load_failed(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    pub fn allows_distraction(&self, kind: &str) -> bool {
        self.distraction_kinds.iter().any(|k| k == kind)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.defaults.duration_min, 25);
        assert_eq!(cfg.defaults.break_min, 5);
        assert_eq!(cfg.ui.default_theme, Theme::Light);
        assert!(cfg.allows_distraction("notification"));
        assert!(!cfg.allows_distraction("daydream"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[defaults]\nbreak_min = 0\n").unwrap();
        assert_eq!(parsed.defaults.break_min, 0);
        assert_eq!(parsed.defaults.duration_min, 25);
        assert_eq!(parsed.distraction_kinds.len(), 6);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("defaults.duration_min").as_deref(), Some("25"));
        assert_eq!(cfg.get("ui.default_theme").as_deref(), Some("light"));
        assert!(cfg.get("ui.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("defaults.break_min", "10").unwrap();
        assert_eq!(cfg.defaults.break_min, 10);
    }

    #[test]
    fn set_updates_theme_and_rejects_unknown_theme() {
        let mut cfg = Config::default();
        cfg.set("ui.default_theme", "dark").unwrap();
        assert_eq!(cfg.ui.default_theme, Theme::Dark);
        assert!(matches!(
            cfg.set("ui.default_theme", "neon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.ui.default_theme, Theme::Dark);
    }

    #[test]
    fn set_replaces_list_from_comma_separated() {
        let mut cfg = Config::default();
        cfg.set("distraction_kinds", "phone, email").unwrap();
        assert_eq!(cfg.distraction_kinds, vec!["phone", "email"]);
        assert_eq!(cfg.get("distraction_kinds").as_deref(), Some("phone,email"));
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_number() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("defaults.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("defaults.duration_min", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(cfg.set("defaults", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn missing_file_loads_default_and_save_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut cfg = Config::default();
        cfg.defaults.duration_min = 50;
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().defaults.duration_min, 50);
    }

    #[test]
    fn malformed_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "defaults = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
