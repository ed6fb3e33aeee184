//! TOML-based application configuration.
//!
//! Stores:
//! - Sync transport settings (poll interval, shared data-layer directory)
//! - Display patterns for session section headers
//! - Log level
//! - The phone-side wear settings that get published to the wearable
//!
//! Configuration is stored at `~/.config/confetti/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::ConfigError;
use crate::session::is_valid_pattern;
use crate::settings::{Theme, ThemePalette, WearSettings};

/// Sync transport configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Shared directory for the directory-backed data layer.
    /// Defaults to `<data_dir>/data_layer`.
    #[serde(default)]
    pub data_layer_dir: Option<String>,
}

/// Section header patterns (strftime syntax).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Used for the first section, which also shows the weekday.
    #[serde(default = "default_day_pattern")]
    pub day_pattern: String,
    #[serde(default = "default_time_pattern")]
    pub time_pattern: String,
}

/// Settings the phone shares with the wearable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearConfig {
    /// When off, snapshots carry no theme and the wearable keeps its own.
    #[serde(default = "default_true")]
    pub share_theme: bool,
    #[serde(default)]
    pub theme: ThemePalette,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/confetti/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub wear: WearConfig,
    /// Default tracing filter when CONFETTI_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default functions
fn default_poll_interval_ms() -> u64 {
    500
}
fn default_day_pattern() -> String {
    "%A %-H:%M".into()
}
fn default_time_pattern() -> String {
    "%-H:%M".into()
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            data_layer_dir: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            day_pattern: default_day_pattern(),
            time_pattern: default_time_pattern(),
        }
    }
}

impl Default for WearConfig {
    fn default() -> Self {
        Self {
            share_theme: true,
            theme: ThemePalette::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            display: DisplayConfig::default(),
            wear: WearConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
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
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// fails validation, or the defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Reject values that would only fail later at render or sync time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sync.poll_interval_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        for (key, pattern) in [
            ("display.day_pattern", &self.display.day_pattern),
            ("display.time_pattern", &self.display.time_pattern),
        ] {
            if !is_valid_pattern(pattern) {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("invalid time pattern '{pattern}'"),
                });
            }
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or fails validation. The config is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Directory shared with the paired devices.
    pub fn data_layer_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.sync.data_layer_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(data_dir()?.join("data_layer")),
        }
    }

    /// Snapshot the phone publishes.
    pub fn wear_settings(&self) -> WearSettings {
        if self.wear.share_theme {
            WearSettings::with_theme(Theme::from_palette(&self.wear.theme))
        } else {
            WearSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Color;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("sync.poll_interval_ms").as_deref(), Some("500"));
        assert_eq!(cfg.get("wear.share_theme").as_deref(), Some("true"));
        assert_eq!(cfg.get("wear.theme.surface").as_deref(), Some("#FF303133"));
        assert!(cfg.get("sync.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("wear.share_theme", "false").unwrap();
        cfg.set("sync.poll_interval_ms", "250").unwrap();
        cfg.set("wear.theme.primary", "#FF112233").unwrap();
        cfg.set("log_level", "debug").unwrap();

        assert!(!cfg.wear.share_theme);
        assert_eq!(cfg.sync.poll_interval_ms, 250);
        assert_eq!(cfg.wear.theme.primary, Color::from_argb(0xFF11_2233));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn set_optional_string() {
        let mut cfg = Config::default();
        cfg.set("sync.data_layer_dir", "/tmp/shared").unwrap();
        assert_eq!(cfg.data_layer_dir().unwrap(), PathBuf::from("/tmp/shared"));
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("sync.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values_and_keeps_config() {
        let mut cfg = Config::default();
        assert!(cfg.set("wear.share_theme", "not_a_bool").is_err());
        assert!(cfg.set("sync.poll_interval_ms", "0").is_err());
        assert!(cfg.set("wear.theme.primary", "blue").is_err());
        assert!(cfg.set("display.time_pattern", "%Q").is_err());
        assert!(cfg.set("display.time_pattern", "%H:%M %z").is_err());
        assert!(cfg.set("display.day_pattern", "%A %Z").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn wear_settings_follow_share_theme() {
        let mut cfg = Config::default();
        let shared = cfg.wear_settings();
        assert_eq!(
            shared.theme.unwrap().to_palette().unwrap(),
            ThemePalette::default()
        );

        cfg.wear.share_theme = false;
        assert!(cfg.wear_settings().theme.is_none());
    }

    #[test]
    fn load_from_creates_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("display.time_pattern", "%H:%M").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.display.time_pattern, "%H:%M");
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sync]\npoll_interval_ms = \"soon\"\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("log_level = \"warn\"\n").unwrap();
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.display, DisplayConfig::default());
        assert!(cfg.wear.share_theme);
    }
}
