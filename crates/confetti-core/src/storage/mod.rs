mod config;

pub use config::{Config, DisplayConfig, SyncConfig, WearConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/confetti[-dev]/` based on CONFETTI_ENV.
///
/// Set CONFETTI_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CONFETTI_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("confetti-dev")
    } else {
        base_dir.join("confetti")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
