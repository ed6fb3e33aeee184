use std::path::Path;

use clap::Subcommand;
use confetti_core::Config;

use super::CliEnv;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "sync.poll_interval_ms", "wear.theme.primary")
        key: String,
    },
    /// Set a config value
    Set {
        /// Dot-separated key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction, env: &CliEnv) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => match env.config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            let mut config = env.config.clone();
            config.set(&key, &value)?;
            config.save_to(&env.config_path())?;
            println!("ok");
        }
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(&env.config)?;
            println!("{json}");
        }
        ConfigAction::Reset => reset(&env.dir)?,
    }
    Ok(())
}

/// Overwrite `<dir>/config.toml` with defaults without reading it first.
pub fn reset(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    Config::default().save_to(&super::config_path(dir))?;
    println!("config reset to defaults");
    Ok(())
}
