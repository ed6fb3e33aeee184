pub mod config;
pub mod sessions;
pub mod sync;

use std::path::{Path, PathBuf};

use confetti_core::Config;

/// Where this invocation keeps its state, plus the loaded config.
pub struct CliEnv {
    pub dir: PathBuf,
    pub config: Config,
}

impl CliEnv {
    pub fn load(dir: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load_from(&config_path(&dir))?;
        Ok(Self { dir, config })
    }

    pub fn config_path(&self) -> PathBuf {
        config_path(&self.dir)
    }
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}
