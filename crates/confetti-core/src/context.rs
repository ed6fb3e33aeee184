//! Explicit wiring of the shared services.
//!
//! Every service exists once per context and is handed out as a cheap clone
//! of a shared handle. Front ends build one context at startup and pass it
//! down instead of looking services up globally.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::storage::Config;
use crate::sync::{get_or_create_node_id_at, DataLayer, DirDataLayer, PhoneSettingsSync};

#[derive(Clone)]
pub struct AppContext {
    config: Arc<Config>,
    data_layer: Arc<dyn DataLayer>,
    settings_sync: PhoneSettingsSync,
}

impl AppContext {
    pub fn new(config: Config, data_layer: Arc<dyn DataLayer>) -> Self {
        let settings_sync = PhoneSettingsSync::new(data_layer.clone());
        Self {
            config: Arc::new(config),
            data_layer,
            settings_sync,
        }
    }

    /// Context backed by the directory data layer described in `config`.
    ///
    /// The local node ID is kept in `state_dir`.
    pub fn with_dir_layer(config: Config, state_dir: &Path) -> Result<Self> {
        let node = get_or_create_node_id_at(state_dir)?;
        let layer = DirDataLayer::new(
            config.data_layer_dir()?,
            node,
            config.sync.poll_interval(),
        );
        Ok(Self::new(config, Arc::new(layer)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_layer(&self) -> Arc<dyn DataLayer> {
        self.data_layer.clone()
    }

    pub fn settings_sync(&self) -> &PhoneSettingsSync {
        &self.settings_sync
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::MemoryDataLayer;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clones_share_one_replicator() {
        let (_phone, wearable) = MemoryDataLayer::paired();
        let ctx = AppContext::new(Config::default(), Arc::new(wearable));
        let other = ctx.clone();

        let _guard = ctx.settings_sync().start().unwrap();
        assert!(other.settings_sync().start().is_err());
    }

    #[test]
    fn test_with_dir_layer_uses_configured_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.sync.data_layer_dir = Some(dir.path().join("layer").display().to_string());

        let ctx = AppContext::with_dir_layer(config, dir.path()).unwrap();
        assert!(ctx.data_layer().paired_phone().is_none());
        assert!(dir.path().join("node_id.txt").exists());
    }
}
