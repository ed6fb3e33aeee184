//! Directory-backed data layer.
//!
//! Devices sharing a directory exchange data items as files:
//!
//! ```text
//! <root>/paired_phone            node ID of the phone
//! <root>/<node id>/<item path>   current payload of each item
//! ```
//!
//! Subscriptions poll the item file and forward changed contents.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;

use super::data_layer::{validate_path, DataLayer, PayloadReceiver};
use super::node_id::NodeId;
use super::types::SyncError;

const PAIRED_PHONE_FILE: &str = "paired_phone";

pub struct DirDataLayer {
    root: PathBuf,
    local: NodeId,
    poll_interval: Duration,
}

impl DirDataLayer {
    pub fn new(root: impl Into<PathBuf>, local: NodeId, poll_interval: Duration) -> Self {
        Self {
            root: root.into(),
            local,
            poll_interval,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register this device as the phone the wearables in `root` pair with.
    pub fn register_as_phone(&self) -> Result<(), SyncError> {
        fs::create_dir_all(&self.root)?;
        write_atomic(
            &self.root.join(PAIRED_PHONE_FILE),
            self.local.as_str().as_bytes(),
        )?;
        tracing::info!(node = %self.local, root = %self.root.display(), "registered as paired phone");
        Ok(())
    }

    fn item_file(&self, node: &NodeId, path: &str) -> Result<PathBuf, SyncError> {
        let relative = validate_path(path)?;
        Ok(self.root.join(node.as_str()).join(relative))
    }
}

impl DataLayer for DirDataLayer {
    fn local_node(&self) -> &NodeId {
        &self.local
    }

    fn paired_phone(&self) -> Option<NodeId> {
        let content = match fs::read_to_string(self.root.join(PAIRED_PHONE_FILE)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(error = %e, "cannot read paired phone file");
                return None;
            }
        };
        match NodeId::parse(&content) {
            Ok(node) => Some(node),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed paired phone file");
                None
            }
        }
    }

    /// Needs a tokio runtime: the poller runs as a task and stops once every
    /// receiver is dropped.
    fn subscribe(&self, node: &NodeId, path: &str) -> Result<PayloadReceiver, SyncError> {
        let file = self.item_file(node, path)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SyncError::NoRuntime)?;

        let (tx, rx) = watch::channel(read_item(&file));
        let interval = self.poll_interval;
        runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    _ = ticker.tick() => {}
                }
                let current = read_item(&file);
                tx.send_if_modified(|value| {
                    if *value != current && current.is_some() {
                        *value = current;
                        true
                    } else {
                        false
                    }
                });
            }
            tracing::debug!(file = %file.display(), "stopped polling data item");
        });

        Ok(rx)
    }

    fn publish(&self, path: &str, payload: Vec<u8>) -> Result<(), SyncError> {
        let file = self.item_file(&self.local, path)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&file, &payload)?;
        tracing::debug!(file = %file.display(), bytes = payload.len(), "published data item");
        Ok(())
    }
}

/// Current file contents, `None` while the item does not exist.
fn read_item(file: &Path) -> Option<Vec<u8>> {
    match fs::read(file) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(file = %file.display(), error = %e, "cannot read data item");
            None
        }
    }
}

fn write_atomic(file: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let tmp = file.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layer(dir: &TempDir) -> DirDataLayer {
        DirDataLayer::new(dir.path(), NodeId::generate(), Duration::from_millis(10))
    }

    #[test]
    fn test_no_paired_phone_without_registration() {
        let dir = TempDir::new().unwrap();
        assert!(layer(&dir).paired_phone().is_none());
    }

    #[test]
    fn test_register_as_phone() {
        let dir = TempDir::new().unwrap();
        let phone = layer(&dir);
        let wearable = layer(&dir);
        phone.register_as_phone().unwrap();
        assert_eq!(wearable.paired_phone().as_ref(), Some(phone.local_node()));
    }

    #[test]
    fn test_malformed_paired_phone_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PAIRED_PHONE_FILE), "garbage").unwrap();
        assert!(layer(&dir).paired_phone().is_none());
    }

    #[test]
    fn test_publish_writes_item_file() {
        let dir = TempDir::new().unwrap();
        let phone = layer(&dir);
        phone.publish("/wear_settings", b"{}".to_vec()).unwrap();
        let file = dir
            .path()
            .join(phone.local_node().as_str())
            .join("wear_settings");
        assert_eq!(fs::read(file).unwrap(), b"{}");
    }

    #[test]
    fn test_subscribe_outside_runtime_fails() {
        let dir = TempDir::new().unwrap();
        let wearable = layer(&dir);
        let node = NodeId::generate();
        assert!(matches!(
            wearable.subscribe(&node, "/wear_settings"),
            Err(SyncError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn test_subscribe_sees_current_and_later_values() {
        let dir = TempDir::new().unwrap();
        let phone = layer(&dir);
        let wearable = layer(&dir);
        phone.publish("/item", b"v1".to_vec()).unwrap();

        let mut rx = wearable.subscribe(phone.local_node(), "/item").unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some(&b"v1"[..]));

        phone.publish("/item", b"v2".to_vec()).unwrap();
        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.borrow().as_deref(), Some(&b"v2"[..]));
    }
}
