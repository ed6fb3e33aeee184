//! The cross-device data layer.
//!
//! Paired devices share small data items addressed by node and path. Each
//! item only ever has a current value, so subscriptions are last-value
//! channels: a subscriber sees the value at subscribe time (if any) and every
//! later replacement, never history.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use super::node_id::NodeId;
use super::types::SyncError;

/// Live view of one data item. `None` until the item has been published.
pub type PayloadReceiver = watch::Receiver<Option<Vec<u8>>>;

/// Every transport between the phone and the wearable implements this trait.
///
/// Dropping the returned receiver releases the subscription.
pub trait DataLayer: Send + Sync {
    /// This device.
    fn local_node(&self) -> &NodeId;

    /// The phone this device is paired with, if any.
    fn paired_phone(&self) -> Option<NodeId>;

    /// Subscribe to the item at `path` published by `node`.
    fn subscribe(&self, node: &NodeId, path: &str) -> Result<PayloadReceiver, SyncError>;

    /// Replace the item at `path` owned by this device.
    fn publish(&self, path: &str, payload: Vec<u8>) -> Result<(), SyncError>;
}

/// Validate a data path: absolute, no empty or `..` segments, only
/// `[A-Za-z0-9_-]` within segments.
pub fn validate_path(path: &str) -> Result<&str, SyncError> {
    let invalid = || SyncError::InvalidPath(path.to_string());
    let rest = path.strip_prefix('/').ok_or_else(invalid)?;
    if rest.is_empty() {
        return Err(invalid());
    }
    for segment in rest.split('/') {
        let ok = !segment.is_empty()
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !ok {
            return Err(invalid());
        }
    }
    Ok(rest)
}

type ItemKey = (NodeId, String);

#[derive(Default)]
struct Hub {
    items: HashMap<ItemKey, watch::Sender<Option<Vec<u8>>>>,
}

impl Hub {
    fn item(&mut self, node: &NodeId, path: &str) -> &watch::Sender<Option<Vec<u8>>> {
        self.items
            .entry((node.clone(), path.to_string()))
            .or_insert_with(|| watch::channel(None).0)
    }
}

/// In-process data layer. Handles created by [`MemoryDataLayer::paired`]
/// share one hub, standing in for the platform channel in tests and demos.
#[derive(Clone)]
pub struct MemoryDataLayer {
    local: NodeId,
    peer: Option<NodeId>,
    hub: Arc<Mutex<Hub>>,
}

impl MemoryDataLayer {
    /// A connected pair: `(phone, wearable)`.
    pub fn paired() -> (Self, Self) {
        let hub = Arc::new(Mutex::new(Hub::default()));
        let phone_id = NodeId::generate();
        let watch_id = NodeId::generate();
        let phone = Self {
            local: phone_id.clone(),
            peer: None,
            hub: hub.clone(),
        };
        let wearable = Self {
            local: watch_id,
            peer: Some(phone_id),
            hub,
        };
        (phone, wearable)
    }

    /// A device with no paired phone.
    pub fn standalone() -> Self {
        Self {
            local: NodeId::generate(),
            peer: None,
            hub: Arc::new(Mutex::new(Hub::default())),
        }
    }

    /// Tear down the item at `path` owned by this device, as if the node
    /// left the network. Current subscribers see the channel close.
    pub fn close(&self, path: &str) {
        let key = (self.local.clone(), path.to_string());
        self.lock().items.remove(&key);
    }

    fn lock(&self) -> MutexGuard<'_, Hub> {
        self.hub.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DataLayer for MemoryDataLayer {
    fn local_node(&self) -> &NodeId {
        &self.local
    }

    fn paired_phone(&self) -> Option<NodeId> {
        self.peer.clone()
    }

    fn subscribe(&self, node: &NodeId, path: &str) -> Result<PayloadReceiver, SyncError> {
        validate_path(path)?;
        Ok(self.lock().item(node, path).subscribe())
    }

    fn publish(&self, path: &str, payload: Vec<u8>) -> Result<(), SyncError> {
        validate_path(path)?;
        let local = self.local.clone();
        self.lock().item(&local, path).send_replace(Some(payload));
        tracing::debug!(node = %local, path, "published data item");
        Ok(())
    }
}
