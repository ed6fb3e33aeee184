//! Live view of the paired phone's settings on the wearable.
//!
//! ```text
//!   phone ──publish──▶ DataLayer ──payloads──▶ pump task ──snapshots──▶ watch channel
//!                                                                        │
//!                                            ┌───────────────────────────┼──────────┐
//!                                            ▼                           ▼          ▼
//!                                      SettingsStream            SettingsStream   current()
//! ```
//!
//! The pump is started with [`PhoneSettingsSync::start`] and runs until the
//! returned [`ReplicationGuard`] is dropped. Streams can be created before or
//! after starting; each one begins at the latest snapshot and then follows
//! replacements. Without a paired phone nothing is ever emitted; the
//! [`ReplicatorStatus`] says why.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::codec::decode_envelope;
use super::data_layer::{DataLayer, PayloadReceiver};
use super::types::{ReplicatorStatus, SyncError, SETTINGS_PATH};
use crate::settings::WearSettings;

struct Shared {
    snapshot_tx: watch::Sender<Option<WearSettings>>,
    status_tx: watch::Sender<ReplicatorStatus>,
    running: AtomicBool,
    /// Bumped when a guard drops; a pump only writes while it still owns the
    /// generation it was started with.
    generation: AtomicU64,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) == generation
    }
}

/// Replicates the paired phone's [`WearSettings`] onto this device.
#[derive(Clone)]
pub struct PhoneSettingsSync {
    data_layer: Arc<dyn DataLayer>,
    shared: Arc<Shared>,
}

impl PhoneSettingsSync {
    pub fn new(data_layer: Arc<dyn DataLayer>) -> Self {
        Self {
            data_layer,
            shared: Arc::new(Shared {
                snapshot_tx: watch::channel(None).0,
                status_tx: watch::channel(ReplicatorStatus::Idle).0,
                running: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Start following the paired phone.
    ///
    /// Must be called inside a tokio runtime. Only one replication runs at a
    /// time; a second call before the guard is dropped fails.
    pub fn start(&self) -> Result<ReplicationGuard, SyncError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
        if self.shared.running.swap(true, Ordering::AcqRel) {
            return Err(SyncError::AlreadyRunning);
        }

        let Some(phone) = self.data_layer.paired_phone() else {
            tracing::warn!(node = %self.data_layer.local_node(), "no paired phone, settings will not sync");
            self.shared.status_tx.send_replace(ReplicatorStatus::NoPairedPhone);
            return Ok(ReplicationGuard {
                shared: self.shared.clone(),
                task: None,
            });
        };

        let payloads = match self.data_layer.subscribe(&phone, SETTINGS_PATH) {
            Ok(rx) => rx,
            Err(e) => {
                self.shared.running.store(false, Ordering::Release);
                return Err(e);
            }
        };

        tracing::info!(phone = %phone, "replicating phone settings");
        self.shared.status_tx.send_replace(ReplicatorStatus::Connected);
        let generation = self.shared.generation.load(Ordering::Acquire);
        let task = runtime.spawn(pump(payloads, self.shared.clone(), generation));

        Ok(ReplicationGuard {
            shared: self.shared.clone(),
            task: Some(task),
        })
    }

    /// A new stream starting at the latest snapshot.
    pub fn subscribe(&self) -> SettingsStream {
        SettingsStream {
            rx: self.shared.snapshot_tx.subscribe(),
            primed: false,
        }
    }

    /// Latest snapshot, without waiting.
    pub fn current(&self) -> Option<WearSettings> {
        self.shared.snapshot_tx.borrow().clone()
    }

    pub fn status(&self) -> ReplicatorStatus {
        *self.shared.status_tx.borrow()
    }

    /// Follow status changes.
    pub fn watch_status(&self) -> watch::Receiver<ReplicatorStatus> {
        self.shared.status_tx.subscribe()
    }

    /// Number of live streams.
    pub fn subscriber_count(&self) -> usize {
        self.shared.snapshot_tx.receiver_count()
    }
}

/// Forward decoded payloads until the transport closes or `generation`
/// is retired.
///
/// Writes are checked under the channel lock, so nothing lands after the
/// guard that retired this generation has finished dropping.
async fn pump(mut payloads: PayloadReceiver, shared: Arc<Shared>, generation: u64) {
    loop {
        let payload = payloads.borrow_and_update().clone();
        if let Some(bytes) = payload {
            match decode_envelope(&bytes) {
                Ok(envelope) => {
                    tracing::debug!(published_at = %envelope.published_at, "received settings snapshot");
                    let sent = shared.snapshot_tx.send_if_modified(|current| {
                        if !shared.is_current(generation) {
                            return false;
                        }
                        *current = Some(envelope.settings);
                        true
                    });
                    if !sent {
                        break;
                    }
                }
                Err(e) => tracing::warn!(error = %e, "dropping undecodable settings payload"),
            }
        }

        if payloads.changed().await.is_err() {
            tracing::info!("phone settings channel closed");
            shared.status_tx.send_if_modified(|status| {
                if !shared.is_current(generation) {
                    return false;
                }
                *status = ReplicatorStatus::Disconnected;
                true
            });
            break;
        }
    }
}

/// Keeps replication running. Dropping it releases the transport
/// subscription and returns the replicator to [`ReplicatorStatus::Idle`].
///
/// The pump task is aborted asynchronously, but once the drop returns it can
/// no longer publish snapshots or status, even if it is still unwinding.
pub struct ReplicationGuard {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl ReplicationGuard {
    pub fn stop(self) {}
}

impl Drop for ReplicationGuard {
    fn drop(&mut self) {
        // Retire the generation under the snapshot lock: an in-flight pump
        // write either completes first or observes the new generation.
        self.shared.snapshot_tx.send_if_modified(|_| {
            self.shared.generation.fetch_add(1, Ordering::AcqRel);
            false
        });
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::info!("stopped replicating phone settings");
        }
        self.shared.status_tx.send_replace(ReplicatorStatus::Idle);
        self.shared.running.store(false, Ordering::Release);
    }
}

/// Settings snapshots as they arrive.
///
/// The first call to [`next`](Self::next) returns the latest snapshot if
/// there is one; later calls wait for a replacement.
pub struct SettingsStream {
    rx: watch::Receiver<Option<WearSettings>>,
    primed: bool,
}

impl SettingsStream {
    /// Next snapshot. `None` once the replicator itself is gone.
    pub async fn next(&mut self) -> Option<WearSettings> {
        if !self.primed {
            self.primed = true;
            if let Some(settings) = self.rx.borrow_and_update().clone() {
                return Some(settings);
            }
        }
        loop {
            self.rx.changed().await.ok()?;
            if let Some(settings) = self.rx.borrow_and_update().clone() {
                return Some(settings);
            }
        }
    }

    /// Like [`next`](Self::next) but gives up after `timeout`.
    pub async fn next_within(&mut self, timeout: Duration) -> Option<WearSettings> {
        tokio::time::timeout(timeout, self.next()).await.ok().flatten()
    }
}
