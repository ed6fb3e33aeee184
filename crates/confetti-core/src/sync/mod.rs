//! Phone-to-wearable settings synchronization.
//!
//! The phone publishes a [`WearSettings`](crate::settings::WearSettings)
//! snapshot on the data layer; the wearable replicates it into a live value.

pub mod codec;
pub mod data_layer;
pub mod dir_layer;
pub mod node_id;
pub mod replicator;
pub mod types;

pub use codec::{decode_settings, encode_settings, SettingsEnvelope};
pub use data_layer::{DataLayer, MemoryDataLayer, PayloadReceiver};
pub use dir_layer::DirDataLayer;
pub use node_id::{get_or_create_node_id_at, NodeId};
pub use replicator::{PhoneSettingsSync, ReplicationGuard, SettingsStream};
pub use types::{ReplicatorStatus, SyncError, SETTINGS_PATH};
