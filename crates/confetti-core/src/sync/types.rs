//! Core types for phone-to-wearable synchronization.

use serde::{Deserialize, Serialize};

/// Data path the phone publishes its settings snapshot under.
pub const SETTINGS_PATH: &str = "/wear_settings";

/// Where the replicator currently stands with the paired phone.
///
/// This is reported out of band; the settings stream itself stays silent
/// while no snapshot is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicatorStatus {
    /// Not started, or stopped.
    #[default]
    Idle,
    /// Started but the data layer knows no paired phone.
    NoPairedPhone,
    /// Subscribed to the phone's settings.
    Connected,
    /// The phone's channel went away; the last snapshot stays current.
    Disconnected,
}

/// Sync error types.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Invalid node ID format: {0}")]
    InvalidNodeId(String),

    #[error("Invalid data path: {0:?}")]
    InvalidPath(String),

    #[error("Unsupported snapshot version {found} (max {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Replicator is already running")]
    AlreadyRunning,

    #[error("No async runtime available to run replication")]
    NoRuntime,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_is_idle() {
        assert_eq!(ReplicatorStatus::default(), ReplicatorStatus::Idle);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ReplicatorStatus::NoPairedPhone).unwrap();
        assert_eq!(json, "\"no_paired_phone\"");
    }
}
