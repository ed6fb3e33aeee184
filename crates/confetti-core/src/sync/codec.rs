//! Encoding/decoding between settings snapshots and data-layer payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::WearSettings;
use crate::sync::types::SyncError;

/// Highest envelope version this build understands.
pub const SNAPSHOT_VERSION: u32 = 1;

/// What travels over the data layer for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsEnvelope {
    pub version: u32,
    pub published_at: DateTime<Utc>,
    pub settings: WearSettings,
}

/// Convert settings to a payload stamped with the current time.
pub fn encode_settings(settings: &WearSettings) -> Result<Vec<u8>, SyncError> {
    encode_envelope(&SettingsEnvelope {
        version: SNAPSHOT_VERSION,
        published_at: Utc::now(),
        settings: settings.clone(),
    })
}

pub fn encode_envelope(envelope: &SettingsEnvelope) -> Result<Vec<u8>, SyncError> {
    Ok(serde_json::to_vec(envelope)?)
}

/// Convert a payload back to its envelope.
///
/// Newer envelope versions are rejected rather than half-read.
pub fn decode_envelope(payload: &[u8]) -> Result<SettingsEnvelope, SyncError> {
    let envelope: SettingsEnvelope = serde_json::from_slice(payload)?;
    if envelope.version > SNAPSHOT_VERSION {
        return Err(SyncError::UnsupportedVersion {
            found: envelope.version,
            supported: SNAPSHOT_VERSION,
        });
    }
    Ok(envelope)
}

/// Convert a payload to settings, dropping the envelope.
pub fn decode_settings(payload: &[u8]) -> Result<WearSettings, SyncError> {
    decode_envelope(payload).map(|envelope| envelope.settings)
}
