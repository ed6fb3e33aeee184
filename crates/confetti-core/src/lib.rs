//! # Confetti Core Library
//!
//! This library provides the non-UI logic behind the Confetti conference
//! schedule apps. The phone and wearable front ends render on top of it; the
//! `confetti` CLI drives the same code from a terminal.
//!
//! ## Architecture
//!
//! - **Sessions**: session records, grouping by start time for display and the
//!   per-row helpers (break detection, speaker/room subtitle)
//! - **Settings**: the settings snapshot the phone shares with the wearable and
//!   decoding of its packed theme colors
//! - **Sync**: a data-layer abstraction over the paired-device channel and the
//!   replicator that turns it into a live last-value stream
//! - **Storage**: TOML-based configuration under the user's config directory
//!
//! ## Key Components
//!
//! - [`group_by_start_time`]: partitions a sorted session list into display groups
//! - [`PhoneSettingsSync`]: live view of the paired phone's settings
//! - [`DataLayer`]: trait for the cross-device transport
//! - [`AppContext`]: explicit wiring of the shared services
//! - [`Config`]: application configuration management

pub mod context;
pub mod error;
pub mod session;
pub mod settings;
pub mod storage;
pub mod sync;

pub use context::AppContext;
pub use error::{ConfigError, CoreError, ValidationError};
pub use session::{
    group_by_start_time, section_headers, SessionDetails, SessionsAtTime, SectionHeader,
};
pub use settings::{Color, Theme, ThemePalette, WearSettings};
pub use storage::{Config, DisplayConfig, SyncConfig};
pub use sync::{
    DataLayer, DirDataLayer, MemoryDataLayer, NodeId, PhoneSettingsSync, ReplicationGuard,
    ReplicatorStatus, SettingsStream, SyncError,
};
