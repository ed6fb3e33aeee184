//! Sync subcommand for sharing settings between phone and wearable.
//!
//! Both sides talk through the directory data layer configured in
//! `sync.data_layer_dir`: `publish` acts as the phone, `watch` as the
//! wearable.

use std::time::Duration;

use clap::Subcommand;
use confetti_core::sync::{encode_settings, get_or_create_node_id_at, SETTINGS_PATH};
use confetti_core::{AppContext, DataLayer, DirDataLayer, ReplicatorStatus, WearSettings};
use serde_json::json;

use super::CliEnv;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Publish the configured wear settings as the paired phone
    Publish,
    /// Follow the paired phone's settings and print each snapshot
    Watch {
        /// Exit after the first snapshot
        #[arg(long)]
        once: bool,
        /// Give up if no snapshot arrives within this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Print this device's node ID
    NodeId,
}

pub fn run(action: SyncAction, env: &CliEnv) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SyncAction::Publish => publish(env),
        SyncAction::Watch { once, timeout_ms } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(watch(env, once, timeout_ms.map(Duration::from_millis)))
        }
        SyncAction::NodeId => {
            println!("{}", get_or_create_node_id_at(&env.dir)?);
            Ok(())
        }
    }
}

fn publish(env: &CliEnv) -> Result<(), Box<dyn std::error::Error>> {
    let node = get_or_create_node_id_at(&env.dir)?;
    let layer = DirDataLayer::new(
        env.config.data_layer_dir()?,
        node,
        env.config.sync.poll_interval(),
    );
    layer.register_as_phone()?;

    let settings = env.config.wear_settings();
    layer.publish(SETTINGS_PATH, encode_settings(&settings)?)?;
    println!("published settings from {}", layer.local_node());
    Ok(())
}

async fn watch(
    env: &CliEnv,
    once: bool,
    timeout: Option<Duration>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::with_dir_layer(env.config.clone(), &env.dir)?;
    let sync = ctx.settings_sync();
    let _guard = sync.start()?;

    if sync.status() == ReplicatorStatus::NoPairedPhone {
        return Err("no paired phone; run `confetti sync publish` on the phone side first".into());
    }

    let mut stream = sync.subscribe();
    let mut received = 0usize;
    loop {
        let next = match timeout {
            Some(limit) => stream.next_within(limit).await,
            None => stream.next().await,
        };
        let Some(settings) = next else {
            if received > 0 {
                return Ok(());
            }
            return Err("no settings received".into());
        };
        print_snapshot(&settings)?;
        received += 1;
        if once {
            return Ok(());
        }
    }
}

fn print_snapshot(settings: &WearSettings) -> Result<(), Box<dyn std::error::Error>> {
    let output = match settings.palette() {
        Some(palette) => json!({ "theme": palette }),
        None => json!({ "theme": null }),
    };
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}
