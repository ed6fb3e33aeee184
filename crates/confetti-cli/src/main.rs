use std::path::PathBuf;

use clap::{Parser, Subcommand};
use confetti_core::storage::data_dir;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::config::ConfigAction;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser)]
#[command(name = "confetti", version, about = "Confetti CLI")]
struct Cli {
    /// Directory holding config.toml and the local node ID
    /// (defaults to ~/.config/confetti)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Session list rendering
    Sessions {
        #[command(subcommand)]
        action: commands::sessions::SessionsAction,
    },
    /// Phone/wearable settings sync
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = resolve_dir(cli.config_dir).and_then(|dir| match cli.command {
        // Reset must work even when the existing file no longer loads.
        Commands::Config {
            action: ConfigAction::Reset,
        } => {
            init_logging(DEFAULT_LOG_LEVEL);
            commands::config::reset(&dir)
        }
        command => {
            let env = commands::CliEnv::load(dir)?;
            init_logging(&env.config.log_level);
            match command {
                Commands::Config { action } => commands::config::run(action, &env),
                Commands::Sessions { action } => commands::sessions::run(action, &env),
                Commands::Sync { action } => commands::sync::run(action, &env),
            }
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn resolve_dir(flag: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match flag {
        Some(dir) => Ok(dir),
        None => Ok(data_dir()?),
    }
}

/// Log to stderr; CONFETTI_LOG overrides the configured level.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env("CONFETTI_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
