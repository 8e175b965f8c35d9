//! # psync-cli
//!
//! Command-line interface for profile permission synchronization.
//!
//! - `psync sync` — reconcile every profile against the local source tree
//! - `psync scan` — print the discovered local entities
//! - `psync profiles` — list the profiles found in the source tree
//!
//! Configuration comes from `psync.toml` (override with `--config`);
//! a missing config file falls back to the built-in defaults.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::SyncConfig;

/// Profile permission synchronizer.
#[derive(Parser)]
#[command(name = "psync", version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "psync.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every profile against the local source tree.
    Sync,
    /// Print the entities discovered in the local source tree.
    Scan,
    /// List the profiles found in the profiles directory.
    Profiles,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the summary on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("psync_scan=info".parse()?)
                .add_directive("psync_policy=info".parse()?)
                .add_directive("psync_profile=info".parse()?)
                .add_directive("psync_reconcile=info".parse()?)
                .add_directive("psync_cli=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = SyncConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Sync => commands::sync::execute(&config).await,
        Commands::Scan => commands::scan::execute(&config),
        Commands::Profiles => commands::profiles::execute(&config),
    }
}
