//! Command-line interface for strictly_sync.

use clap::{Parser, Subcommand};

/// Strictly Sync - server-authoritative tic-tac-toe client
#[derive(Parser, Debug)]
#[command(name = "strictly_sync")]
#[command(about = "Thin client that mirrors a tic-tac-toe authority over WebSocket", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to client config (TOML). Missing file means defaults.
    #[arg(short, long, default_value = "strictly_sync.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to an authority and play from the terminal
    Play {
        /// Authority WebSocket URL (overrides config)
        #[arg(long)]
        url: Option<String>,

        /// Reply bound for moves in milliseconds, 0 to wait forever (overrides config)
        #[arg(long)]
        move_timeout_ms: Option<u64>,
    },

    /// Print the effective configuration
    Config,
}
