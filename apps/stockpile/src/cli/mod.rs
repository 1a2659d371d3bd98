//! # Stockpile CLI Module
//!
//! This module implements the CLI interface for Stockpile.
//!
//! ## Available Commands
//!
//! - `play` - Interactive menu (default)
//! - `villages` - List villages, their items and requirements
//! - `search` - Find which villages hold an item
//! - `simulate` - Clear every village automatically, weakest items dropped first

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stockpile_core::StockpileError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Stockpile - village rescue game
///
/// Carry items between villages in a pack with limited room.
#[derive(Parser, Debug)]
#[command(name = "stockpile")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML world file (falls back to STOCKPILE_CONFIG, then the built-in roster)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play the interactive game
    Play,

    /// List villages with their items and requirements
    Villages,

    /// Find which villages hold an item
    Search {
        /// Item name (case-insensitive)
        #[arg(short, long)]
        name: String,
    },

    /// Clear every village automatically, dropping the weakest items first
    Simulate,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), StockpileError> {
    let config = cli.config.as_deref();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Play) | None => cmd_play(config),
        Some(Commands::Villages) => cmd_villages(config, json_mode),
        Some(Commands::Search { name }) => cmd_search(config, json_mode, &name),
        Some(Commands::Simulate) => cmd_simulate(config, json_mode, cli.verbose),
    }
}
