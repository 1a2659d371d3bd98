//! # Stockpile - Village Rescue
//!
//! The main binary for the Stockpile game.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/stockpile (THE BINARY)              │
//! │                                                          │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐  │
//! │  │    CLI      │    │  Menu loop  │    │ World file  │  │
//! │  │   (clap)    │    │ (stdin/out) │    │   (toml)    │  │
//! │  └──────┬──────┘    └──────┬──────┘    └──────┬──────┘  │
//! │         └──────────────────┼──────────────────┘         │
//! │                            ▼                            │
//! │                   ┌────────────────┐                    │
//! │                   │ stockpile-core │                    │
//! │                   │  (THE LOGIC)   │                    │
//! │                   └────────────────┘                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Play with the built-in villages
//! stockpile
//!
//! # Play a custom world
//! stockpile -c world.toml play
//!
//! # Non-interactive commands
//! stockpile villages --json-mode
//! stockpile search -n sword
//! stockpile simulate -v
//! ```

use clap::Parser;
use stockpile::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing: STOCKPILE_LOG_FORMAT=json enables machine-parseable output.
    // Logs go to stderr; stdout belongs to the game.
    let log_format = std::env::var("STOCKPILE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockpile=warn,stockpile_core=warn".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner (never in JSON mode, it would corrupt the output)
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Stockpile startup banner.
fn print_banner() {
    println!(
        r#"
  ╔═╗╔╦╗╔═╗╔═╗╦╔═╔═╗╦╦  ╔═╗
  ╚═╗ ║ ║ ║║  ╠╩╗╠═╝║║  ║╣
  ╚═╝ ╩ ╚═╝╚═╝╩ ╩╩  ╩╩═╝╚═╝

  Village Rescue v{}

  Seven villages • One pack • Choose wisely
"#,
        env!("CARGO_PKG_VERSION")
    );
}
