//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::WorldConfig;
use crate::game::{Game, write_progress, write_villages};
use std::io;
use std::path::Path;
use stockpile_core::{EvictWeakest, Liberation, StockpileError, World};

/// Build the world from `--config`, `STOCKPILE_CONFIG` or the built-in roster.
pub fn load_world(config: Option<&Path>) -> Result<World, StockpileError> {
    let world = WorldConfig::resolve(config)?.into_world()?;
    tracing::debug!(
        villages = world.containers().len(),
        capacity = world.pack().capacity(),
        "world ready"
    );
    Ok(world)
}

fn io_error(e: io::Error) -> StockpileError {
    StockpileError::IoError(e.to_string())
}

// =============================================================================
// PLAY COMMAND
// =============================================================================

/// Run the interactive menu on stdin/stdout.
pub fn cmd_play(config: Option<&Path>) -> Result<(), StockpileError> {
    let world = load_world(config)?;
    let mut game = Game::new(world, io::stdin().lock(), io::stdout().lock());
    game.run()
}

// =============================================================================
// VILLAGES COMMAND
// =============================================================================

/// List villages, their starting items and requirements.
pub fn cmd_villages(config: Option<&Path>, json_mode: bool) -> Result<(), StockpileError> {
    let world = load_world(config)?;

    if json_mode {
        let villages: Vec<serde_json::Value> = world
            .containers()
            .iter()
            .map(|village| {
                serde_json::json!({
                    "name": village.name(),
                    "cleared": village.is_cleared(),
                    "items": village.listing(),
                    "requires": village.requirements(),
                })
            })
            .collect();
        let output = serde_json::json!({
            "capacity": world.pack().capacity(),
            "villages": villages,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    let mut out = io::stdout().lock();
    write_villages(&mut out, &world).map_err(io_error)
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Find which villages hold an item.
pub fn cmd_search(config: Option<&Path>, json_mode: bool, name: &str) -> Result<(), StockpileError> {
    let world = load_world(config)?;
    let villages = world.locate(name);

    if json_mode {
        let output = serde_json::json!({
            "item": name,
            "villages": villages,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if villages.is_empty() {
        println!("Item not found in any village!");
    } else {
        println!("{} found in these villages:", name);
        for village in villages {
            println!("- {}", village);
        }
    }
    Ok(())
}

// =============================================================================
// SIMULATE COMMAND
// =============================================================================

/// Liberate villages in order until one fails or all are cleared.
///
/// Eviction drops the weakest pack item that no later village requires.
/// Returns every outcome, the stopping one included.
pub fn simulate(world: &mut World) -> Vec<Liberation> {
    let mut outcomes = Vec::new();
    loop {
        let mut policy = EvictWeakest::protecting(world.upcoming_requirements());
        let outcome = world.liberate(&mut policy);
        let advanced = matches!(outcome, Liberation::Cleared { .. });
        tracing::debug!(?outcome, "simulation step");
        outcomes.push(outcome);
        if !advanced {
            return outcomes;
        }
    }
}

/// Play the whole game without prompts.
pub fn cmd_simulate(
    config: Option<&Path>,
    json_mode: bool,
    verbose: bool,
) -> Result<(), StockpileError> {
    let mut world = load_world(config)?;
    let outcomes = simulate(&mut world);

    if json_mode {
        let output = serde_json::json!({
            "outcomes": outcomes,
            "progress": world.progress(),
            "pack": world.pack().list_view().collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    for outcome in &outcomes {
        match outcome {
            Liberation::Cleared { village, transfer } => {
                println!("{} liberated.", village);
                if verbose {
                    for record in &transfer.surrendered {
                        println!("  handed over: {}", record);
                    }
                    for record in &transfer.evicted {
                        println!("  dropped:     {}", record);
                    }
                    for name in &transfer.transferred {
                        println!("  collected:   {}", name);
                    }
                }
            }
            Liberation::MissingRequirements { village, missing } => {
                let names: Vec<&str> = missing.iter().map(|name| name.as_str()).collect();
                println!("{} needs: {}", village, names.join(", "));
            }
            Liberation::Abandoned { village, reason, .. } => {
                println!("{} abandoned: {}", village, reason);
            }
            Liberation::AllCleared => {}
        }
    }

    let mut out = io::stdout().lock();
    write_progress(&mut out, &world).map_err(io_error)
}
