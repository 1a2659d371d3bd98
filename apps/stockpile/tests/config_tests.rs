//! Integration tests for world file loading and the non-interactive commands.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use std::io::Write;
use stockpile::cli::{load_world, simulate};
use stockpile::config::WorldConfig;
use stockpile_core::{EvictWeakest, Liberation, NeverEvict, StockpileError};
use tempfile::NamedTempFile;

fn world_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const TWO_VILLAGES: &str = r#"
capacity = 2

[[items]]
name = "Rope"
power = 2

[[items]]
name = "Lamp"
power = 3

[[items]]
name = "Crown"
power = 20

[[villages]]
name = "Harbor"
items = ["Rope", "Lamp"]

[[villages]]
name = "Castle"
items = ["Crown"]
requires = ["lamp"]
"#;

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn test_load_world_file() {
    let file = world_file(TWO_VILLAGES);
    let config = WorldConfig::load(file.path()).unwrap();

    assert_eq!(config.capacity, 2);
    assert_eq!(config.items.len(), 3);
    assert_eq!(config.villages[1].requires, vec!["lamp".to_string()]);
}

#[test]
fn test_load_world_from_flag() {
    let file = world_file(TWO_VILLAGES);
    let world = load_world(Some(file.path())).unwrap();

    assert_eq!(world.containers().len(), 2);
    assert_eq!(world.pack().capacity(), 2);
    assert_eq!(world.locate("crown"), vec!["Castle"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        WorldConfig::load(&path),
        Err(StockpileError::IoError(_))
    ));
}

#[test]
fn test_malformed_toml_is_config_error() {
    let file = world_file("capacity = [");
    assert!(matches!(
        WorldConfig::load(file.path()),
        Err(StockpileError::Config(_))
    ));
}

#[test]
fn test_blank_village_name_rejected() {
    let file = world_file(
        r#"
        [[villages]]
        name = "  "
        "#,
    );
    assert!(matches!(
        load_world(Some(file.path())),
        Err(StockpileError::InvalidName(_))
    ));
}

#[test]
fn test_too_many_requirements_rejected() {
    let requires = vec!["\"Rope\""; 17].join(", ");
    let text = format!(
        "[[items]]\nname = \"Rope\"\n\n[[villages]]\nname = \"Greedy\"\nrequires = [{requires}]\n"
    );
    let config = WorldConfig::from_toml_str(&text).unwrap();

    assert!(matches!(config.validate(), Err(StockpileError::Config(_))));
}

// =============================================================================
// SIMULATION
// =============================================================================

#[test]
fn test_simulate_builtin_roster_clears_everything() {
    let mut world = WorldConfig::builtin().into_world().unwrap();
    let outcomes = simulate(&mut world);

    assert_eq!(outcomes.len(), 8);
    assert!(
        outcomes[..7]
            .iter()
            .all(|outcome| matches!(outcome, Liberation::Cleared { .. }))
    );
    assert_eq!(outcomes[7], Liberation::AllCleared);
    assert!(world.progress().is_complete());
    world.pack().verify().unwrap();
}

#[test]
fn test_simulate_stops_on_missing_requirement() {
    let file = world_file(TWO_VILLAGES);
    let mut world = load_world(Some(file.path())).unwrap();
    let outcomes = simulate(&mut world);

    // Harbor fits exactly; Castle needs the lamp, which is still there.
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(
        &outcomes[1],
        Liberation::Cleared { village, .. } if village == "Castle"
    ));
    assert_eq!(outcomes[2], Liberation::AllCleared);

    // Castle now wants the crown it holds itself.
    let text = TWO_VILLAGES.replace("requires = [\"lamp\"]", "requires = [\"crown\"]");
    let config = WorldConfig::from_toml_str(&text).unwrap();
    let mut world = config.into_world().unwrap();
    let outcomes = simulate(&mut world);
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(
        &outcomes[1],
        Liberation::MissingRequirements { village, .. } if village == "Castle"
    ));
    assert_eq!(world.cleared_count(), 1);
}

#[test]
fn test_declined_transfer_can_be_retried_on_builtin_roster() {
    let mut world = WorldConfig::builtin().into_world().unwrap();
    for _ in 0..4 {
        let mut policy = EvictWeakest::protecting(world.upcoming_requirements());
        assert!(matches!(
            world.liberate(&mut policy),
            Liberation::Cleared { .. }
        ));
    }
    let before = world.pack().total_power();

    let outcome = world.liberate(&mut NeverEvict);
    let Liberation::Abandoned { village, transfer, .. } = outcome else {
        panic!("expected abandoned");
    };
    assert_eq!(village, "Crystalton");
    assert!(!transfer.surrendered.is_empty());

    // Nothing was evicted, so the pack is exactly as it was.
    assert!(world.missing_requirements().is_empty());
    assert_eq!(world.pack().total_power(), before);
    assert_eq!(world.locate("gold"), vec!["Crystalton"]);

    let outcomes = simulate(&mut world);
    assert_eq!(outcomes.last(), Some(&Liberation::AllCleared));
    assert!(world.progress().is_complete());
}

#[test]
fn test_liberation_serializes_with_outcome_tag() {
    let mut world = WorldConfig::builtin().into_world().unwrap();
    let outcomes = simulate(&mut world);

    let json = serde_json::to_value(&outcomes[0]).unwrap();
    assert_eq!(json["outcome"], "cleared");
    assert_eq!(json["village"], "Greenvale");
    assert_eq!(json["transfer"]["transferred"][0], "Sword");

    let done = serde_json::to_value(&outcomes[7]).unwrap();
    assert_eq!(done["outcome"], "all_cleared");
}
