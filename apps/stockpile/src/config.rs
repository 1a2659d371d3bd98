//! # World Configuration
//!
//! Loads the item catalog and village roster from a TOML file.
//!
//! ## Resolution Order
//!
//! 1. `--config <PATH>`
//! 2. `STOCKPILE_CONFIG` environment variable
//! 3. The built-in roster
//!
//! ## File Format
//!
//! ```toml
//! capacity = 10
//!
//! [[items]]
//! name = "Sword"
//! power = 10
//!
//! [[villages]]
//! name = "Greenvale"
//! items = ["Sword"]
//! requires = []
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stockpile_core::{
    Container, DEFAULT_PACK_CAPACITY, ItemName, MAX_REQUIREMENTS, MAX_VILLAGES, Power, Record,
    StockpileError, World,
};

/// Environment variable naming a world file.
pub const CONFIG_ENV: &str = "STOCKPILE_CONFIG";

/// Maximum world file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

fn default_capacity() -> usize {
    DEFAULT_PACK_CAPACITY
}

// =============================================================================
// FILE STRUCTURE
// =============================================================================

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemEntry {
    pub name: String,
    #[serde(default)]
    pub power: i64,
}

/// One village: its starting stock and the items it demands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VillageEntry {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub requires: Vec<String>,
}

/// A whole world file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
    #[serde(default)]
    pub villages: Vec<VillageEntry>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WorldConfig {
    /// The seven-village roster the game ships with.
    #[must_use]
    pub fn builtin() -> Self {
        let items = [
            ("Sword", 10),
            ("Potion", 5),
            ("Map", 2),
            ("Axe", 8),
            ("Gold", 15),
            ("Food", 3),
            ("Copper", 4),
            ("Silver", 6),
            ("Shield", 7),
            ("Armor", 12),
            ("Key", 1),
            ("Torch", 2),
            ("Bow", 9),
        ]
        .into_iter()
        .map(|(name, power)| ItemEntry {
            name: name.to_string(),
            power,
        })
        .collect();

        let villages = [
            ("Greenvale", ["Sword", "Food", "Shield"], &[][..]),
            ("Silverton", ["Potion", "Copper", "Armor"], &[][..]),
            ("Goldcrest", ["Map", "Silver", "Key"], &[][..]),
            ("Irontop", ["Axe", "Shield", "Torch"], &[][..]),
            ("Crystalton", ["Gold", "Armor", "Bow"], &["Sword", "Armor"][..]),
            ("Emeraldvale", ["Food", "Key", "Sword"], &["Bow", "Key"][..]),
            ("Diamondcity", ["Copper", "Torch", "Potion"], &["Gold", "Shield"][..]),
        ]
        .into_iter()
        .map(|(name, items, requires)| VillageEntry {
            name: name.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
            requires: requires.iter().map(|s| s.to_string()).collect(),
        })
        .collect();

        Self {
            capacity: DEFAULT_PACK_CAPACITY,
            items,
            villages,
        }
    }

    /// Parse a world from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, StockpileError> {
        toml::from_str(text).map_err(|e| StockpileError::Config(e.to_string()))
    }

    /// Read and parse a world file.
    pub fn load(path: &Path) -> Result<Self, StockpileError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            StockpileError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(StockpileError::Config(format!(
                "World file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            StockpileError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            villages = config.villages.len(),
            items = config.items.len(),
            "world file loaded"
        );
        Ok(config)
    }

    /// Load from `path`, else from `STOCKPILE_CONFIG`, else the built-in roster.
    pub fn resolve(path: Option<&Path>) -> Result<Self, StockpileError> {
        let chosen = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match chosen {
            Some(path) => Self::load(&path),
            None => {
                tracing::debug!("no world file given, using built-in roster");
                Ok(Self::builtin())
            }
        }
    }

    /// Check names, references and limits.
    pub fn validate(&self) -> Result<(), StockpileError> {
        self.catalog().map(|_| ())
    }

    /// Build the world this file describes.
    pub fn into_world(self) -> Result<World, StockpileError> {
        let catalog = self.catalog()?;
        let containers = self
            .villages
            .iter()
            .map(|village| -> Result<Container, StockpileError> {
                let records = village
                    .items
                    .iter()
                    .map(|name| lookup(&catalog, name).cloned())
                    .collect::<Result<Vec<Record>, _>>()?;
                let requirements = village
                    .requires
                    .iter()
                    .map(|name| lookup(&catalog, name).map(|record| record.name().clone()))
                    .collect::<Result<Vec<ItemName>, _>>()?;
                Ok(Container::new(village.name.trim(), records).with_requirements(requirements))
            })
            .collect::<Result<Vec<Container>, _>>()?;

        World::new(containers, self.capacity)
    }

    /// Validated catalog records, in file order.
    fn catalog(&self) -> Result<Vec<Record>, StockpileError> {
        if self.capacity == 0 {
            return Err(StockpileError::ZeroCapacity);
        }
        if self.villages.len() > MAX_VILLAGES {
            return Err(StockpileError::Config(format!(
                "{} villages exceeds maximum of {}",
                self.villages.len(),
                MAX_VILLAGES
            )));
        }

        let mut catalog: Vec<Record> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let name = ItemName::parse(&item.name)?;
            if catalog.iter().any(|record| *record.name() == name) {
                return Err(StockpileError::Config(format!(
                    "Item '{}' is listed twice",
                    name
                )));
            }
            catalog.push(Record::from_parts(name, Power::new(item.power)));
        }

        for village in &self.villages {
            ItemName::parse(&village.name)?;
            if village.requires.len() > MAX_REQUIREMENTS {
                return Err(StockpileError::Config(format!(
                    "Village '{}' has {} requirements, maximum is {}",
                    village.name,
                    village.requires.len(),
                    MAX_REQUIREMENTS
                )));
            }
            for name in village.items.iter().chain(&village.requires) {
                lookup(&catalog, name)?;
            }
        }

        Ok(catalog)
    }
}

fn lookup<'a>(catalog: &'a [Record], name: &str) -> Result<&'a Record, StockpileError> {
    let wanted = name.trim();
    catalog
        .iter()
        .find(|record| record.name().matches(wanted))
        .ok_or_else(|| StockpileError::UnknownItem(wanted.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
