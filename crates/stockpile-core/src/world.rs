//! # World
//!
//! The single owned aggregate of a game: the villages, the player's pack and
//! the progress cursor.
//!
//! Nothing here performs I/O. When the pack is full during a transfer the
//! world asks an [`EvictionPolicy`] which item to drop; the app implements
//! the policy with a console prompt, tests with a closure.
//!
//! ## Transfer Flow
//!
//! 1. The current village's requirements must all be in the pack
//! 2. One unit of each requirement is surrendered
//! 3. The village's stock is drained and pushed into the pack in order
//! 4. A rejected push asks the policy for an eviction, then retries
//! 5. If the policy gives up (or names something not in the pack) the
//!    transfer is rolled back: moved units return to the village with the
//!    rest of its stock and the surrendered requirements return to the pack.
//!    Only evicted items are lost, and the village stays uncleared

use crate::collection::BoundedCollection;
use crate::container::Container;
use crate::primitives::MAX_VILLAGES;
use crate::{ItemName, Record, StockpileError};
use serde::Serialize;
use std::fmt;

// =============================================================================
// EVICTION POLICY
// =============================================================================

/// Decides what to drop from a full pack.
pub trait EvictionPolicy {
    /// Name a pack item to drop so `incoming` fits, or `None` to give up.
    fn choose(&mut self, pack: &BoundedCollection, incoming: &Record) -> Option<String>;
}

impl<F> EvictionPolicy for F
where
    F: FnMut(&BoundedCollection, &Record) -> Option<String>,
{
    fn choose(&mut self, pack: &BoundedCollection, incoming: &Record) -> Option<String> {
        self(pack, incoming)
    }
}

/// Always gives up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverEvict;

impl EvictionPolicy for NeverEvict {
    fn choose(&mut self, _pack: &BoundedCollection, _incoming: &Record) -> Option<String> {
        None
    }
}

/// Drops the lowest-power item that is not protected.
///
/// Ties go to the first name in order. Gives up when only protected items
/// remain.
#[derive(Debug, Clone, Default)]
pub struct EvictWeakest {
    protected: Vec<ItemName>,
}

impl EvictWeakest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Never drop any of `names`.
    #[must_use]
    pub fn protecting(names: impl IntoIterator<Item = ItemName>) -> Self {
        Self {
            protected: names.into_iter().collect(),
        }
    }
}

impl EvictionPolicy for EvictWeakest {
    fn choose(&mut self, pack: &BoundedCollection, _incoming: &Record) -> Option<String> {
        pack.list_view()
            .filter(|item| !self.protected.contains(item.name))
            .min_by_key(|item| item.power)
            .map(|item| item.name.to_string())
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Why a transfer stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Abandon {
    /// The policy declined to drop anything.
    Declined,
    /// The policy named an item the pack does not hold.
    UnknownItem(String),
}

impl fmt::Display for Abandon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declined => write!(f, "no item was dropped to make room"),
            Self::UnknownItem(name) => write!(f, "item not found: {name}"),
        }
    }
}

/// What moved during one liberation attempt.
///
/// For an abandoned attempt this is what moved before the rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transfer {
    /// Requirements taken out of the pack.
    pub surrendered: Vec<Record>,
    /// Village items that made it into the pack, in order.
    pub transferred: Vec<ItemName>,
    /// Pack items dropped to make room.
    pub evicted: Vec<Record>,
}

/// Result of [`World::liberate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Liberation {
    /// The village was cleared and the cursor moved on.
    Cleared { village: String, transfer: Transfer },
    /// The pack lacks some of the village's requirements. Nothing changed.
    MissingRequirements {
        village: String,
        missing: Vec<ItemName>,
    },
    /// The transfer stopped and was rolled back. Only `transfer.evicted` is lost.
    Abandoned {
        village: String,
        reason: Abandon,
        transfer: Transfer,
    },
    /// Every village is already cleared.
    AllCleared,
}

/// Snapshot of how far the game has come.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress<'a> {
    pub current: Option<&'a str>,
    pub cleared: Vec<&'a str>,
    pub remaining: Vec<&'a str>,
    pub total: usize,
}

impl Progress<'_> {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Villages, pack and cursor, owned together.
#[derive(Debug, Clone)]
pub struct World {
    containers: Vec<Container>,
    pack: BoundedCollection,
    current: usize,
}

impl World {
    /// Create a world with an empty pack of `capacity` slots.
    ///
    /// Returns `StockpileError::ZeroCapacity` for a zero capacity and
    /// `StockpileError::Config` when there are more than `MAX_VILLAGES`
    /// villages.
    pub fn new(containers: Vec<Container>, capacity: usize) -> Result<Self, StockpileError> {
        if containers.len() > MAX_VILLAGES {
            return Err(StockpileError::Config(format!(
                "{} villages exceeds maximum of {}",
                containers.len(),
                MAX_VILLAGES
            )));
        }
        Ok(Self {
            containers,
            pack: BoundedCollection::new(capacity)?,
            current: 0,
        })
    }

    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    #[must_use]
    pub fn pack(&self) -> &BoundedCollection {
        &self.pack
    }

    /// The next village to clear, or `None` once all are cleared.
    #[must_use]
    pub fn current(&self) -> Option<&Container> {
        self.containers.get(self.current)
    }

    /// Number of villages cleared so far.
    #[must_use]
    pub fn cleared_count(&self) -> usize {
        self.current
    }

    /// Put a record straight into the pack. Same contract as `push`.
    pub fn stow(&mut self, record: Record) -> bool {
        self.pack.push(record)
    }

    /// Remove one unit from the pack ("use" or "discard" an item).
    pub fn use_item(&mut self, name: &str) -> Option<Record> {
        self.pack.take_by_name(name)
    }

    /// Requirements of the current village the pack cannot cover.
    #[must_use]
    pub fn missing_requirements(&self) -> Vec<ItemName> {
        self.current()
            .map(|container| missing_from(&self.pack, container.requirements()))
            .unwrap_or_default()
    }

    /// Requirements of the villages after the current one.
    #[must_use]
    pub fn upcoming_requirements(&self) -> Vec<ItemName> {
        self.containers
            .iter()
            .skip(self.current.saturating_add(1))
            .flat_map(|container| container.requirements().iter().cloned())
            .collect()
    }

    /// Names of villages whose current stock holds `name`.
    #[must_use]
    pub fn locate(&self, name: &str) -> Vec<&str> {
        self.containers
            .iter()
            .filter(|container| container.has(name))
            .map(Container::name)
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> Progress<'_> {
        let (cleared, remaining): (Vec<&Container>, Vec<&Container>) = self
            .containers
            .iter()
            .partition(|container| container.is_cleared());
        Progress {
            current: self.current().map(Container::name),
            cleared: cleared.into_iter().map(Container::name).collect(),
            remaining: remaining.into_iter().map(Container::name).collect(),
            total: self.containers.len(),
        }
    }

    /// Try to clear the current village. See the module docs for the flow.
    pub fn liberate(&mut self, policy: &mut impl EvictionPolicy) -> Liberation {
        let Some(container) = self.containers.get_mut(self.current) else {
            return Liberation::AllCleared;
        };
        let village = container.name().to_string();

        let missing = missing_from(&self.pack, container.requirements());
        if !missing.is_empty() {
            return Liberation::MissingRequirements { village, missing };
        }

        let mut transfer = Transfer::default();
        for requirement in container.requirements() {
            if let Some(record) = self.pack.take_by_name(requirement.as_str()) {
                transfer.surrendered.push(record);
            }
        }

        let mut pending = container.take_stock().into_iter();
        while let Some(mut record) = pending.next() {
            let name = record.name().clone();
            loop {
                match self.pack.try_push(record) {
                    Ok(()) => {
                        transfer.transferred.push(name);
                        break;
                    }
                    Err(rejected) => record = rejected,
                }

                let reason = match policy.choose(&self.pack, &record) {
                    Some(choice) => match self.pack.take_by_name(&choice) {
                        Some(dropped) => {
                            transfer.evicted.push(dropped);
                            continue;
                        }
                        None => Abandon::UnknownItem(choice),
                    },
                    None => Abandon::Declined,
                };

                let returned: Vec<Record> = transfer
                    .transferred
                    .iter()
                    .filter_map(|name| self.pack.take_by_name(name.as_str()))
                    .collect();
                container.restock(
                    returned
                        .into_iter()
                        .chain(std::iter::once(record))
                        .chain(pending),
                );
                for surrendered in &transfer.surrendered {
                    // Evictions freed these slots. A refused record stays in the village.
                    if let Err(refused) = self.pack.try_push(surrendered.clone()) {
                        container.restock(std::iter::once(refused));
                    }
                }
                return Liberation::Abandoned {
                    village,
                    reason,
                    transfer,
                };
            }
        }

        container.mark_cleared();
        self.current += 1;
        Liberation::Cleared { village, transfer }
    }
}

/// Requirement names the pack holds too few units of. Each name once.
fn missing_from(pack: &BoundedCollection, requirements: &[ItemName]) -> Vec<ItemName> {
    let mut missing: Vec<ItemName> = Vec::new();
    for (at, name) in requirements.iter().enumerate() {
        let needed = requirements[..=at].iter().filter(|n| *n == name).count();
        if (pack.count_of(name.as_str()) as usize) < needed && !missing.contains(name) {
            missing.push(name.clone());
        }
    }
    missing
}

// =============================================================================
// TESTS
// =============================================================================
