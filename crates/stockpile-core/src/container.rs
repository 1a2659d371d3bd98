//! # Container
//!
//! A location holding loot (a village in the game).
//!
//! The stock lives in an `OrderedIndex`. A separate manifest remembers what
//! the container started with so it can still be displayed after the stock
//! has been carried off; the manifest is never consulted for holdings.

use crate::index::OrderedIndex;
use crate::{ItemName, Record};

/// A named location with a fixed starting stock.
#[derive(Debug, Clone)]
pub struct Container {
    name: String,
    stock: OrderedIndex,
    manifest: Vec<ItemName>,
    requirements: Vec<ItemName>,
    cleared: bool,
}

impl Container {
    /// Create a container stocked with `records`, in the given order.
    #[must_use]
    pub fn new(name: impl Into<String>, records: impl IntoIterator<Item = Record>) -> Self {
        let stock: OrderedIndex = records.into_iter().collect();
        let manifest = stock
            .listing()
            .into_iter()
            .map(|record| record.name().clone())
            .collect();
        Self {
            name: name.into(),
            stock,
            manifest,
            requirements: Vec::new(),
            cleared: false,
        }
    }

    /// Items that must be surrendered from the pack before this container
    /// can be cleared.
    #[must_use]
    pub fn with_requirements(mut self, requirements: impl IntoIterator<Item = ItemName>) -> Self {
        self.requirements = requirements.into_iter().collect();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether the current stock holds `name`.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.stock.search(name).is_some()
    }

    /// Find a record in the current stock.
    #[must_use]
    pub fn search(&self, name: &str) -> Option<&Record> {
        self.stock.search(name)
    }

    /// Current stock, in the order it was stocked.
    #[must_use]
    pub fn listing(&self) -> Vec<&Record> {
        self.stock.listing()
    }

    /// Names of the starting stock, for display only.
    #[must_use]
    pub fn manifest(&self) -> &[ItemName] {
        &self.manifest
    }

    #[must_use]
    pub fn requirements(&self) -> &[ItemName] {
        &self.requirements
    }

    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Move the whole stock out for transfer.
    pub fn take_stock(&mut self) -> Vec<Record> {
        self.stock.drain()
    }

    /// Put untransferred records back.
    pub fn restock(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            self.stock.insert(record);
        }
    }

    pub fn mark_cleared(&mut self) {
        self.cleared = true;
    }
}

// =============================================================================
// TESTS
// =============================================================================
