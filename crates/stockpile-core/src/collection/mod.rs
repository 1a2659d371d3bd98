//! # Bounded Collection
//!
//! The player's pack: a capacity-limited, name-sorted linked list of counted
//! entries.
//!
//! - Pushing a record whose name (ignoring case) matches an existing entry
//!   bumps that entry's `count`; the first record pushed stays the prototype
//! - `size` is the sum of all counts and never exceeds `capacity`
//! - A full collection rejects pushes; it never evicts on its own
//! - An `OrderedIndex` mirrors the distinct entries for O(log n) lookup

mod chain;

use crate::index::OrderedIndex;
use crate::{ItemName, Power, Record, StockpileError};
use chain::Chain;
use serde::Serialize;

// =============================================================================
// ENTRY
// =============================================================================

#[derive(Debug, Clone)]
struct Entry {
    record: Record,
    count: u32,
}

// =============================================================================
// BOUNDED COLLECTION
// =============================================================================

/// A fixed-capacity, duplicate-counting collection of records.
#[derive(Debug, Clone)]
pub struct BoundedCollection {
    entries: Chain<Entry>,
    lookup: OrderedIndex,
    capacity: usize,
    size: usize,
}

impl BoundedCollection {
    /// Create an empty collection with room for `capacity` units.
    ///
    /// Returns `StockpileError::ZeroCapacity` when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self, StockpileError> {
        if capacity == 0 {
            return Err(StockpileError::ZeroCapacity);
        }
        Ok(Self {
            entries: Chain::new(),
            lookup: OrderedIndex::new(),
            capacity,
            size: 0,
        })
    }

    /// Add one unit. Returns `false`, changing nothing, when the collection
    /// is full.
    pub fn push(&mut self, record: Record) -> bool {
        self.try_push(record).is_ok()
    }

    /// Add one unit, handing the record back when the collection is full.
    pub fn try_push(&mut self, record: Record) -> Result<(), Record> {
        if self.size >= self.capacity {
            return Err(record);
        }

        let existing = if self.lookup.contains(record.name().as_str()) {
            self.entries.find(|entry| entry.record.name() == record.name())
        } else {
            None
        };
        match existing.and_then(|pos| self.entries.get_mut(pos)) {
            Some(entry) => entry.count = entry.count.saturating_add(1),
            None => {
                let after = self
                    .entries
                    .seek_last(|entry| entry.record.name() <= record.name());
                self.lookup.insert(record.clone());
                self.entries.insert_after(after, Entry { record, count: 1 });
            }
        }

        self.size += 1;
        Ok(())
    }

    /// Remove one unit named `name`, ignoring case.
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        self.take_by_name(name).is_some()
    }

    /// Remove one unit named `name` and return it.
    ///
    /// While other units remain the returned record is a copy of the entry's
    /// prototype; the last unit hands back the prototype itself.
    pub fn take_by_name(&mut self, name: &str) -> Option<Record> {
        if !self.lookup.contains(name) {
            return None;
        }

        let pos = self.entries.find(|entry| entry.record.name().matches(name))?;
        let entry = self.entries.get_mut(pos)?;
        let taken = if entry.count > 1 {
            entry.count -= 1;
            entry.record.clone()
        } else {
            let entry = self.entries.remove_at(pos)?;
            self.lookup.remove_record(&entry.record);
            entry.record
        };

        self.size -= 1;
        Some(taken)
    }

    /// Check if any unit is named `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    /// Look up a stored record by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Record> {
        self.lookup.search(name)
    }

    /// Number of units named `name`.
    #[must_use]
    pub fn count_of(&self, name: &str) -> u32 {
        if !self.lookup.contains(name) {
            return 0;
        }
        self.entries
            .iter()
            .find(|entry| entry.record.name().matches(name))
            .map_or(0, |entry| entry.count)
    }

    /// Sum of `power × count` over all entries, saturating.
    #[must_use]
    pub fn total_power(&self) -> Power {
        self.entries.iter().fold(Power::default(), |total, entry| {
            total.saturating_add(entry.record.power().times(entry.count))
        })
    }

    /// `(name, power, count)` for every entry, sorted by name.
    ///
    /// The view borrows the collection; call again for a fresh pass.
    pub fn list_view(&self) -> ListView<'_> {
        ListView {
            entries: self.entries.iter(),
        }
    }

    /// Maximum number of units.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of units currently held.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Free slots left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity - self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.size >= self.capacity
    }

    /// Check size accounting, name order and the lookup mirror.
    pub fn verify(&self) -> Result<(), StockpileError> {
        let counted: usize = self.entries.iter().map(|entry| entry.count as usize).sum();
        if counted != self.size {
            return Err(StockpileError::InvariantViolation(format!(
                "size {} but entries hold {}",
                self.size, counted
            )));
        }
        if self.size > self.capacity {
            return Err(StockpileError::InvariantViolation(format!(
                "size {} exceeds capacity {}",
                self.size, self.capacity
            )));
        }
        if self.entries.iter().any(|entry| entry.count == 0) {
            return Err(StockpileError::InvariantViolation(
                "entry with zero count".to_string(),
            ));
        }

        let names: Vec<&ItemName> = self.entries.iter().map(|entry| entry.record.name()).collect();
        if names.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(StockpileError::InvariantViolation(
                "entries out of name order".to_string(),
            ));
        }
        if names.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(StockpileError::InvariantViolation(
                "two entries share a name".to_string(),
            ));
        }

        if self.lookup.len() != self.entries.len() {
            return Err(StockpileError::InvariantViolation(format!(
                "lookup mirrors {} entries, list has {}",
                self.lookup.len(),
                self.entries.len()
            )));
        }
        self.lookup.verify()
    }
}

// =============================================================================
// LIST VIEW
// =============================================================================

/// One row of a [`ListView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListItem<'a> {
    pub name: &'a ItemName,
    pub power: Power,
    pub count: u32,
}

/// Lazy name-ordered pass over a [`BoundedCollection`].
#[derive(Clone)]
pub struct ListView<'a> {
    entries: chain::Iter<'a, Entry>,
}

impl<'a> Iterator for ListView<'a> {
    type Item = ListItem<'a>;

    fn next(&mut self) -> Option<ListItem<'a>> {
        self.entries.next().map(|entry| ListItem {
            name: entry.record.name(),
            power: entry.record.power(),
            count: entry.count,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
