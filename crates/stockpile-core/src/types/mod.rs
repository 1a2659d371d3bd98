//! # Core Type Definitions
//!
//! This module contains the value types shared by every kernel structure:
//! - Item identity (`ItemName`) with case-insensitive ordering
//! - Item strength (`Power`) with saturating arithmetic
//! - The stored unit (`Record`)
//! - Error types (`StockpileError`)
//!
//! ## Ordering Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` so they sort identically on every run
//! - Use saturating arithmetic for sums to prevent overflow

use crate::primitives::MAX_NAME_LENGTH;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

// =============================================================================
// CASE-INSENSITIVE COMPARISON
// =============================================================================

/// Compare two labels ignoring letter case.
///
/// Both sides are folded with `char::to_lowercase`, so multi-char folds
/// (e.g. `İ`) compare the same way everywhere in the kernel.
#[must_use]
pub fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

// =============================================================================
// ITEM NAME
// =============================================================================

/// The identity of an item.
///
/// Equality and ordering ignore letter case; `Display` keeps the spelling the
/// item was created with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(String);

impl ItemName {
    /// Create a name without validation.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Create a name from user or configuration input.
    ///
    /// Surrounding whitespace is trimmed. Returns
    /// `StockpileError::InvalidName` if the result is empty or longer than
    /// `MAX_NAME_LENGTH` characters.
    pub fn parse(raw: &str) -> Result<Self, StockpileError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(StockpileError::InvalidName(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the name as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether `query` names this item, ignoring case.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        caseless_cmp(&self.0, query) == Ordering::Equal
    }
}

impl PartialEq for ItemName {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for ItemName {}

impl PartialOrd for ItemName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ItemName {
    fn cmp(&self, other: &Self) -> Ordering {
        caseless_cmp(&self.0, &other.0)
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// POWER
// =============================================================================

/// Strength score of an item.
/// Uses i64 with saturating arithmetic to prevent overflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Power(pub i64);

impl Power {
    /// Create a new power score.
    #[must_use]
    pub const fn new(power: i64) -> Self {
        Self(power)
    }

    /// Get the raw score.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Add two scores, clamping at the `i64` bounds.
    #[must_use]
    pub const fn saturating_add(self, other: Power) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Score of `count` identical units.
    #[must_use]
    pub const fn times(self, count: u32) -> Self {
        Self(self.0.saturating_mul(count as i64))
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// A named, valued item.
///
/// Fields are private: a record never changes after creation. Moving a record
/// between structures moves ownership; copies are only ever made with an
/// explicit `clone()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: ItemName,
    #[serde(default)]
    power: Power,
}

impl Record {
    /// Create a new record.
    #[must_use]
    pub fn new(name: impl Into<String>, power: i64) -> Self {
        Self {
            name: ItemName::new(name),
            power: Power::new(power),
        }
    }

    /// Create a record from an already built name.
    #[must_use]
    pub fn from_parts(name: ItemName, power: Power) -> Self {
        Self { name, power }
    }

    /// The item's identity.
    #[must_use]
    pub fn name(&self) -> &ItemName {
        &self.name
    }

    /// The item's strength.
    #[must_use]
    pub fn power(&self) -> Power {
        self.power
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (power: {})", self.name, self.power)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Stockpile system.
///
/// Lookups and pushes never fail with an error: a missing item is `None` or
/// `false`, a full pack is `false`. These variants cover construction,
/// configuration and self-checks.
#[derive(Debug, Error)]
pub enum StockpileError {
    /// A bounded collection needs at least one slot.
    #[error("Capacity must be at least 1")]
    ZeroCapacity,

    /// An item name is empty or too long.
    #[error("Invalid item name: {0:?}")]
    InvalidName(String),

    /// A name refers to an item that is not in the catalog.
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// A structural self-check failed.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// The world configuration is malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
