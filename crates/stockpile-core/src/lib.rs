//! # stockpile-core
//!
//! The inventory kernel for Stockpile - THE LOGIC.
//!
//! This crate holds every data structure of the game and none of its I/O:
//! - `index` → AVL tree of records keyed by case-insensitive name
//! - `collection` → capacity-limited, duplicate-counting pack
//! - `container` → a village's stock, manifest and requirements
//! - `world` → villages, pack and progress owned together
//!
//! ## Architectural Constraints
//!
//! - Pure and synchronous: no console, no files, no clocks
//! - Every decision that needs a user goes through a trait (`EvictionPolicy`)
//! - Integer arithmetic only; sums saturate
//! - No global state: a `World` is an ordinary owned value

// =============================================================================
// MODULES
// =============================================================================

pub mod collection;
pub mod container;
pub mod index;
pub mod primitives;
pub mod types;
pub mod world;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ItemName, Power, Record, StockpileError, caseless_cmp};

// =============================================================================
// RE-EXPORTS: Structures
// =============================================================================

pub use collection::{BoundedCollection, ListItem, ListView};
pub use container::Container;
pub use index::{Iter, OrderedIndex};
pub use world::{
    Abandon, EvictWeakest, EvictionPolicy, Liberation, NeverEvict, Progress, Transfer, World,
};

// =============================================================================
// RE-EXPORTS: Primitives
// =============================================================================

pub use primitives::{DEFAULT_PACK_CAPACITY, MAX_NAME_LENGTH, MAX_REQUIREMENTS, MAX_VILLAGES};
