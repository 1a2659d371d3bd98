//! # Kernel Primitives
//!
//! Hardcoded constants for the Stockpile kernel.
//!
//! These values are compiled into the binary. The world file may override the
//! pack capacity, never the name limits.

/// Pack capacity used when the world file does not set one.
pub const DEFAULT_PACK_CAPACITY: usize = 10;

/// Maximum length, in characters, of an item or village name.
///
/// Longer names are rejected by `ItemName::parse`.
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum number of villages in one world.
pub const MAX_VILLAGES: usize = 256;

/// Maximum number of requirements a single village may declare.
pub const MAX_REQUIREMENTS: usize = 16;
