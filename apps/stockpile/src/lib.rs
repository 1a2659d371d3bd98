//! # Stockpile
//!
//! Library half of the Stockpile binary: CLI definitions, world
//! configuration and the interactive game loop. Split from `main.rs` so
//! integration tests can drive a game with scripted input.

pub mod cli;
pub mod config;
pub mod game;
