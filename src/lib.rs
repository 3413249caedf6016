//! Procedural cave level generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod automaton;
pub mod config;
pub mod decor;
pub mod error;
pub mod hazards;
pub mod level;
pub mod minimap;
pub mod noise;
pub mod pipeline;
pub mod seeds;
pub mod tilemap;
pub mod zones;

pub use config::{GenerationConfig, HazardConfig};
pub use error::{LevelError, Result};
pub use level::Level;
pub use pipeline::{generate_batch, generate_level, generate_with_seeds, spawn_generation};
pub use seeds::LevelSeeds;
