//! Simulation engine for HOMEFRONT.
//!
//! Owns the entity registry (a hecs world), runs the status machine and
//! the per-tick systems at a fixed rate, and produces GameStateSnapshots
//! for the renderer and HUD.

pub mod collision;
pub mod engine;
pub mod error;
pub mod level;
pub mod map;
pub mod registry;
pub mod status;
pub mod systems;
pub mod world_setup;

pub use engine::{Scene, SimConfig, SimulationEngine};
pub use error::MapError;
pub use homefront_core as core;
pub use map::{GridMap, MapProvider};
