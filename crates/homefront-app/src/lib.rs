//! HOMEFRONT frame driver.
//!
//! Runs the simulation on its own thread at a fixed tick, feeds it player
//! commands, and hands snapshots to whoever is watching.

pub mod autopilot;
pub mod cli;
pub mod game_loop;
pub mod logging;
pub mod state;

pub use homefront_core as core;
