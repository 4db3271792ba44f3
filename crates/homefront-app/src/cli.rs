//! Command-line options for the headless frame driver.

use std::path::PathBuf;

use clap::Parser;

use homefront_core::constants::{DEFAULT_ARENA_SIZE, TICK_RATE};
use homefront_sim::engine::SimConfig;

/// Headless HOMEFRONT runner: drives the simulation at a fixed tick and
/// prints the final state as JSON.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// RNG seed. Same seed, same game.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Stop after this many ticks even if the game is still running.
    #[arg(long, default_value_t = 120 * TICK_RATE as u64)]
    pub ticks: u64,

    /// Ticks per second.
    #[arg(long, default_value_t = TICK_RATE)]
    pub tick_rate: u32,

    /// Arena width in world units.
    #[arg(long, default_value_t = DEFAULT_ARENA_SIZE)]
    pub width: f32,

    /// Arena height in world units.
    #[arg(long, default_value_t = DEFAULT_ARENA_SIZE)]
    pub height: f32,

    /// Grid layout file (levels separated by blank lines). Defaults to the
    /// built-in campaign.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Sleep between ticks to run at wall-clock speed.
    #[arg(long)]
    pub realtime: bool,

    /// Let the autopilot drive the player tank.
    #[arg(long)]
    pub autopilot: bool,

    /// Print every snapshot as a JSON line, not just the last one.
    #[arg(long)]
    pub trace: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            tick_rate: self.tick_rate.max(1),
        }
    }
}
