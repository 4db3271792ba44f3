//! State shared between the driver and the game loop thread.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use homefront_core::commands::PlayerCommand;
use homefront_core::state::GameStateSnapshot;

/// Commands sent to the game loop thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// (Re)start the game in an arena of this size.
    Start { width: f32, height: f32 },
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the loop after each tick.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

/// How the loop paces and ends itself.
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    /// Wall-clock duration of one tick. `None` runs as fast as possible.
    pub tick_duration: Option<Duration>,
    /// Stop after this many ticks.
    pub max_ticks: u64,
    /// Stop once the game reaches `Lost` or `Win`.
    pub stop_when_over: bool,
    /// Drive the player tank with the autopilot.
    pub autopilot: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            tick_duration: None,
            max_ticks: u64::MAX,
            stop_when_over: true,
            autopilot: false,
        }
    }
}

impl LoopSettings {
    /// Wall-clock pacing for `tick_rate` ticks per second.
    pub fn realtime(tick_rate: u32) -> Option<Duration> {
        Some(Duration::from_nanos(1_000_000_000 / tick_rate.max(1) as u64))
    }
}
