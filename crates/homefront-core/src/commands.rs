//! Player commands sent from the input source to the simulation.
//!
//! Commands are queued and applied at the start of the next tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All player intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Turn the player tank and keep driving that way.
    Move { direction: Direction },
    /// Fire a missile along the current heading.
    Fire,

    // --- Cheats ---
    /// Remove every enemy tank immediately, without scoring.
    ClearEnemies,
    /// Make the player tank invulnerable for a while.
    GrantInvulnerability,
    /// Add one life.
    GrantLife,
}
