//! Events emitted by the simulation for HUD, audio and effects.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A level was built and play resumed.
    LevelStarted { level: usize },
    /// The level timer ran out on a non-final level; show the score.
    LevelCleared { level: usize, score: u32 },
    /// A tank fired.
    MissileFired { faction: Faction },
    /// The player tank was removed and a life spent.
    PlayerDestroyed { lives_left: u32 },
    /// A replacement player tank entered the arena.
    PlayerRespawned { id: EntityId },
    /// An enemy tank was removed.
    EnemyDestroyed { score: u32 },
    /// An enemy tank entered the arena.
    EnemySpawned { id: EntityId },
    /// The home structure fell.
    HomeDestroyed,
    /// The grace delay ran out.
    GameLost { cause: LossCause, score: u32 },
    /// The final level's timer ran out.
    GameWon { score: u32 },
}
