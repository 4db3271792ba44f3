//! ECS components for hecs entities.
//!
//! Components are plain data structs. Behaviour lives in the sim crate's
//! systems, which are the only code that advances this state.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::Bounds;

/// Liveness flag. Dead entities are removed at the next prune, except
/// obstacles, which stay in place and are reported once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitality {
    pub alive: bool,
    /// Set once an obstacle's death has been reported by a prune.
    pub loss_reported: bool,
}

impl Default for Vitality {
    fn default() -> Self {
        Self {
            alive: true,
            loss_reported: false,
        }
    }
}

/// Draw-order key. Only used to sort the render snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RenderPriority(pub i32);

/// Tank state (player or enemy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankState {
    pub faction: Faction,
    pub heading: Direction,
    /// Whether the tank drives along its heading this tick.
    pub moving: bool,
    /// World units per second.
    pub speed: f32,
    /// Seconds until the next shot is allowed.
    pub fire_cooldown_secs: f64,
    /// Cooldown applied after each shot.
    pub fire_interval_secs: f64,
    /// Seconds of invulnerability left.
    pub invulnerable_secs: f64,
    /// Set by input or AI; consumed by the tank's next update.
    pub fire_requested: bool,
    /// Bounds before this tick's movement, restored when blocked.
    pub previous: Bounds,
}

impl TankState {
    pub fn player(bounds: Bounds) -> Self {
        Self {
            faction: Faction::Player,
            heading: Direction::Up,
            moving: false,
            speed: PLAYER_TANK_SPEED,
            fire_cooldown_secs: 0.0,
            fire_interval_secs: PLAYER_FIRE_INTERVAL_SECS,
            invulnerable_secs: 0.0,
            fire_requested: false,
            previous: bounds,
        }
    }

    pub fn enemy(bounds: Bounds, heading: Direction) -> Self {
        Self {
            faction: Faction::Enemy,
            heading,
            moving: true,
            speed: ENEMY_TANK_SPEED,
            fire_cooldown_secs: ENEMY_FIRE_INTERVAL_SECS,
            fire_interval_secs: ENEMY_FIRE_INTERVAL_SECS,
            invulnerable_secs: 0.0,
            fire_requested: false,
            previous: bounds,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_secs > 0.0
    }
}

/// Missile flight state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MissileState {
    pub faction: Faction,
    pub heading: Direction,
    pub speed: f32,
}

/// Static obstacle state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstacleState {
    pub kind: ObstacleKind,
}

/// Enemy patrol bookkeeping, read and written by the patrol FSM.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Patrol {
    pub phase: PatrolPhase,
    pub phase_elapsed_secs: f64,
    /// Set by a collision reaction; cleared by the next steering pass.
    pub blocked: bool,
}
