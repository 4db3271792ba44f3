//! Game state snapshot: the complete visible state handed to the renderer
//! and HUD after each tick.

use serde::{Deserialize, Serialize};

use crate::components::RenderPriority;
use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Bounds, EntityId, SimTime};

/// Complete game state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub status: GameStatus,
    /// Set while losing or lost.
    pub loss_cause: Option<LossCause>,
    /// Zero-based level index.
    pub level: usize,
    pub level_count: usize,
    pub hud: HudView,
    /// Entities in draw order (stable by render priority).
    pub entities: Vec<EntityView>,
    pub events: Vec<GameEvent>,
}

/// Numbers shown in the heads-up display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudView {
    pub lives: u32,
    pub score: u32,
    /// Whole seconds left on the level clock.
    pub time_remaining_secs: i64,
}

/// One entity as the renderer sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub category: Category,
    pub bounds: Bounds,
    pub alive: bool,
    pub render_priority: RenderPriority,
    /// Tanks and missiles only.
    pub heading: Option<Direction>,
    pub invulnerable: bool,
    /// Obstacles only.
    pub obstacle: Option<ObstacleKind>,
}
