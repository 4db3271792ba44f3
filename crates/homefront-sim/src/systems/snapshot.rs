//! Snapshot system: reads the registry and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::Entity;

use homefront_core::components::*;
use homefront_core::enums::*;
use homefront_core::events::GameEvent;
use homefront_core::state::*;
use homefront_core::types::{Bounds, EntityId, SimTime};

use crate::registry::EntityRegistry;

/// Status-related fields of the snapshot, owned by the engine.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotHeader {
    pub time: SimTime,
    pub status: GameStatus,
    pub loss_cause: Option<LossCause>,
    pub level: usize,
    pub level_count: usize,
    pub hud: HudView,
}

/// Build a complete GameStateSnapshot from the current registry.
pub fn build_snapshot(
    registry: &EntityRegistry,
    header: SnapshotHeader,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: header.time,
        status: header.status,
        loss_cause: header.loss_cause,
        level: header.level,
        level_count: header.level_count,
        hud: header.hud,
        entities: build_entities(registry),
        events,
    }
}

/// Stable identity of a registry entity for outside consumers.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Entity views in draw order: ascending render priority, ties in
/// insertion order.
pub fn build_entities(registry: &EntityRegistry) -> Vec<EntityView> {
    let world = registry.world();
    let mut views: Vec<EntityView> = registry
        .entities()
        .iter()
        .filter_map(|&entity| {
            let mut query = world
                .query_one::<(
                    &Category,
                    &Bounds,
                    &RenderPriority,
                    &Vitality,
                    Option<&TankState>,
                    Option<&MissileState>,
                    Option<&ObstacleState>,
                )>(entity)
                .ok()?;
            let (category, bounds, priority, vitality, tank, missile, obstacle) = query.get()?;

            let heading = tank
                .map(|t| t.heading)
                .or_else(|| missile.map(|m| m.heading));

            Some(EntityView {
                id: entity_id(entity),
                category: *category,
                bounds: *bounds,
                alive: vitality.alive,
                render_priority: *priority,
                heading,
                invulnerable: tank.is_some_and(|t| t.is_invulnerable()),
                obstacle: obstacle.map(|o| o.kind),
            })
        })
        .collect();

    // sort_by_key is stable
    views.sort_by_key(|v| v.render_priority);
    views
}
