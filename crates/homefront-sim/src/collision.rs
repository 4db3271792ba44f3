//! Collision detection and category-driven reactions.
//!
//! Every unordered pair of entities live at the start of detection is
//! tested once. A pair reacts only if the bounds overlap and the
//! categories interact; then both sides react to each other.

use hecs::Entity;

use homefront_core::components::{ObstacleState, Patrol, TankState};
use homefront_core::enums::{Category, ObstacleKind};
use homefront_core::types::Bounds;

use crate::registry::EntityRegistry;

/// Which category pairs interact, indexed by `Category::index()`.
/// Rows and columns: PlayerTank, EnemyTank, PlayerMissile, EnemyMissile, Obstacle.
pub const INTERACTION_TABLE: [[bool; 5]; 5] = [
    [true, true, false, true, true],
    [true, true, true, true, true],
    [false, true, true, false, true],
    [true, true, false, true, true],
    [true, true, true, true, true],
];

/// Whether entities of categories `a` and `b` react to each other.
pub fn interacts(a: Category, b: Category) -> bool {
    INTERACTION_TABLE[a.index()][b.index()]
}

/// Two entities that touched and reacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub first: Entity,
    pub second: Entity,
}

/// Run pairwise detection over the registry and apply reactions.
/// Returns the contacts in detection order.
pub fn detect(registry: &mut EntityRegistry) -> Vec<Contact> {
    let live = registry.live_entities();
    let mut contacts = Vec::new();

    for (i, &(a, cat_a)) in live.iter().enumerate() {
        for &(b, cat_b) in &live[i + 1..] {
            let bounds_a = pair_bounds(registry, a);
            let bounds_b = pair_bounds(registry, b);
            if !bounds_a.intersects(&bounds_b) || !interacts(cat_a, cat_b) {
                continue;
            }
            react(registry, a, cat_a, cat_b);
            react(registry, b, cat_b, cat_a);
            contacts.push(Contact { first: a, second: b });
        }
    }
    contacts
}

fn pair_bounds(registry: &EntityRegistry, entity: Entity) -> Bounds {
    match registry.bounds(entity) {
        Some(bounds) => bounds,
        None => panic!("collision pair references removed entity {entity:?}"),
    }
}

/// Apply `target`'s reaction to touching an entity of category `other`.
fn react(registry: &mut EntityRegistry, target: Entity, category: Category, other: Category) {
    match category {
        Category::PlayerMissile | Category::EnemyMissile => {
            registry.mark_dead(target);
        }
        Category::PlayerTank | Category::EnemyTank => {
            if other.is_missile() {
                let invulnerable = registry
                    .tank_mut(target)
                    .map(|t| t.is_invulnerable())
                    .unwrap_or(false);
                if !invulnerable {
                    registry.mark_dead(target);
                }
            } else {
                push_back(registry, target);
            }
        }
        Category::Obstacle => {
            let kind = registry
                .world()
                .get::<&ObstacleState>(target)
                .map(|o| o.kind)
                .ok();
            if kind == Some(ObstacleKind::Home) && other.is_missile() {
                registry.mark_dead(target);
            }
        }
    }
}

/// Return a tank to its pre-move bounds and flag its patrol as blocked.
fn push_back(registry: &mut EntityRegistry, tank: Entity) {
    let world = registry.world_mut();
    if let Ok((bounds, state, patrol)) =
        world.query_one_mut::<(&mut Bounds, &TankState, Option<&mut Patrol>)>(tank)
    {
        *bounds = state.previous;
        if let Some(patrol) = patrol {
            patrol.blocked = true;
        }
    }
}
