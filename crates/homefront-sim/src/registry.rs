//! Entity registry: owns the live entities of the current level.
//!
//! Storage is a hecs `World`; `order` keeps insertion order so update,
//! collision and snapshot iteration is deterministic. Removal is two-phase:
//! entities are marked dead during the tick and the order list is compacted
//! in one pass by `prune`, so nothing is skipped or visited twice.

use glam::Vec2;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use homefront_core::components::{ObstacleState, TankState, Vitality};
use homefront_core::enums::{Category, ObstacleKind};
use homefront_core::events::GameEvent;
use homefront_core::types::Bounds;

use crate::systems;
use crate::world_setup::{self, EntityBlueprint};

/// Read-only inputs every per-entity update sees.
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext {
    pub arena: Bounds,
    /// Centre of the standing home structure, if any.
    pub home: Option<Vec2>,
}

/// What a prune pass removed, per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub player_tanks: u32,
    pub enemy_tanks: u32,
    pub missiles: u32,
    /// Obstacles whose death is reported for the first time. They stay in
    /// the registry.
    pub obstacles_destroyed: Vec<Entity>,
}

impl PruneReport {
    pub fn is_empty(&self) -> bool {
        self.player_tanks == 0
            && self.enemy_tanks == 0
            && self.missiles == 0
            && self.obstacles_destroyed.is_empty()
    }
}

/// Ordered collection of the entities in play.
pub struct EntityRegistry {
    world: World,
    order: Vec<Entity>,
    updating: bool,
    spawn_buffer: Vec<EntityBlueprint>,
    despawn_buffer: Vec<Entity>,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            order: Vec::new(),
            updating: false,
            spawn_buffer: Vec::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Read-only access to component storage.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Append a new entity and return its identity.
    pub fn insert(&mut self, blueprint: EntityBlueprint) -> Entity {
        assert!(!self.updating, "insert called during the update pass");
        let entity = world_setup::spawn(&mut self.world, blueprint);
        debug_assert!(
            !self.order.contains(&entity),
            "duplicate identity {entity:?} in registry"
        );
        self.order.push(entity);
        entity
    }

    /// Remove everything (level transitions and restarts). Entities are
    /// despawned one by one so their identities are never handed out again.
    pub fn clear(&mut self) {
        assert!(!self.updating, "clear called during the update pass");
        for entity in self.order.drain(..) {
            let _ = self.world.despawn(entity);
        }
        self.spawn_buffer.clear();
        self.despawn_buffer.clear();
    }

    pub fn category(&self, entity: Entity) -> Option<Category> {
        self.world.get::<&Category>(entity).ok().map(|c| *c)
    }

    pub fn bounds(&self, entity: Entity) -> Option<Bounds> {
        self.world.get::<&Bounds>(entity).ok().map(|b| *b)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world
            .get::<&Vitality>(entity)
            .map(|v| v.alive)
            .unwrap_or(false)
    }

    /// Flag an entity for removal at the next prune. Returns whether it
    /// was alive before.
    pub fn mark_dead(&mut self, entity: Entity) -> bool {
        match self.world.get::<&mut Vitality>(entity) {
            Ok(mut vitality) => std::mem::replace(&mut vitality.alive, false),
            Err(_) => false,
        }
    }

    /// Mutable tank state, if `entity` is a tank still in the registry.
    pub fn tank_mut(&mut self, entity: Entity) -> Option<hecs::RefMut<'_, TankState>> {
        self.world.get::<&mut TankState>(entity).ok()
    }

    /// Live entities with their categories, in insertion order.
    pub fn live_entities(&self) -> Vec<(Entity, Category)> {
        self.order
            .iter()
            .filter(|&&e| self.is_alive(e))
            .filter_map(|&e| self.category(e).map(|c| (e, c)))
            .collect()
    }

    /// Number of live entities of `category`.
    pub fn count_live(&self, category: Category) -> usize {
        self.live_entities()
            .into_iter()
            .filter(|&(_, c)| c == category)
            .count()
    }

    /// Bounds of every live tank (spawn points must avoid them).
    pub fn live_tank_bounds(&self) -> Vec<Bounds> {
        self.live_entities()
            .into_iter()
            .filter(|&(_, c)| c.is_tank())
            .filter_map(|(e, _)| self.bounds(e))
            .collect()
    }

    /// Centre of the first standing home structure.
    pub fn home_center(&self) -> Option<Vec2> {
        self.order.iter().find_map(|&e| {
            let obstacle = self.world.get::<&ObstacleState>(e).ok()?;
            if obstacle.kind != ObstacleKind::Home || !self.is_alive(e) {
                return None;
            }
            self.bounds(e).map(|b| b.center())
        })
    }

    /// Run every live entity's own update. Entities that die during the
    /// pass are not updated again; spawns requested during the pass are
    /// appended afterwards and first update next tick.
    pub fn update(
        &mut self,
        dt: f64,
        ctx: &UpdateContext,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<GameEvent>,
    ) {
        self.updating = true;
        for idx in 0..self.order.len() {
            let entity = self.order[idx];
            systems::movement::update_entity(
                &mut self.world,
                entity,
                dt,
                ctx,
                rng,
                &mut self.spawn_buffer,
            );
        }
        self.updating = false;

        let spawns = std::mem::take(&mut self.spawn_buffer);
        for blueprint in spawns {
            if let Some(faction) = blueprint.category.faction() {
                events.push(GameEvent::MissileFired { faction });
            }
            self.insert(blueprint);
        }
    }

    /// Remove dead entities in one compaction pass and report them.
    /// Obstacles are kept; each obstacle death is reported exactly once.
    pub fn prune(&mut self) -> PruneReport {
        assert!(!self.updating, "prune called during the update pass");

        let Self {
            world,
            order,
            despawn_buffer,
            ..
        } = self;
        let mut report = PruneReport::default();
        despawn_buffer.clear();

        order.retain(|&entity| {
            let Ok((category, vitality)) = world.query_one_mut::<(&Category, &mut Vitality)>(entity)
            else {
                panic!("registry order references missing entity {entity:?}");
            };
            if vitality.alive {
                return true;
            }
            match *category {
                Category::Obstacle => {
                    if !vitality.loss_reported {
                        vitality.loss_reported = true;
                        report.obstacles_destroyed.push(entity);
                    }
                    true
                }
                Category::PlayerTank => {
                    report.player_tanks += 1;
                    despawn_buffer.push(entity);
                    false
                }
                Category::EnemyTank => {
                    report.enemy_tanks += 1;
                    despawn_buffer.push(entity);
                    false
                }
                Category::PlayerMissile | Category::EnemyMissile => {
                    report.missiles += 1;
                    despawn_buffer.push(entity);
                    false
                }
            }
        });

        for entity in despawn_buffer.drain(..) {
            let _ = world.despawn(entity);
        }
        report
    }

    /// Remove every entity of `category` immediately, with no report.
    /// Only valid between passes.
    pub fn remove_category(&mut self, category: Category) -> usize {
        assert!(!self.updating, "remove_category called during the update pass");

        let Self {
            world,
            order,
            despawn_buffer,
            ..
        } = self;
        despawn_buffer.clear();
        order.retain(|&entity| {
            let matches = world
                .get::<&Category>(entity)
                .map(|c| *c == category)
                .unwrap_or(false);
            if matches {
                despawn_buffer.push(entity);
            }
            !matches
        });

        let removed = despawn_buffer.len();
        for entity in despawn_buffer.drain(..) {
            let _ = world.despawn(entity);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homefront_core::enums::{Direction, Faction};

    fn tile(x: f32, y: f32) -> Bounds {
        Bounds::new(x, y, 20.0, 20.0)
    }

    #[test]
    fn test_insert_assigns_distinct_identities_in_order() {
        let mut registry = EntityRegistry::new();
        let a = registry.insert(EntityBlueprint::obstacle(ObstacleKind::Steel, tile(0.0, 0.0)));
        let b = registry.insert(EntityBlueprint::player_tank(tile(40.0, 0.0)));
        let c = registry.insert(EntityBlueprint::enemy_tank(tile(80.0, 0.0), Direction::Down));

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(registry.entities(), &[a, b, c]);
        assert_eq!(registry.category(c), Some(Category::EnemyTank));
    }

    #[test]
    fn test_prune_removes_dead_and_keeps_order() {
        let mut registry = EntityRegistry::new();
        let ids: Vec<_> = (0..6)
            .map(|i| {
                registry.insert(EntityBlueprint::enemy_tank(
                    tile(i as f32 * 30.0, 0.0),
                    Direction::Up,
                ))
            })
            .collect();

        // Adjacent dead entities are the classic skip bug.
        registry.mark_dead(ids[1]);
        registry.mark_dead(ids[2]);
        registry.mark_dead(ids[5]);

        let report = registry.prune();
        assert_eq!(report.enemy_tanks, 3);
        assert_eq!(registry.entities(), &[ids[0], ids[3], ids[4]]);
        assert!(!registry.contains(ids[1]));
        assert!(!registry.contains(ids[5]));
    }

    #[test]
    fn test_prune_reports_by_category() {
        let mut registry = EntityRegistry::new();
        let player = registry.insert(EntityBlueprint::player_tank(tile(0.0, 0.0)));
        let enemy = registry.insert(EntityBlueprint::enemy_tank(tile(50.0, 0.0), Direction::Up));
        let missile = registry.insert(EntityBlueprint::missile(
            Faction::Enemy,
            &tile(100.0, 100.0),
            Direction::Left,
        ));

        for e in [player, enemy, missile] {
            registry.mark_dead(e);
        }
        let report = registry.prune();
        assert_eq!(report.player_tanks, 1);
        assert_eq!(report.enemy_tanks, 1);
        assert_eq!(report.missiles, 1);
        assert!(report.obstacles_destroyed.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dead_obstacle_is_kept_and_reported_once() {
        let mut registry = EntityRegistry::new();
        let home = registry.insert(EntityBlueprint::obstacle(ObstacleKind::Home, tile(0.0, 0.0)));
        registry.mark_dead(home);

        let first = registry.prune();
        assert_eq!(first.obstacles_destroyed, vec![home]);

        for _ in 0..10 {
            let again = registry.prune();
            assert!(again.is_empty(), "obstacle death must be reported once");
        }
        assert!(registry.contains(home));
        assert!(!registry.is_alive(home));
        assert_eq!(registry.home_center(), None);
    }

    #[test]
    fn test_mark_dead_is_idempotent() {
        let mut registry = EntityRegistry::new();
        let tank = registry.insert(EntityBlueprint::player_tank(tile(0.0, 0.0)));
        assert!(registry.mark_dead(tank));
        assert!(!registry.mark_dead(tank));
        assert_eq!(registry.prune().player_tanks, 1);
        assert!(!registry.mark_dead(tank), "removed entity stays dead");
    }

    #[test]
    fn test_remove_category_leaves_others() {
        let mut registry = EntityRegistry::new();
        let player = registry.insert(EntityBlueprint::player_tank(tile(0.0, 0.0)));
        for i in 0..3 {
            registry.insert(EntityBlueprint::enemy_tank(
                tile(50.0 + i as f32 * 30.0, 0.0),
                Direction::Up,
            ));
        }
        assert_eq!(registry.remove_category(Category::EnemyTank), 3);
        assert_eq!(registry.entities(), &[player]);
        assert_eq!(registry.count_live(Category::EnemyTank), 0);
    }

    #[test]
    fn test_clear_empties_registry() {
        let mut registry = EntityRegistry::new();
        let tank = registry.insert(EntityBlueprint::player_tank(tile(0.0, 0.0)));
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains(tank));

        let replacement = registry.insert(EntityBlueprint::player_tank(tile(0.0, 0.0)));
        assert_ne!(tank, replacement, "identities are not reused after clear");
    }

    #[test]
    fn test_home_center_finds_standing_home() {
        let mut registry = EntityRegistry::new();
        registry.insert(EntityBlueprint::obstacle(ObstacleKind::Steel, tile(0.0, 0.0)));
        registry.insert(EntityBlueprint::obstacle(ObstacleKind::Home, tile(100.0, 200.0)));
        assert_eq!(registry.home_center(), Some(Vec2::new(110.0, 210.0)));
    }
}
