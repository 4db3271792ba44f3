//! Level controller: builds levels through the map provider, owns the
//! level clock and the reference to the current player tank.

use hecs::Entity;
use log::{debug, info};
use rand_chacha::ChaCha8Rng;

use homefront_core::constants::{DEATH_GRACE_SECS, LEVEL_DURATION_SECS};
use homefront_core::enums::Category;
use homefront_core::types::Bounds;

use crate::map::{MapProvider, SpawnContext};
use crate::registry::EntityRegistry;

pub struct LevelController {
    provider: Box<dyn MapProvider + Send>,
    level_count: usize,
    level: usize,
    elapsed_secs: f64,
    arena: Bounds,
    player: Option<Entity>,
}

impl LevelController {
    pub fn new(provider: Box<dyn MapProvider + Send>) -> Self {
        let level_count = provider.level_count();
        assert!(level_count > 0, "map provider has no levels");
        Self {
            provider,
            level_count,
            level: 0,
            elapsed_secs: 0.0,
            arena: Bounds::default(),
            player: None,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn level_count(&self) -> usize {
        self.level_count
    }

    pub fn is_final_level(&self) -> bool {
        self.level + 1 >= self.level_count
    }

    pub fn arena(&self) -> Bounds {
        self.arena
    }

    pub fn set_arena(&mut self, arena: Bounds) {
        self.arena = arena;
    }

    /// The current player tank, if one has been built.
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn advance_clock(&mut self, dt: f64) {
        self.elapsed_secs += dt;
    }

    /// The level clock has run past the level duration.
    pub fn is_expired(&self) -> bool {
        self.elapsed_secs > LEVEL_DURATION_SECS
    }

    /// Countdown shown on the HUD: duration minus whole seconds elapsed.
    pub fn time_remaining_secs(&self) -> i64 {
        (LEVEL_DURATION_SECS as i64 - self.elapsed_secs.floor() as i64).max(0)
    }

    /// Clear the registry, populate level `index` and reset the clock.
    /// Returns the new player tank.
    pub fn build_level(&mut self, index: usize, registry: &mut EntityRegistry) -> Entity {
        assert!(
            index < self.level_count,
            "level {index} out of range ({} levels)",
            self.level_count
        );
        registry.clear();

        let layout = self.provider.populate(index, self.arena);
        for blueprint in layout.entities {
            registry.insert(blueprint);
        }
        let player = registry.insert(layout.player);

        self.level = index;
        self.elapsed_secs = 0.0;
        self.player = Some(player);
        info!(
            "built level {index}/{}: {} entities",
            self.level_count,
            registry.len()
        );
        player
    }

    /// Build the level after the current one.
    pub fn advance_level(&mut self, registry: &mut EntityRegistry) -> Entity {
        self.build_level(self.level + 1, registry)
    }

    /// Ask the provider for an enemy and insert it if one is due.
    pub fn spawn_enemy_if_due(
        &mut self,
        registry: &mut EntityRegistry,
        rng: &mut ChaCha8Rng,
    ) -> Option<Entity> {
        let occupied = registry.live_tank_bounds();
        let blueprint = self.provider.try_spawn_enemy(SpawnContext {
            level: self.level,
            level_elapsed_secs: self.elapsed_secs,
            live_enemies: registry.count_live(Category::EnemyTank),
            occupied: &occupied,
            rng,
        })?;
        let enemy = registry.insert(blueprint);
        debug!("enemy spawned: {enemy:?}");
        Some(enemy)
    }

    /// Insert a fresh player tank, briefly invulnerable, and make it the
    /// player reference.
    pub fn revive_player(&mut self, registry: &mut EntityRegistry) -> Entity {
        let blueprint = self
            .provider
            .respawn_player()
            .with_invulnerability(DEATH_GRACE_SECS);
        let player = registry.insert(blueprint);
        debug!("player revived: {player:?}");
        self.player = Some(player);
        player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::GridMap;
    use rand::SeedableRng;

    fn controller() -> (LevelController, EntityRegistry) {
        let map = GridMap::parse("E...\n.#..\n.PH.\n\nE.E.\n....\n.HP.").unwrap();
        let mut levels = LevelController::new(Box::new(map));
        levels.set_arena(Bounds::new(0.0, 0.0, 400.0, 300.0));
        (levels, EntityRegistry::new())
    }

    #[test]
    fn test_build_level_resets_clock_and_registry() {
        let (mut levels, mut registry) = controller();
        let first = levels.build_level(0, &mut registry);
        assert_eq!(registry.len(), 3);
        assert_eq!(levels.player(), Some(first));
        assert!(!levels.is_final_level());

        levels.advance_clock(12.5);
        let second = levels.advance_level(&mut registry);
        assert_eq!(levels.level(), 1);
        assert!(levels.is_final_level());
        assert_eq!(levels.elapsed_secs(), 0.0);
        assert!(!registry.contains(first));
        assert_eq!(registry.category(second), Some(Category::PlayerTank));
    }

    #[test]
    fn test_clock_and_countdown() {
        let (mut levels, mut registry) = controller();
        levels.build_level(0, &mut registry);
        assert_eq!(levels.time_remaining_secs(), 30);

        levels.advance_clock(0.99);
        assert_eq!(levels.time_remaining_secs(), 30);
        levels.advance_clock(0.02);
        assert_eq!(levels.time_remaining_secs(), 29);

        levels.advance_clock(28.98);
        assert!(!levels.is_expired());
        levels.advance_clock(0.02);
        assert!(levels.is_expired());
        assert_eq!(levels.time_remaining_secs(), 0);
    }

    #[test]
    fn test_revive_gives_new_invulnerable_tank() {
        let (mut levels, mut registry) = controller();
        let first = levels.build_level(0, &mut registry);
        registry.mark_dead(first);
        registry.prune();

        let second = levels.revive_player(&mut registry);
        assert_ne!(first, second);
        assert_eq!(levels.player(), Some(second));
        assert!(registry.tank_mut(second).unwrap().is_invulnerable());
    }

    #[test]
    fn test_spawn_enemy_when_due() {
        let (mut levels, mut registry) = controller();
        levels.build_level(0, &mut registry);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!(levels.spawn_enemy_if_due(&mut registry, &mut rng).is_none());
        levels.advance_clock(1.0);
        let enemy = levels.spawn_enemy_if_due(&mut registry, &mut rng).unwrap();
        assert_eq!(registry.category(enemy), Some(Category::EnemyTank));
        assert_eq!(registry.count_live(Category::EnemyTank), 1);
    }
}
