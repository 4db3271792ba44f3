//! Per-entity update: each entity advances only its own state.
//!
//! Tanks count down cooldowns, steer (enemies), drive and fire; missiles
//! fly and die when they leave the arena; obstacles never change here.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use homefront_core::components::{MissileState, Patrol, TankState, Vitality};
use homefront_core::types::Bounds;

use crate::registry::UpdateContext;
use crate::systems::tank_ai;
use crate::world_setup::EntityBlueprint;

/// Update one entity in place. Dead entities are skipped, which is what
/// keeps an entity that died earlier in the pass from updating again.
pub fn update_entity(
    world: &mut World,
    entity: Entity,
    dt: f64,
    ctx: &UpdateContext,
    rng: &mut ChaCha8Rng,
    spawns: &mut Vec<EntityBlueprint>,
) {
    let Ok((vitality, bounds, tank, missile, patrol)) = world.query_one_mut::<(
        &mut Vitality,
        &mut Bounds,
        Option<&mut TankState>,
        Option<&mut MissileState>,
        Option<&mut Patrol>,
    )>(entity) else {
        return;
    };

    if !vitality.alive {
        return;
    }

    if let Some(tank) = tank {
        if let Some(patrol) = patrol {
            tank_ai::steer(tank, patrol, bounds, ctx.home, dt, rng);
        }
        update_tank(tank, bounds, dt, &ctx.arena, spawns);
    } else if let Some(missile) = missile {
        update_missile(missile, bounds, vitality, dt, &ctx.arena);
    }
}

/// Advance timers, drive along the heading (clamped to the arena) and
/// queue a missile if a shot was requested and the gun is ready.
pub fn update_tank(
    tank: &mut TankState,
    bounds: &mut Bounds,
    dt: f64,
    arena: &Bounds,
    spawns: &mut Vec<EntityBlueprint>,
) {
    tank.previous = *bounds;
    tank.fire_cooldown_secs = (tank.fire_cooldown_secs - dt).max(0.0);
    tank.invulnerable_secs = (tank.invulnerable_secs - dt).max(0.0);

    if tank.moving {
        let step = tank.heading.unit() * tank.speed * dt as f32;
        *bounds = bounds.translated(step).clamped_within(arena);
    }

    if std::mem::take(&mut tank.fire_requested) && tank.fire_cooldown_secs <= 0.0 {
        tank.fire_cooldown_secs = tank.fire_interval_secs;
        spawns.push(EntityBlueprint::missile(tank.faction, bounds, tank.heading));
    }
}

/// Fly straight; a missile that has left the arena is dead.
pub fn update_missile(
    missile: &MissileState,
    bounds: &mut Bounds,
    vitality: &mut Vitality,
    dt: f64,
    arena: &Bounds,
) {
    let step = missile.heading.unit() * missile.speed * dt as f32;
    *bounds = bounds.translated(step);
    if !arena.intersects(bounds) {
        vitality.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homefront_core::components::Vitality;
    use homefront_core::constants::*;
    use homefront_core::enums::{Category, Direction, Faction};

    fn arena() -> Bounds {
        Bounds::new(0.0, 0.0, 200.0, 200.0)
    }

    #[test]
    fn test_tank_drives_and_remembers_previous_bounds() {
        let start = Bounds::new(100.0, 100.0, 20.0, 20.0);
        let mut bounds = start;
        let mut tank = TankState::player(start);
        tank.moving = true;
        tank.heading = Direction::Right;
        let mut spawns = Vec::new();

        update_tank(&mut tank, &mut bounds, 0.5, &arena(), &mut spawns);

        assert_eq!(tank.previous, start);
        assert_eq!(bounds.min.x, 100.0 + PLAYER_TANK_SPEED * 0.5);
        assert!(spawns.is_empty());
    }

    #[test]
    fn test_tank_is_clamped_to_arena() {
        let mut bounds = Bounds::new(5.0, 5.0, 20.0, 20.0);
        let mut tank = TankState::player(bounds);
        tank.moving = true;
        tank.heading = Direction::Up;
        let mut spawns = Vec::new();

        update_tank(&mut tank, &mut bounds, 1.0, &arena(), &mut spawns);
        assert_eq!(bounds.min.y, 0.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut bounds = Bounds::new(100.0, 100.0, 20.0, 20.0);
        let mut tank = TankState::player(bounds);
        let mut spawns = Vec::new();

        tank.fire_requested = true;
        update_tank(&mut tank, &mut bounds, DT, &arena(), &mut spawns);
        assert_eq!(spawns.len(), 1);
        assert_eq!(spawns[0].category, Category::PlayerMissile);
        assert!(!spawns[0].bounds.intersects(&bounds), "missile starts clear of the barrel");

        tank.fire_requested = true;
        update_tank(&mut tank, &mut bounds, DT, &arena(), &mut spawns);
        assert_eq!(spawns.len(), 1, "second shot is inside the cooldown");
        assert!(!tank.fire_requested, "request is consumed either way");
    }

    #[test]
    fn test_invulnerability_counts_down() {
        let mut bounds = Bounds::new(100.0, 100.0, 20.0, 20.0);
        let mut tank = TankState::player(bounds);
        tank.invulnerable_secs = 0.05;
        let mut spawns = Vec::new();

        update_tank(&mut tank, &mut bounds, DT, &arena(), &mut spawns);
        assert!(tank.is_invulnerable());
        for _ in 0..5 {
            update_tank(&mut tank, &mut bounds, DT, &arena(), &mut spawns);
        }
        assert!(!tank.is_invulnerable());
    }

    #[test]
    fn test_missile_dies_outside_arena() {
        let missile = MissileState {
            faction: Faction::Enemy,
            heading: Direction::Left,
            speed: MISSILE_SPEED,
        };
        let mut bounds = Bounds::new(-2.0, 50.0, MISSILE_SIZE, MISSILE_SIZE);
        let mut vitality = Vitality::default();

        update_missile(&missile, &mut bounds, &mut vitality, DT, &arena());
        assert!(!vitality.alive);
    }

    #[test]
    fn test_missile_flies_straight() {
        let missile = MissileState {
            faction: Faction::Player,
            heading: Direction::Down,
            speed: MISSILE_SPEED,
        };
        let mut bounds = Bounds::new(50.0, 50.0, MISSILE_SIZE, MISSILE_SIZE);
        let mut vitality = Vitality::default();

        update_missile(&missile, &mut bounds, &mut vitality, 0.1, &arena());
        assert!(vitality.alive);
        assert_eq!(bounds.min.x, 50.0);
        assert!((bounds.min.y - (50.0 + MISSILE_SPEED * 0.1)).abs() < 1e-4);
    }
}
