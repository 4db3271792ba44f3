//! Entity blueprints and spawn factories.
//!
//! A blueprint is everything needed to create an entity except its
//! identity, which the registry assigns on insert.

use glam::Vec2;
use hecs::World;

use homefront_core::components::*;
use homefront_core::constants::*;
use homefront_core::enums::*;
use homefront_core::types::Bounds;

/// Behaviour-specific state of a blueprint.
#[derive(Debug, Clone)]
pub enum Behavior {
    Tank(TankState),
    Missile(MissileState),
    Obstacle(ObstacleState),
}

/// An entity waiting to be inserted into the registry.
#[derive(Debug, Clone)]
pub struct EntityBlueprint {
    pub category: Category,
    pub bounds: Bounds,
    pub render_priority: RenderPriority,
    pub behavior: Behavior,
}

impl EntityBlueprint {
    pub fn player_tank(bounds: Bounds) -> Self {
        Self {
            category: Category::PlayerTank,
            bounds,
            render_priority: RenderPriority(TANK_RENDER_PRIORITY),
            behavior: Behavior::Tank(TankState::player(bounds)),
        }
    }

    pub fn enemy_tank(bounds: Bounds, heading: Direction) -> Self {
        Self {
            category: Category::EnemyTank,
            bounds,
            render_priority: RenderPriority(TANK_RENDER_PRIORITY),
            behavior: Behavior::Tank(TankState::enemy(bounds, heading)),
        }
    }

    /// Missile leaving `shooter`'s barrel along `heading`, placed just clear
    /// of the shooter so it never starts inside it.
    pub fn missile(faction: Faction, shooter: &Bounds, heading: Direction) -> Self {
        let size = Vec2::splat(MISSILE_SIZE);
        let unit = heading.unit();
        let reach = shooter.size * 0.5 + size * 0.5 + Vec2::splat(MISSILE_MUZZLE_GAP);
        let center = shooter.center() + unit * reach;
        Self {
            category: faction.missile_category(),
            bounds: Bounds::from_center(center, size),
            render_priority: RenderPriority(MISSILE_RENDER_PRIORITY),
            behavior: Behavior::Missile(MissileState {
                faction,
                heading,
                speed: MISSILE_SPEED,
            }),
        }
    }

    pub fn obstacle(kind: ObstacleKind, bounds: Bounds) -> Self {
        Self {
            category: Category::Obstacle,
            bounds,
            render_priority: RenderPriority(OBSTACLE_RENDER_PRIORITY),
            behavior: Behavior::Obstacle(ObstacleState { kind }),
        }
    }

    /// Start the tank invulnerable for `secs`. No effect on other behaviours.
    pub fn with_invulnerability(mut self, secs: f64) -> Self {
        if let Behavior::Tank(tank) = &mut self.behavior {
            tank.invulnerable_secs = secs;
        }
        self
    }
}

/// Spawn a blueprint into the world with the component bundle for its behaviour.
pub fn spawn(world: &mut World, blueprint: EntityBlueprint) -> hecs::Entity {
    let EntityBlueprint {
        category,
        bounds,
        render_priority,
        behavior,
    } = blueprint;
    let vitality = Vitality::default();

    match behavior {
        Behavior::Tank(tank) => {
            debug_assert!(category.is_tank(), "tank behaviour on {category:?}");
            if tank.faction == Faction::Enemy {
                world.spawn((
                    category,
                    bounds,
                    render_priority,
                    vitality,
                    tank,
                    Patrol::default(),
                ))
            } else {
                world.spawn((category, bounds, render_priority, vitality, tank))
            }
        }
        Behavior::Missile(missile) => {
            debug_assert!(category.is_missile(), "missile behaviour on {category:?}");
            world.spawn((category, bounds, render_priority, vitality, missile))
        }
        Behavior::Obstacle(obstacle) => {
            debug_assert_eq!(category, Category::Obstacle);
            world.spawn((category, bounds, render_priority, vitality, obstacle))
        }
    }
}
