//! Enumeration types used throughout the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Entity category. Decides collision interaction and what a removal is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    PlayerTank,
    EnemyTank,
    PlayerMissile,
    EnemyMissile,
    /// Terrain and the defended home structure.
    Obstacle,
}

impl Category {
    /// Every category, in table order.
    pub const ALL: [Category; 5] = [
        Category::PlayerTank,
        Category::EnemyTank,
        Category::PlayerMissile,
        Category::EnemyMissile,
        Category::Obstacle,
    ];

    /// Row/column of this category in per-pair tables.
    pub fn index(self) -> usize {
        match self {
            Category::PlayerTank => 0,
            Category::EnemyTank => 1,
            Category::PlayerMissile => 2,
            Category::EnemyMissile => 3,
            Category::Obstacle => 4,
        }
    }

    /// Legacy compatibility bitmask.
    pub fn mask(self) -> u8 {
        match self {
            Category::PlayerTank => PLAYER_TANK_MASK,
            Category::EnemyTank => ENEMY_TANK_MASK,
            Category::PlayerMissile => PLAYER_MISSILE_MASK,
            Category::EnemyMissile => ENEMY_MISSILE_MASK,
            Category::Obstacle => OBSTACLE_MASK,
        }
    }

    pub fn is_tank(self) -> bool {
        matches!(self, Category::PlayerTank | Category::EnemyTank)
    }

    pub fn is_missile(self) -> bool {
        matches!(self, Category::PlayerMissile | Category::EnemyMissile)
    }

    /// Side this entity fights for. Obstacles belong to nobody.
    pub fn faction(self) -> Option<Faction> {
        match self {
            Category::PlayerTank | Category::PlayerMissile => Some(Faction::Player),
            Category::EnemyTank | Category::EnemyMissile => Some(Faction::Enemy),
            Category::Obstacle => None,
        }
    }
}

/// Fighting side of a tank or missile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn tank_category(self) -> Category {
        match self {
            Faction::Player => Category::PlayerTank,
            Faction::Enemy => Category::EnemyTank,
        }
    }

    pub fn missile_category(self) -> Category {
        match self {
            Faction::Player => Category::PlayerMissile,
            Faction::Enemy => Category::EnemyMissile,
        }
    }
}

/// Heading on the grid. Screen coordinates: `Up` is negative y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this heading.
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Grid heading that best points from `from` to `to` (dominant axis wins,
    /// ties go vertical). Returns `None` when the points coincide.
    pub fn toward(from: Vec2, to: Vec2) -> Option<Direction> {
        let delta = to - from;
        if delta == Vec2::ZERO {
            return None;
        }
        let direction = if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(direction)
    }
}

/// Kind of static obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// The structure the player defends. Destroyed by any missile.
    Home,
    /// Indestructible wall.
    Steel,
}

/// Enemy tank patrol phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolPhase {
    /// Driving straight along the current heading.
    #[default]
    Advance,
    /// Stopped after a bump, about to pick a new heading.
    Reorient,
}

/// Top-level game status as seen from outside the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Created but not started.
    #[default]
    Waiting,
    Playing,
    /// Level cleared, waiting before the next one.
    Between,
    /// Loss decided, holding the grace delay.
    ToLose,
    Lost,
    Win,
}

impl GameStatus {
    /// `Lost` and `Win` only change through an explicit restart.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Lost | GameStatus::Win)
    }

    /// Whether `step` does any work in this status.
    pub fn is_running(self) -> bool {
        matches!(
            self,
            GameStatus::Playing | GameStatus::Between | GameStatus::ToLose
        )
    }
}

/// Why a game is being lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossCause {
    /// The last life was spent.
    LivesExhausted,
    /// The home structure was destroyed.
    HomeDestroyed,
}
