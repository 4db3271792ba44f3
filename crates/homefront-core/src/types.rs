//! Fundamental geometric and simulation types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world units (screen coordinates, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Top-left corner.
    pub min: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle of `size` centred on `center`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    /// Bottom-right corner.
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Overlap test. Rectangles that only share an edge do not intersect,
    /// so adjacent map tiles never collide with each other.
    pub fn intersects(&self, other: &Bounds) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Bounds) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && b_max.x <= a_max.x
            && b_max.y <= a_max.y
    }

    pub fn translated(&self, delta: Vec2) -> Bounds {
        Bounds {
            min: self.min + delta,
            size: self.size,
        }
    }

    /// Shift this rectangle the least amount needed to fit inside `outer`.
    pub fn clamped_within(&self, outer: &Bounds) -> Bounds {
        let max_min = (outer.max() - self.size).max(outer.min);
        Bounds {
            min: self.min.clamp(outer.min, max_min),
            size: self.size,
        }
    }
}

/// Identity of an entity as exposed to renderers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each running tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds since the game started.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
