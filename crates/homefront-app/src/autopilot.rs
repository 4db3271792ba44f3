//! Autopilot: plays the player tank from snapshots, for demos and soak runs.
//!
//! Steers toward the nearest enemy tank along the dominant axis and fires
//! when the enemy sits in front of the barrel.

use glam::Vec2;

use homefront_core::commands::PlayerCommand;
use homefront_core::enums::{Category, Direction};
use homefront_core::state::{EntityView, GameStateSnapshot};
use homefront_core::types::EntityId;

#[derive(Debug, Default)]
pub struct Autopilot {
    heading: Option<Direction>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands for the next tick given the last snapshot.
    pub fn commands(
        &mut self,
        snapshot: &GameStateSnapshot,
        player: Option<EntityId>,
    ) -> Vec<PlayerCommand> {
        let Some(tank) = player.and_then(|id| find_live(snapshot, id)) else {
            return Vec::new();
        };
        let position = tank.bounds.center();

        let target = snapshot
            .entities
            .iter()
            .filter(|e| e.alive && e.category == Category::EnemyTank)
            .map(|e| e.bounds.center())
            .min_by(|a, b| {
                a.distance_squared(position)
                    .partial_cmp(&b.distance_squared(position))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let mut commands = Vec::new();
        let Some(target) = target else {
            return commands;
        };

        if let Some(direction) = Direction::toward(position, target) {
            if self.heading != Some(direction) {
                self.heading = Some(direction);
                commands.push(PlayerCommand::Move { direction });
            }
            if in_line_of_fire(position, target, direction, tank.bounds.size) {
                commands.push(PlayerCommand::Fire);
            }
        }
        commands
    }
}

fn find_live(snapshot: &GameStateSnapshot, id: EntityId) -> Option<&EntityView> {
    snapshot.entities.iter().find(|e| e.id == id && e.alive)
}

/// The target lies ahead along `direction` within half a tank of the
/// barrel's axis.
fn in_line_of_fire(from: Vec2, to: Vec2, direction: Direction, size: Vec2) -> bool {
    let delta = to - from;
    let unit = direction.unit();
    let ahead = delta.dot(unit);
    let off_axis = (delta - unit * ahead).length();
    ahead > 0.0 && off_axis <= size.max_element() * 0.5
}
