#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::commands::PlayerCommand;
    use crate::constants::*;
    use crate::enums::*;
    use crate::events::GameEvent;
    use crate::state::GameStateSnapshot;
    use crate::types::{Bounds, EntityId, SimTime};

    #[test]
    fn test_category_masks_match_legacy_values() {
        assert_eq!(Category::PlayerTank.mask(), 1);
        assert_eq!(Category::EnemyTank.mask(), 3);
        assert_eq!(Category::PlayerMissile.mask(), 6);
        assert_eq!(Category::EnemyMissile.mask(), 9);
        assert_eq!(Category::Obstacle.mask(), 15);
    }

    #[test]
    fn test_category_index_is_table_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_faction_round_trip() {
        for faction in [Faction::Player, Faction::Enemy] {
            assert_eq!(faction.tank_category().faction(), Some(faction));
            assert_eq!(faction.missile_category().faction(), Some(faction));
        }
        assert_eq!(Category::Obstacle.faction(), None);
    }

    #[test]
    fn test_direction_toward_dominant_axis() {
        let origin = Vec2::ZERO;
        assert_eq!(Direction::toward(origin, Vec2::new(10.0, 2.0)), Some(Direction::Right));
        assert_eq!(Direction::toward(origin, Vec2::new(-10.0, 2.0)), Some(Direction::Left));
        assert_eq!(Direction::toward(origin, Vec2::new(1.0, 5.0)), Some(Direction::Down));
        assert_eq!(Direction::toward(origin, Vec2::new(1.0, -5.0)), Some(Direction::Up));
        assert_eq!(Direction::toward(origin, origin), None);
    }

    #[test]
    fn test_direction_unit_and_opposite() {
        for direction in Direction::ALL {
            assert_eq!(direction.unit() + direction.opposite().unit(), Vec2::ZERO);
            assert_eq!(direction.unit().length(), 1.0);
        }
    }

    #[test]
    fn test_bounds_overlap_is_strict() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let touching = Bounds::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Bounds::new(9.0, 9.0, 10.0, 10.0);
        let apart = Bounds::new(30.0, 30.0, 5.0, 5.0);

        assert!(!a.intersects(&touching), "shared edges must not collide");
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
        assert!(!a.intersects(&apart));
        assert!(a.intersects(&a));
    }

    #[test]
    fn test_bounds_clamped_within_arena() {
        let arena = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let outside = Bounds::new(95.0, -5.0, 10.0, 10.0);
        let clamped = outside.clamped_within(&arena);
        assert_eq!(clamped.min, Vec2::new(90.0, 0.0));
        assert!(arena.contains(&clamped));

        let inside = Bounds::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(inside.clamped_within(&arena), inside);
    }

    #[test]
    fn test_bounds_from_center() {
        let b = Bounds::from_center(Vec2::new(50.0, 50.0), Vec2::new(10.0, 20.0));
        assert_eq!(b.min, Vec2::new(45.0, 40.0));
        assert_eq!(b.center(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_game_status_classification() {
        assert!(GameStatus::Lost.is_terminal());
        assert!(GameStatus::Win.is_terminal());
        assert!(!GameStatus::ToLose.is_terminal());
        assert!(!GameStatus::Waiting.is_running());
        assert!(GameStatus::Between.is_running());
        assert!(GameStatus::ToLose.is_running());
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance(DT);
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    /// Commands arrive from outside as tagged JSON.
    #[test]
    fn test_player_command_serde() {
        let commands = vec![
            PlayerCommand::Move {
                direction: Direction::Left,
            },
            PlayerCommand::Fire,
            PlayerCommand::ClearEnemies,
            PlayerCommand::GrantInvulnerability,
            PlayerCommand::GrantLife,
        ];
        for cmd in commands {
            let json = serde_json::to_string(&cmd).unwrap();
            let back: PlayerCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(cmd, back);
        }

        let parsed: PlayerCommand =
            serde_json::from_str(r#"{"type":"Move","direction":"Down"}"#).unwrap();
        assert_eq!(
            parsed,
            PlayerCommand::Move {
                direction: Direction::Down
            }
        );
    }

    #[test]
    fn test_game_event_tagging() {
        let event = GameEvent::LevelCleared { level: 1, score: 300 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "LevelCleared");
        assert_eq!(json["score"], 300);
    }

    #[test]
    fn test_default_snapshot_is_waiting() {
        let snapshot = GameStateSnapshot::default();
        assert_eq!(snapshot.status, GameStatus::Waiting);
        assert!(snapshot.entities.is_empty());

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, GameStatus::Waiting);
        assert_eq!(back.hud, snapshot.hud);
    }

    #[test]
    fn test_entity_id_ordering() {
        assert!(EntityId(1) < EntityId(2));
    }
}
