//! Map providers: level geometry and spawn-point selection.
//!
//! The engine only talks to the `MapProvider` trait. `GridMap` is the
//! shipped implementation, built from ASCII layouts:
//!
//! ```text
//! #  steel wall        H  home structure
//! P  player spawn      E  enemy spawn point
//! .  empty
//! ```
//!
//! Tiles are scaled to the arena given when a level is populated.

use glam::Vec2;
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use homefront_core::constants::*;
use homefront_core::enums::{Direction, ObstacleKind};
use homefront_core::types::Bounds;

use crate::error::MapError;
use crate::world_setup::EntityBlueprint;

/// Everything a level build inserts. The player tank is kept apart so the
/// level controller can hold on to its identity.
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub player: EntityBlueprint,
    pub entities: Vec<EntityBlueprint>,
}

/// What a provider may look at when deciding whether to spawn an enemy.
pub struct SpawnContext<'a> {
    pub level: usize,
    /// Time since the level was built.
    pub level_elapsed_secs: f64,
    pub live_enemies: usize,
    /// Bounds of every live tank; a spawn must not overlap them.
    pub occupied: &'a [Bounds],
    pub rng: &'a mut ChaCha8Rng,
}

/// Source of level geometry and spawn decisions.
pub trait MapProvider {
    fn level_count(&self) -> usize;

    /// Build level `level` for an arena of the given bounds.
    fn populate(&mut self, level: usize, arena: Bounds) -> LevelLayout;

    /// Called once per playing tick. Returns an enemy to insert, if one
    /// is due and there is room.
    fn try_spawn_enemy(&mut self, ctx: SpawnContext<'_>) -> Option<EntityBlueprint>;

    /// A fresh player tank at the current level's player spawn.
    fn respawn_player(&mut self) -> EntityBlueprint;
}

/// One cell of a grid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Steel,
    Home,
    PlayerSpawn,
    EnemySpawn,
}

impl Tile {
    fn from_glyph(glyph: char) -> Option<Tile> {
        match glyph {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Steel),
            'H' => Some(Tile::Home),
            'P' => Some(Tile::PlayerSpawn),
            'E' => Some(Tile::EnemySpawn),
            _ => None,
        }
    }
}

/// A validated level grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLevel {
    columns: usize,
    rows: Vec<Vec<Tile>>,
}

impl GridLevel {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &t)| (r, c, t)))
    }
}

/// Geometry of the level currently in play.
#[derive(Debug, Clone)]
struct ActiveLevel {
    player_spawn: Bounds,
    enemy_spawns: Vec<Bounds>,
    home: Option<Vec2>,
    next_spawn_secs: f64,
}

const CAMPAIGN: &str = "\
E.....E.....E
.............
..#.......#..
..#.......#..
.............
....##.##....
.............
.#.........#.
.#.........#.
.............
.....#.#.....
.....#H#.....
....P........

E.....E.....E
.............
.##..###..##.
.............
....#...#....
.#..#...#..#.
.#.........#.
.....###.....
.............
.##.......##.
.....#.#.....
.....#H#.....
....P........

E.....E.....E
..#...#...#..
..#.......#..
.....#.#.....
.##.......##.
.....#.#.....
..#...#...#..
.............
.#.#.....#.#.
.............
....##.##....
.....#H#.....
....P........
";

/// Grid-based map provider.
#[derive(Debug, Clone)]
pub struct GridMap {
    levels: Vec<GridLevel>,
    active: Option<ActiveLevel>,
}

impl GridMap {
    /// The built-in three-level campaign.
    pub fn campaign() -> Self {
        match Self::parse(CAMPAIGN) {
            Ok(map) => map,
            Err(e) => panic!("built-in campaign is malformed: {e}"),
        }
    }

    /// Parse levels from text. Levels are separated by blank lines.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut blocks: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in text.lines().map(str::trim_end) {
            if line.is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        Self::from_layouts(&blocks.iter().map(|b| b.join("\n")).collect::<Vec<_>>())
    }

    /// Build a map from one layout string per level.
    pub fn from_layouts<S: AsRef<str>>(layouts: &[S]) -> Result<Self, MapError> {
        if layouts.is_empty() {
            return Err(MapError::NoLevels);
        }
        let levels = layouts
            .iter()
            .enumerate()
            .map(|(level, text)| parse_level(level, text.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            levels,
            active: None,
        })
    }

    pub fn levels(&self) -> &[GridLevel] {
        &self.levels
    }
}

fn parse_level(level: usize, text: &str) -> Result<GridLevel, MapError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let Some(first) = lines.first() else {
        return Err(MapError::EmptyLevel { level });
    };
    let columns = first.chars().count();

    let mut rows = Vec::with_capacity(lines.len());
    for (row, line) in lines.iter().enumerate() {
        let found = line.chars().count();
        if found != columns {
            return Err(MapError::RaggedRow {
                level,
                row,
                expected: columns,
                found,
            });
        }
        let tiles = line
            .chars()
            .enumerate()
            .map(|(column, glyph)| {
                Tile::from_glyph(glyph).ok_or(MapError::UnknownTile {
                    level,
                    row,
                    column,
                    glyph,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(tiles);
    }

    let grid = GridLevel { columns, rows };
    let count = |tile: Tile| grid.tiles().filter(|&(_, _, t)| t == tile).count();
    match count(Tile::PlayerSpawn) {
        0 => return Err(MapError::MissingPlayerSpawn { level }),
        1 => {}
        _ => return Err(MapError::DuplicatePlayerSpawn { level }),
    }
    if count(Tile::Home) == 0 {
        return Err(MapError::MissingHome { level });
    }
    if count(Tile::EnemySpawn) == 0 {
        return Err(MapError::MissingEnemySpawn { level });
    }
    Ok(grid)
}

/// Tank-sized rectangle centred in a tile.
fn tank_bounds(tile: &Bounds) -> Bounds {
    Bounds::from_center(tile.center(), tile.size * TANK_TILE_FRACTION)
}

impl MapProvider for GridMap {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn populate(&mut self, level: usize, arena: Bounds) -> LevelLayout {
        assert!(level < self.levels.len(), "level {level} out of range");
        let grid = &self.levels[level];
        let tile_size = Vec2::new(
            arena.size.x / grid.columns() as f32,
            arena.size.y / grid.rows() as f32,
        );

        let mut entities = Vec::new();
        let mut player_spawn = None;
        let mut enemy_spawns = Vec::new();
        let mut home = None;

        for (row, column, tile) in grid.tiles() {
            let min = arena.min + Vec2::new(column as f32, row as f32) * tile_size;
            let bounds = Bounds {
                min,
                size: tile_size,
            };
            match tile {
                Tile::Empty => {}
                Tile::Steel => {
                    entities.push(EntityBlueprint::obstacle(ObstacleKind::Steel, bounds))
                }
                Tile::Home => {
                    home.get_or_insert(bounds.center());
                    entities.push(EntityBlueprint::obstacle(ObstacleKind::Home, bounds));
                }
                Tile::PlayerSpawn => player_spawn = Some(tank_bounds(&bounds)),
                Tile::EnemySpawn => enemy_spawns.push(tank_bounds(&bounds)),
            }
        }

        // Validated on parse.
        let player_spawn = player_spawn.unwrap_or_default();
        debug!(
            "populated level {level}: {} obstacles, {} enemy spawn points",
            entities.len(),
            enemy_spawns.len()
        );

        self.active = Some(ActiveLevel {
            player_spawn,
            enemy_spawns,
            home,
            next_spawn_secs: ENEMY_FIRST_SPAWN_SECS,
        });

        LevelLayout {
            player: EntityBlueprint::player_tank(player_spawn),
            entities,
        }
    }

    fn try_spawn_enemy(&mut self, ctx: SpawnContext<'_>) -> Option<EntityBlueprint> {
        let active = self.active.as_mut()?;
        if ctx.level_elapsed_secs < active.next_spawn_secs || ctx.live_enemies >= MAX_LIVE_ENEMIES {
            return None;
        }

        let free: Vec<&Bounds> = active
            .enemy_spawns
            .iter()
            .filter(|spawn| !ctx.occupied.iter().any(|o| o.intersects(spawn)))
            .collect();
        if free.is_empty() {
            return None;
        }

        let spawn = *free[ctx.rng.gen_range(0..free.len())];
        active.next_spawn_secs = ctx.level_elapsed_secs + ENEMY_SPAWN_INTERVAL_SECS;

        let heading = active
            .home
            .and_then(|home| Direction::toward(spawn.center(), home))
            .unwrap_or(Direction::Down);
        Some(EntityBlueprint::enemy_tank(spawn, heading))
    }

    fn respawn_player(&mut self) -> EntityBlueprint {
        match &self.active {
            Some(active) => EntityBlueprint::player_tank(active.player_spawn),
            None => panic!("respawn_player called before any level was populated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homefront_core::enums::Category;
    use rand::SeedableRng;

    const SMALL: &str = "\
E..E
.#..
.PH.
";

    fn arena() -> Bounds {
        Bounds::new(0.0, 0.0, 400.0, 300.0)
    }

    #[test]
    fn test_campaign_parses() {
        let map = GridMap::campaign();
        assert_eq!(map.level_count(), 3);
        for level in map.levels() {
            assert_eq!(level.columns(), 13);
            assert_eq!(level.rows(), 13);
        }
    }

    #[test]
    fn test_parse_splits_levels_on_blank_lines() {
        let text = format!("{SMALL}\n\n{SMALL}\n   \n{SMALL}");
        let map = GridMap::parse(&text).unwrap();
        assert_eq!(map.level_count(), 3);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(GridMap::parse("\n\n").unwrap_err(), MapError::NoLevels);
        assert_eq!(
            GridMap::parse("E..\n.P\n..H").unwrap_err(),
            MapError::RaggedRow {
                level: 0,
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            GridMap::parse("EPX\n..H").unwrap_err(),
            MapError::UnknownTile {
                level: 0,
                row: 0,
                column: 2,
                glyph: 'X'
            }
        );
        assert_eq!(
            GridMap::parse("E..\n..H").unwrap_err(),
            MapError::MissingPlayerSpawn { level: 0 }
        );
        assert_eq!(
            GridMap::parse("EPP\n..H").unwrap_err(),
            MapError::DuplicatePlayerSpawn { level: 0 }
        );
        assert_eq!(
            GridMap::parse("EP.\n...").unwrap_err(),
            MapError::MissingHome { level: 0 }
        );
        assert_eq!(
            GridMap::parse(&format!("{SMALL}\n\n..P\n..H")).unwrap_err(),
            MapError::MissingEnemySpawn { level: 1 }
        );
        assert_eq!(
            GridMap::from_layouts::<&str>(&[]).unwrap_err(),
            MapError::NoLevels
        );
    }

    #[test]
    fn test_populate_scales_tiles_to_arena() {
        let mut map = GridMap::parse(SMALL).unwrap();
        let layout = map.populate(0, arena());

        // One steel, one home.
        assert_eq!(layout.entities.len(), 2);
        assert!(layout.entities.iter().all(|e| e.category == Category::Obstacle));
        assert_eq!(layout.entities[0].bounds, Bounds::new(100.0, 100.0, 100.0, 100.0));

        let player = layout.player.bounds;
        assert_eq!(player.center(), Vec2::new(150.0, 250.0));
        assert_eq!(player.size, Vec2::new(80.0, 80.0));
    }

    #[test]
    fn test_spawn_cadence() {
        let mut map = GridMap::parse(SMALL).unwrap();
        map.populate(0, arena());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        fn ctx(elapsed: f64, live: usize, rng: &mut ChaCha8Rng) -> SpawnContext<'_> {
            SpawnContext {
                level: 0,
                level_elapsed_secs: elapsed,
                live_enemies: live,
                occupied: &[],
                rng,
            }
        }

        assert!(map.try_spawn_enemy(ctx(0.5, 0, &mut rng)).is_none(), "too early");
        let first = map.try_spawn_enemy(ctx(1.0, 0, &mut rng)).unwrap();
        assert_eq!(first.category, Category::EnemyTank);
        assert!(map.try_spawn_enemy(ctx(2.0, 1, &mut rng)).is_none(), "interval not elapsed");
        assert!(map
            .try_spawn_enemy(ctx(1.0 + ENEMY_SPAWN_INTERVAL_SECS, 1, &mut rng))
            .is_some());
        assert!(map
            .try_spawn_enemy(ctx(100.0, MAX_LIVE_ENEMIES, &mut rng))
            .is_none(), "enemy cap reached");
    }

    #[test]
    fn test_spawn_skips_occupied_points() {
        let mut map = GridMap::parse(SMALL).unwrap();
        map.populate(0, arena());
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        // Both spawn points blocked.
        let occupied = [Bounds::new(0.0, 0.0, 100.0, 100.0), Bounds::new(300.0, 0.0, 100.0, 100.0)];
        let blocked = map.try_spawn_enemy(SpawnContext {
            level: 0,
            level_elapsed_secs: 5.0,
            live_enemies: 0,
            occupied: &occupied,
            rng: &mut rng,
        });
        assert!(blocked.is_none());

        // Only the left one blocked.
        let spawned = map
            .try_spawn_enemy(SpawnContext {
                level: 0,
                level_elapsed_secs: 5.0,
                live_enemies: 0,
                occupied: &occupied[..1],
                rng: &mut rng,
            })
            .unwrap();
        assert!(spawned.bounds.min.x > 300.0);
    }

    #[test]
    fn test_enemy_faces_home_on_spawn() {
        let mut map = GridMap::parse("E....\n.....\n..H.P").unwrap();
        map.populate(0, Bounds::new(0.0, 0.0, 500.0, 300.0));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let enemy = map
            .try_spawn_enemy(SpawnContext {
                level: 0,
                level_elapsed_secs: 1.0,
                live_enemies: 0,
                occupied: &[],
                rng: &mut rng,
            })
            .unwrap();
        // Home is two tiles right and two down; ties go vertical.
        match enemy.behavior {
            crate::world_setup::Behavior::Tank(tank) => assert_eq!(tank.heading, Direction::Down),
            other => panic!("expected a tank, got {other:?}"),
        }
    }

    #[test]
    fn test_respawn_uses_player_spawn() {
        let mut map = GridMap::parse(SMALL).unwrap();
        let layout = map.populate(0, arena());
        let again = map.respawn_player();
        assert_eq!(again.bounds, layout.player.bounds);
        assert_eq!(again.category, Category::PlayerTank);
    }
}
