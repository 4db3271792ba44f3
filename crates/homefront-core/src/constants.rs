//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Session ---

/// Lives granted at the start of every game.
pub const INITIAL_LIVES: u32 = 3;

/// Score awarded for each enemy tank removed from play.
pub const SCORE_UNIT: u32 = 100;

/// Default arena edge length (the original window was square).
pub const DEFAULT_ARENA_SIZE: f32 = 680.0;

// --- Timers (seconds) ---

/// How long each level lasts before it is cleared.
pub const LEVEL_DURATION_SECS: f64 = 30.0;

/// Pause between a cleared level and the next one.
pub const BETWEEN_LEVEL_DELAY_SECS: f64 = 3.0;

/// Grace period held in `ToLose` before the game is lost.
pub const TO_LOSE_DELAY_SECS: f64 = 0.5;

/// Window after a player death during which input is ignored and the
/// replacement tank is invulnerable.
pub const DEATH_GRACE_SECS: f64 = 1.0;

/// Invulnerability granted by the cheat command.
pub const CHEAT_INVULNERABILITY_SECS: f64 = 10.0;

// --- Category masks ---
// Compatibility values. Interaction is authored as a per-pair table in the
// sim crate; these only have to agree with it.

pub const PLAYER_TANK_MASK: u8 = 1;
pub const ENEMY_TANK_MASK: u8 = 3;
pub const PLAYER_MISSILE_MASK: u8 = 6;
pub const ENEMY_MISSILE_MASK: u8 = 9;
pub const OBSTACLE_MASK: u8 = 15;

// --- Render order ---

pub const OBSTACLE_RENDER_PRIORITY: i32 = 0;
pub const TANK_RENDER_PRIORITY: i32 = 1;
pub const MISSILE_RENDER_PRIORITY: i32 = 2;

// --- Tanks ---

/// Player tank speed (world units per second).
pub const PLAYER_TANK_SPEED: f32 = 120.0;

/// Enemy tank speed (world units per second).
pub const ENEMY_TANK_SPEED: f32 = 80.0;

/// Minimum time between two player shots.
pub const PLAYER_FIRE_INTERVAL_SECS: f64 = 0.4;

/// Minimum time between two enemy shots.
pub const ENEMY_FIRE_INTERVAL_SECS: f64 = 1.5;

/// Fraction of a map tile occupied by a tank, so tanks fit through
/// one-tile corridors.
pub const TANK_TILE_FRACTION: f32 = 0.8;

// --- Missiles ---

/// Missile speed (world units per second).
pub const MISSILE_SPEED: f32 = 300.0;

/// Missile edge length.
pub const MISSILE_SIZE: f32 = 6.0;

/// Gap left between a tank's barrel edge and a freshly fired missile.
pub const MISSILE_MUZZLE_GAP: f32 = 1.0;

// --- Enemy spawning ---

/// Level time at which the first enemy may appear.
pub const ENEMY_FIRST_SPAWN_SECS: f64 = 1.0;

/// Time between two enemy spawns.
pub const ENEMY_SPAWN_INTERVAL_SECS: f64 = 4.0;

/// Upper bound on enemy tanks alive at once.
pub const MAX_LIVE_ENEMIES: usize = 4;

// --- Enemy patrol behaviour ---

/// Minimum length of a straight patrol leg.
pub const ENEMY_LEG_SECS: f64 = 2.0;

/// Per-tick chance to turn once the minimum leg is done.
pub const ENEMY_TURN_CHANCE: f64 = 0.02;

/// Time an enemy idles after bumping into something.
pub const ENEMY_REORIENT_SECS: f64 = 0.25;

/// Per-tick chance to pull the trigger.
pub const ENEMY_FIRE_CHANCE: f64 = 0.015;

/// Chance a new heading points toward the home structure.
pub const ENEMY_HOME_BIAS: f64 = 0.6;
