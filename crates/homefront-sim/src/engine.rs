//! Simulation engine: the per-tick orchestrator.
//!
//! `SimulationEngine` owns the status machine, the entity registry and the
//! level controller, applies player commands, and produces one
//! `GameStateSnapshot` per step. Completely headless and deterministic per
//! seed.

use std::collections::VecDeque;

use hecs::Entity;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use homefront_core::commands::PlayerCommand;
use homefront_core::components::{ObstacleState, TankState};
use homefront_core::constants::*;
use homefront_core::enums::{Category, GameStatus, LossCause, ObstacleKind};
use homefront_core::events::GameEvent;
use homefront_core::state::{GameStateSnapshot, HudView};
use homefront_core::types::{Bounds, EntityId, SimTime};

use crate::collision;
use crate::level::LevelController;
use crate::map::MapProvider;
use crate::registry::{EntityRegistry, PruneReport, UpdateContext};
use crate::status::{StatusMachine, TickAction, TickInput};
use crate::systems::snapshot::{self, SnapshotHeader};

/// Configuration for a simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Ticks per second used by `tick()`.
    pub tick_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
        }
    }
}

impl SimConfig {
    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate.max(1) as f64
    }
}

/// What `start` built.
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub arena: Bounds,
    pub level: usize,
    pub level_count: usize,
    pub player: EntityId,
}

/// The simulation engine. Owns all game state.
pub struct SimulationEngine {
    config: SimConfig,
    time: SimTime,
    status: StatusMachine,
    registry: EntityRegistry,
    levels: LevelController,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    lives: u32,
    score: u32,
    /// Seconds since the last player death, while inside the grace window.
    since_death_secs: Option<f64>,
}

impl SimulationEngine {
    pub fn new(config: SimConfig, provider: impl MapProvider + Send + 'static) -> Self {
        Self {
            config,
            time: SimTime::default(),
            status: StatusMachine::new(),
            registry: EntityRegistry::new(),
            levels: LevelController::new(Box::new(provider)),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            lives: INITIAL_LIVES,
            score: 0,
            since_death_secs: None,
        }
    }

    /// Reset everything and begin level 0 in an arena of the given size.
    /// Valid from any status.
    pub fn start(&mut self, width: f32, height: f32) -> Scene {
        let arena = Bounds::new(0.0, 0.0, width, height);
        info!("starting game in {width}x{height} arena (seed {})", self.config.seed);

        self.time = SimTime::default();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.command_queue.clear();
        self.events.clear();
        self.lives = INITIAL_LIVES;
        self.score = 0;
        self.since_death_secs = None;

        self.levels.set_arena(arena);
        let player = self.levels.build_level(0, &mut self.registry);
        self.status.start();
        self.events.push(GameEvent::LevelStarted { level: 0 });

        Scene {
            arena,
            level: 0,
            level_count: self.levels.level_count(),
            player: snapshot::entity_id(player),
        }
    }

    /// Queue a player command for processing at the next step.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance by one tick of the configured rate.
    pub fn tick(&mut self) -> GameStateSnapshot {
        let dt = self.config.dt();
        self.step(dt)
    }

    /// Advance the simulation by `dt` seconds and return the snapshot.
    pub fn step(&mut self, dt: f64) -> GameStateSnapshot {
        if self.status().is_running() {
            self.advance_grace(dt);
            self.process_commands();
        } else {
            self.command_queue.clear();
        }

        let action = self.status.tick(
            dt,
            TickInput {
                lives: self.lives,
                level_expired: self.levels.is_expired(),
                final_level: self.levels.is_final_level(),
            },
        );

        match action {
            TickAction::Idle | TickAction::Paused | TickAction::LivesExhausted => {}
            TickAction::Won => {
                info!("final level survived, score {}", self.score);
                self.events.push(GameEvent::GameWon { score: self.score });
            }
            TickAction::LevelCleared => {
                info!("level {} cleared, score {}", self.levels.level(), self.score);
                self.events.push(GameEvent::LevelCleared {
                    level: self.levels.level(),
                    score: self.score,
                });
            }
            TickAction::NextLevel => {
                self.levels.advance_level(&mut self.registry);
                self.since_death_secs = None;
                self.events.push(GameEvent::LevelStarted {
                    level: self.levels.level(),
                });
            }
            TickAction::Lost => {
                let cause = self.status.loss_cause().unwrap_or(LossCause::LivesExhausted);
                info!("game lost ({cause:?}), score {}", self.score);
                self.events.push(GameEvent::GameLost {
                    cause,
                    score: self.score,
                });
            }
            TickAction::Simulate => self.simulate(dt),
        }

        if action != TickAction::Idle {
            self.time.advance(dt);
        }

        let events = std::mem::take(&mut self.events);
        snapshot::build_snapshot(&self.registry, self.header(), events)
    }

    /// Snapshot of the current state without advancing it.
    pub fn snapshot(&self) -> GameStateSnapshot {
        snapshot::build_snapshot(&self.registry, self.header(), Vec::new())
    }

    pub fn status(&self) -> GameStatus {
        self.status.status()
    }

    pub fn loss_cause(&self) -> Option<LossCause> {
        self.status.loss_cause()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Zero-based index of the current level.
    pub fn level(&self) -> usize {
        self.levels.level()
    }

    pub fn level_count(&self) -> usize {
        self.levels.level_count()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> SimConfig {
        self.config
    }

    /// Current player tank.
    pub fn player(&self) -> Option<Entity> {
        self.levels.player()
    }

    /// Read-only access to the entity registry.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    #[cfg(test)]
    pub(crate) fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    #[cfg(test)]
    pub(crate) fn level_controller_mut(&mut self) -> &mut LevelController {
        &mut self.levels
    }

    fn header(&self) -> SnapshotHeader {
        SnapshotHeader {
            time: self.time,
            status: self.status(),
            loss_cause: self.status.loss_cause(),
            level: self.levels.level(),
            level_count: self.levels.level_count(),
            hud: HudView {
                lives: self.lives,
                score: self.score,
                time_remaining_secs: self.levels.time_remaining_secs(),
            },
        }
    }

    fn advance_grace(&mut self, dt: f64) {
        if let Some(elapsed) = self.since_death_secs.as_mut() {
            *elapsed += dt;
            if *elapsed >= DEATH_GRACE_SECS {
                self.since_death_secs = None;
            }
        }
    }

    fn in_death_grace(&self) -> bool {
        self.since_death_secs.is_some()
    }

    /// Apply all queued commands, or drop them inside the death grace window.
    fn process_commands(&mut self) {
        if self.in_death_grace() {
            if !self.command_queue.is_empty() {
                debug!(
                    "dropping {} command(s) inside death grace window",
                    self.command_queue.len()
                );
                self.command_queue.clear();
            }
            return;
        }
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Move { direction } => {
                if let Some(mut tank) = self.player_tank() {
                    tank.heading = direction;
                    tank.moving = true;
                }
            }
            PlayerCommand::Fire => {
                if let Some(mut tank) = self.player_tank() {
                    tank.fire_requested = true;
                }
            }
            PlayerCommand::ClearEnemies => {
                let removed = self.registry.remove_category(Category::EnemyTank);
                debug!("cheat: cleared {removed} enemy tank(s)");
            }
            PlayerCommand::GrantInvulnerability => {
                if let Some(mut tank) = self.player_tank() {
                    tank.invulnerable_secs = CHEAT_INVULNERABILITY_SECS;
                    debug!("cheat: player invulnerable for {CHEAT_INVULNERABILITY_SECS}s");
                }
            }
            PlayerCommand::GrantLife => {
                if self.status.accepts_tallies() {
                    self.lives += 1;
                    debug!("cheat: lives now {}", self.lives);
                } else {
                    warn!("extra life ignored in {:?}", self.status());
                }
            }
        }
    }

    /// The live player tank's state, if there is one.
    fn player_tank(&mut self) -> Option<hecs::RefMut<'_, TankState>> {
        let player = self.levels.player()?;
        if !self.registry.is_alive(player) {
            warn!("command ignored: no live player tank");
            return None;
        }
        self.registry.tank_mut(player)
    }

    /// Update, collide, prune, then spawn.
    fn simulate(&mut self, dt: f64) {
        let ctx = UpdateContext {
            arena: self.levels.arena(),
            home: self.registry.home_center(),
        };
        self.registry.update(dt, &ctx, &mut self.rng, &mut self.events);

        collision::detect(&mut self.registry);

        let report = self.registry.prune();
        if !report.is_empty() {
            self.apply_prune(&report);
        }

        if self.status() == GameStatus::Playing {
            self.levels.advance_clock(dt);
            if let Some(enemy) = self.levels.spawn_enemy_if_due(&mut self.registry, &mut self.rng) {
                self.events.push(GameEvent::EnemySpawned {
                    id: snapshot::entity_id(enemy),
                });
            }
        }
    }

    /// Apply lives, score, respawn and loss side effects of a prune.
    fn apply_prune(&mut self, report: &PruneReport) {
        let tallies = self.status.accepts_tallies();

        // Every removed player tank is replaced; only a death while playing
        // costs a life.
        for _ in 0..report.player_tanks {
            if tallies {
                self.lives = self.lives.saturating_sub(1);
                self.since_death_secs = Some(0.0);
                debug!("player destroyed, {} lives left", self.lives);
                self.events.push(GameEvent::PlayerDestroyed {
                    lives_left: self.lives,
                });
            } else {
                debug!("player destroyed in {:?}, no life spent", self.status());
            }
            let player = self.levels.revive_player(&mut self.registry);
            self.events.push(GameEvent::PlayerRespawned {
                id: snapshot::entity_id(player),
            });
        }

        if tallies {
            for _ in 0..report.enemy_tanks {
                self.score += SCORE_UNIT;
                self.events.push(GameEvent::EnemyDestroyed { score: self.score });
            }
            if report.enemy_tanks > 0 {
                debug!("{} enemy tank(s) destroyed, score {}", report.enemy_tanks, self.score);
            }
        }

        for &obstacle in &report.obstacles_destroyed {
            let kind = self
                .registry
                .world()
                .get::<&ObstacleState>(obstacle)
                .map(|o| o.kind)
                .ok();
            if kind == Some(ObstacleKind::Home) {
                info!("home destroyed");
                self.events.push(GameEvent::HomeDestroyed);
                self.status.enter_to_lose(LossCause::HomeDestroyed);
            }
        }

        if self.lives == 0 {
            self.status.enter_to_lose(LossCause::LivesExhausted);
        }
    }
}
