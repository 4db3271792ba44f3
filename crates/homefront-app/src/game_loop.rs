//! Game loop thread: runs the simulation engine at a fixed tick and
//! publishes snapshots.
//!
//! The engine is moved into the thread and owned there exclusively.
//! Commands arrive via an `mpsc` channel; the latest snapshot is kept in
//! shared state for polling and the final one is returned on join.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Instant;

use log::{debug, info};

use homefront_core::state::GameStateSnapshot;
use homefront_sim::engine::SimulationEngine;
use homefront_sim::systems::snapshot::entity_id;

use crate::autopilot::Autopilot;
use crate::state::{GameLoopCommand, LoopSettings, SharedSnapshot};

/// Handle to a running game loop.
pub struct GameLoopHandle {
    pub commands: mpsc::Sender<GameLoopCommand>,
    pub latest_snapshot: SharedSnapshot,
    thread: JoinHandle<Option<GameStateSnapshot>>,
}

impl GameLoopHandle {
    /// Wait for the loop to finish and return its last snapshot.
    pub fn join(self) -> Option<GameStateSnapshot> {
        self.thread.join().ok().flatten()
    }
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    settings: LoopSettings,
    observer: Option<Box<dyn FnMut(&GameStateSnapshot) + Send>>,
) -> io::Result<GameLoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot = SharedSnapshot::default();
    let shared = latest_snapshot.clone();

    let thread = std::thread::Builder::new()
        .name("homefront-game-loop".into())
        .spawn(move || run_game_loop(engine, settings, cmd_rx, &shared, observer))?;

    Ok(GameLoopHandle {
        commands: cmd_tx,
        latest_snapshot,
        thread,
    })
}

/// The game loop. Runs until Shutdown, channel disconnect, the tick limit,
/// or (when configured) the end of the game.
fn run_game_loop(
    mut engine: SimulationEngine,
    settings: LoopSettings,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &SharedSnapshot,
    mut observer: Option<Box<dyn FnMut(&GameStateSnapshot) + Send>>,
) -> Option<GameStateSnapshot> {
    let mut autopilot = settings.autopilot.then(Autopilot::new);
    let mut last: Option<GameStateSnapshot> = None;
    let mut next_tick_time = Instant::now();
    let mut ticks = 0u64;

    while ticks < settings.max_ticks {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Start { width, height }) => {
                    engine.start(width, height);
                }
                Ok(GameLoopCommand::Shutdown) => {
                    debug!("game loop shut down after {ticks} ticks");
                    return last;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return last,
            }
        }

        // 2. Autopilot input from the previous snapshot
        if let (Some(pilot), Some(snapshot)) = (autopilot.as_mut(), last.as_ref()) {
            let player = engine.player().map(entity_id);
            engine.queue_commands(pilot.commands(snapshot, player));
        }

        // 3. Advance one tick
        let snapshot = engine.tick();
        ticks += 1;

        if let Some(observe) = observer.as_mut() {
            observe(&snapshot);
        }
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        let over = snapshot.status.is_terminal();
        last = Some(snapshot);

        if over && settings.stop_when_over {
            info!("game over after {ticks} ticks: {:?}", engine.status());
            break;
        }

        // 4. Sleep until next tick
        if let Some(tick_duration) = settings.tick_duration {
            next_tick_time += tick_duration;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > tick_duration * 2 {
                // Too far behind: reset to avoid catch-up spiral
                next_tick_time = now;
            }
        }
    }
    last
}
