//! Game status state machine.
//!
//! `Waiting → Playing → {Between, ToLose} → Playing | Lost | Win`.
//! Timers for the timed phases live inside the phase variant, so leaving
//! a phase drops its timer and re-entering starts from zero. `ToLose` is
//! the one exception: entering it while already in it keeps the timer.

use log::info;

use homefront_core::constants::{BETWEEN_LEVEL_DELAY_SECS, TO_LOSE_DELAY_SECS};
use homefront_core::enums::{GameStatus, LossCause};

/// Current phase, with the timer the phase owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Waiting,
    Playing,
    Between { elapsed_secs: f64 },
    ToLose { cause: LossCause, elapsed_secs: f64 },
    Lost { cause: LossCause },
    Win,
}

impl Phase {
    pub fn status(&self) -> GameStatus {
        match self {
            Phase::Waiting => GameStatus::Waiting,
            Phase::Playing => GameStatus::Playing,
            Phase::Between { .. } => GameStatus::Between,
            Phase::ToLose { .. } => GameStatus::ToLose,
            Phase::Lost { .. } => GameStatus::Lost,
            Phase::Win => GameStatus::Win,
        }
    }
}

/// Facts the machine needs from the rest of the game for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInput {
    pub lives: u32,
    /// The level clock has run past the level duration.
    pub level_expired: bool,
    pub final_level: bool,
}

/// What the engine should do this tick. Only `Simulate` runs the
/// update/collide/prune sequence; every other action ends the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Waiting or terminal: nothing happens.
    Idle,
    /// Lives ran out; now in `ToLose`.
    LivesExhausted,
    /// Final level timer ran out; now in `Win`.
    Won,
    /// A non-final level timer ran out; now in `Between`.
    LevelCleared,
    /// Between levels, delay still running.
    Paused,
    /// Between-level delay elapsed; rebuild the next level, now `Playing`.
    NextLevel,
    /// Grace delay elapsed; now in `Lost`.
    Lost,
    /// Run the simulation sequence.
    Simulate,
}

/// Decide the action for one tick, short-circuiting in priority order.
/// Pure: the caller applies the returned phase.
pub fn next_action(phase: Phase, dt: f64, input: TickInput) -> (Phase, TickAction) {
    let running = phase.status().is_running();
    if !running {
        return (phase, TickAction::Idle);
    }

    // Lives pre-empt everything else.
    if input.lives == 0 && !matches!(phase, Phase::ToLose { .. }) {
        let next = Phase::ToLose {
            cause: LossCause::LivesExhausted,
            elapsed_secs: 0.0,
        };
        return (next, TickAction::LivesExhausted);
    }

    match phase {
        Phase::Playing if input.level_expired => {
            if input.final_level {
                (Phase::Win, TickAction::Won)
            } else {
                (Phase::Between { elapsed_secs: 0.0 }, TickAction::LevelCleared)
            }
        }
        Phase::Between { elapsed_secs } => {
            let elapsed_secs = elapsed_secs + dt;
            if elapsed_secs >= BETWEEN_LEVEL_DELAY_SECS {
                (Phase::Playing, TickAction::NextLevel)
            } else {
                (Phase::Between { elapsed_secs }, TickAction::Paused)
            }
        }
        Phase::ToLose {
            cause,
            elapsed_secs,
        } => {
            let elapsed_secs = elapsed_secs + dt;
            if elapsed_secs >= TO_LOSE_DELAY_SECS {
                (Phase::Lost { cause }, TickAction::Lost)
            } else {
                (Phase::ToLose { cause, elapsed_secs }, TickAction::Simulate)
            }
        }
        other => (other, TickAction::Simulate),
    }
}

/// Owner of the current phase.
#[derive(Debug, Clone)]
pub struct StatusMachine {
    phase: Phase,
}

impl Default for StatusMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Waiting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> GameStatus {
        self.phase.status()
    }

    /// Why the game is being lost or was lost.
    pub fn loss_cause(&self) -> Option<LossCause> {
        match self.phase {
            Phase::ToLose { cause, .. } | Phase::Lost { cause } => Some(cause),
            _ => None,
        }
    }

    /// Lives and score only change while playing.
    pub fn accepts_tallies(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Enter `Playing` from any phase.
    pub fn start(&mut self) {
        info!("status {:?} -> Playing (start)", self.status());
        self.phase = Phase::Playing;
    }

    /// Request `ToLose`. Idempotent: a second request keeps the running
    /// timer and the first cause. Ignored outside running phases.
    pub fn enter_to_lose(&mut self, cause: LossCause) {
        match self.phase {
            Phase::ToLose { .. } => {}
            Phase::Playing | Phase::Between { .. } => {
                info!("status {:?} -> ToLose ({cause:?})", self.status());
                self.phase = Phase::ToLose {
                    cause,
                    elapsed_secs: 0.0,
                };
            }
            _ => {}
        }
    }

    /// Advance one tick and return what the engine should do.
    pub fn tick(&mut self, dt: f64, input: TickInput) -> TickAction {
        let before = self.status();
        let (phase, action) = next_action(self.phase, dt, input);

        if action == TickAction::LivesExhausted {
            assert_eq!(input.lives, 0, "lives-exhausted loss with lives left");
        }
        if action == TickAction::Won {
            assert!(input.final_level, "win before the final level");
        }

        self.phase = phase;
        if self.status() != before {
            info!("status {before:?} -> {:?} ({action:?})", self.status());
        }
        action
    }
}
