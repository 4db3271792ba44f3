//! Enemy patrol finite state machine.
//!
//! Pure functions that compute phase transitions, headings and fire
//! decisions for enemy tanks. Randomness comes from the caller's RNG so
//! the simulation stays deterministic per seed.
//! No ECS dependency: operates on plain data.

use glam::Vec2;
use rand::Rng;

use homefront_core::constants::*;
use homefront_core::enums::{Direction, PatrolPhase};

/// Input to the patrol FSM for a single tank.
pub struct PatrolContext {
    pub phase: PatrolPhase,
    pub heading: Direction,
    /// Tank centre.
    pub position: Vec2,
    /// Centre of the home structure, if one still stands.
    pub home: Option<Vec2>,
    /// The tank bumped into something since the last evaluation.
    pub blocked: bool,
    pub elapsed_in_phase_secs: f64,
}

/// Output from the patrol FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolUpdate {
    pub new_phase: PatrolPhase,
    pub heading: Direction,
    pub moving: bool,
    pub fire: bool,
    /// The phase (or patrol leg) restarted; its clock goes back to zero.
    pub phase_changed: bool,
}

/// Evaluate the FSM for one enemy tank.
pub fn evaluate<R: Rng>(ctx: &PatrolContext, rng: &mut R) -> PatrolUpdate {
    match ctx.phase {
        PatrolPhase::Advance => evaluate_advance(ctx, rng),
        PatrolPhase::Reorient => evaluate_reorient(ctx, rng),
    }
}

fn evaluate_advance<R: Rng>(ctx: &PatrolContext, rng: &mut R) -> PatrolUpdate {
    // Stuck against something: stop, but shoot at it.
    if ctx.blocked {
        return PatrolUpdate {
            new_phase: PatrolPhase::Reorient,
            heading: ctx.heading,
            moving: false,
            fire: rng.gen_bool(ENEMY_FIRE_CHANCE),
            phase_changed: true,
        };
    }

    let fire = rng.gen_bool(ENEMY_FIRE_CHANCE);

    if ctx.elapsed_in_phase_secs >= ENEMY_LEG_SECS && rng.gen_bool(ENEMY_TURN_CHANCE) {
        return PatrolUpdate {
            new_phase: PatrolPhase::Advance,
            heading: pick_heading(ctx, rng),
            moving: true,
            fire,
            phase_changed: true,
        };
    }

    PatrolUpdate {
        new_phase: PatrolPhase::Advance,
        heading: ctx.heading,
        moving: true,
        fire,
        phase_changed: false,
    }
}

fn evaluate_reorient<R: Rng>(ctx: &PatrolContext, rng: &mut R) -> PatrolUpdate {
    if ctx.elapsed_in_phase_secs >= ENEMY_REORIENT_SECS {
        return PatrolUpdate {
            new_phase: PatrolPhase::Advance,
            heading: pick_heading(ctx, rng),
            moving: true,
            fire: false,
            phase_changed: true,
        };
    }

    PatrolUpdate {
        new_phase: PatrolPhase::Reorient,
        heading: ctx.heading,
        moving: false,
        fire: false,
        phase_changed: false,
    }
}

/// Pick a new heading different from the current one, leaning toward the
/// home structure when there is one.
pub fn pick_heading<R: Rng>(ctx: &PatrolContext, rng: &mut R) -> Direction {
    let homeward = ctx
        .home
        .and_then(|home| Direction::toward(ctx.position, home))
        .filter(|&d| d != ctx.heading);

    if let Some(direction) = homeward {
        if rng.gen_bool(ENEMY_HOME_BIAS) {
            return direction;
        }
    }

    let choices: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&d| d != ctx.heading)
        .collect();
    choices[rng.gen_range(0..choices.len())]
}
