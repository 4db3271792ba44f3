//! Enemy tank steering: runs the patrol FSM for one tank and writes the
//! result back into its components.

use glam::Vec2;
use rand_chacha::ChaCha8Rng;

use homefront_core::components::{Patrol, TankState};
use homefront_core::types::Bounds;

use homefront_ai::fsm::{evaluate, PatrolContext};

/// Evaluate the patrol FSM and apply the update to `tank` and `patrol`.
pub fn steer(
    tank: &mut TankState,
    patrol: &mut Patrol,
    bounds: &Bounds,
    home: Option<Vec2>,
    dt: f64,
    rng: &mut ChaCha8Rng,
) {
    patrol.phase_elapsed_secs += dt;

    let ctx = PatrolContext {
        phase: patrol.phase,
        heading: tank.heading,
        position: bounds.center(),
        home,
        blocked: std::mem::take(&mut patrol.blocked),
        elapsed_in_phase_secs: patrol.phase_elapsed_secs,
    };

    let update = evaluate(&ctx, rng);
    if update.phase_changed {
        patrol.phase = update.new_phase;
        patrol.phase_elapsed_secs = 0.0;
    }
    tank.heading = update.heading;
    tank.moving = update.moving;
    tank.fire_requested |= update.fire;
}
