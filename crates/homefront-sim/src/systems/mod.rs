//! ECS systems that advance or read the simulation each tick.

pub mod movement;
pub mod snapshot;
pub mod tank_ai;
