//! Enemy tank AI for HOMEFRONT.
//!
//! Implements the patrol state machine that decides where enemy tanks
//! drive and when they shoot.

pub mod fsm;

pub use homefront_core as core;
