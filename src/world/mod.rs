//! Simulation world and scenario setup

pub mod flock_world;
pub mod setup;

pub use flock_world::{TickCounters, World};
