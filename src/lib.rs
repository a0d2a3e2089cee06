//! Murmuration - a boids flocking engine

pub mod command;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod spatial;
pub mod world;

pub use crate::command::{Command, Dispatcher};
pub use crate::core::{Bounds, FlockConfig, FlockError, FlockId, Result, ScenarioConfig, Vec2};
pub use crate::simulation::Simulation;
pub use crate::world::World;
