pub mod config;
pub mod error;
pub mod types;

pub use config::{FlockConfig, ScenarioConfig};
pub use error::{FlockError, Result};
pub use types::{Bounds, FlockId, Tick, Vec2};
