pub mod body;
pub mod flock;
pub mod obstacle;

pub use body::{Behavior, Body};
pub use flock::{Agent, Flock};
pub use obstacle::Obstacle;
