//! Steering rules and the tick entry points that drive them
//!
//! Rules only write target headings and speeds; `motion` turns those into movement.

pub mod avoidance;
pub mod boundary;
pub mod flocking;
pub mod jitter;
pub mod motion;
pub mod predator;
pub mod schedule;
pub mod tick;

pub use boundary::BoundaryPolicy;
pub use flocking::{run_flocking, steer_agent, AgentSample, FlockingSteer};
pub use schedule::{DueTicks, Simulation, StepReport, TickClock};
pub use tick::{
    tick_boundaries, tick_flocking, tick_frame_steering, tick_obstacle_roam, tick_per_frame,
    tick_random, TickReport,
};
