//! Kinematic state shared by agents and obstacles

use serde::{Deserialize, Serialize};

use crate::core::types::{FlockId, Vec2};

/// Steering capability fixed when the body is created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Member of a flock; rule weights come from that flock's config
    Flocking { flock: FlockId },
    /// Random roam with a fixed jitter blend weight
    Roaming { jitter_weight: f32 },
}

/// Position and heading as seen by the host, plus the targets the rules write
///
/// Rules only ever write `target_heading` and `target_speed` (and `position` for wrap).
/// `heading` and `speed` belong to the host's motion integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    /// Current direction of travel (unit vector, or zero before the first move)
    pub heading: Vec2,
    pub speed: f32,
    pub target_heading: Vec2,
    pub target_speed: f32,
    pub max_speed: f32,
    /// Radians per second
    pub max_rotation_speed: f32,
    pub behavior: Behavior,
}

impl Body {
    pub fn new(position: Vec2, behavior: Behavior) -> Self {
        Self {
            position,
            heading: Vec2::ZERO,
            speed: 0.0,
            target_heading: Vec2::ZERO,
            target_speed: 0.0,
            max_speed: 0.0,
            max_rotation_speed: 0.0,
            behavior,
        }
    }

    pub fn with_limits(mut self, max_speed: f32, max_rotation_speed: f32) -> Self {
        self.max_speed = max_speed;
        self.max_rotation_speed = max_rotation_speed;
        self
    }

    pub fn with_heading(mut self, heading: Vec2) -> Self {
        self.heading = heading;
        self
    }

    pub fn flock(&self) -> Option<FlockId> {
        match self.behavior {
            Behavior::Flocking { flock } => Some(flock),
            Behavior::Roaming { .. } => None,
        }
    }
}
