//! Roaming obstacles: a degenerate one-rule flock that agents steer around

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::entity::body::{Behavior, Body};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Body,
    /// Agents closer than this are pushed away
    pub avoidance_radius: f32,
    /// Roam blend weight, fixed at construction. Kept here rather than read back out of
    /// `body.behavior`, which is public and only describes the body.
    jitter_weight: f32,
}

impl Obstacle {
    pub fn new(position: Vec2, avoidance_radius: f32, max_speed: f32, jitter_weight: f32) -> Self {
        let body = Body::new(position, Behavior::Roaming { jitter_weight })
            .with_limits(max_speed, 0.0);
        Self {
            body,
            avoidance_radius,
            jitter_weight,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn jitter_weight(&self) -> f32 {
        self.jitter_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_roams() {
        let obstacle = Obstacle::new(Vec2::new(2.0, -1.0), 4.0, 1.0, 0.1);
        assert_eq!(obstacle.position(), Vec2::new(2.0, -1.0));
        assert_eq!(obstacle.jitter_weight(), 0.1);
        assert_eq!(obstacle.body.max_speed, 1.0);
        assert_eq!(obstacle.body.flock(), None);
    }

    #[test]
    fn test_jitter_weight_survives_behavior_edit() {
        let mut obstacle = Obstacle::new(Vec2::ZERO, 1.0, 1.0, 0.25);
        obstacle.body.behavior = Behavior::Flocking {
            flock: crate::core::types::FlockId(0),
        };
        assert_eq!(obstacle.jitter_weight(), 0.25);
    }
}
