//! Obstacle avoidance through the obstacle spatial index

use crate::core::types::normalize_or_zero;
use crate::entity::{Flock, Obstacle};
use crate::spatial::SpatialIndex;

/// Push every agent away from the indexed obstacles whose avoidance radius it is inside.
///
/// `index` must have been built from `obstacles`' current positions. Candidates come from
/// the agent's own cell only. Returns the number of (agent, obstacle) pushes applied.
pub fn avoid_obstacles(
    flock: &mut Flock,
    obstacles: &[Obstacle],
    index: &SpatialIndex,
    query_radius: f32,
) -> usize {
    let (config, agents) = flock.split_mut();
    let weight = config.weight_avoid_obstacles;
    let mut pushes = 0;

    for agent in agents.iter_mut() {
        let position = agent.body.position;
        let mut heading = agent.body.target_heading;
        let mut pushed = false;

        for idx in index.neighbors(position, query_radius) {
            let Some(obstacle) = obstacles.get(idx) else {
                continue;
            };
            let dist = obstacle.position().distance(position);
            if dist < obstacle.avoidance_radius {
                heading += normalize_or_zero(position - obstacle.position()) * weight;
                pushed = true;
                pushes += 1;
            }
        }

        if pushed {
            agent.body.target_heading = normalize_or_zero(heading);
        }
    }

    pushes
}
