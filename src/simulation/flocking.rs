//! Alignment, cohesion and separation over every pair of agents in a flock
//!
//! Each agent's steer is a pure function of a frozen snapshot taken at tick start, and
//! each agent writes only its own target heading. That makes the per-agent work safe to
//! fan out in fixed-size batches with rayon: batches share the snapshot read-only, and
//! the parallel iterator completing is the barrier before the next tick.

use rayon::prelude::*;

use crate::core::config::{EngineConfig, FlockConfig, SeparationDivisor};
use crate::core::types::{normalize_or_zero, Vec2};
use crate::entity::{Agent, Flock};

/// What the rule reads from another agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSample {
    pub position: Vec2,
    pub heading: Vec2,
    pub speed: f32,
}

impl From<&Agent> for AgentSample {
    fn from(agent: &Agent) -> Self {
        Self {
            position: agent.body.position,
            heading: agent.body.heading,
            speed: agent.body.speed,
        }
    }
}

/// Result of evaluating one agent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlockingSteer {
    /// Agents inside the visibility radius
    pub neighbor_count: usize,
    /// Agents inside the separation distance
    pub separation_count: usize,
    /// Mean neighbor heading, renormalized
    pub alignment_heading: Vec2,
    pub average_speed: f32,
    pub centroid: Vec2,
    pub separation_heading: Vec2,
    pub separation_speed: f32,
    /// Weighted contributions; zero when the rule is disabled or has no input
    pub alignment: Vec2,
    pub separation: Vec2,
    pub cohesion: Vec2,
}

impl FlockingSteer {
    pub fn combined(&self) -> Vec2 {
        self.alignment + self.separation + self.cohesion
    }

    /// Unit heading, or zero when the three terms cancel or are all absent
    pub fn target_heading(&self) -> Vec2 {
        normalize_or_zero(self.combined())
    }
}

/// Evaluate agent `i` against every other agent in `snapshot`
pub fn steer_agent(
    i: usize,
    snapshot: &[AgentSample],
    config: &FlockConfig,
    divisor: SeparationDivisor,
) -> FlockingSteer {
    let current = snapshot[i];

    let mut speed_sum = 0.0;
    let mut heading_sum = Vec2::ZERO;
    let mut position_sum = Vec2::ZERO;
    let mut count = 0usize;

    let mut separation_dir = Vec2::ZERO;
    let mut separation_speed = 0.0;
    let mut separation_count = 0usize;

    for (j, other) in snapshot.iter().enumerate() {
        if i == j {
            continue;
        }
        let dist = current.position.distance(other.position);

        if dist < config.visibility {
            speed_sum += other.speed;
            heading_sum += other.heading;
            position_sum += other.position;
            count += 1;
        }

        if dist < config.separation_distance {
            separation_dir += normalize_or_zero(current.position - other.position);
            separation_speed += dist * config.weight_separation;
            separation_count += 1;
        }
    }

    let mut steer = FlockingSteer {
        neighbor_count: count,
        separation_count,
        ..FlockingSteer::default()
    };

    if count > 0 {
        let n = count as f32;
        steer.average_speed = speed_sum / n;
        steer.alignment_heading = normalize_or_zero(heading_sum / n);
        steer.centroid = position_sum / n;
    }

    let separation_n = match divisor {
        SeparationDivisor::SeparationCount => separation_count,
        SeparationDivisor::NeighborCount => count,
    };
    if separation_count > 0 {
        if separation_n > 0 {
            separation_speed /= separation_n as f32;
        }
        if separation_speed != 0.0 {
            separation_dir /= separation_speed;
        }
        steer.separation_heading = normalize_or_zero(separation_dir);
        steer.separation_speed = separation_speed;
    }

    if config.use_alignment_rule {
        steer.alignment = steer.alignment_heading * steer.average_speed * config.weight_alignment;
    }
    if config.use_separation_rule {
        steer.separation =
            steer.separation_heading * steer.separation_speed * config.weight_separation;
    }
    if config.use_cohesion_rule && count > 0 {
        steer.cohesion = (steer.centroid - current.position) * config.weight_cohesion;
    }

    steer
}

/// Snapshot the flock, evaluate every agent in batches and write target headings.
///
/// Returns the number of neighbor contributions seen (visibility plus separation hits).
pub fn run_flocking(flock: &mut Flock, engine: &EngineConfig) -> usize {
    let snapshot: Vec<AgentSample> = flock.agents().iter().map(AgentSample::from).collect();
    let divisor = engine.separation_divisor;
    let batch_size = engine.batch_size.max(1);
    let (config, agents) = flock.split_mut();

    let evaluate_batch = |batch: usize, chunk: &mut [Agent]| -> usize {
        let offset = batch * batch_size;
        let mut contributions = 0;
        for (k, agent) in chunk.iter_mut().enumerate() {
            let steer = steer_agent(offset + k, &snapshot, config, divisor);
            agent.body.target_heading = steer.target_heading();
            contributions += steer.neighbor_count + steer.separation_count;
        }
        contributions
    };

    if snapshot.len() >= engine.parallel_threshold {
        agents
            .par_chunks_mut(batch_size)
            .enumerate()
            .map(|(batch, chunk)| evaluate_batch(batch, chunk))
            .sum()
    } else {
        agents
            .chunks_mut(batch_size)
            .enumerate()
            .map(|(batch, chunk)| evaluate_batch(batch, chunk))
            .sum()
    }
}
