//! Tick entry points - one per rule group
//!
//! The host decides when each of these fires. Within one host frame the documented order
//! is: flocking -> frame steering (obstacle avoidance, predator separation) -> random
//! jitter -> obstacle roam -> boundaries. `tick_per_frame` runs the two continuous parts
//! back to back for hosts that do not interleave the periodic groups.

use crate::core::types::{Tick, Vec2};
use crate::simulation::avoidance::avoid_obstacles;
use crate::simulation::boundary::{self, BoundaryPolicy};
use crate::simulation::flocking::run_flocking;
use crate::simulation::jitter::jitter;
use crate::simulation::predator::flee_from;
use crate::world::World;

/// What one tick-group invocation did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Counter value of the group after this invocation
    pub tick: Tick,
    /// Bodies the group evaluated
    pub evaluated: usize,
    /// Neighbor, obstacle or predator contributions applied
    pub contributions: usize,
    /// Wraps or bounces applied
    pub boundary_corrections: usize,
}

impl TickReport {
    /// Sum the counts of two invocations, keeping the later tick number
    pub fn merge(mut self, other: TickReport) -> Self {
        self.tick = self.tick.max(other.tick);
        self.evaluated += other.evaluated;
        self.contributions += other.contributions;
        self.boundary_corrections += other.boundary_corrections;
        self
    }
}

/// Alignment, cohesion and separation for every flock
pub fn tick_flocking(world: &mut World) -> TickReport {
    world.ticks.flocking += 1;
    let mut report = TickReport {
        tick: world.ticks.flocking,
        ..TickReport::default()
    };

    if !world.engine.use_flocking {
        return report;
    }

    for flock in world.flocks.iter_mut() {
        report.evaluated += flock.population();
        report.contributions += run_flocking(flock, &world.engine);
    }

    tracing::debug!(
        "Flocking tick {}: {} agents, {} neighbor contributions",
        report.tick,
        report.evaluated,
        report.contributions
    );
    report
}

/// Random jitter for every agent of flocks with the random rule on
pub fn tick_random(world: &mut World) -> TickReport {
    world.ticks.random += 1;
    let mut report = TickReport {
        tick: world.ticks.random,
        ..TickReport::default()
    };

    for flock in world.flocks.iter_mut() {
        let (config, agents) = flock.split_mut();
        if !config.use_random_rule {
            continue;
        }
        for agent in agents.iter_mut() {
            jitter(&mut agent.body, config.weight_random, &mut world.rng);
        }
        report.evaluated += agents.len();
    }

    tracing::debug!("Random tick {}: {} agents jittered", report.tick, report.evaluated);
    report
}

/// Random roam for every obstacle
pub fn tick_obstacle_roam(world: &mut World) -> TickReport {
    world.ticks.obstacle_roam += 1;

    for obstacle in world.obstacles.iter_mut() {
        let weight = obstacle.jitter_weight();
        jitter(&mut obstacle.body, weight, &mut world.rng);
    }

    let report = TickReport {
        tick: world.ticks.obstacle_roam,
        evaluated: world.obstacles.len(),
        ..TickReport::default()
    };
    tracing::debug!("Obstacle roam tick {}: {} obstacles", report.tick, report.evaluated);
    report
}

/// Obstacle avoidance then predator separation
///
/// Rebuilds the obstacle index first: obstacles roam, so an index from an earlier frame
/// would answer for stale positions.
pub fn tick_frame_steering(world: &mut World) -> TickReport {
    world.rebuild_obstacle_index();
    let mut report = TickReport {
        tick: world.ticks.frame,
        ..TickReport::default()
    };

    if !world.obstacles.is_empty() {
        for flock in world.flocks.iter_mut() {
            if !flock.config.use_avoid_obstacles_rule {
                continue;
            }
            report.evaluated += flock.population();
            report.contributions += avoid_obstacles(
                flock,
                &world.obstacles,
                &world.obstacle_index,
                world.obstacle_query_radius,
            );
        }
    }

    // Predator positions frozen before any prey is touched, in flock order
    let predators: Vec<Vec<Vec2>> = world
        .flocks
        .iter()
        .filter(|f| f.config.is_predator)
        .map(|f| f.positions())
        .collect();

    if !predators.is_empty() {
        for flock in world.flocks.iter_mut() {
            let (config, agents) = flock.split_mut();
            if !config.flees_predators() {
                continue;
            }
            for agent in agents.iter_mut() {
                for positions in &predators {
                    report.contributions += flee_from(
                        &mut agent.body,
                        positions,
                        config.enemy_separation_distance,
                        config.weight_flee_on_sight_enemy,
                    );
                }
            }
            report.evaluated += agents.len();
        }
    }

    report
}

/// Agent boundary policy per flock, then obstacle wrap
pub fn tick_boundaries(world: &mut World) -> TickReport {
    let bounds = world.bounds;
    let mut report = TickReport {
        tick: world.ticks.frame,
        ..TickReport::default()
    };

    for flock in world.flocks.iter_mut() {
        let policy = BoundaryPolicy::for_flock(&flock.config);
        for agent in flock.agents_mut() {
            if policy.apply(&mut agent.body, &bounds) {
                report.boundary_corrections += 1;
            }
        }
        report.evaluated += flock.population();
    }

    for obstacle in world.obstacles.iter_mut() {
        if boundary::wrap(&mut obstacle.body, &bounds) {
            report.boundary_corrections += 1;
        }
    }
    report.evaluated += world.obstacles.len();

    report
}

/// Continuous pass: avoidance, predator separation, then boundaries
pub fn tick_per_frame(world: &mut World) -> TickReport {
    world.ticks.frame += 1;
    let steering = tick_frame_steering(world);
    let boundaries = tick_boundaries(world);
    let report = steering.merge(boundaries);

    tracing::debug!(
        "Frame {}: {} contributions, {} boundary corrections",
        report.tick,
        report.contributions,
        report.boundary_corrections
    );
    report
}
