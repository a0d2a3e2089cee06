//! Host-side scheduling: turn frame time into due ticks and run them in order

use crate::command::Dispatcher;
use crate::core::config::{CadenceConfig, ScenarioConfig};
use crate::core::error::Result;
use crate::simulation::motion::integrate;
use crate::simulation::tick::{
    tick_boundaries, tick_flocking, tick_frame_steering, tick_obstacle_roam, tick_random,
    TickReport,
};
use crate::world::World;

/// Upper bound on catch-up ticks per group in one `advance`, so a long stall does not
/// turn into a burst of hundreds of ticks
pub const MAX_CATCH_UP: u32 = 4;

/// Which periodic groups are due, and how many times
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueTicks {
    pub flocking: u32,
    pub random: u32,
    pub obstacle_roam: u32,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    period: f32,
    elapsed: f32,
}

impl Timer {
    /// Starts due: every group fires on the first frame
    fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: period,
        }
    }

    fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed += dt.max(0.0);
        if self.period <= 0.0 || self.elapsed < self.period {
            return 0;
        }
        let due = (self.elapsed / self.period).floor();
        self.elapsed -= due * self.period;
        (due as u32).min(MAX_CATCH_UP)
    }
}

/// Accumulates host frame time against the configured cadences
#[derive(Debug, Clone)]
pub struct TickClock {
    flocking: Timer,
    random: Timer,
    obstacle_roam: Timer,
}

impl TickClock {
    pub fn new(cadence: &CadenceConfig) -> Self {
        Self {
            flocking: Timer::new(cadence.flocking),
            random: Timer::new(cadence.random),
            obstacle_roam: Timer::new(cadence.obstacle_roam),
        }
    }

    pub fn advance(&mut self, dt: f32) -> DueTicks {
        DueTicks {
            flocking: self.flocking.advance(dt),
            random: self.random.advance(dt),
            obstacle_roam: self.obstacle_roam.advance(dt),
        }
    }
}

/// Summary of one `Simulation::step`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub jobs_drained: usize,
    pub due: DueTicks,
    /// Every flocking tick run this step, merged
    pub flocking: TickReport,
    pub frame: TickReport,
}

/// A world plus the host pieces that drive it: clock, dispatcher and integrator
pub struct Simulation {
    pub world: World,
    pub clock: TickClock,
    pub dispatcher: Dispatcher,
}

impl Simulation {
    pub fn new(world: World) -> Self {
        let clock = TickClock::new(&world.cadence);
        Self {
            world,
            clock,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn from_config(config: &ScenarioConfig) -> Result<Self> {
        Ok(Self::new(World::from_config(config)?))
    }

    /// One host frame of `dt` seconds.
    ///
    /// Queued jobs (agent growth) run first, strictly between ticks. Due periodic groups
    /// and the per-frame pass then run in rule order, and finally every body is moved
    /// toward its targets.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let mut report = StepReport {
            jobs_drained: self.dispatcher.drain(&mut self.world),
            due: self.clock.advance(dt),
            ..StepReport::default()
        };

        for _ in 0..report.due.flocking {
            report.flocking = report.flocking.merge(tick_flocking(&mut self.world));
        }

        self.world.ticks.frame += 1;
        let steering = tick_frame_steering(&mut self.world);

        for _ in 0..report.due.random {
            tick_random(&mut self.world);
        }
        for _ in 0..report.due.obstacle_roam {
            tick_obstacle_roam(&mut self.world);
        }

        let boundaries = tick_boundaries(&mut self.world);
        report.frame = TickReport {
            tick: self.world.ticks.frame,
            evaluated: steering.evaluated + boundaries.evaluated,
            contributions: steering.contributions,
            boundary_corrections: boundaries.boundary_corrections,
        };

        for flock in self.world.flocks_mut() {
            for agent in flock.agents_mut() {
                integrate(&mut agent.body, dt);
            }
        }
        for obstacle in self.world.obstacles_mut() {
            integrate(&mut obstacle.body, dt);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::core::config::FlockConfig;

    #[test]
    fn test_clock_fires_everything_on_first_frame() {
        let mut clock = TickClock::new(&CadenceConfig::default());
        let due = clock.advance(0.0);
        assert_eq!(
            due,
            DueTicks {
                flocking: 1,
                random: 1,
                obstacle_roam: 1
            }
        );
        assert_eq!(clock.advance(0.0), DueTicks::default());
    }

    #[test]
    fn test_clock_respects_cadence() {
        let mut clock = TickClock::new(&CadenceConfig::default());
        clock.advance(0.0);
        let mut flocking = 0;
        let mut roam = 0;
        // 4 seconds at 10 fps
        for _ in 0..40 {
            let due = clock.advance(0.1);
            flocking += due.flocking;
            roam += due.obstacle_roam;
        }
        assert!((3..=4).contains(&flocking));
        assert!((1..=2).contains(&roam));
    }

    #[test]
    fn test_clock_caps_catch_up() {
        let mut clock = TickClock::new(&CadenceConfig::default());
        clock.advance(0.0);
        assert_eq!(clock.advance(1000.0).flocking, MAX_CATCH_UP);
    }

    #[test]
    fn test_step_drains_growth_before_ticks() {
        let mut config = ScenarioConfig::default();
        config.engine.seed = Some(8);
        let mut flock = FlockConfig::named("starlings");
        flock.count = 10;
        config.flocks.push(flock);

        let mut sim = Simulation::from_config(&config).unwrap();
        let id = sim.world.flock_id("starlings").unwrap();
        sim.dispatcher
            .enqueue_command(Command::AddAgents { flock: id, count: 5 })
            .unwrap();

        let report = sim.step(1.0 / 60.0);
        assert_eq!(report.jobs_drained, 1);
        assert_eq!(report.due.flocking, 1);
        assert_eq!(report.flocking.evaluated, 15);
        assert_eq!(sim.world.agent_count(), 15);
    }

    #[test]
    fn test_catch_up_flocking_reports_every_tick() {
        let mut config = ScenarioConfig::default();
        config.engine.seed = Some(13);
        let mut flock = FlockConfig::named("late");
        flock.count = 6;
        config.flocks.push(flock);

        let mut sim = Simulation::from_config(&config).unwrap();
        sim.step(0.0);
        let report = sim.step(3.0);
        assert_eq!(report.due.flocking, 3);
        assert_eq!(report.flocking.evaluated, 18);
        assert_eq!(report.flocking.tick, 4);
    }

    #[test]
    fn test_agents_stay_in_bounds_over_time() {
        let mut config = ScenarioConfig::default();
        config.engine.seed = Some(21);
        let mut flock = FlockConfig::named("wrap");
        flock.count = 40;
        flock.use_random_rule = true;
        config.flocks.push(flock);

        let mut sim = Simulation::from_config(&config).unwrap();
        for _ in 0..300 {
            sim.step(1.0 / 30.0);
        }
        let bounds = sim.world.bounds;
        // Wrap runs before integration, so one frame of drift past an edge is possible
        let slack = 5.0 * (1.0 / 30.0) + 1e-3;
        for agent in sim.world.flocks()[0].agents() {
            let p = agent.position();
            assert!(p.x >= bounds.min.x - slack && p.x <= bounds.max.x + slack);
            assert!(p.y >= bounds.min.y - slack && p.y <= bounds.max.y + slack);
        }
    }
}
