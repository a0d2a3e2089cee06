//! World - owns every flock, the obstacles and the obstacle index

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::{CadenceConfig, EngineConfig, FlockConfig, SpatialConfig};
use crate::core::error::{FlockError, Result};
use crate::core::types::{random_heading, Bounds, FlockId, Tick, Vec2};
use crate::entity::{Flock, Obstacle};
use crate::spatial::SpatialIndex;

/// How many times each tick group has run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounters {
    pub flocking: Tick,
    pub random: Tick,
    pub obstacle_roam: Tick,
    pub frame: Tick,
}

/// The simulation state read and written by the tick entry points
///
/// Ticks and growth both take `&mut World`, so agents can only be added between ticks.
pub struct World {
    pub bounds: Bounds,
    pub engine: EngineConfig,
    pub cadence: CadenceConfig,
    pub ticks: TickCounters,
    pub(crate) flocks: Vec<Flock>,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) obstacle_index: SpatialIndex,
    /// Largest avoidance radius among obstacles, used as the index query radius
    pub(crate) obstacle_query_radius: f32,
    pub(crate) rng: ChaCha8Rng,
    names: AHashMap<String, FlockId>,
}

impl World {
    pub fn new(bounds: Bounds, spatial: &SpatialConfig, engine: EngineConfig) -> Self {
        let rng = match engine.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            bounds,
            engine,
            cadence: CadenceConfig::default(),
            ticks: TickCounters::default(),
            flocks: Vec::new(),
            obstacles: Vec::new(),
            obstacle_index: SpatialIndex::new(spatial.cell_size, spatial.lookup),
            obstacle_query_radius: 0.0,
            rng,
            names: AHashMap::new(),
        }
    }

    /// Register an empty flock
    pub fn add_flock(&mut self, config: FlockConfig) -> Result<FlockId> {
        config.validate()?;
        if self.names.contains_key(&config.name) {
            return Err(FlockError::InvalidConfig(format!(
                "duplicate flock name {:?}",
                config.name
            )));
        }

        let id = FlockId(self.flocks.len() as u32);
        self.names.insert(config.name.clone(), id);
        self.flocks.push(Flock::new(id, config));
        Ok(id)
    }

    /// Register a flock and place its configured initial population
    pub fn spawn_flock(&mut self, config: FlockConfig) -> Result<FlockId> {
        let count = config.count;
        let id = self.add_flock(config)?;
        self.add_agents(count, id)?;
        Ok(id)
    }

    /// Append one agent at `position`; returns its index within the flock
    pub fn add_agent(&mut self, position: Vec2, flock: FlockId) -> Result<usize> {
        let heading = random_heading(&mut self.rng);
        let flock = self
            .flocks
            .get_mut(flock.index())
            .ok_or(FlockError::FlockNotFound(flock))?;
        Ok(flock.add_agent(position, heading))
    }

    /// Append `count` agents at random positions inside the bounds
    pub fn add_agents(&mut self, count: usize, flock: FlockId) -> Result<usize> {
        if flock.index() >= self.flocks.len() {
            return Err(FlockError::FlockNotFound(flock));
        }

        for _ in 0..count {
            let position = self.bounds.random_point(&mut self.rng);
            self.add_agent(position, flock)?;
        }

        let population = self.flocks[flock.index()].population();
        tracing::info!(
            "Added {} agents to {} ({}), population now {}",
            count,
            self.flocks[flock.index()].name(),
            flock,
            population
        );
        Ok(count)
    }

    /// Add a roaming obstacle and re-index the obstacle set
    pub fn add_obstacle(&mut self, position: Vec2, avoidance_radius: f32) -> usize {
        let mut obstacle = Obstacle::new(
            position,
            avoidance_radius,
            self.engine.obstacle_max_speed,
            self.engine.obstacle_jitter_weight,
        );
        obstacle.body.heading = random_heading(&mut self.rng);
        self.obstacles.push(obstacle);
        self.rebuild_obstacle_index();
        self.obstacles.len() - 1
    }

    /// Re-index obstacle positions. Must run after obstacles move and before the
    /// next avoidance query.
    pub fn rebuild_obstacle_index(&mut self) {
        let positions: Vec<Vec2> = self.obstacles.iter().map(Obstacle::position).collect();
        self.obstacle_index.build(&positions);
        self.obstacle_query_radius = self
            .obstacles
            .iter()
            .map(|o| o.avoidance_radius)
            .fold(0.0, f32::max);
    }

    pub fn flock_id(&self, name: &str) -> Result<FlockId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| FlockError::UnknownFlockName(name.to_string()))
    }

    pub fn flock(&self, id: FlockId) -> Result<&Flock> {
        self.flocks.get(id.index()).ok_or(FlockError::FlockNotFound(id))
    }

    pub fn flock_mut(&mut self, id: FlockId) -> Result<&mut Flock> {
        self.flocks
            .get_mut(id.index())
            .ok_or(FlockError::FlockNotFound(id))
    }

    pub fn flocks(&self) -> &[Flock] {
        &self.flocks
    }

    pub fn flocks_mut(&mut self) -> &mut [Flock] {
        &mut self.flocks
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn obstacle_index(&self) -> &SpatialIndex {
        &self.obstacle_index
    }

    pub fn agent_count(&self) -> usize {
        self.flocks.iter().map(Flock::population).sum()
    }
}
