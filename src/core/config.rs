//! Scenario configuration with documented defaults
//!
//! A scenario is a TOML document: world bounds, spatial index tuning, tick cadences,
//! engine switches, then one `[[flocks]]` table per flock and one `[[obstacles]]` table per
//! obstacle. Every section is optional and falls back to the defaults below.

use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::error::{FlockError, Result};
use crate::core::types::{Bounds, Vec2};

/// How the spatial index turns a cell key into a scan start position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpatialLookup {
    /// Start table sized to the point count. Keys past the end read as position 0.
    #[default]
    Dense,
    /// Binary search of the sorted key array. Still scans a single bucket.
    Searched,
}

/// What the accumulated separation speed is averaged over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparationDivisor {
    /// Number of agents that actually triggered separation
    #[default]
    SeparationCount,
    /// Number of agents inside the visibility radius (alignment count)
    NeighborCount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Edge length of one grid cell (world units)
    ///
    /// Queries only scan the queried point's own cell, so this also caps the useful
    /// query radius: anything across a cell edge is invisible to the index.
    pub cell_size: f32,
    pub lookup: SpatialLookup,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            lookup: SpatialLookup::Dense,
        }
    }
}

/// Seconds between invocations of each periodic tick group
///
/// The per-frame pass (boundary, avoidance, predator separation) has no cadence: it runs
/// once per host frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub flocking: f32,
    pub random: f32,
    pub obstacle_roam: f32,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            flocking: 1.0,
            random: 1.0,
            obstacle_roam: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Master switch for the alignment/cohesion/separation tick
    pub use_flocking: bool,
    /// Agents evaluated per batch in the all-pairs rule
    pub batch_size: usize,
    /// Below this many agents in a flock the all-pairs rule runs on the calling thread
    pub parallel_threshold: usize,
    /// RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    pub obstacle_max_speed: f32,
    /// Blend weight of the +/-45 degree jitter for obstacles
    pub obstacle_jitter_weight: f32,
    /// How many agents the host adds per "add agents" request
    pub add_increment: usize,
    pub separation_divisor: SeparationDivisor,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_flocking: true,
            batch_size: 10,
            parallel_threshold: 256,
            seed: None,
            obstacle_max_speed: 1.0,
            obstacle_jitter_weight: 0.1,
            add_increment: 100,
            separation_divisor: SeparationDivisor::SeparationCount,
        }
    }
}

/// Per-flock weights, thresholds and rule toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    pub name: String,
    /// Initial population placed at setup
    pub count: usize,
    /// Distance under which another agent counts for alignment and cohesion
    pub visibility: f32,
    /// Distance under which another agent pushes this one away
    pub separation_distance: f32,
    pub weight_alignment: f32,
    pub weight_separation: f32,
    pub weight_cohesion: f32,
    pub weight_random: f32,
    pub weight_avoid_obstacles: f32,
    pub weight_flee_on_sight_enemy: f32,
    pub max_speed: f32,
    /// Radians per second, consumed by the host's motion integrator
    pub max_rotation_speed: f32,
    pub bounce_wall: bool,
    pub is_predator: bool,
    pub use_alignment_rule: bool,
    pub use_separation_rule: bool,
    pub use_cohesion_rule: bool,
    pub use_random_rule: bool,
    pub use_avoid_obstacles_rule: bool,
    pub use_flee_on_sight_enemy_rule: bool,
    pub enemy_separation_distance: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            name: "flock".into(),
            count: 100,
            visibility: 20.0,
            separation_distance: 5.0,
            weight_alignment: 1.0,
            weight_separation: 1.0,
            weight_cohesion: 1.0,
            weight_random: 1.0,
            weight_avoid_obstacles: 10.0,
            weight_flee_on_sight_enemy: 6.0,
            max_speed: 5.0,
            max_rotation_speed: 3.5,
            bounce_wall: false,
            is_predator: false,
            use_alignment_rule: true,
            use_separation_rule: true,
            use_cohesion_rule: true,
            use_random_rule: false,
            use_avoid_obstacles_rule: true,
            use_flee_on_sight_enemy_rule: false,
            enemy_separation_distance: 5.0,
        }
    }
}

impl FlockConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True when this flock steers away from predator flocks
    pub fn flees_predators(&self) -> bool {
        self.use_flee_on_sight_enemy_rule && !self.is_predator
    }

    pub fn validate(&self) -> Result<()> {
        let context = format!("flock {:?}", self.name);
        let non_negative = [
            ("visibility", self.visibility),
            ("separation_distance", self.separation_distance),
            ("enemy_separation_distance", self.enemy_separation_distance),
            ("max_speed", self.max_speed),
            ("max_rotation_speed", self.max_rotation_speed),
        ];
        for (field, value) in non_negative {
            check_non_negative(&context, field, value)?;
        }

        let weights = [
            ("weight_alignment", self.weight_alignment),
            ("weight_separation", self.weight_separation),
            ("weight_cohesion", self.weight_cohesion),
            ("weight_random", self.weight_random),
            ("weight_avoid_obstacles", self.weight_avoid_obstacles),
            ("weight_flee_on_sight_enemy", self.weight_flee_on_sight_enemy),
        ];
        for (field, value) in weights {
            check_finite(&context, field, value)?;
        }
        Ok(())
    }
}

/// NaN and infinities are rejected along with negatives
fn check_non_negative(context: &str, field: &str, value: f32) -> Result<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(FlockError::InvalidConfig(format!(
            "{}: {} must be finite and >= 0 (got {})",
            context, field, value
        )));
    }
    Ok(())
}

fn check_finite(context: &str, field: &str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(FlockError::InvalidConfig(format!(
            "{}: {} must be finite (got {})",
            context, field, value
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub avoidance_radius: f32,
    /// Fixed spawn point; random within bounds when absent
    pub position: Option<Vec2>,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            avoidance_radius: 3.0,
            position: None,
        }
    }
}

/// Complete setup input handed over by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub bounds: Bounds,
    pub spatial: SpatialConfig,
    pub cadence: CadenceConfig,
    pub engine: EngineConfig,
    pub flocks: Vec<FlockConfig>,
    pub obstacles: Vec<ObstacleConfig>,
}

impl ScenarioConfig {
    /// Parse and validate a scenario from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ScenarioConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    ///
    /// Degenerate but representable setups (no agents, zero speeds) pass; they simply
    /// produce a motionless simulation.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.bounds.min, self.bounds.max);
        if !(min.is_finite() && max.is_finite() && min.x < max.x && min.y < max.y) {
            return Err(FlockError::InvalidConfig(format!(
                "bounds min {:?} must be finite and strictly below max {:?}",
                self.bounds.min, self.bounds.max
            )));
        }

        if !(self.spatial.cell_size.is_finite() && self.spatial.cell_size > 0.0) {
            return Err(FlockError::InvalidConfig(format!(
                "spatial.cell_size must be finite and > 0 (got {})",
                self.spatial.cell_size
            )));
        }

        if self.engine.batch_size == 0 {
            return Err(FlockError::InvalidConfig("engine.batch_size must be > 0".into()));
        }

        let cadences = [
            ("flocking", self.cadence.flocking),
            ("random", self.cadence.random),
            ("obstacle_roam", self.cadence.obstacle_roam),
        ];
        for (name, secs) in cadences {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(FlockError::InvalidConfig(format!(
                    "cadence.{} must be finite and > 0 seconds (got {})",
                    name, secs
                )));
            }
        }

        check_non_negative("engine", "obstacle_max_speed", self.engine.obstacle_max_speed)?;
        check_finite(
            "engine",
            "obstacle_jitter_weight",
            self.engine.obstacle_jitter_weight,
        )?;

        let mut names = AHashSet::new();
        for flock in &self.flocks {
            flock.validate()?;
            if !names.insert(flock.name.as_str()) {
                return Err(FlockError::InvalidConfig(format!(
                    "duplicate flock name {:?}",
                    flock.name
                )));
            }
        }

        for (i, obstacle) in self.obstacles.iter().enumerate() {
            let context = format!("obstacle {}", i);
            check_non_negative(&context, "avoidance_radius", obstacle.avoidance_radius)?;
            if let Some(p) = obstacle.position {
                if !p.is_finite() {
                    return Err(FlockError::InvalidConfig(format!(
                        "{}: position must be finite (got {:?})",
                        context, p
                    )));
                }
            }
        }

        Ok(())
    }
}
