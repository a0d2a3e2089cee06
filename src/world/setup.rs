//! Build a world from a scenario: random placement of agents and obstacles

use crate::core::config::ScenarioConfig;
use crate::core::error::Result;
use crate::world::flock_world::World;

impl World {
    /// Validate `config`, then create every flock with its initial population and every
    /// obstacle. The obstacle index is built once here.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self> {
        config.validate()?;

        let mut world = World::new(config.bounds, &config.spatial, config.engine.clone());
        world.cadence = config.cadence.clone();

        for flock in &config.flocks {
            world.spawn_flock(flock.clone())?;
        }

        for obstacle in &config.obstacles {
            let position = match obstacle.position {
                Some(p) => p,
                None => world.bounds.random_point(&mut world.rng),
            };
            world.add_obstacle(position, obstacle.avoidance_radius);
        }

        tracing::info!(
            "World ready: {} flocks, {} agents, {} obstacles",
            world.flocks().len(),
            world.agent_count(),
            world.obstacles().len()
        );

        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::config::{FlockConfig, ObstacleConfig, ScenarioConfig};
    use crate::core::types::Vec2;
    use crate::world::World;

    #[test]
    fn test_from_config_places_everything() {
        let mut config = ScenarioConfig::default();
        config.engine.seed = Some(1);
        let mut prey = FlockConfig::named("prey");
        prey.count = 30;
        let mut hunters = FlockConfig::named("hunters");
        hunters.count = 3;
        hunters.is_predator = true;
        config.flocks = vec![prey, hunters];
        config.obstacles = vec![
            ObstacleConfig {
                avoidance_radius: 2.0,
                position: Some(Vec2::new(5.0, 5.0)),
            },
            ObstacleConfig::default(),
        ];

        let world = World::from_config(&config).unwrap();
        assert_eq!(world.flocks().len(), 2);
        assert_eq!(world.agent_count(), 33);
        assert_eq!(world.obstacles().len(), 2);
        assert_eq!(world.obstacles()[0].position(), Vec2::new(5.0, 5.0));
        assert!(world.bounds.contains(world.obstacles()[1].position()));
        assert_eq!(world.obstacle_index().len(), 2);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = ScenarioConfig::default();
        config.spatial.cell_size = -1.0;
        assert!(World::from_config(&config).is_err());
    }

    #[test]
    fn test_empty_scenario_is_stable() {
        let world = World::from_config(&ScenarioConfig::default()).unwrap();
        assert_eq!(world.agent_count(), 0);
        assert!(world.obstacles().is_empty());
    }
}
