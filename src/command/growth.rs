//! Typed growth commands

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::FlockId;
use crate::world::World;

/// A world mutation that must happen between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    AddAgents { flock: FlockId, count: usize },
    AddAgentsByName { flock: String, count: usize },
}

impl Command {
    /// Apply to the world; returns how many agents were added
    pub fn apply(self, world: &mut World) -> Result<usize> {
        match self {
            Command::AddAgents { flock, count } => world.add_agents(count, flock),
            Command::AddAgentsByName { flock, count } => {
                let id = world.flock_id(&flock)?;
                world.add_agents(count, id)
            }
        }
    }

    /// Apply from a dispatcher job, where there is no caller to return an error to
    pub(crate) fn run(self, world: &mut World) {
        if let Err(e) = self.apply(world) {
            tracing::warn!("Growth command failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{EngineConfig, FlockConfig, SpatialConfig};
    use crate::core::error::FlockError;
    use crate::core::types::Bounds;

    #[test]
    fn test_add_agents_by_name() {
        let engine = EngineConfig {
            seed: Some(1),
            ..EngineConfig::default()
        };
        let mut world = World::new(Bounds::default(), &SpatialConfig::default(), engine);
        world.add_flock(FlockConfig::named("terns")).unwrap();

        let added = Command::AddAgentsByName {
            flock: "terns".into(),
            count: 4,
        }
        .apply(&mut world)
        .unwrap();
        assert_eq!(added, 4);
        assert_eq!(world.agent_count(), 4);

        let missing = Command::AddAgentsByName {
            flock: "owls".into(),
            count: 1,
        }
        .apply(&mut world);
        assert!(matches!(missing, Err(FlockError::UnknownFlockName(_))));
    }
}
