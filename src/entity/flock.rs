//! Flock: one rule configuration and the agents it owns

use serde::{Deserialize, Serialize};

use crate::core::config::FlockConfig;
use crate::core::types::{FlockId, Vec2};
use crate::entity::body::{Behavior, Body};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub body: Body,
}

impl Agent {
    pub fn position(&self) -> Vec2 {
        self.body.position
    }
}

/// A group of agents sharing one set of weights and toggles
///
/// Agents are append-only: there is no removal, so agent indices stay stable for the
/// lifetime of the flock.
#[derive(Debug, Clone)]
pub struct Flock {
    pub id: FlockId,
    pub config: FlockConfig,
    agents: Vec<Agent>,
}

impl Flock {
    pub fn new(id: FlockId, config: FlockConfig) -> Self {
        Self {
            id,
            config,
            agents: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Append an agent at rest; returns its index in the flock
    pub fn add_agent(&mut self, position: Vec2, heading: Vec2) -> usize {
        let body = Body::new(position, Behavior::Flocking { flock: self.id })
            .with_limits(self.config.max_speed, self.config.max_rotation_speed)
            .with_heading(heading);
        self.agents.push(Agent { body });
        self.agents.len() - 1
    }

    /// Live population; always the agent list length
    pub fn population(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Config and agents borrowed together, for rules that read one and write the other
    pub fn split_mut(&mut self) -> (&FlockConfig, &mut [Agent]) {
        (&self.config, &mut self.agents)
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn agent_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.agents.get_mut(index)
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.agents.iter().map(|a| a.body.position).collect()
    }
}
