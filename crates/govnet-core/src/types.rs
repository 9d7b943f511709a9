//! Shared types used across the govnet crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic step counter.
pub type Step = u64;

/// Unique identifier for an agent in the population.
///
/// Ids are handed out sequentially by the model and are never reused,
/// even after the agent is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl AgentId {
    /// The id that follows this one in allocation order.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of organization an agent represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentType {
    Government,
    CivilSocietyOrg,
    PrivateEnterprise,
    Academic,
    /// External funding opportunity; only ever introduced by a scheduled event.
    ResourceNode,
}

impl AgentType {
    /// Types created in bulk at model construction, in creation order.
    pub const BULK: [AgentType; 4] = [
        AgentType::Government,
        AgentType::CivilSocietyOrg,
        AgentType::PrivateEnterprise,
        AgentType::Academic,
    ];

    /// Short machine-friendly name, used in exported tables.
    pub fn name(&self) -> &'static str {
        match self {
            AgentType::Government => "government",
            AgentType::CivilSocietyOrg => "civil_society",
            AgentType::PrivateEnterprise => "private_enterprise",
            AgentType::Academic => "academic",
            AgentType::ResourceNode => "resource_node",
        }
    }

    /// Default attribute ranges for agents of this type.
    pub fn default_ranges(&self) -> AttributeRanges {
        match self {
            AgentType::Government => AttributeRanges {
                resources: (10.0, 50.0),
                commitment: (0.2, 0.5),
                motivation: (0.2, 0.8),
            },
            AgentType::CivilSocietyOrg => AttributeRanges {
                resources: (10.0, 30.0),
                commitment: (0.7, 0.9),
                motivation: (0.8, 0.9),
            },
            AgentType::PrivateEnterprise => AttributeRanges {
                resources: (50.0, 100.0),
                commitment: (0.2, 0.8),
                motivation: (0.1, 0.3),
            },
            AgentType::Academic => AttributeRanges {
                resources: (10.0, 50.0),
                commitment: (0.8, 1.0),
                motivation: (0.2, 0.8),
            },
            AgentType::ResourceNode => AttributeRanges {
                resources: (RESOURCE_NODE_RESOURCES, RESOURCE_NODE_RESOURCES),
                commitment: (1.0, 1.0),
                motivation: (0.5, 0.5),
            },
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Distinguished role an agent may carry.
///
/// At most one broker and one catalyst exist per model; the resource node
/// never takes either of the other roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    None,
    /// Government agent with elevated commitment; target of scripted removal.
    Broker,
    /// Academic agent whose presence is required for a forum to convene.
    Catalyst,
    ResourceNode,
}

/// Uniform `(low, high)` ranges used to draw initial agent attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeRanges {
    pub resources: (f64, f64),
    pub commitment: (f64, f64),
    pub motivation: (f64, f64),
}

/// Data carried on an undirected relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Tie quality in [0, 1].
    pub strength: f64,
}

impl EdgeData {
    /// Create edge data, clamping the strength into [0, 1].
    pub fn new(strength: f64) -> Self {
        Self {
            strength: clamp_strength(strength),
        }
    }

    /// Add `delta` to the strength, keeping it inside [0, 1].
    pub fn reinforce(&mut self, delta: f64) {
        self.strength = clamp_strength(self.strength + delta);
    }

    /// Multiply the strength by `factor`, keeping it inside [0, 1].
    pub fn scale(&mut self, factor: f64) {
        self.strength = clamp_strength(self.strength * factor);
    }
}

/// Clamp a relationship strength into [0, 1]. NaN collapses to 0.
pub fn clamp_strength(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A joint project proposed during agent activation, executed at end of step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProposal {
    pub proposer: AgentId,
    pub partner: AgentId,
}

/// Resources held by the resource node.
pub const RESOURCE_NODE_RESOURCES: f64 = 1_000_000.0;

/// Commitment assigned to the broker, overriding its drawn value.
pub const BROKER_COMMITMENT: f64 = 0.95;

/// Strength of an edge created by a successful collaboration attempt.
pub const COLLABORATION_STRENGTH: f64 = 0.05;

/// Strength of a forum-created edge, and the increment for existing ones.
pub const FORUM_STRENGTH: f64 = 0.1;

/// Edge strength a pair must exceed before proposing a joint project.
pub const PROJECT_STRENGTH_GATE: f64 = 0.6;

/// Resources granted to each participant of an executed project.
pub const PROJECT_REWARD: f64 = 10.0;

/// Strength increment applied to the edge of an executed project.
pub const PROJECT_STRENGTH_BONUS: f64 = 0.2;

/// Scale used to normalize resource figures into probabilities.
pub const RESOURCE_SCALE: f64 = 100.0;
