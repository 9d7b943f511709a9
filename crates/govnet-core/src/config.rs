//! Model configuration.
//!
//! A `ModelConfig` is immutable for the lifetime of a run. `Default` yields
//! the baseline collaboration scenario; the `with_*` builders derive the
//! broker-departure and resource-windfall variants from it.

use crate::error::ConfigError;
use crate::types::{AgentType, Step};
use serde::{Deserialize, Serialize};

/// Number of agents to create per organization type.
///
/// Counts are signed so that a negative value read from a config file is
/// reported as a configuration error instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationCounts {
    pub government: i64,
    pub civil_society: i64,
    pub private_enterprise: i64,
    pub academic: i64,
}

impl PopulationCounts {
    pub fn new(government: i64, civil_society: i64, private_enterprise: i64, academic: i64) -> Self {
        Self {
            government,
            civil_society,
            private_enterprise,
            academic,
        }
    }

    /// Count configured for a bulk type. The resource node is never bulk-created.
    pub fn count(&self, agent_type: AgentType) -> i64 {
        match agent_type {
            AgentType::Government => self.government,
            AgentType::CivilSocietyOrg => self.civil_society,
            AgentType::PrivateEnterprise => self.private_enterprise,
            AgentType::Academic => self.academic,
            AgentType::ResourceNode => 0,
        }
    }

    /// Total bulk population (negative counts contribute nothing).
    pub fn total(&self) -> usize {
        AgentType::BULK
            .iter()
            .map(|t| self.count(*t).max(0) as usize)
            .sum()
    }
}

impl Default for PopulationCounts {
    fn default() -> Self {
        Self::new(5, 5, 3, 2)
    }
}

/// Parameters of the network laid down before the first step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkSeed {
    /// Strength of edges inside each same-type clique (default: 0.7).
    #[serde(default = "default_clique_strength")]
    pub clique_strength: f64,
    /// Number of random cross-type bridging attempts (default: 3).
    #[serde(default = "default_bridge_attempts")]
    pub bridge_attempts: usize,
    /// Strength of a bridging edge (default: 0.1).
    #[serde(default = "default_bridge_strength")]
    pub bridge_strength: f64,
}

fn default_clique_strength() -> f64 { 0.7 }
fn default_bridge_attempts() -> usize { 3 }
fn default_bridge_strength() -> f64 { 0.1 }

impl Default for NetworkSeed {
    fn default() -> Self {
        Self {
            clique_strength: default_clique_strength(),
            bridge_attempts: default_bridge_attempts(),
            bridge_strength: default_bridge_strength(),
        }
    }
}

/// Configuration for a governance network run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub population: PopulationCounts,
    /// Fraction of every edge's strength lost per step (default: 0.02).
    #[serde(default = "default_link_decay_rate")]
    pub link_decay_rate: f64,
    /// Probability that a forum convenes in a step (default: 0.2).
    #[serde(default = "default_forum_frequency")]
    pub forum_frequency: f64,
    /// Combined resources a pair must exceed to propose a project (default: 100).
    #[serde(default = "default_project_resource_threshold")]
    pub project_resource_threshold: f64,
    /// Step at which the broker departs, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_removal_step: Option<Step>,
    /// Step at which the resource node is introduced, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_node_introduction_step: Option<Step>,
    /// Seed for the shared generator; drawn from OS entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub network: NetworkSeed,
}

fn default_link_decay_rate() -> f64 { 0.02 }
fn default_forum_frequency() -> f64 { 0.2 }
fn default_project_resource_threshold() -> f64 { 100.0 }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            population: PopulationCounts::default(),
            link_decay_rate: default_link_decay_rate(),
            forum_frequency: default_forum_frequency(),
            project_resource_threshold: default_project_resource_threshold(),
            broker_removal_step: None,
            resource_node_introduction_step: None,
            seed: None,
            network: NetworkSeed::default(),
        }
    }
}

impl ModelConfig {
    pub fn with_population(mut self, population: PopulationCounts) -> Self {
        self.population = population;
        self
    }

    pub fn with_link_decay_rate(mut self, rate: f64) -> Self {
        self.link_decay_rate = rate;
        self
    }

    pub fn with_forum_frequency(mut self, frequency: f64) -> Self {
        self.forum_frequency = frequency;
        self
    }

    pub fn with_project_resource_threshold(mut self, threshold: f64) -> Self {
        self.project_resource_threshold = threshold;
        self
    }

    pub fn with_broker_removal_step(mut self, step: Step) -> Self {
        self.broker_removal_step = Some(step);
        self
    }

    pub fn with_resource_node_introduction_step(mut self, step: Step) -> Self {
        self.resource_node_introduction_step = Some(step);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_network(mut self, network: NetworkSeed) -> Self {
        self.network = network;
        self
    }

    /// Check every parameter, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for agent_type in AgentType::BULK {
            let count = self.population.count(agent_type);
            if count < 0 {
                return Err(ConfigError::NegativeCount {
                    agent_type: agent_type.name().to_string(),
                    count,
                });
            }
        }

        check_probability("link_decay_rate", self.link_decay_rate)?;
        check_probability("forum_frequency", self.forum_frequency)?;

        let threshold = self.project_resource_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }

        if self.broker_removal_step == Some(0) {
            return Err(ConfigError::InvalidScheduleStep { name: "broker_removal_step" });
        }
        if self.resource_node_introduction_step == Some(0) {
            return Err(ConfigError::InvalidScheduleStep {
                name: "resource_node_introduction_step",
            });
        }

        check_strength("network.clique_strength", self.network.clique_strength)?;
        check_strength("network.bridge_strength", self.network.bridge_strength)?;
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

fn check_strength(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidStrength { name, value })
    }
}
