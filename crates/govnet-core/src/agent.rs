//! Agent — one organizational actor in the governance network.
//!
//! An agent owns its type, resources, commitment and motivation profile.
//! Each step it may court a new partner and may propose a joint project to
//! an existing neighbor. Everything it touches is handed in through a
//! [`StepContext`]; there is no ambient graph or generator.

use crate::topology::RelationshipGraph;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Live agents keyed by id. Ordered so that iteration is reproducible.
pub type Population = BTreeMap<AgentId, Agent>;

/// An organizational actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub agent_type: AgentType,
    /// Non-negative; grows by the project reward.
    pub resources: f64,
    /// Per-step probability of attempting each interaction, in [0, 1].
    pub commitment: f64,
    /// Weight of homophily versus resource seeking when choosing partners, in [0, 1].
    pub motivation_profile: f64,
    pub role: Role,
}

/// Everything an agent may read or mutate during its activation.
pub struct StepContext<'a, G: RelationshipGraph, R: Rng> {
    pub graph: &'a mut G,
    /// Agents are read-only during activation; resources change only when
    /// queued projects execute.
    pub population: &'a Population,
    pub proposals: &'a mut Vec<ProjectProposal>,
    pub rng: &'a mut R,
    pub project_resource_threshold: f64,
}

/// What an agent did during one activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationOutcome {
    /// Partner of a newly created collaboration edge.
    pub linked: Option<AgentId>,
    /// Partner of a queued joint project.
    pub proposed: Option<AgentId>,
}

impl Agent {
    pub fn new(
        id: AgentId,
        agent_type: AgentType,
        resources: f64,
        commitment: f64,
        motivation_profile: f64,
    ) -> Self {
        Self {
            id,
            agent_type,
            resources,
            commitment,
            motivation_profile,
            role: Role::None,
        }
    }

    /// The resource node: effectively unbounded resources, full commitment.
    pub fn resource_node(id: AgentId) -> Self {
        let ranges = AgentType::ResourceNode.default_ranges();
        Self {
            id,
            agent_type: AgentType::ResourceNode,
            resources: ranges.resources.0,
            commitment: ranges.commitment.0,
            motivation_profile: ranges.motivation.0,
            role: Role::ResourceNode,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_broker(&self) -> bool {
        self.role == Role::Broker
    }

    pub fn is_catalyst(&self) -> bool {
        self.role == Role::Catalyst
    }

    pub fn is_resource_node(&self) -> bool {
        self.role == Role::ResourceNode
    }

    /// Run one activation: collaboration attempt, then project proposal.
    pub fn step<G: RelationshipGraph, R: Rng>(
        &self,
        ctx: &mut StepContext<'_, G, R>,
    ) -> ActivationOutcome {
        let linked = self.attempt_new_collaboration(ctx);
        let proposed = self.propose_joint_project(ctx);
        ActivationOutcome { linked, proposed }
    }

    /// With probability `commitment`, pick a random unconnected agent and
    /// link to it with the partner-dependent acceptance probability.
    pub fn attempt_new_collaboration<G: RelationshipGraph, R: Rng>(
        &self,
        ctx: &mut StepContext<'_, G, R>,
    ) -> Option<AgentId> {
        if ctx.rng.gen::<f64>() >= self.commitment {
            return None;
        }

        let population = ctx.population;
        let candidates: Vec<&Agent> = population
            .values()
            .filter(|other| other.id != self.id && !ctx.graph.has_edge(&self.id, &other.id))
            .collect();
        let partner = *candidates.choose(&mut *ctx.rng)?;

        let own_degree = ctx.graph.degree(&self.id);
        let prob = self.acceptance_probability(partner, own_degree, population.len());
        if ctx.rng.gen::<f64>() < prob {
            ctx.graph
                .set_edge(self.id, partner.id, EdgeData::new(COLLABORATION_STRENGTH));
            Some(partner.id)
        } else {
            None
        }
    }

    /// With probability `commitment`, pick a random neighbor and queue a
    /// joint project if the tie is strong and the pair is resourced enough.
    pub fn propose_joint_project<G: RelationshipGraph, R: Rng>(
        &self,
        ctx: &mut StepContext<'_, G, R>,
    ) -> Option<AgentId> {
        if ctx.rng.gen::<f64>() >= self.commitment {
            return None;
        }

        let neighbors = ctx.graph.neighbors(&self.id);
        let &(partner_id, edge) = neighbors.choose(&mut *ctx.rng)?;
        if edge.strength <= PROJECT_STRENGTH_GATE {
            return None;
        }

        let partner = ctx.population.get(&partner_id)?;
        if self.resources + partner.resources > ctx.project_resource_threshold {
            ctx.proposals.push(ProjectProposal {
                proposer: self.id,
                partner: partner_id,
            });
            Some(partner_id)
        } else {
            None
        }
    }

    /// Probability that a link to `partner` is accepted.
    ///
    /// Courting the resource node scales with this agent's resources and
    /// connectedness; any other partner is scored by homophily and
    /// resource seeking, weighted by the motivation profile.
    pub fn acceptance_probability(
        &self,
        partner: &Agent,
        own_degree: usize,
        population_size: usize,
    ) -> f64 {
        match partner.role {
            Role::ResourceNode => {
                if population_size <= 1 {
                    return 0.0;
                }
                (self.resources / RESOURCE_SCALE)
                    * (own_degree as f64 / (population_size - 1) as f64)
            }
            Role::None | Role::Broker | Role::Catalyst => {
                let homophily = if self.agent_type == partner.agent_type { 1.0 } else { 0.0 };
                let resource_seeking =
                    ((partner.resources - self.resources) / RESOURCE_SCALE).max(0.0);
                self.motivation_profile * homophily
                    + (1.0 - self.motivation_profile) * resource_seeking
            }
        }
    }
}
