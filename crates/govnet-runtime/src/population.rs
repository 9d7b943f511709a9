//! Population bootstrap — agent creation, role designation and the
//! initial network.
//!
//! The starting network has high bonding and low bridging capital: every
//! type forms a full clique of strong ties, and a handful of random
//! cross-type bridges are laid on top.

use govnet_core::agent::{Agent, Population};
use govnet_core::config::{NetworkSeed, PopulationCounts};
use govnet_core::topology::RelationshipGraph;
use govnet_core::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Create the bulk population in type order, drawing attributes from each
/// type's default ranges. Returns the population and the next free id.
///
/// Negative counts are treated as zero; the config is validated before
/// this is reached.
pub fn create_agents<R: Rng>(counts: &PopulationCounts, rng: &mut R) -> (Population, AgentId) {
    let mut population = Population::new();
    let mut next_id = AgentId(0);

    for agent_type in AgentType::BULK {
        let ranges = agent_type.default_ranges();
        for _ in 0..counts.count(agent_type).max(0) {
            let resources = draw(ranges.resources, rng);
            let commitment = draw(ranges.commitment, rng);
            let motivation = draw(ranges.motivation, rng);
            population.insert(
                next_id,
                Agent::new(next_id, agent_type, resources, commitment, motivation),
            );
            next_id = next_id.next();
        }
    }

    (population, next_id)
}

/// Mark one random government agent as broker and one random academic as
/// catalyst. Either role is skipped when its type is absent.
pub fn designate_roles<R: Rng>(population: &mut Population, rng: &mut R) {
    if let Some(id) = pick_of_type(population, AgentType::Government, rng) {
        if let Some(broker) = population.get_mut(&id) {
            broker.role = Role::Broker;
            broker.commitment = BROKER_COMMITMENT;
        }
    }

    if let Some(id) = pick_of_type(population, AgentType::Academic, rng) {
        if let Some(catalyst) = population.get_mut(&id) {
            catalyst.role = Role::Catalyst;
        }
    }
}

/// Lay down same-type cliques and random cross-type bridges.
pub fn seed_network<G: RelationshipGraph, R: Rng>(
    population: &Population,
    graph: &mut G,
    network: &NetworkSeed,
    rng: &mut R,
) {
    for id in population.keys() {
        graph.add_node(*id);
    }

    let mut by_type: BTreeMap<AgentType, Vec<AgentId>> = BTreeMap::new();
    for agent in population.values() {
        by_type.entry(agent.agent_type).or_default().push(agent.id);
    }

    for members in by_type.values() {
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                graph.set_edge(*a, *b, EdgeData::new(network.clique_strength));
            }
        }
    }

    let agents: Vec<&Agent> = population.values().collect();
    if agents.is_empty() {
        return;
    }
    for _ in 0..network.bridge_attempts {
        let (Some(a), Some(b)) = (agents.choose(rng), agents.choose(rng)) else {
            continue;
        };
        if a.agent_type != b.agent_type {
            graph.set_edge(a.id, b.id, EdgeData::new(network.bridge_strength));
        }
    }
}

fn pick_of_type<R: Rng>(population: &Population, agent_type: AgentType, rng: &mut R) -> Option<AgentId> {
    let ids: Vec<AgentId> = population
        .values()
        .filter(|a| a.agent_type == agent_type)
        .map(|a| a.id)
        .collect();
    ids.choose(rng).copied()
}

fn draw<R: Rng>((low, high): (f64, f64), rng: &mut R) -> f64 {
    if low < high {
        rng.gen_range(low..high)
    } else {
        low
    }
}
