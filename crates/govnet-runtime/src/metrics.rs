//! Per-step metrics for tracking how the network evolves.
//!
//! Two record series are kept, both append-only:
//! - Model records: one per step, describing the whole network
//! - Agent records: one per live agent per step
//!
//! Graph measures follow the usual conventions for undirected simple
//! graphs: density is `2m / (n(n-1))`, clustering is averaged over every
//! node with nodes of degree < 2 contributing zero.

use govnet_core::agent::Population;
use govnet_core::topology::RelationshipGraph;
use govnet_core::types::*;
use serde::{Deserialize, Serialize};

/// Network-level measurements taken at the end of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Steps completed when this record was taken; 0 is the initial state.
    pub step: Step,
    /// Live agents.
    pub population: usize,
    pub network_density: f64,
    pub average_clustering: f64,
    pub edge_count: usize,
    /// Cumulative executed joint projects.
    pub successful_projects: u64,
    /// Node count of the largest connected component; 0 for an empty graph.
    pub largest_component: usize,
    /// 0 when there is no resource node.
    pub resource_node_degree: usize,
    /// Inequality of resources over all live agents, resource node included.
    pub gini_coefficient: f64,
}

/// One live agent's state at the end of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub step: Step,
    pub agent_id: AgentId,
    pub agent_type: AgentType,
    pub resources: f64,
    pub commitment: f64,
    pub degree: usize,
}

/// The recorded history of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsLog {
    model: Vec<ModelRecord>,
    agents: Vec<AgentRecord>,
}

impl MetricsLog {
    pub(crate) fn push(&mut self, record: ModelRecord, agents: Vec<AgentRecord>) {
        self.model.push(record);
        self.agents.extend(agents);
    }

    pub fn model_records(&self) -> &[ModelRecord] {
        &self.model
    }

    pub fn agent_records(&self) -> &[AgentRecord] {
        &self.agents
    }

    /// The model record for a given step, if recorded.
    pub fn record_at(&self, step: Step) -> Option<&ModelRecord> {
        self.model.iter().find(|r| r.step == step)
    }

    /// Agent records for a given step, in agent id order.
    pub fn agents_at(&self, step: Step) -> impl Iterator<Item = &AgentRecord> {
        self.agents.iter().filter(move |r| r.step == step)
    }

    /// The most recent model record.
    pub fn latest(&self) -> Option<&ModelRecord> {
        self.model.last()
    }

    /// Number of model records.
    pub fn len(&self) -> usize {
        self.model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }
}

/// Measure the network and every live agent.
pub fn collect<G: RelationshipGraph>(
    step: Step,
    graph: &G,
    population: &Population,
    total_projects: u64,
) -> (ModelRecord, Vec<AgentRecord>) {
    let resources: Vec<f64> = population.values().map(|a| a.resources).collect();
    let resource_node_degree = population
        .values()
        .find(|a| a.is_resource_node())
        .map(|a| graph.degree(&a.id))
        .unwrap_or(0);

    let record = ModelRecord {
        step,
        population: population.len(),
        network_density: density(graph),
        average_clustering: average_clustering(graph),
        edge_count: graph.edge_count(),
        successful_projects: total_projects,
        largest_component: largest_component(graph),
        resource_node_degree,
        gini_coefficient: compute_gini(&resources),
    };

    let agents = population
        .values()
        .map(|a| AgentRecord {
            step,
            agent_id: a.id,
            agent_type: a.agent_type,
            resources: a.resources,
            commitment: a.commitment,
            degree: graph.degree(&a.id),
        })
        .collect();

    (record, agents)
}

/// `2m / (n(n-1))`; 0 for fewer than two nodes.
pub fn density<G: RelationshipGraph>(graph: &G) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }
    2.0 * graph.edge_count() as f64 / (n as f64 * (n as f64 - 1.0))
}

/// Mean local clustering coefficient over all nodes.
pub fn average_clustering<G: RelationshipGraph>(graph: &G) -> f64 {
    let nodes = graph.all_nodes();
    if nodes.is_empty() {
        return 0.0;
    }

    let mut clustering_sum = 0.0f64;
    for nid in &nodes {
        let neighbor_ids: Vec<AgentId> = graph.neighbors(nid).into_iter().map(|(id, _)| id).collect();
        let k = neighbor_ids.len();
        if k < 2 {
            continue;
        }

        let mut triangles = 0u64;
        for i in 0..k {
            for j in (i + 1)..k {
                if graph.has_edge(&neighbor_ids[i], &neighbor_ids[j]) {
                    triangles += 1;
                }
            }
        }
        let possible = (k * (k - 1) / 2) as f64;
        clustering_sum += triangles as f64 / possible;
    }

    clustering_sum / nodes.len() as f64
}

/// Size of the largest connected component; 0 for an empty graph.
pub fn largest_component<G: RelationshipGraph>(graph: &G) -> usize {
    graph.component_sizes().first().copied().unwrap_or(0)
}

/// Gini coefficient (0 = perfectly equal, 1 = maximally unequal).
///
/// Over ascending-sorted values: `Σ (2(i+1) - n - 1) r[i] / (n Σ r)`,
/// summed as mirrored pairs `(n - 1 - 2i)(r[n-1-i] - r[i])` so that equal
/// values give exactly 0. 0 for fewer than two values or a zero total.
pub fn compute_gini(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let total: f64 = sorted.iter().sum();
    if total == 0.0 {
        return 0.0;
    }

    let weighted: f64 = (0..n / 2)
        .map(|i| (n - 1 - 2 * i) as f64 * (sorted[n - 1 - i] - sorted[i]))
        .sum();

    weighted / (n as f64 * total)
}

/// Print a formatted summary of one model record to the terminal.
pub fn print_report(record: &ModelRecord) {
    println!("── Network at step {} ─────────────────────────────", record.step);
    println!("  Population:                 {}", record.population);
    println!("  Edges:                      {}", record.edge_count);
    println!("  Density:                    {:.3}", record.network_density);
    println!("  Average clustering:         {:.3}", record.average_clustering);
    println!("  Largest component:          {}", record.largest_component);
    println!("  Successful projects:        {}", record.successful_projects);
    println!("  Resource node degree:       {}", record.resource_node_degree);
    println!("  Gini coefficient:           {:.3} (low = evenly spread)", record.gini_coefficient);
}
