//! Exporters — graph snapshots as JSON, metric series as CSV or JSON.
//!
//! Snapshots list every node with its agent attributes and every edge
//! exactly once, lower id first, so two snapshots of the same state
//! serialize identically.

use crate::metrics::MetricsLog;
use govnet_core::agent::Population;
use govnet_core::error::Result;
use govnet_core::topology::RelationshipGraph;
use govnet_core::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A node in a graph snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: AgentId,
    pub agent_type: AgentType,
    pub role: Role,
    pub resources: f64,
    pub commitment: f64,
    pub degree: usize,
}

/// An undirected edge in a graph snapshot, with `source < target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: AgentId,
    pub target: AgentId,
    pub strength: f64,
}

/// Read-only view of the network at one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub step: Step,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    /// Capture the graph and the attributes of the agents on it.
    pub fn capture<G: RelationshipGraph>(step: Step, graph: &G, population: &Population) -> Self {
        let nodes = population
            .values()
            .map(|agent| NodeSnapshot {
                id: agent.id,
                agent_type: agent.agent_type,
                role: agent.role,
                resources: agent.resources,
                commitment: agent.commitment,
                degree: graph.degree(&agent.id),
            })
            .collect();

        let mut edges: Vec<EdgeSnapshot> = graph
            .all_edges()
            .into_iter()
            .map(|(a, b, edge)| EdgeSnapshot {
                source: a.min(b),
                target: a.max(b),
                strength: edge.strength,
            })
            .collect();
        edges.sort_by_key(|e| (e.source, e.target));

        Self { step, nodes, edges }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty-printed JSON to a file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl MetricsLog {
    /// Model records as CSV with a header row.
    pub fn model_csv(&self) -> String {
        let mut csv = String::from(
            "step,population,network_density,average_clustering,edge_count,\
             successful_projects,largest_component,resource_node_degree,gini_coefficient\n",
        );
        for r in self.model_records() {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                r.step,
                r.population,
                r.network_density,
                r.average_clustering,
                r.edge_count,
                r.successful_projects,
                r.largest_component,
                r.resource_node_degree,
                r.gini_coefficient,
            ));
        }
        csv
    }

    /// Agent records as CSV with a header row.
    pub fn agent_csv(&self) -> String {
        let mut csv = String::from("step,agent_id,agent_type,resources,commitment,degree\n");
        for r in self.agent_records() {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                r.step,
                r.agent_id,
                r.agent_type.name(),
                r.resources,
                r.commitment,
                r.degree,
            ));
        }
        csv
    }

    /// Write both series as CSV files into `dir`.
    pub fn write_csv(&self, dir: &Path) -> Result<()> {
        std::fs::write(dir.join("model_metrics.csv"), self.model_csv())?;
        std::fs::write(dir.join("agent_metrics.csv"), self.agent_csv())?;
        Ok(())
    }

    /// Write the whole log as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
