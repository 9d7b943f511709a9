//! Concrete implementation of the RelationshipGraph trait using petgraph.
//!
//! Uses petgraph's `StableGraph` as the backing store so that removing a
//! departing agent does not invalidate the indices of everyone else, with a
//! HashMap index for O(1) node lookup by agent id.

use govnet_core::topology::RelationshipGraph;
use govnet_core::types::*;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet, VecDeque};

/// Petgraph-backed implementation of the relationship graph.
#[derive(Debug, Clone)]
pub struct PetRelationshipGraph {
    graph: StableUnGraph<AgentId, EdgeData>,
    /// Map from agent id to petgraph's internal index.
    node_index: HashMap<AgentId, NodeIndex>,
}

impl PetRelationshipGraph {
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            node_index: HashMap::new(),
        }
    }

    fn index_pair(&self, a: &AgentId, b: &AgentId) -> Option<(NodeIndex, NodeIndex)> {
        Some((*self.node_index.get(a)?, *self.node_index.get(b)?))
    }
}

impl Default for PetRelationshipGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationshipGraph for PetRelationshipGraph {
    fn add_node(&mut self, id: AgentId) {
        if self.node_index.contains_key(&id) {
            return;
        }
        let idx = self.graph.add_node(id);
        self.node_index.insert(id, idx);
    }

    fn remove_node(&mut self, id: &AgentId) -> Option<usize> {
        let idx = self.node_index.remove(id)?;
        let incident = self.graph.edges(idx).count();
        self.graph.remove_node(idx);
        Some(incident)
    }

    fn contains_node(&self, id: &AgentId) -> bool {
        self.node_index.contains_key(id)
    }

    fn set_edge(&mut self, a: AgentId, b: AgentId, data: EdgeData) -> bool {
        if a == b {
            return false;
        }
        let Some((a_idx, b_idx)) = self.index_pair(&a, &b) else {
            return false;
        };
        let data = EdgeData::new(data.strength);

        if let Some(edge_idx) = self.graph.find_edge(a_idx, b_idx) {
            self.graph[edge_idx] = data;
            false
        } else {
            self.graph.add_edge(a_idx, b_idx, data);
            true
        }
    }

    fn get_edge(&self, a: &AgentId, b: &AgentId) -> Option<&EdgeData> {
        let (a_idx, b_idx) = self.index_pair(a, b)?;
        let edge_idx = self.graph.find_edge(a_idx, b_idx)?;
        self.graph.edge_weight(edge_idx)
    }

    fn get_edge_mut(&mut self, a: &AgentId, b: &AgentId) -> Option<&mut EdgeData> {
        let (a_idx, b_idx) = self.index_pair(a, b)?;
        let edge_idx = self.graph.find_edge(a_idx, b_idx)?;
        self.graph.edge_weight_mut(edge_idx)
    }

    fn neighbors(&self, node: &AgentId) -> Vec<(AgentId, &EdgeData)> {
        let Some(&node_idx) = self.node_index.get(node) else {
            return Vec::new();
        };

        self.graph
            .edges(node_idx)
            .map(|edge| {
                let other_idx = if edge.source() == node_idx {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other_idx], edge.weight())
            })
            .collect()
    }

    fn degree(&self, node: &AgentId) -> usize {
        self.node_index
            .get(node)
            .map(|&idx| self.graph.edges(idx).count())
            .unwrap_or(0)
    }

    fn all_nodes(&self) -> Vec<AgentId> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx])
            .collect()
    }

    fn all_edges(&self) -> Vec<(AgentId, AgentId, &EdgeData)> {
        self.graph
            .edge_indices()
            .filter_map(|idx| {
                let (a, b) = self.graph.edge_endpoints(idx)?;
                Some((self.graph[a], self.graph[b], &self.graph[idx]))
            })
            .collect()
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn decay_edges(&mut self, rate: f64) {
        let factor = 1.0 - rate;
        // Indices are collected up front so the pass sees the graph as it stood.
        let indices: Vec<_> = self.graph.edge_indices().collect();
        for edge_idx in indices {
            if let Some(edge) = self.graph.edge_weight_mut(edge_idx) {
                edge.scale(factor);
            }
        }
    }

    fn component_sizes(&self) -> Vec<usize> {
        let mut visited = HashSet::new();
        let mut sizes = Vec::new();

        for node_idx in self.graph.node_indices() {
            if !visited.insert(node_idx) {
                continue;
            }
            let mut size = 0usize;
            let mut queue = VecDeque::new();
            queue.push_back(node_idx);
            while let Some(current) = queue.pop_front() {
                size += 1;
                for next in self.graph.neighbors(current) {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            sizes.push(size);
        }

        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(n: u64) -> PetRelationshipGraph {
        let mut graph = PetRelationshipGraph::new();
        for i in 0..n {
            graph.add_node(AgentId(i));
        }
        graph
    }

    #[test]
    fn add_and_retrieve_edges() {
        let mut graph = graph_with(2);
        assert!(graph.set_edge(AgentId(0), AgentId(1), EdgeData::new(0.4)));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.get_edge(&AgentId(0), &AgentId(1)).unwrap().strength, 0.4);
        // Undirected: the reverse lookup sees the same edge
        assert_eq!(graph.get_edge(&AgentId(1), &AgentId(0)).unwrap().strength, 0.4);
    }

    #[test]
    fn set_edge_replaces_instead_of_duplicating() {
        let mut graph = graph_with(2);
        graph.set_edge(AgentId(0), AgentId(1), EdgeData::new(0.7));
        assert!(!graph.set_edge(AgentId(1), AgentId(0), EdgeData::new(0.1)));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.get_edge(&AgentId(0), &AgentId(1)).unwrap().strength, 0.1);
    }

    #[test]
    fn self_loops_and_missing_nodes_are_rejected() {
        let mut graph = graph_with(2);
        assert!(!graph.set_edge(AgentId(0), AgentId(0), EdgeData::new(0.5)));
        assert!(!graph.set_edge(AgentId(0), AgentId(7), EdgeData::new(0.5)));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn strengths_are_clamped_on_write() {
        let mut graph = graph_with(2);
        graph.set_edge(AgentId(0), AgentId(1), EdgeData { strength: 3.0 });
        assert_eq!(graph.get_edge(&AgentId(0), &AgentId(1)).unwrap().strength, 1.0);

        graph.strengthen_or_create(AgentId(0), AgentId(1), 0.5);
        assert_eq!(graph.get_edge(&AgentId(0), &AgentId(1)).unwrap().strength, 1.0);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut graph = graph_with(4);
        graph.set_edge(AgentId(0), AgentId(1), EdgeData::new(0.5));
        graph.set_edge(AgentId(0), AgentId(2), EdgeData::new(0.5));
        graph.set_edge(AgentId(2), AgentId(3), EdgeData::new(0.5));

        assert_eq!(graph.remove_node(&AgentId(0)), Some(2));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(&AgentId(2), &AgentId(3)));
        assert_eq!(graph.degree(&AgentId(0)), 0);
        assert_eq!(graph.remove_node(&AgentId(0)), None);

        // Surviving indices still resolve after removal
        graph.add_node(AgentId(4));
        assert!(graph.set_edge(AgentId(3), AgentId(4), EdgeData::new(0.2)));
        assert_eq!(graph.neighbors(&AgentId(3)).len(), 2);
    }

    #[test]
    fn decay_scales_every_edge() {
        let mut graph = graph_with(3);
        graph.set_edge(AgentId(0), AgentId(1), EdgeData::new(1.0));
        graph.set_edge(AgentId(1), AgentId(2), EdgeData::new(0.5));

        graph.decay_edges(0.5);
        assert!((graph.get_edge(&AgentId(0), &AgentId(1)).unwrap().strength - 0.5).abs() < f64::EPSILON);
        assert!((graph.get_edge(&AgentId(1), &AgentId(2)).unwrap().strength - 0.25).abs() < f64::EPSILON);

        graph.decay_edges(0.0);
        assert!((graph.get_edge(&AgentId(0), &AgentId(1)).unwrap().strength - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn component_sizes_largest_first() {
        let mut graph = graph_with(6);
        graph.set_edge(AgentId(0), AgentId(1), EdgeData::new(0.5));
        graph.set_edge(AgentId(1), AgentId(2), EdgeData::new(0.5));
        graph.set_edge(AgentId(3), AgentId(4), EdgeData::new(0.5));

        assert_eq!(graph.component_sizes(), vec![3, 2, 1]);
        assert!(PetRelationshipGraph::new().component_sizes().is_empty());
    }

    #[test]
    fn all_edges_lists_each_pair_once() {
        let mut graph = graph_with(3);
        graph.set_edge(AgentId(0), AgentId(1), EdgeData::new(0.5));
        graph.set_edge(AgentId(2), AgentId(1), EdgeData::new(0.5));
        assert_eq!(graph.all_edges().len(), 2);
        assert_eq!(graph.degree(&AgentId(1)), 2);
    }
}
