//! Topology — the relationship network between organizations.
//!
//! Nodes are agent ids; the agents themselves live in the model's
//! population and are looked up by id. Edges are undirected, at most one
//! per unordered pair, never self-loops, and carry a strength in [0, 1].

use crate::types::*;

/// A handle to the relationship graph.
///
/// This is a trait rather than a concrete type so that agent behavior can
/// be exercised against any backend, including small test doubles.
pub trait RelationshipGraph {
    /// Add a node for an agent. Adding an existing node is a no-op.
    fn add_node(&mut self, id: AgentId);

    /// Remove a node and every incident edge. Returns the number of edges removed,
    /// or `None` if the node was not present.
    fn remove_node(&mut self, id: &AgentId) -> Option<usize>;

    /// Whether the node is present.
    fn contains_node(&self, id: &AgentId) -> bool;

    /// Add or replace the edge between two distinct, present nodes.
    /// Returns `true` if a new edge was created.
    fn set_edge(&mut self, a: AgentId, b: AgentId, data: EdgeData) -> bool;

    /// Get edge data.
    fn get_edge(&self, a: &AgentId, b: &AgentId) -> Option<&EdgeData>;

    /// Get mutable edge data.
    fn get_edge_mut(&mut self, a: &AgentId, b: &AgentId) -> Option<&mut EdgeData>;

    /// Whether an edge joins the two nodes.
    fn has_edge(&self, a: &AgentId, b: &AgentId) -> bool {
        self.get_edge(a, b).is_some()
    }

    /// Get all neighbors of a node with the connecting edge.
    fn neighbors(&self, node: &AgentId) -> Vec<(AgentId, &EdgeData)>;

    /// Number of incident edges; 0 for an absent node.
    fn degree(&self, node: &AgentId) -> usize;

    /// Get all node ids.
    fn all_nodes(&self) -> Vec<AgentId>;

    /// Get all edges, each listed once.
    fn all_edges(&self) -> Vec<(AgentId, AgentId, &EdgeData)>;

    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of edges.
    fn edge_count(&self) -> usize;

    /// Multiply every edge's strength by `1 - rate`.
    fn decay_edges(&mut self, rate: f64);

    /// Sizes of the connected components, largest first.
    fn component_sizes(&self) -> Vec<usize>;

    /// Increase the strength of an existing edge, or create it at `delta`.
    /// Returns `true` if the edge was created.
    fn strengthen_or_create(&mut self, a: AgentId, b: AgentId, delta: f64) -> bool {
        if let Some(edge) = self.get_edge_mut(&a, &b) {
            edge.reinforce(delta);
            false
        } else {
            self.set_edge(a, b, EdgeData::new(delta))
        }
    }
}
