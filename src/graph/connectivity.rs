use crate::model::{Edge, Node};
use ahash::AHashMap;
use itertools::Itertools;

/// Read-only neighbor queries computed fresh from the edge list.
///
/// Edges whose other endpoint no longer exists are skipped rather than
/// reported, so a dangling edge never surfaces as a missing node. Node
/// lookups go through an id map built once, so each query is linear in the
/// number of edges.
#[derive(Debug, Clone)]
pub struct ConnectivityIndex<'a> {
    by_id: AHashMap<&'a str, &'a Node>,
    edges: &'a [Edge],
}

impl<'a> ConnectivityIndex<'a> {
    pub fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let by_id = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        Self { by_id, edges }
    }

    fn node(&self, id: &str) -> Option<&'a Node> {
        self.by_id.get(id).copied()
    }

    fn exists(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Edges into `node_id` whose source still exists, in insertion order.
    pub fn incoming_edges(&self, node_id: &str) -> Vec<&'a Edge> {
        self.edges
            .iter()
            .filter(|e| e.target == node_id && self.exists(&e.source))
            .collect()
    }

    /// Edges out of `node_id` whose target still exists, in insertion order.
    pub fn outgoing_edges(&self, node_id: &str) -> Vec<&'a Edge> {
        self.edges
            .iter()
            .filter(|e| e.source == node_id && self.exists(&e.target))
            .collect()
    }

    /// Nodes feeding into `node_id`, each listed once.
    pub fn source_nodes_of(&self, node_id: &str) -> Vec<&'a Node> {
        self.incoming_edges(node_id)
            .into_iter()
            .filter_map(|e| self.node(&e.source))
            .unique_by(|n| n.id.clone())
            .collect()
    }

    /// Nodes fed by `node_id`, each listed once.
    pub fn target_nodes_of(&self, node_id: &str) -> Vec<&'a Node> {
        self.outgoing_edges(node_id)
            .into_iter()
            .filter_map(|e| self.node(&e.target))
            .unique_by(|n| n.id.clone())
            .collect()
    }

    pub fn has_upstream(&self, node_id: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.target == node_id && self.exists(&e.source))
    }

    /// Edges with at least one endpoint missing.
    pub fn dangling_edges(&self) -> Vec<&'a Edge> {
        self.edges
            .iter()
            .filter(|e| !self.exists(&e.source) || !self.exists(&e.target))
            .collect()
    }
}
