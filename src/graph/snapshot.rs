use super::GraphStore;
use crate::condition::from_json_logic;
use crate::config::EngineConfig;
use crate::error::{GraphError, SnapshotError};
use crate::model::data::{COMPARISON_TARGET, CONDITION, OPERATOR};
use crate::model::{Edge, Node, NodeKind};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use tracing::{debug, warn};

/// The persisted form of a graph: `{ "nodes": [...], "edges": [...] }`.
///
/// Fields the engine does not interpret are carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &str) -> Result<(), SnapshotError> {
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })
    }
}

impl GraphStore {
    /// Builds a store from a persisted graph.
    ///
    /// Duplicate node ids are rejected. Edges that reference a missing node
    /// or reuse an edge id are dropped. Condition nodes that only carry the
    /// nested predicate form get the flat fields filled in. No propagation
    /// runs: node data is taken as saved.
    pub fn from_snapshot(
        snapshot: GraphSnapshot,
        config: EngineConfig,
    ) -> Result<Self, SnapshotError> {
        let mut seen = AHashSet::new();
        for node in &snapshot.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateId(node.id.clone()).into());
            }
        }

        let registry = config.registry();
        let nodes: Vec<Node> = snapshot
            .nodes
            .into_iter()
            .map(|mut node| {
                registry.ensure_label(node.kind, &mut node.data);
                normalize_predicate(&mut node);
                node
            })
            .collect();

        let node_ids: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let mut edge_ids = AHashSet::new();
        let mut edges = Vec::with_capacity(snapshot.edges.len());
        for edge in snapshot.edges {
            if !node_ids.contains(edge.source.as_str())
                || !node_ids.contains(edge.target.as_str())
            {
                warn!(edge_id = %edge.id, edge = %edge, "dropping dangling edge from snapshot");
                continue;
            }
            if !edge_ids.insert(edge.id.clone()) {
                warn!(edge_id = %edge.id, "dropping edge with duplicate id from snapshot");
                continue;
            }
            edges.push(edge);
        }

        debug!(nodes = nodes.len(), edges = edges.len(), "snapshot_loaded");
        Ok(GraphStore::from_parts(config, nodes, edges))
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes().to_vec(),
            edges: self.edges().to_vec(),
        }
    }
}

/// Fills `operator` / `comparisonTarget` from a nested `condition` rule.
///
/// The nested field itself stays in place so it round-trips verbatim.
fn normalize_predicate(node: &mut Node) {
    if node.kind != NodeKind::Condition || node.data.operator().is_some() {
        return;
    }
    let Some(flat) = node.data.get(CONDITION).and_then(from_json_logic) else {
        return;
    };
    debug!(node_id = %node.id, operator = %flat.operator, "normalized nested condition");
    node.data
        .insert(OPERATOR, Value::String(flat.operator.symbol().to_string()));
    node.data.insert(COMPARISON_TARGET, flat.comparison_target);
}
