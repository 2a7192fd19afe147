use super::connectivity::ConnectivityIndex;
use super::ids::{IdGenerator, UuidIds};
use crate::config::EngineConfig;
use crate::error::GraphError;
use crate::model::data::{STATUS, VALUE};
use crate::model::{Edge, Node, NodeKind, Position, StatusCheck, check_transition};
use crate::propagation::{PropagationReport, RejectedTransition, ValuePropagator};
use crate::registry::NodeTypeRegistry;
use ahash::AHashSet;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, warn};

/// Owns the canonical node and edge lists of one flow graph.
///
/// Every mutation goes through this type. Rejected mutations return an error
/// before anything is changed, and every change that can alter a node's
/// output runs a [`ValuePropagator`] pass before returning.
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    registry: NodeTypeRegistry,
    config: EngineConfig,
    ids: Box<dyn IdGenerator>,
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            registry: config.registry(),
            config,
            ids: Box::new(UuidIds),
        }
    }

    /// Replaces the id source used for created nodes and edges.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    // --- Queries ---

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn connectivity(&self) -> ConnectivityIndex<'_> {
        ConnectivityIndex::new(&self.nodes, &self.edges)
    }

    pub fn source_nodes_of(&self, id: &str) -> Vec<&Node> {
        self.connectivity().source_nodes_of(id)
    }

    pub fn target_nodes_of(&self, id: &str) -> Vec<&Node> {
        self.connectivity().target_nodes_of(id)
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut NodeTypeRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Node mutations ---

    /// Appends a node. Fails if its id is already taken.
    pub fn add_node(&mut self, mut node: Node) -> Result<(), GraphError> {
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateId(node.id));
        }
        self.registry.ensure_label(node.kind, &mut node.data);
        info!(node_id = %node.id, kind = %node.kind, "node_added");
        self.nodes.push(node);
        Ok(())
    }

    /// Palette drop: a node of `kind` seeded from the registry defaults.
    pub fn create_node(&mut self, kind: NodeKind, position: Position) -> String {
        let id = self.fresh_node_id(kind);
        let node = Node::new(id.clone(), kind, self.registry.default_data(kind)).at(position);
        info!(node_id = %id, kind = %kind, "node_created");
        self.nodes.push(node);
        id
    }

    /// Removes a node and every edge touching it.
    ///
    /// Targets left without any upstream connection get their live value
    /// cleared. Removing an unknown id does nothing.
    pub fn remove_node(&mut self, id: &str) -> PropagationReport {
        let mut report = PropagationReport::new(id);
        let Some(index) = self.nodes.iter().position(|n| n.id == id) else {
            debug!(node_id = %id, "remove_node: no such node");
            return report;
        };

        self.nodes.remove(index);
        let removed = self.take_edges(|e| e.touches(id));
        info!(node_id = %id, edges_removed = removed.len(), "node_removed");

        let targets: Vec<String> = removed
            .iter()
            .filter(|e| e.target != id)
            .map(|e| e.target.clone())
            .collect();
        self.clear_orphaned(targets, &mut report);
        report
    }

    /// Copies a node's configuration into a new node next to it.
    ///
    /// Runtime fields (value, status, results, counters, logs) start idle.
    /// Returns `None` if `id` does not exist.
    pub fn duplicate_node(&mut self, id: &str) -> Option<String> {
        let original = self.node(id)?;
        let kind = original.kind;
        let data = self.registry.idle_copy(kind, &original.data);
        let position = original.position.offset(self.config.duplicate_offset);
        let extra = original.extra.clone();

        let new_id = self.fresh_node_id(kind);
        let mut node = Node::new(new_id.clone(), kind, data).at(position);
        node.extra = extra;
        info!(node_id = %new_id, original = %id, "node_duplicated");
        self.nodes.push(node);
        Some(new_id)
    }

    /// Moves a node on the canvas. Returns whether the node exists.
    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Shallow-merges `partial` into a node's data.
    ///
    /// Runs a propagation pass when a field in the kind's output set changed.
    /// Returns `None` if the node does not exist.
    pub fn update_node_data(
        &mut self,
        id: &str,
        partial: Map<String, Value>,
    ) -> Option<PropagationReport> {
        let Some(kind) = self.node(id).map(|n| n.kind) else {
            debug!(node_id = %id, "update_node_data: no such node");
            return None;
        };

        let mut report = PropagationReport::new(id);
        let relevant = self.registry.is_output_relevant(kind, &partial);
        self.apply_data(id, partial, &mut report);

        if relevant {
            report = ValuePropagator::new(self, report).run(id);
        }
        Some(report)
    }

    /// Merges `partial` without propagating, enforcing status transitions.
    ///
    /// An illegal `status` write is dropped and recorded in `report`; the
    /// rest of `partial` still applies.
    pub(crate) fn apply_data(
        &mut self,
        id: &str,
        mut partial: Map<String, Value>,
        report: &mut PropagationReport,
    ) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return false;
        };

        if let Some(next) = partial.get(STATUS).and_then(Value::as_str) {
            let current = node.data.status();
            if check_transition(node.kind, current, next) == StatusCheck::Rejected {
                warn!(
                    node_id = %id,
                    from = current.unwrap_or("idle"),
                    to = next,
                    "status transition rejected"
                );
                report.rejected_transitions.push(RejectedTransition {
                    node_id: id.to_string(),
                    from: current.map(str::to_string),
                    to: next.to_string(),
                });
                partial.remove(STATUS);
            }
        }

        node.data.merge(&partial);
        true
    }

    // --- Edge mutations ---

    /// Connects `source` to `target` and returns the edge id.
    ///
    /// If the source already has an output for the new edge's handle it is
    /// delivered at once. Connecting an identical pair of ports twice returns
    /// the existing edge.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
        target_handle: Option<&str>,
    ) -> Result<(String, PropagationReport), GraphError> {
        for endpoint in [source, target] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::UnknownNode(endpoint.to_string()));
            }
        }

        let existing = self
            .edges
            .iter()
            .find(|e| e.connects(source, target, source_handle, target_handle));
        if let Some(existing) = existing {
            debug!(edge_id = %existing.id, "connect: connection already exists");
            return Ok((existing.id.clone(), PropagationReport::new(source)));
        }

        let id = self.fresh_edge_id(source, target);
        let edge = Edge::new(id, source, target).with_handles(
            source_handle.map(str::to_string),
            target_handle.map(str::to_string),
        );
        let edge_id = edge.id.clone();
        info!(edge_id = %edge_id, edge = %edge, "edge_connected");
        self.edges.push(edge);

        let report =
            ValuePropagator::new(self, PropagationReport::new(source)).run_edge(&edge_id);
        Ok((edge_id, report))
    }

    /// Removes an edge and clears its target if that was its last upstream link.
    pub fn disconnect(&mut self, edge_id: &str) -> Result<PropagationReport, GraphError> {
        let Some(index) = self.edges.iter().position(|e| e.id == edge_id) else {
            return Err(GraphError::UnknownEdge(edge_id.to_string()));
        };

        let edge = self.edges.remove(index);
        info!(edge_id = %edge_id, edge = %edge, "edge_disconnected");
        let mut report = PropagationReport::new(edge.source.clone());
        self.clear_orphaned(vec![edge.target], &mut report);
        Ok(report)
    }

    /// Inserts a new node of `kind` into an existing edge A→B.
    ///
    /// The edge is replaced by A→new, keeping its source handle, and new→B,
    /// keeping its target handle. Returns the new node's id.
    pub fn split_edge(
        &mut self,
        edge_id: &str,
        kind: NodeKind,
        position: Position,
    ) -> Result<(String, PropagationReport), GraphError> {
        let Some(index) = self.edges.iter().position(|e| e.id == edge_id) else {
            return Err(GraphError::UnknownEdge(edge_id.to_string()));
        };

        let old = self.edges.remove(index);
        let node_id = self.create_node(kind, position);

        let upstream_id = self.fresh_edge_id(&old.source, &node_id);
        let upstream = Edge::new(upstream_id.clone(), old.source.clone(), node_id.clone())
            .with_handles(old.source_handle.clone(), None);
        let downstream_id = self.fresh_edge_id(&node_id, &old.target);
        let mut downstream = Edge::new(downstream_id, node_id.clone(), old.target.clone())
            .with_handles(None, old.target_handle.clone());
        downstream.edge_type = old.edge_type.clone();
        downstream.animated = old.animated;

        info!(edge_id = %edge_id, node_id = %node_id, "edge_split");
        self.edges.insert(index, downstream);
        self.edges.insert(index, upstream);

        let report =
            ValuePropagator::new(self, PropagationReport::new(old.source)).run_edge(&upstream_id);
        Ok((node_id, report))
    }

    // --- Internals ---

    /// Removes and returns all edges matching `pred`, preserving order of the rest.
    fn take_edges(&mut self, pred: impl Fn(&Edge) -> bool) -> Vec<Edge> {
        let (taken, kept): (Vec<Edge>, Vec<Edge>) =
            std::mem::take(&mut self.edges).into_iter().partition(|e| pred(e));
        self.edges = kept;
        taken
    }

    /// Clears the value of each target that no longer has an upstream link.
    fn clear_orphaned(&mut self, targets: Vec<String>, report: &mut PropagationReport) {
        let mut seen = AHashSet::new();
        for target in targets {
            if !seen.insert(target.clone()) {
                continue;
            }
            let live = self.node(&target).is_some_and(|n| n.data.value().is_some());
            if !live || self.connectivity().has_upstream(&target) {
                continue;
            }
            debug!(node_id = %target, "clearing value of orphaned node");
            let mut partial = Map::new();
            partial.insert(VALUE.to_string(), Value::Null);
            if let Some(cleared) = self.update_node_data(&target, partial) {
                report.absorb(cleared);
            }
        }
    }

    fn fresh_node_id(&mut self, kind: NodeKind) -> String {
        loop {
            let id = self.ids.node_id(kind);
            if !self.contains_node(&id) {
                return id;
            }
        }
    }

    fn fresh_edge_id(&mut self, source: &str, target: &str) -> String {
        loop {
            let id = self.ids.edge_id(source, target);
            if self.edge(&id).is_none() {
                return id;
            }
        }
    }

    /// Builds a store from already-validated parts.
    pub(crate) fn from_parts(config: EngineConfig, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut store = Self::with_config(config);
        store.nodes = nodes;
        store.edges = edges;
        store
    }
}
