//! Pushes node outputs to downstream nodes.
//!
//! A pass starts at one node, delivers its output along the edges its route
//! selects and recurses depth-first into every node that received something.
//! Each (node, value) pair is delivered at most once per pass, and the total
//! number of deliveries is bounded by the engine configuration, so a pass
//! always terminates, cycles included.

use crate::graph::GraphStore;
use crate::model::data::RESULT;
use crate::model::Edge;
use ahash::AHashSet;
use serde_json::{Map, Value};
use tracing::{debug, debug_span, warn};

pub mod report;
pub mod rules;

pub use report::*;
pub use rules::{Reception, Route};

/// Runs one propagation pass against a store.
pub struct ValuePropagator<'s> {
    store: &'s mut GraphStore,
    report: PropagationReport,
    visited: AHashSet<(String, String)>,
    steps: usize,
    max_steps: usize,
}

impl<'s> ValuePropagator<'s> {
    /// Starts a pass whose findings are appended to `report`.
    pub fn new(store: &'s mut GraphStore, report: PropagationReport) -> Self {
        let max_steps = store.config().max_propagation_steps;
        Self {
            store,
            report,
            visited: AHashSet::new(),
            steps: 0,
            max_steps,
        }
    }

    /// Propagates the current output of `origin` to everything downstream.
    pub fn run(mut self, origin: &str) -> PropagationReport {
        let span = debug_span!("propagate", origin = %origin);
        let _guard = span.enter();

        if let Some((value, handle)) = self.decide(origin) {
            self.visited.insert(visit_key(origin, &value));
            self.send(origin, &value, handle);
        }
        self.finish()
    }

    /// Delivers the current output of an edge's source along that edge only,
    /// then continues downstream from its target.
    pub fn run_edge(mut self, edge_id: &str) -> PropagationReport {
        let span = debug_span!("propagate_edge", edge_id = %edge_id);
        let _guard = span.enter();

        let Some(edge) = self.store.edge(edge_id).cloned() else {
            return self.finish();
        };
        if let Some((value, handle)) = self.decide(&edge.source) {
            if accepts(&edge, handle) {
                self.visited.insert(visit_key(&edge.source, &value));
                self.deliver(&edge, &value);
            }
        }
        self.finish()
    }

    fn finish(self) -> PropagationReport {
        if self.steps > 0 {
            debug!(
                deliveries = self.report.deliveries.len(),
                cycle_cuts = self.report.cycle_cuts,
                truncated = self.report.truncated,
                "propagation_finished"
            );
        }
        self.report
    }

    /// Routes `node_id`'s current data. Records gate outcomes on the node.
    fn decide(&mut self, node_id: &str) -> Option<(Value, Option<&'static str>)> {
        let node = self.store.node(node_id)?;
        let (route, gate) = rules::route(node);

        if let Some(passed) = gate {
            let input = node.data.value().cloned().unwrap_or(Value::Null);
            self.report.evaluations.push(GateEvaluation {
                node_id: node_id.to_string(),
                input,
                passed,
            });
            let mut result = Map::new();
            result.insert(RESULT.to_string(), Value::Bool(passed));
            self.store.apply_data(node_id, result, &mut self.report);
        }

        match route {
            Route::Emit { value, handle } => Some((value, handle)),
            Route::Held => {
                debug!(node_id = %node_id, "output held until status resolves");
                None
            }
            Route::Filtered => {
                debug!(node_id = %node_id, "filter rejected value");
                None
            }
            Route::Silent => None,
        }
    }

    fn send(&mut self, node_id: &str, value: &Value, handle: Option<&'static str>) {
        let edges: Vec<Edge> = self
            .store
            .connectivity()
            .outgoing_edges(node_id)
            .into_iter()
            .filter(|e| accepts(e, handle))
            .cloned()
            .collect();

        for edge in &edges {
            if self.report.truncated {
                break;
            }
            self.deliver(edge, value);
        }
    }

    fn deliver(&mut self, edge: &Edge, value: &Value) {
        if !self.visited.insert(visit_key(&edge.target, value)) {
            warn!(
                edge_id = %edge.id,
                target = %edge.target,
                "cycle guard: value already delivered in this pass"
            );
            self.report.cycle_cuts += 1;
            return;
        }
        if self.steps >= self.max_steps {
            warn!(
                max_steps = self.max_steps,
                origin = %self.report.origin,
                "propagation stopped at step bound"
            );
            self.report.truncated = true;
            return;
        }

        let Some(target) = self.store.node(&edge.target) else {
            return;
        };
        let reception = rules::receive(target, &edge.source, value);
        self.steps += 1;
        self.store
            .apply_data(&edge.target, reception.partial, &mut self.report);

        debug!(
            edge_id = %edge.id,
            source = %edge.source,
            target = %edge.target,
            value = %value,
            "value_delivered"
        );
        self.report.deliveries.push(Delivery {
            edge_id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            source_handle: edge.source_handle.clone(),
            value: value.clone(),
        });
        if let Some(kind) = reception.effect {
            self.report.effects.push(Effect {
                node_id: edge.target.clone(),
                kind,
                value: value.clone(),
            });
        }

        if reception.hold {
            debug!(node_id = %edge.target, "value held by resolved node");
            return;
        }
        if let Some((next, handle)) = self.decide(&edge.target) {
            self.send(&edge.target, &next, handle);
        }
    }
}

fn accepts(edge: &Edge, handle: Option<&str>) -> bool {
    match handle {
        None => true,
        Some(h) => edge.source_handle() == Some(h),
    }
}

fn visit_key(node_id: &str, value: &Value) -> (String, String) {
    (node_id.to_string(), value.to_string())
}
