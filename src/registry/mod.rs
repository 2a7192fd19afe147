//! Static per-kind knowledge: default data, output fields, idle projection
//! and source handle names.

use crate::model::data::{
    COMPARISON_TARGET, COUNT, FILTER_VALUE, LABEL, LOGS, OPERATOR, RESULT, STATUS, VALUE,
    VALUE_TYPE,
};
use crate::model::{NodeData, NodeKind};
use ahash::AHashMap;
use serde_json::{Map, Value};

mod defaults;

pub use defaults::builtin_default;

pub const HANDLE_TRUE: &str = "true";
pub const HANDLE_FALSE: &str = "false";
pub const HANDLE_APPROVED: &str = "approved";
pub const HANDLE_REJECTED: &str = "rejected";
pub const HANDLE_ALLOWED: &str = "allowed";
pub const HANDLE_BLOCKED: &str = "blocked";

/// Fields holding in-flight runtime state rather than configuration.
const RUNTIME_FIELDS: [&str; 5] = [VALUE, STATUS, RESULT, COUNT, LOGS];

/// Maps each node kind to its default configuration and propagation metadata.
///
/// Deployment overrides are shallow-merged over the built-in literals. Nodes
/// own a copy of their data, so changing a default later never touches nodes
/// that already exist.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    overrides: AHashMap<NodeKind, Map<String, Value>>,
}

impl NodeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: AHashMap<NodeKind, Map<String, Value>>) -> Self {
        Self { overrides }
    }

    /// Replaces (or adds) the deployment override for one kind.
    pub fn set_override(&mut self, kind: NodeKind, partial: Map<String, Value>) {
        self.overrides.insert(kind, partial);
    }

    pub fn default_data(&self, kind: NodeKind) -> NodeData {
        let mut data = NodeData::from(builtin_default(kind));
        if let Some(partial) = self.overrides.get(&kind) {
            data.merge(partial);
        }
        data
    }

    pub fn default_label(&self, kind: NodeKind) -> String {
        self.default_data(kind)
            .label()
            .map(str::to_string)
            .unwrap_or_else(|| kind.as_str().to_string())
    }

    /// The data field carrying the value a node emits, `None` for terminal kinds.
    pub fn output_field(&self, kind: NodeKind) -> Option<&'static str> {
        (!kind.is_terminal()).then_some(VALUE)
    }

    /// Fields whose change can alter what a node emits.
    ///
    /// An `updateNodeData` touching any of these starts a propagation pass.
    pub fn output_fields(&self, kind: NodeKind) -> &'static [&'static str] {
        match kind {
            NodeKind::EventTrigger | NodeKind::DateTime => &[VALUE],
            NodeKind::Condition | NodeKind::Filter => {
                &[VALUE, OPERATOR, COMPARISON_TARGET, FILTER_VALUE, VALUE_TYPE]
            }
            NodeKind::Timeout | NodeKind::AiAnalysis => &[VALUE],
            NodeKind::Approval | NodeKind::RateLimit => &[VALUE, STATUS],
            NodeKind::Notification
            | NodeKind::Webhook
            | NodeKind::AuditLog
            | NodeKind::Debugger => &[],
        }
    }

    pub fn is_output_relevant(&self, kind: NodeKind, partial: &Map<String, Value>) -> bool {
        let fields = self.output_fields(kind);
        partial.keys().any(|key| fields.contains(&key.as_str()))
    }

    /// Named source handles of a multi-output kind, empty for single-output kinds.
    pub fn source_handles(&self, kind: NodeKind) -> &'static [&'static str] {
        match kind {
            NodeKind::Condition => &[HANDLE_TRUE, HANDLE_FALSE],
            NodeKind::Approval => &[HANDLE_APPROVED, HANDLE_REJECTED],
            NodeKind::RateLimit => &[HANDLE_ALLOWED, HANDLE_BLOCKED],
            NodeKind::EventTrigger
            | NodeKind::DateTime
            | NodeKind::Filter
            | NodeKind::Timeout
            | NodeKind::Notification
            | NodeKind::Webhook
            | NodeKind::AuditLog
            | NodeKind::Debugger
            | NodeKind::AiAnalysis => &[],
        }
    }

    /// The runtime fields of `kind` reset to their initial values.
    ///
    /// Always taken from the built-in table: overrides configure nodes, they
    /// do not redefine what "idle" means.
    pub fn idle_projection(&self, kind: NodeKind) -> Map<String, Value> {
        let builtin = builtin_default(kind);
        let mut idle = Map::new();
        for field in RUNTIME_FIELDS {
            if let Some(initial) = builtin.get(field) {
                idle.insert(field.to_string(), initial.clone());
            }
        }
        idle
    }

    /// Copies configuration fields of `data` and resets its runtime fields.
    pub fn idle_copy(&self, kind: NodeKind, data: &NodeData) -> NodeData {
        let mut copy = data.clone();
        copy.merge(&self.idle_projection(kind));
        // value is runtime state for every kind, even ones whose default omits it
        if copy.contains(VALUE) {
            copy.insert(VALUE, Value::Null);
        }
        copy
    }

    /// Fills a missing `label` from the kind's default.
    pub fn ensure_label(&self, kind: NodeKind, data: &mut NodeData) {
        if !data.contains(LABEL) {
            data.insert(LABEL, Value::String(self.default_label(kind)));
        }
    }
}
