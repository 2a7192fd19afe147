use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One value handed from a source node to a target node along an edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub edge_id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    pub value: Value,
}

/// The outcome of a gating node's predicate during a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateEvaluation {
    pub node_id: String,
    pub input: Value,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    Webhook,
    Notification,
}

/// A long-running side effect the caller must start for a node.
///
/// Completion is reported back later as a `status` update on the node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub node_id: String,
    pub kind: EffectKind,
    pub value: Value,
}

/// A `status` write that the node kind's state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedTransition {
    pub node_id: String,
    pub from: Option<String>,
    pub to: String,
}

/// Everything one mutation caused downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationReport {
    /// The node whose change started the pass.
    pub origin: String,
    pub deliveries: Vec<Delivery>,
    pub evaluations: Vec<GateEvaluation>,
    pub effects: Vec<Effect>,
    pub rejected_transitions: Vec<RejectedTransition>,
    /// Deliveries skipped because the (node, value) pair was already visited.
    pub cycle_cuts: usize,
    /// Whether the step bound stopped the pass early.
    pub truncated: bool,
}

impl PropagationReport {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
            && self.evaluations.is_empty()
            && self.effects.is_empty()
            && self.rejected_transitions.is_empty()
            && self.cycle_cuts == 0
            && !self.truncated
    }

    /// The last value delivered to `node_id` in this pass, if any.
    pub fn delivered_to(&self, node_id: &str) -> Option<&Value> {
        self.deliveries
            .iter()
            .rev()
            .find(|d| d.target == node_id)
            .map(|d| &d.value)
    }

    /// Folds another report into this one, keeping this origin.
    pub fn absorb(&mut self, other: PropagationReport) {
        self.deliveries.extend(other.deliveries);
        self.evaluations.extend(other.evaluations);
        self.effects.extend(other.effects);
        self.rejected_transitions.extend(other.rejected_transitions);
        self.cycle_cuts += other.cycle_cuts;
        self.truncated |= other.truncated;
    }
}

impl fmt::Display for PropagationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.origin)?;
        let mut lines: Vec<String> = Vec::new();
        for eval in &self.evaluations {
            let verdict = if eval.passed { "passed" } else { "failed" };
            lines.push(format!("gate {} {} on {}", eval.node_id, verdict, eval.input));
        }
        for delivery in &self.deliveries {
            let handle = delivery
                .source_handle
                .as_deref()
                .map_or(String::new(), |h| format!("[{}]", h));
            lines.push(format!(
                "{} --{}--> {} = {}",
                delivery.source, handle, delivery.target, delivery.value
            ));
        }
        for effect in &self.effects {
            lines.push(format!("start {:?} for {}", effect.kind, effect.node_id));
        }
        for rejected in &self.rejected_transitions {
            lines.push(format!(
                "rejected status {} -> {} on {}",
                rejected.from.as_deref().unwrap_or("idle"),
                rejected.to,
                rejected.node_id
            ));
        }
        if self.cycle_cuts > 0 {
            lines.push(format!("cycle guard cut {} deliveries", self.cycle_cuts));
        }
        if self.truncated {
            lines.push("stopped at the step bound".to_string());
        }

        let count = lines.len();
        for (i, line) in lines.iter().enumerate() {
            let marker = if i + 1 == count { "└── " } else { "├── " };
            writeln!(f, "{}{}", marker, line)?;
        }
        Ok(())
    }
}
