use super::GraphStore;
use crate::error::GraphError;
use crate::model::{Node, NodeKind, Position};
use crate::propagation::PropagationReport;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single mutation request, as produced by an editor or an inbound event.
///
/// ```json
/// { "command": "updateNodeData", "id": "trigger1", "partial": { "value": 42 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    AddNode {
        node: Node,
    },
    CreateNode {
        kind: NodeKind,
        #[serde(default)]
        position: Position,
    },
    RemoveNode {
        id: String,
    },
    DuplicateNode {
        id: String,
    },
    MoveNode {
        id: String,
        position: Position,
    },
    Connect {
        source: String,
        target: String,
        #[serde(default)]
        source_handle: Option<String>,
        #[serde(default)]
        target_handle: Option<String>,
    },
    Disconnect {
        edge_id: String,
    },
    SplitEdge {
        edge_id: String,
        kind: NodeKind,
        #[serde(default)]
        position: Position,
    },
    UpdateNodeData {
        id: String,
        partial: Map<String, Value>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddNode { .. } => "addNode",
            Command::CreateNode { .. } => "createNode",
            Command::RemoveNode { .. } => "removeNode",
            Command::DuplicateNode { .. } => "duplicateNode",
            Command::MoveNode { .. } => "moveNode",
            Command::Connect { .. } => "connect",
            Command::Disconnect { .. } => "disconnect",
            Command::SplitEdge { .. } => "splitEdge",
            Command::UpdateNodeData { .. } => "updateNodeData",
        }
    }
}

/// What applying a [`Command`] produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CommandOutcome {
    NodeAdded {
        id: String,
    },
    NodeRemoved {
        report: PropagationReport,
    },
    /// `None` when the source node did not exist.
    NodeDuplicated {
        id: Option<String>,
    },
    NodeMoved {
        found: bool,
    },
    Connected {
        edge_id: String,
        report: PropagationReport,
    },
    Disconnected {
        report: PropagationReport,
    },
    EdgeSplit {
        node_id: String,
        report: PropagationReport,
    },
    /// `None` when the node did not exist.
    DataUpdated {
        report: Option<PropagationReport>,
    },
}

impl CommandOutcome {
    /// The propagation report carried by this outcome, if any.
    pub fn report(&self) -> Option<&PropagationReport> {
        match self {
            CommandOutcome::NodeRemoved { report }
            | CommandOutcome::Connected { report, .. }
            | CommandOutcome::Disconnected { report }
            | CommandOutcome::EdgeSplit { report, .. } => Some(report),
            CommandOutcome::DataUpdated { report } => report.as_ref(),
            CommandOutcome::NodeAdded { .. }
            | CommandOutcome::NodeDuplicated { .. }
            | CommandOutcome::NodeMoved { .. } => None,
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::NodeAdded { id } => write!(f, "added node {}", id),
            CommandOutcome::NodeRemoved { report } => write!(f, "removed node {}", report.origin),
            CommandOutcome::NodeDuplicated { id: Some(id) } => write!(f, "duplicated as {}", id),
            CommandOutcome::NodeDuplicated { id: None } => write!(f, "nothing to duplicate"),
            CommandOutcome::NodeMoved { found } => {
                if *found {
                    write!(f, "moved node")
                } else {
                    write!(f, "nothing to move")
                }
            }
            CommandOutcome::Connected { edge_id, .. } => write!(f, "connected {}", edge_id),
            CommandOutcome::Disconnected { .. } => write!(f, "disconnected edge"),
            CommandOutcome::EdgeSplit { node_id, .. } => write!(f, "split edge with {}", node_id),
            CommandOutcome::DataUpdated { report: Some(r) } => {
                write!(f, "updated {} ({} deliveries)", r.origin, r.deliveries.len())
            }
            CommandOutcome::DataUpdated { report: None } => write!(f, "nothing to update"),
        }
    }
}

impl GraphStore {
    /// Applies one command fully before returning.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, GraphError> {
        let outcome = match command {
            Command::AddNode { node } => {
                let id = node.id.clone();
                self.add_node(node)?;
                CommandOutcome::NodeAdded { id }
            }
            Command::CreateNode { kind, position } => CommandOutcome::NodeAdded {
                id: self.create_node(kind, position),
            },
            Command::RemoveNode { id } => CommandOutcome::NodeRemoved {
                report: self.remove_node(&id),
            },
            Command::DuplicateNode { id } => CommandOutcome::NodeDuplicated {
                id: self.duplicate_node(&id),
            },
            Command::MoveNode { id, position } => CommandOutcome::NodeMoved {
                found: self.move_node(&id, position),
            },
            Command::Connect {
                source,
                target,
                source_handle,
                target_handle,
            } => {
                let (edge_id, report) = self.connect(
                    &source,
                    &target,
                    source_handle.as_deref(),
                    target_handle.as_deref(),
                )?;
                CommandOutcome::Connected { edge_id, report }
            }
            Command::Disconnect { edge_id } => CommandOutcome::Disconnected {
                report: self.disconnect(&edge_id)?,
            },
            Command::SplitEdge {
                edge_id,
                kind,
                position,
            } => {
                let (node_id, report) = self.split_edge(&edge_id, kind, position)?;
                CommandOutcome::EdgeSplit { node_id, report }
            }
            Command::UpdateNodeData { id, partial } => CommandOutcome::DataUpdated {
                report: self.update_node_data(&id, partial),
            },
        };
        Ok(outcome)
    }
}
