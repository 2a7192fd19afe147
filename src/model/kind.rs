use crate::error::UnknownNodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of node types a flow can contain.
///
/// Serialized by the tag the canvas uses in its JSON (`"eventTrigger"`,
/// `"rateLimit"`, `"ai-analysis"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "eventTrigger")]
    EventTrigger,
    #[serde(rename = "dateTime")]
    DateTime,
    #[serde(rename = "condition")]
    Condition,
    #[serde(rename = "filter")]
    Filter,
    #[serde(rename = "timeout")]
    Timeout,
    #[serde(rename = "approval")]
    Approval,
    #[serde(rename = "rateLimit")]
    RateLimit,
    #[serde(rename = "notification")]
    Notification,
    #[serde(rename = "webhook")]
    Webhook,
    #[serde(rename = "auditLog")]
    AuditLog,
    #[serde(rename = "debugger")]
    Debugger,
    #[serde(rename = "ai-analysis")]
    AiAnalysis,
}

/// Broad role of a node kind in value propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Emits its own value (event stream, schedule).
    Trigger,
    /// Re-emits its input only when a predicate allows it.
    Gate,
    /// Forwards whatever it receives.
    PassThrough,
    /// Routes its input to one of several named source handles.
    Router,
    /// Consumes values; nothing flows further.
    Terminal,
}

impl NodeKind {
    pub const ALL: [NodeKind; 12] = [
        NodeKind::EventTrigger,
        NodeKind::DateTime,
        NodeKind::Condition,
        NodeKind::Filter,
        NodeKind::Timeout,
        NodeKind::Approval,
        NodeKind::RateLimit,
        NodeKind::Notification,
        NodeKind::Webhook,
        NodeKind::AuditLog,
        NodeKind::Debugger,
        NodeKind::AiAnalysis,
    ];

    /// The wire tag of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::EventTrigger => "eventTrigger",
            NodeKind::DateTime => "dateTime",
            NodeKind::Condition => "condition",
            NodeKind::Filter => "filter",
            NodeKind::Timeout => "timeout",
            NodeKind::Approval => "approval",
            NodeKind::RateLimit => "rateLimit",
            NodeKind::Notification => "notification",
            NodeKind::Webhook => "webhook",
            NodeKind::AuditLog => "auditLog",
            NodeKind::Debugger => "debugger",
            NodeKind::AiAnalysis => "ai-analysis",
        }
    }

    pub fn role(&self) -> NodeRole {
        match self {
            NodeKind::EventTrigger | NodeKind::DateTime => NodeRole::Trigger,
            NodeKind::Condition | NodeKind::Filter => NodeRole::Gate,
            NodeKind::Timeout | NodeKind::AiAnalysis => NodeRole::PassThrough,
            NodeKind::Approval | NodeKind::RateLimit => NodeRole::Router,
            NodeKind::Notification
            | NodeKind::Webhook
            | NodeKind::AuditLog
            | NodeKind::Debugger => NodeRole::Terminal,
        }
    }

    /// Multi-output kinds route each value to exactly one named source handle.
    pub fn is_multi_output(&self) -> bool {
        matches!(
            self,
            NodeKind::Condition | NodeKind::Approval | NodeKind::RateLimit
        )
    }

    pub fn is_terminal(&self) -> bool {
        self.role() == NodeRole::Terminal
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownNodeKind(s.to_string()))
    }
}
