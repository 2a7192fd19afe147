use super::report::EffectKind;
use crate::condition::Predicate;
use crate::model::data::{COUNT, LOGS, STATUS, VALUE};
use crate::model::{ApprovalStatus, Node, NodeKind, RateLimitStatus};
use crate::registry::{
    HANDLE_ALLOWED, HANDLE_APPROVED, HANDLE_BLOCKED, HANDLE_FALSE, HANDLE_REJECTED, HANDLE_TRUE,
};
use serde_json::{Map, Value, json};

/// What a node sends downstream given its current data.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Nothing to send: terminal kind or no live value.
    Silent,
    /// A router waiting for its status to resolve.
    Held,
    /// A filter whose predicate failed. Targets are left untouched.
    Filtered,
    /// Send `value` to edges on `handle`, or to every edge when `None`.
    Emit {
        value: Value,
        handle: Option<&'static str>,
    },
}

/// Decides the route of `node` and, for gating kinds, the predicate outcome.
///
/// Triggers and pass-through kinds emit whenever they hold a non-null value.
/// Their `status` field is display state only and never gates output.
pub fn route(node: &Node) -> (Route, Option<bool>) {
    let Some(value) = node.data.value().cloned() else {
        return (Route::Silent, None);
    };

    match node.kind {
        NodeKind::EventTrigger | NodeKind::DateTime | NodeKind::Timeout | NodeKind::AiAnalysis => {
            (Route::Emit { value, handle: None }, None)
        }
        NodeKind::Condition => {
            let passed = Predicate::from_data(&node.data).test(&value);
            let handle = if passed { HANDLE_TRUE } else { HANDLE_FALSE };
            (
                Route::Emit {
                    value,
                    handle: Some(handle),
                },
                Some(passed),
            )
        }
        NodeKind::Filter => {
            let passed = Predicate::from_data(&node.data).test(&value);
            if passed {
                (Route::Emit { value, handle: None }, Some(true))
            } else {
                (Route::Filtered, Some(false))
            }
        }
        NodeKind::Approval => {
            let status = node.data.status().and_then(|s| s.parse().ok());
            match status {
                Some(ApprovalStatus::Approved) => (
                    Route::Emit {
                        value,
                        handle: Some(HANDLE_APPROVED),
                    },
                    None,
                ),
                Some(ApprovalStatus::Rejected) => (
                    Route::Emit {
                        value,
                        handle: Some(HANDLE_REJECTED),
                    },
                    None,
                ),
                _ => (Route::Held, None),
            }
        }
        NodeKind::RateLimit => {
            let status = node.data.status().and_then(|s| s.parse().ok());
            match status {
                Some(RateLimitStatus::Allowed) => (
                    Route::Emit {
                        value,
                        handle: Some(HANDLE_ALLOWED),
                    },
                    None,
                ),
                Some(RateLimitStatus::Blocked) => (
                    Route::Emit {
                        value,
                        handle: Some(HANDLE_BLOCKED),
                    },
                    None,
                ),
                _ => (Route::Held, None),
            }
        }
        NodeKind::Notification | NodeKind::Webhook | NodeKind::AuditLog | NodeKind::Debugger => {
            (Route::Silent, None)
        }
    }
}

/// The data change a delivery of `value` from `source` makes on `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reception {
    pub partial: Map<String, Value>,
    pub effect: Option<EffectKind>,
    /// The target keeps the value but must not forward it in this pass.
    pub hold: bool,
}

pub fn receive(target: &Node, source: &str, value: &Value) -> Reception {
    let mut partial = Map::new();
    partial.insert(VALUE.to_string(), value.clone());
    let mut effect = None;
    let mut hold = false;

    match target.kind {
        NodeKind::EventTrigger
        | NodeKind::DateTime
        | NodeKind::Condition
        | NodeKind::Filter
        | NodeKind::Timeout
        | NodeKind::AiAnalysis => {}
        NodeKind::Webhook => {
            partial.insert(STATUS.to_string(), json!("pending"));
            effect = Some(EffectKind::Webhook);
        }
        NodeKind::Notification => {
            partial.insert(STATUS.to_string(), json!("sending"));
            effect = Some(EffectKind::Notification);
        }
        NodeKind::Approval => {
            let status = target.data.status().map(str::parse::<ApprovalStatus>);
            match status {
                None | Some(Ok(ApprovalStatus::Idle)) => {
                    partial.insert(STATUS.to_string(), json!(ApprovalStatus::Pending.as_str()));
                }
                // A decision covers the value it was made on. Later values wait
                // for a reset and a fresh decision.
                Some(Ok(
                    ApprovalStatus::Approved | ApprovalStatus::Rejected | ApprovalStatus::Timeout,
                )) => hold = true,
                Some(_) => {}
            }
        }
        NodeKind::RateLimit => {
            let count = target.data.count() + 1;
            let within = target.data.limit().is_none_or(|limit| count <= limit);
            let status = if within {
                RateLimitStatus::Allowed
            } else {
                RateLimitStatus::Blocked
            };
            partial.insert(COUNT.to_string(), json!(count));
            partial.insert(STATUS.to_string(), json!(status.as_str()));
        }
        NodeKind::AuditLog | NodeKind::Debugger => {
            let mut logs = target.data.logs().to_vec();
            logs.push(json!({ "source": source, "value": value }));
            partial.insert(LOGS.to_string(), Value::Array(logs));
        }
    }

    Reception {
        partial,
        effect,
        hold,
    }
}
