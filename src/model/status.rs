use super::NodeKind;
use crate::error::UnknownStatus;
use std::fmt;
use std::str::FromStr;

/// Transition rules of a node kind's `status` field.
pub trait StatusMachine: Copy + PartialEq + FromStr<Err = UnknownStatus> {
    const IDLE: Self;

    /// Whether `self -> next` is a legal move. Resetting to idle always is.
    fn can_transition_to(self, next: Self) -> bool;
}

/// Defines a status enum together with its string mapping.
macro_rules! define_status {
    ( $( $(#[$meta:meta])* $name:ident { $( $variant:ident => $text:literal ),* $(,)? } )* ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum $name {
                $( $variant, )*
            }

            impl $name {
                pub fn as_str(&self) -> &'static str {
                    match self {
                        $( $name::$variant => $text, )*
                    }
                }
            }

            impl FromStr for $name {
                type Err = UnknownStatus;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    match s {
                        $( $text => Ok($name::$variant), )*
                        other => Err(UnknownStatus(other.to_string())),
                    }
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

define_status! {
    /// `idle -> pending -> (success | error)`, re-enterable to `pending` on retry.
    WebhookStatus {
        Idle => "idle",
        Pending => "pending",
        Success => "success",
        Error => "error",
    }

    /// `idle -> sending -> (sent | failed)`.
    NotificationStatus {
        Idle => "idle",
        Sending => "sending",
        Sent => "sent",
        Failed => "failed",
    }

    /// `idle -> pending -> (approved | rejected | timeout)`, terminal once resolved.
    ApprovalStatus {
        Idle => "idle",
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Timeout => "timeout",
    }

    /// `idle -> (allowed | blocked)`, recomputed per incoming value.
    RateLimitStatus {
        Idle => "idle",
        Allowed => "allowed",
        Blocked => "blocked",
    }
}

impl StatusMachine for WebhookStatus {
    const IDLE: Self = WebhookStatus::Idle;

    fn can_transition_to(self, next: Self) -> bool {
        use WebhookStatus::*;
        match (self, next) {
            (_, Idle) => true,
            (_, Pending) => true,
            (Pending, Success | Error) => true,
            (a, b) => a == b,
        }
    }
}

impl StatusMachine for NotificationStatus {
    const IDLE: Self = NotificationStatus::Idle;

    fn can_transition_to(self, next: Self) -> bool {
        use NotificationStatus::*;
        match (self, next) {
            (_, Idle) => true,
            // every new delivery is a fresh send
            (_, Sending) => true,
            (Sending, Sent | Failed) => true,
            (a, b) => a == b,
        }
    }
}

impl StatusMachine for ApprovalStatus {
    const IDLE: Self = ApprovalStatus::Idle;

    fn can_transition_to(self, next: Self) -> bool {
        use ApprovalStatus::*;
        match (self, next) {
            (_, Idle) => true,
            (Idle, Pending) => true,
            (Pending, Approved | Rejected | Timeout) => true,
            (a, b) => a == b,
        }
    }
}

impl StatusMachine for RateLimitStatus {
    const IDLE: Self = RateLimitStatus::Idle;

    fn can_transition_to(self, _next: Self) -> bool {
        true
    }
}

/// Outcome of checking a status write against the node kind's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCheck {
    Allowed,
    Rejected,
    /// The kind has no modeled state machine; any status is accepted.
    Unchecked,
}

fn check<M: StatusMachine>(from: Option<&str>, to: &str) -> StatusCheck {
    let Ok(next) = to.parse::<M>() else {
        return StatusCheck::Rejected;
    };
    // A missing or unparseable current status counts as idle.
    let current = from
        .and_then(|s| s.parse::<M>().ok())
        .unwrap_or(M::IDLE);
    if current.can_transition_to(next) {
        StatusCheck::Allowed
    } else {
        StatusCheck::Rejected
    }
}

/// Validates a `status` write for a node of the given kind.
pub fn check_transition(kind: NodeKind, from: Option<&str>, to: &str) -> StatusCheck {
    match kind {
        NodeKind::Webhook => check::<WebhookStatus>(from, to),
        NodeKind::Notification => check::<NotificationStatus>(from, to),
        NodeKind::Approval => check::<ApprovalStatus>(from, to),
        NodeKind::RateLimit => check::<RateLimitStatus>(from, to),
        NodeKind::EventTrigger
        | NodeKind::DateTime
        | NodeKind::Condition
        | NodeKind::Filter
        | NodeKind::Timeout
        | NodeKind::AuditLog
        | NodeKind::Debugger
        | NodeKind::AiAnalysis => StatusCheck::Unchecked,
    }
}
