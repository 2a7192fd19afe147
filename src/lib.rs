//! # Nagare - Flow Graph State and Value Propagation
//!
//! **Nagare** keeps the state of a node-based automation flow: typed nodes
//! (triggers, conditions, filters, approvals, webhooks, ...) joined by directed
//! edges. Whenever a node's output changes, the value is pushed downstream,
//! gated by condition predicates and routed by node-specific rules.
//!
//! ## Core Workflow
//!
//! 1.  **Load or Build a Graph**: Read a [`graph::GraphSnapshot`] from JSON, or
//!     start from an empty [`graph::GraphStore`] and add nodes.
//! 2.  **Mutate**: Call the store's operations directly, or send it
//!     [`graph::Command`] messages. Every mutation is applied fully before the next.
//! 3.  **Observe**: Each mutation that moves values returns a
//!     [`propagation::PropagationReport`] listing deliveries, gate outcomes and
//!     the external effects (webhook calls, notifications) the caller should start.
//! 4.  **Persist**: Take a snapshot and save it back to JSON.
//!
//! ## Quick Start
//!
//! ```rust
//! use nagare::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<()> {
//! let mut store = GraphStore::new();
//! store.add_node(Node::new("trigger1", NodeKind::EventTrigger, NodeData::new()))?;
//! store.add_node(Node::new(
//!     "cond1",
//!     NodeKind::Condition,
//!     NodeData::from(json!({ "operator": ">", "comparisonTarget": 100, "valueType": "number" })
//!         .as_object()
//!         .cloned()
//!         .unwrap_or_default()),
//! ))?;
//! store.add_node(Node::new("log1", NodeKind::AuditLog, NodeData::new()))?;
//!
//! store.connect("trigger1", "cond1", None, None)?;
//! store.connect("cond1", "log1", Some("true"), None)?;
//!
//! let mut partial = serde_json::Map::new();
//! partial.insert("value".to_string(), json!(150));
//! let report = store.update_node_data("trigger1", partial).unwrap_or_default();
//!
//! assert_eq!(report.delivered_to("log1"), Some(&json!(150)));
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod condition;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod prelude;
pub mod propagation;
pub mod registry;
pub mod shared;
