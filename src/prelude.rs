//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to build, mutate and persist a
//! flow graph.
//!
//! # Example
//!
//! ```rust,no_run
//! use nagare::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let snapshot = GraphSnapshot::from_file("path/to/flow.json")?;
//! let config = EngineConfig::from_file("path/to/engine.json")?;
//! let mut store = GraphStore::from_snapshot(snapshot, config)?;
//!
//! let outcome = store.apply(Command::RemoveNode { id: "webhook1".to_string() })?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```

// Graph state and mutation
pub use crate::graph::{
    Command, CommandOutcome, ConnectivityIndex, GraphSnapshot, GraphStore, IdGenerator,
    SequentialIds, UuidIds,
};
pub use crate::shared::SharedGraph;

// Node and edge model
pub use crate::model::{Edge, Node, NodeData, NodeKind, NodeRole, Position};

// Predicates
pub use crate::condition::{ComparisonOperator, Predicate, ValueType, evaluate};

// Propagation results
pub use crate::propagation::{Delivery, Effect, EffectKind, PropagationReport};

// Registry and configuration
pub use crate::config::EngineConfig;
pub use crate::registry::NodeTypeRegistry;

// Error types
pub use crate::error::{ConfigError, GraphError, SnapshotError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
