//! The graph store and everything that reads or persists it.

mod command;
mod connectivity;
mod ids;
mod snapshot;
mod store;

pub use command::{Command, CommandOutcome};
pub use connectivity::ConnectivityIndex;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use snapshot::GraphSnapshot;
pub use store::GraphStore;
