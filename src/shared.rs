//! A cloneable handle that lets many producers feed one store.

use crate::error::GraphError;
use crate::graph::{Command, CommandOutcome, GraphSnapshot, GraphStore};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Single-writer access to a [`GraphStore`] shared across threads.
///
/// Each submitted command holds the lock for its whole mutation and
/// propagation pass, so commands are applied one at a time in lock order.
#[derive(Debug, Clone)]
pub struct SharedGraph {
    inner: Arc<Mutex<GraphStore>>,
}

impl SharedGraph {
    pub fn new(store: GraphStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GraphStore> {
        // rejected commands never mutate, so a poisoned store is still consistent
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("graph lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn submit(&self, command: Command) -> Result<CommandOutcome, GraphError> {
        let name = command.name();
        let mut store = self.lock();
        debug!(command = name, "applying command");
        store.apply(command)
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut GraphStore) -> R) -> R {
        let mut store = self.lock();
        f(&mut store)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.lock().snapshot()
    }
}

impl From<GraphStore> for SharedGraph {
    fn from(store: GraphStore) -> Self {
        Self::new(store)
    }
}
