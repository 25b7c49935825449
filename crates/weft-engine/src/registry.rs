//! Process-wide bookkeeping of live simulators.

use std::sync::{Arc, RwLock};

use tracing::debug;

use weft_core::LookupError;

use crate::simulator::Simulator;

/// Append-only collection of simulators, looked up by rendered identifier.
///
/// The registry is injectable: the composition root owns one and passes it
/// to whatever needs lookup, so every test gets a fresh registry. Entries
/// are never removed — they outlive their simulator's terminal state so late
/// callers can still inspect `state()` and `err()`.
#[derive(Default)]
pub struct Registry {
    simulators: RwLock<Vec<Arc<Simulator>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a simulator. O(1), never fails.
    pub fn register(&self, simulator: Arc<Simulator>) {
        debug!(uid = %simulator.id(), "registered");
        self.simulators.write().unwrap().push(simulator);
    }

    /// Find a simulator by its rendered identifier. Linear scan.
    pub fn lookup(&self, id: &str) -> Result<Arc<Simulator>, LookupError> {
        self.simulators
            .read()
            .unwrap()
            .iter()
            .find(|s| s.id().to_string() == id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound { id: id.to_string() })
    }

    /// Number of registered simulators.
    pub fn len(&self) -> usize {
        self.simulators.read().unwrap().len()
    }

    /// Whether no simulator has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block until every currently registered simulator's coordination loop
    /// has exited.
    ///
    /// Simulators registered after this call starts are not waited on. The
    /// backing list is snapshotted first so registration and lookup stay
    /// available while joining.
    pub fn wait_all(&self) {
        let simulators: Vec<_> = self.simulators.read().unwrap().to_vec();
        for simulator in simulators {
            simulator.wait();
        }
    }
}

