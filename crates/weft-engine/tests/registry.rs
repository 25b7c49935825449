//! Integration tests for the simulator registry.
//!
//! Moved out of an inline `#[cfg(test)]` module so the fixtures in
//! `weft-test-utils` (which depends on `weft-engine`) resolve against the
//! same `weft-engine` rlib these tests link.

use std::sync::Arc;

use weft_core::{LifecycleState, LookupError};
use weft_engine::{init_simulator, Registry, Simulator};
use weft_test_utils::{CollectingWriter, ScriptedSimulation, VecReader};

#[test]
fn lookup_finds_registered_simulator() {
    let registry = Registry::new();
    let a = Simulator::new(ScriptedSimulation::new());
    let b = Simulator::new(ScriptedSimulation::new());
    registry.register(Arc::clone(&a));
    registry.register(Arc::clone(&b));
    assert_eq!(registry.len(), 2);

    let found = registry.lookup(&a.id().to_string()).expect("a is registered");
    assert_eq!(found.id(), a.id());
    let found = registry.lookup(&b.id().to_string()).expect("b is registered");
    assert_eq!(found.id(), b.id());
}

#[test]
fn lookup_miss_names_the_requested_id() {
    let registry = Registry::new();
    assert!(registry.is_empty());
    match registry.lookup("C") {
        Err(LookupError::NotFound { id }) => assert_eq!(id, "C"),
        Ok(_) => panic!("lookup of an unregistered id succeeded"),
    }
}

#[test]
fn wait_all_joins_running_simulators() {
    let registry = Registry::new();
    let simulators: Vec<_> = (0..2)
        .map(|_| {
            let (writer, _collected) = CollectingWriter::new();
            init_simulator(
                &registry,
                VecReader::new(Vec::new()),
                writer,
                ScriptedSimulation::new(),
                Vec::new(),
            )
        })
        .collect();
    for simulator in &simulators {
        simulator.run();
    }

    registry.wait_all();

    for simulator in &simulators {
        assert_eq!(simulator.state(), LifecycleState::Finished);
    }
}
