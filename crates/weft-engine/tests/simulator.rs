//! Integration tests for the simulator coordination loop.
//!
//! These live under `tests/` rather than as an inline `#[cfg(test)]` module
//! because they rely on `weft-test-utils`, which itself depends on
//! `weft-engine`; an integration test links the same `weft-engine` rlib the
//! fixtures were built against, avoiding a duplicate-crate trait mismatch.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use proptest::prelude::*;

use weft_core::{Event, LifecycleState, RunError, RunStatus, Value};
use weft_engine::{init_simulator, Registry, SimOption};
use weft_test_utils::{CollectingWriter, RepeatReader, ScriptedSimulation, VecReader};

fn event(t: i64) -> Event {
    [("t", t)].into_iter().collect()
}

/// Poll until `predicate` holds or a 2s deadline passes.
fn wait_until(predicate: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !predicate() {
        if Instant::now() > deadline {
            panic!("condition not reached within 2s");
        }
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn run_to_finished_delivers_in_order() {
    let registry = Registry::new();
    let simulation = ScriptedSimulation::new();
    let consumed = simulation.consumed();
    let (writer, collected) = CollectingWriter::new();
    let reader = VecReader::new(vec![event(1), event(2)]);
    let simulator = init_simulator(&registry, reader, writer, simulation, Vec::new());

    simulator.run();
    simulator.wait();

    assert_eq!(simulator.state(), LifecycleState::Finished);
    assert_eq!(simulator.err(), None);
    {
        let consumed = consumed.lock().unwrap();
        assert_eq!(*consumed, [event(1), event(2)]);
    }

    // The writer thread may still be draining the last observation.
    wait_until(|| collected.lock().unwrap().len() == 2);
    let collected = collected.lock().unwrap();
    assert_eq!(collected[0].get("step").and_then(Value::as_int), Some(0));
    assert_eq!(collected[0].get("t").and_then(Value::as_int), Some(1));
    assert_eq!(collected[1].get("step").and_then(Value::as_int), Some(1));
    assert_eq!(collected[1].get("t").and_then(Value::as_int), Some(2));
}

#[test]
fn fatal_reply_records_error_and_stops_forwarding() {
    let registry = Registry::new();
    let simulation = ScriptedSimulation::new().with_replies([
        RunStatus::Processing,
        RunStatus::Fatal {
            reason: "divergence at step 1".into(),
        },
    ]);
    let consumed = simulation.consumed();
    let (writer, _collected) = CollectingWriter::new();
    let reader = VecReader::new(vec![event(1), event(2), event(3)]);
    let simulator = init_simulator(&registry, reader, writer, simulation, Vec::new());

    simulator.run();
    simulator.wait();

    assert_eq!(simulator.state(), LifecycleState::Fatal);
    assert_eq!(
        simulator.err(),
        Some(RunError::SimulationFatal {
            reason: "divergence at step 1".into()
        })
    );
    // The third event was never forwarded.
    assert_eq!(consumed.lock().unwrap().len(), 2);
}

#[test]
fn pause_then_start_resumes_without_loss() {
    let registry = Registry::new();
    let simulation = ScriptedSimulation::new();
    let consumed = simulation.consumed();
    let (writer, _collected) = CollectingWriter::new();
    let reader = VecReader::new(vec![event(1), event(2)]);
    let simulator = init_simulator(&registry, reader, writer, simulation, Vec::new());

    // Buffered before the loop starts, so the pause is applied before
    // any delivery is attempted.
    simulator.pause();
    simulator.run();
    wait_until(|| simulator.state() == LifecycleState::Paused);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(consumed.lock().unwrap().len(), 0);

    simulator.start();
    simulator.wait();

    assert_eq!(simulator.state(), LifecycleState::Finished);
    let consumed = consumed.lock().unwrap();
    assert_eq!(*consumed, [event(1), event(2)]);
}

#[test]
fn options_configure_the_simulation_before_wrapping() {
    let registry = Registry::new();
    let (writer, _collected) = CollectingWriter::new();
    let option: SimOption<ScriptedSimulation> =
        Box::new(|s| s.set_outcome(RunStatus::EndInput));
    let simulator = init_simulator(
        &registry,
        VecReader::new(Vec::new()),
        writer,
        ScriptedSimulation::new(),
        vec![option],
    );

    simulator.run();
    simulator.wait();

    assert_eq!(simulator.state(), LifecycleState::EndInput);
    assert_eq!(simulator.err(), None);
}

#[test]
fn commands_after_finish_are_ignored() {
    let registry = Registry::new();
    let (writer, _collected) = CollectingWriter::new();
    let simulator = init_simulator(
        &registry,
        VecReader::new(Vec::new()),
        writer,
        ScriptedSimulation::new(),
        Vec::new(),
    );

    simulator.run();
    simulator.wait();
    assert_eq!(simulator.state(), LifecycleState::Finished);

    simulator.start();
    simulator.pause();
    simulator.stop();

    assert_eq!(simulator.state(), LifecycleState::Finished);
    assert_eq!(simulator.err(), None);
}

#[test]
fn start_while_active_is_ignored() {
    let registry = Registry::new();
    let (writer, _collected) = CollectingWriter::new();
    let simulator = init_simulator(
        &registry,
        RepeatReader::new(event(0)),
        writer,
        ScriptedSimulation::new(),
        Vec::new(),
    );

    simulator.run();
    wait_until(|| simulator.state() == LifecycleState::Active);
    simulator.start();
    assert_eq!(simulator.state(), LifecycleState::Active);

    simulator.stop();
    simulator.wait();
    assert_eq!(simulator.state(), LifecycleState::Interrupted);
}

#[test]
fn concurrent_stops_interrupt_once() {
    let registry = Registry::new();
    let (writer, _collected) = CollectingWriter::new();
    let simulator = init_simulator(
        &registry,
        RepeatReader::new(event(0)),
        writer,
        ScriptedSimulation::new(),
        Vec::new(),
    );
    simulator.run();

    let stoppers: Vec<_> = (0..3)
        .map(|_| {
            let simulator = Arc::clone(&simulator);
            thread::spawn(move || simulator.stop())
        })
        .collect();
    for handle in stoppers {
        handle.join().unwrap();
    }

    simulator.wait();
    assert_eq!(simulator.state(), LifecycleState::Interrupted);
    assert_eq!(simulator.err(), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Terminal states absorb arbitrary command sequences.
    #[test]
    fn terminal_states_absorb_commands(commands in prop::collection::vec(0u8..3, 1..12)) {
        let registry = Registry::new();
        let (writer, _collected) = CollectingWriter::new();
        let simulator = init_simulator(
            &registry,
            VecReader::new(Vec::new()),
            writer,
            ScriptedSimulation::new(),
            Vec::new(),
        );
        simulator.run();
        simulator.wait();
        prop_assert_eq!(simulator.state(), LifecycleState::Finished);

        for command in commands {
            match command {
                0 => simulator.start(),
                1 => simulator.pause(),
                _ => simulator.stop(),
            }
        }

        prop_assert_eq!(simulator.state(), LifecycleState::Finished);
        prop_assert_eq!(simulator.err(), None);
    }
}
