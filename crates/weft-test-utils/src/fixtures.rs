//! Reusable capability fixtures.
//!
//! Four standard fixtures for coordinator and scenario testing:
//!
//! - [`VecReader`] — pushes a fixed batch of events, then closes the feed.
//! - [`RepeatReader`] — pushes clones of one event until the feed closes.
//! - [`CollectingWriter`] — drains observations into a shared vector.
//! - [`ScriptedSimulation`] — answers each delivery from a fixed script and
//!   reports a configurable outcome when the input closes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Receiver, Sender};

use weft_core::{Event, Observations, RunStatus};
use weft_engine::{Delivery, Reader, Simulation, Simulator, Writer};

/// Pushes a fixed batch of events in order, then closes the feed.
pub struct VecReader {
    events: Vec<Event>,
}

impl VecReader {
    /// Reader over the given events.
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl Reader for VecReader {
    fn read(&mut self, _simulator: &Simulator, events: Sender<Event>) {
        for event in self.events.drain(..) {
            if events.send(event).is_err() {
                break; // coordinator shut down mid-batch
            }
        }
    }
}

/// Pushes clones of one event until the coordinator hangs up.
///
/// Useful for exercising stop and pause while input is always available.
pub struct RepeatReader {
    event: Event,
}

impl RepeatReader {
    /// Reader repeating `event` indefinitely.
    pub fn new(event: Event) -> Self {
        Self { event }
    }
}

impl Reader for RepeatReader {
    fn read(&mut self, _simulator: &Simulator, events: Sender<Event>) {
        while events.send(self.event.clone()).is_ok() {}
    }
}

/// Collects every received observation into a shared vector.
pub struct CollectingWriter {
    collected: Arc<Mutex<Vec<Observations>>>,
}

impl CollectingWriter {
    /// The writer and the shared vector it fills, for test assertions.
    pub fn new() -> (Self, Arc<Mutex<Vec<Observations>>>) {
        let collected = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                collected: Arc::clone(&collected),
            },
            collected,
        )
    }
}

impl Writer for CollectingWriter {
    fn write(&mut self, _simulator: &Simulator, observations: Receiver<Observations>) {
        for obs in observations {
            self.collected.lock().unwrap().push(obs);
        }
    }
}

/// Deterministic simulation fixture.
///
/// Answers the n-th delivery with the n-th scripted reply (falling back to
/// [`RunStatus::Processing`] when the script runs out), emits one
/// observation per consumed event (a `"step"` index plus the event's own
/// entries), records every consumed event, and reports a configurable
/// outcome when the event channel closes (default [`RunStatus::Finished`]).
pub struct ScriptedSimulation {
    replies: Mutex<VecDeque<RunStatus>>,
    outcome: RunStatus,
    consumed: Arc<Mutex<Vec<Event>>>,
    obs_tx: Mutex<Option<Sender<Observations>>>,
    obs_rx: Mutex<Option<Receiver<Observations>>>,
}

impl ScriptedSimulation {
    /// Fixture that acknowledges every event and finishes on close.
    pub fn new() -> Self {
        let (obs_tx, obs_rx) = bounded(0);
        Self {
            replies: Mutex::new(VecDeque::new()),
            outcome: RunStatus::Finished,
            consumed: Arc::new(Mutex::new(Vec::new())),
            obs_tx: Mutex::new(Some(obs_tx)),
            obs_rx: Mutex::new(Some(obs_rx)),
        }
    }

    /// Scripted per-event replies, applied in order.
    pub fn with_replies(self, replies: impl IntoIterator<Item = RunStatus>) -> Self {
        *self.replies.lock().unwrap() = replies.into_iter().collect();
        self
    }

    /// Outcome reported when the event channel closes.
    pub fn with_outcome(mut self, outcome: RunStatus) -> Self {
        self.set_outcome(outcome);
        self
    }

    /// Set the close outcome in place (usable from a configuration option).
    pub fn set_outcome(&mut self, outcome: RunStatus) {
        self.outcome = outcome;
    }

    /// Shared record of every consumed event, in delivery order.
    pub fn consumed(&self) -> Arc<Mutex<Vec<Event>>> {
        Arc::clone(&self.consumed)
    }
}

impl Default for ScriptedSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for ScriptedSimulation {
    fn run(&self, deliveries: Receiver<Delivery>, outcome: Sender<RunStatus>) {
        let obs_tx = self
            .obs_tx
            .lock()
            .unwrap()
            .take()
            .expect("run called twice");
        let mut step: i64 = 0;
        for Delivery { event, reply } in deliveries {
            self.consumed.lock().unwrap().push(event.clone());

            let mut obs = Observations::new();
            obs.insert("step", step);
            for (key, value) in event.iter() {
                obs.insert(key, value.clone());
            }
            if obs_tx.send(obs).is_err() {
                return; // observation pump gone
            }

            let status = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(RunStatus::Processing);
            let terminal = status.is_terminal();
            let _ = reply.send(status);
            if terminal {
                return;
            }
            step += 1;
        }
        // Input closed: report the configured outcome. The coordinator may
        // already be gone if the run was interrupted.
        let _ = outcome.send(self.outcome.clone());
    }

    fn observe(&self, sink: Sender<Observations>) {
        let obs_rx = self
            .obs_rx
            .lock()
            .unwrap()
            .take()
            .expect("observe called twice");
        for obs in obs_rx {
            if sink.send(obs).is_err() {
                return;
            }
        }
    }
}
