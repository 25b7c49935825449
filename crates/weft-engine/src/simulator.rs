//! The coordinator: one [`Simulator`] drives one simulation.
//!
//! The simulator owns every channel and spawns one thread per concurrent
//! activity: the reader's push loop, the writer's drain loop, the
//! simulation's run loop, the simulation's observation forwarding loop, and
//! the coordination loop. The coordination loop is the sole writer of the
//! lifecycle state; `state()` and `err()` read it under a shared lock.

use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, Receiver, Sender};
use tracing::{info, warn};

use weft_core::{Command, Event, LifecycleState, Observations, RunError, RunStatus, SimulatorId};

use crate::capability::{Delivery, Reader, SimOption, Simulation, Writer};
use crate::registry::Registry;

/// Wire a simulation to its input source and output sink, register the
/// resulting simulator, and return it ready for [`Simulator::run`].
///
/// Each option mutates the simulation before the coordinator wraps it;
/// recognized options are simulation-specific.
pub fn init_simulator<S: Simulation>(
    registry: &Registry,
    reader: impl Reader,
    writer: impl Writer,
    mut simulation: S,
    options: Vec<SimOption<S>>,
) -> Arc<Simulator> {
    for option in options {
        option(&mut simulation);
    }
    let simulator = Simulator::new(simulation);
    simulator.attach(reader, writer);
    registry.register(Arc::clone(&simulator));
    info!(uid = %simulator.id(), "ready");
    simulator
}

/// Externally visible condition of a simulator.
///
/// State and last error share one lock: readers are `state()`/`err()`, the
/// only writer is the coordination loop.
struct Progress {
    state: LifecycleState,
    err: Option<RunError>,
}

/// Channel ends claimed by `run()`, grouped so they can be moved out of the
/// simulator in one piece when the run activities start.
struct RunChannels {
    cmd_rx: Receiver<Command>,
    feed_rx: Receiver<Event>,
    deliveries_tx: Sender<Delivery>,
    deliveries_rx: Receiver<Delivery>,
    outcome_tx: Sender<RunStatus>,
    outcome_rx: Receiver<RunStatus>,
    obs_tx: Sender<Observations>,
}

/// Coordinator for one simulation run.
///
/// Construction creates every channel; `attach_reader`/`attach_writer` hand
/// the outer ends to the capabilities and start their threads; `run()`
/// starts the simulation's activities and the coordination loop and returns
/// immediately. Completion is observed via [`state`](Simulator::state)
/// polling, [`wait`](Simulator::wait), or
/// [`Registry::wait_all`](crate::registry::Registry::wait_all).
pub struct Simulator {
    id: SimulatorId,
    simulation: Arc<dyn Simulation>,
    progress: RwLock<Progress>,
    cmd_tx: Sender<Command>,
    feed_slot: Mutex<Option<Sender<Event>>>,
    sink_slot: Mutex<Option<Receiver<Observations>>>,
    run_slot: Mutex<Option<RunChannels>>,
    coordinate_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Simulator {
    /// Create a coordinator around a simulation. Initial state is
    /// [`LifecycleState::Ready`].
    pub fn new(simulation: impl Simulation) -> Arc<Self> {
        // Command channel is bounded(1): stop() blocks until accepted, so at
        // most one stop request is ever outstanding. Data channels are
        // rendezvous; the reply and outcome channels hold one message.
        let (cmd_tx, cmd_rx) = bounded(1);
        let (feed_tx, feed_rx) = bounded(0);
        let (deliveries_tx, deliveries_rx) = bounded(0);
        let (outcome_tx, outcome_rx) = bounded(1);
        let (obs_tx, obs_rx) = bounded(0);
        Arc::new(Self {
            id: SimulatorId::generate(),
            simulation: Arc::new(simulation),
            progress: RwLock::new(Progress {
                state: LifecycleState::Ready,
                err: None,
            }),
            cmd_tx,
            feed_slot: Mutex::new(Some(feed_tx)),
            sink_slot: Mutex::new(Some(obs_rx)),
            run_slot: Mutex::new(Some(RunChannels {
                cmd_rx,
                feed_rx,
                deliveries_tx,
                deliveries_rx,
                outcome_tx,
                outcome_rx,
                obs_tx,
            })),
            coordinate_handle: Mutex::new(None),
        })
    }

    /// The process-unique identifier, immutable post-construction.
    pub fn id(&self) -> SimulatorId {
        self.id
    }

    /// The current resting state.
    pub fn state(&self) -> LifecycleState {
        self.progress.read().unwrap().state
    }

    /// The last recorded error, if any.
    pub fn err(&self) -> Option<RunError> {
        self.progress.read().unwrap().err.clone()
    }

    /// Bind an input source and an output sink and start both activities.
    ///
    /// Precondition: called at most once, before [`run`](Simulator::run).
    pub fn attach(self: &Arc<Self>, reader: impl Reader, writer: impl Writer) {
        self.attach_reader(reader);
        self.attach_writer(writer);
    }

    /// Bind an input source and start its push loop.
    ///
    /// Precondition: called at most once, before [`run`](Simulator::run).
    pub fn attach_reader(self: &Arc<Self>, mut reader: impl Reader) {
        let feed = self
            .feed_slot
            .lock()
            .unwrap()
            .take()
            .expect("attach_reader called twice");
        let simulator = Arc::clone(self);
        thread::Builder::new()
            .name("weft-reader".into())
            .spawn(move || reader.read(&simulator, feed))
            .expect("failed to spawn reader thread");
    }

    /// Bind an output sink and start its drain loop.
    ///
    /// Precondition: called at most once, before [`run`](Simulator::run).
    pub fn attach_writer(self: &Arc<Self>, mut writer: impl Writer) {
        let sink = self
            .sink_slot
            .lock()
            .unwrap()
            .take()
            .expect("attach_writer called twice");
        let simulator = Arc::clone(self);
        thread::Builder::new()
            .name("weft-writer".into())
            .spawn(move || writer.write(&simulator, sink))
            .expect("failed to spawn writer thread");
    }

    /// Request transition to [`LifecycleState::Active`].
    ///
    /// No-op (logged) if the simulator is terminal or already active.
    pub fn start(&self) {
        let state = self.state();
        if state.is_terminal() {
            info!(uid = %self.id, %state, "start ignored: simulator is terminal");
            return;
        }
        if state == LifecycleState::Active {
            info!(uid = %self.id, "start ignored: already active");
            return;
        }
        if self.cmd_tx.send(Command::Activate).is_err() {
            info!(uid = %self.id, "start ignored: coordination loop has exited");
        }
    }

    /// Request transition to [`LifecycleState::Paused`].
    ///
    /// No-op (logged) if the simulator is terminal or already paused.
    pub fn pause(&self) {
        let state = self.state();
        if state.is_terminal() {
            info!(uid = %self.id, %state, "pause ignored: simulator is terminal");
            return;
        }
        if state == LifecycleState::Paused {
            info!(uid = %self.id, "pause ignored: already paused");
            return;
        }
        if self.cmd_tx.send(Command::Pause).is_err() {
            info!(uid = %self.id, "pause ignored: coordination loop has exited");
        }
    }

    /// Unconditionally request [`LifecycleState::Interrupted`].
    ///
    /// Blocks until the command is accepted onto the channel; the bounded
    /// capacity means at most one stop request is outstanding at a time. If
    /// the coordination loop has already exited the request is a logged
    /// no-op — never a hang, never a panic.
    pub fn stop(&self) {
        if self.cmd_tx.send(Command::Interrupt).is_err() {
            info!(uid = %self.id, "stop ignored: coordination loop has exited");
        }
    }

    /// Start the simulation's run loop, its observation forwarding loop, and
    /// the coordination loop; returns immediately.
    ///
    /// Precondition: reader and writer attached, called at most once.
    pub fn run(self: &Arc<Self>) {
        let RunChannels {
            cmd_rx,
            feed_rx,
            deliveries_tx,
            deliveries_rx,
            outcome_tx,
            outcome_rx,
            obs_tx,
        } = self.run_slot.lock().unwrap().take().expect("run called twice");
        info!(uid = %self.id, "started");

        let simulation = Arc::clone(&self.simulation);
        thread::Builder::new()
            .name("weft-sim".into())
            .spawn(move || simulation.run(deliveries_rx, outcome_tx))
            .expect("failed to spawn simulation thread");

        let simulation = Arc::clone(&self.simulation);
        thread::Builder::new()
            .name("weft-obs".into())
            .spawn(move || simulation.observe(obs_tx))
            .expect("failed to spawn observation thread");

        let simulator = Arc::clone(self);
        let handle = thread::Builder::new()
            .name("weft-coordinate".into())
            .spawn(move || simulator.coordinate(cmd_rx, feed_rx, deliveries_tx, outcome_rx))
            .expect("failed to spawn coordination thread");
        *self.coordinate_handle.lock().unwrap() = Some(handle);
    }

    /// Block until the coordination loop has exited.
    pub fn wait(&self) {
        let handle = self.coordinate_handle.lock().unwrap().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!(uid = %self.id, "coordination thread panicked");
            }
        }
    }

    /// The coordination loop: multiplexes user commands, the event feed, and
    /// simulation statuses into one resting state.
    ///
    /// Sole writer of [`Progress`]. On exit the loop's channel ends drop,
    /// disconnecting the command channel, so late commands fail their send
    /// and are handled as logged no-ops by the callers.
    fn coordinate(
        &self,
        cmd_rx: Receiver<Command>,
        feed_rx: Receiver<Event>,
        deliveries_tx: Sender<Delivery>,
        outcome_rx: Receiver<RunStatus>,
    ) {
        self.transition(LifecycleState::Active, None);
        info!(uid = %self.id, "active");
        let mut deliveries = Some(deliveries_tx);

        loop {
            // Pending commands are applied before any input handling.
            if self.drain_commands(&cmd_rx) {
                break;
            }

            if self.state() == LifecycleState::Paused {
                // No event delivery while paused; block until a command
                // lifts the pause instead of spinning on the feed.
                match cmd_rx.recv() {
                    Ok(command) => {
                        if self.apply(command) {
                            break;
                        }
                        continue;
                    }
                    Err(_) => break,
                }
            }

            select! {
                recv(cmd_rx) -> msg => match msg {
                    Ok(command) => {
                        if self.apply(command) {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                recv(feed_rx) -> msg => match msg {
                    Ok(event) => {
                        let Some(tx) = deliveries.as_ref() else { break };
                        let status = self.forward(tx, event);
                        if self.settle(status) {
                            break;
                        }
                    }
                    Err(_) => {
                        // Input exhausted: close the simulation's event
                        // channel exactly once and wait for its verdict.
                        drop(deliveries.take());
                        let status = outcome_rx.recv().unwrap_or_else(|_| RunStatus::Fatal {
                            reason: "simulation exited without a final status".into(),
                        });
                        self.settle(status);
                        break;
                    }
                },
            }
        }
    }

    /// Drain pending user commands. Returns `true` when the loop must exit.
    fn drain_commands(&self, cmd_rx: &Receiver<Command>) -> bool {
        while let Ok(command) = cmd_rx.try_recv() {
            if self.apply(command) {
                return true;
            }
        }
        false
    }

    /// Apply a user command to the resting state. Returns `true` when the
    /// loop must exit.
    fn apply(&self, command: Command) -> bool {
        match command {
            Command::Interrupt => {
                self.transition(LifecycleState::Interrupted, None);
                info!(uid = %self.id, "stopped");
                true
            }
            Command::Pause => {
                self.transition(LifecycleState::Paused, None);
                info!(uid = %self.id, "paused");
                false
            }
            Command::Activate => {
                self.transition(LifecycleState::Active, None);
                info!(uid = %self.id, "active");
                false
            }
        }
    }

    /// Forward one event and wait for the simulation's acknowledgement.
    ///
    /// Commands arriving while the acknowledgement is in flight are observed
    /// only after it arrives. A simulation that never answers wedges this
    /// call — stop() cannot preempt an in-flight delivery (documented
    /// limitation). A simulation that hangs up instead of answering settles
    /// as fatal rather than leaving the loop stuck in a non-terminal state.
    fn forward(&self, deliveries: &Sender<Delivery>, event: Event) -> RunStatus {
        let (reply_tx, reply_rx) = bounded(1);
        let delivery = Delivery {
            event,
            reply: reply_tx,
        };
        if deliveries.send(delivery).is_err() {
            return RunStatus::Fatal {
                reason: "simulation dropped its event channel".into(),
            };
        }
        reply_rx.recv().unwrap_or_else(|_| RunStatus::Fatal {
            reason: "simulation dropped the acknowledgement channel".into(),
        })
    }

    /// Fold a run status into the resting state. Returns `true` when the
    /// status is terminal and the loop must exit.
    fn settle(&self, status: RunStatus) -> bool {
        match status {
            RunStatus::Processing => false,
            RunStatus::Finished => {
                self.transition(LifecycleState::Finished, None);
                info!(uid = %self.id, "finished");
                true
            }
            RunStatus::EndInput => {
                self.transition(LifecycleState::EndInput, None);
                info!(uid = %self.id, "end of input");
                true
            }
            RunStatus::Fatal { reason } => {
                warn!(uid = %self.id, %reason, "fatal");
                self.transition(
                    LifecycleState::Fatal,
                    Some(RunError::SimulationFatal { reason }),
                );
                true
            }
        }
    }

    fn transition(&self, state: LifecycleState, err: Option<RunError>) {
        let mut progress = self.progress.write().unwrap();
        progress.state = state;
        if err.is_some() {
            progress.err = err;
        }
    }
}
