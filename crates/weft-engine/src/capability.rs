//! Capability contracts between the coordinator and its collaborators.
//!
//! The engine never implements these: it owns the channels and drives
//! whatever implementations are handed to it at attach time. Concrete
//! readers, writers, and simulations live entirely outside this crate.

use crossbeam_channel::{Receiver, Sender};

use weft_core::{Event, Observations, RunStatus};

use crate::simulator::Simulator;

/// One event forwarded to the simulation, paired with the reply channel for
/// its run status.
///
/// The reply channel is `bounded(1)` and created fresh per event, so the
/// request/acknowledge pair is explicit: whoever holds `reply` owes exactly
/// one answer — [`RunStatus::Processing`] to request more input, any
/// terminal status to end the run.
pub struct Delivery {
    /// The event to consume.
    pub event: Event,
    /// Acknowledgement channel for this event.
    pub reply: Sender<RunStatus>,
}

/// An input source feeding events into a simulator.
pub trait Reader: Send + 'static {
    /// Push events onto `events` in production order until the source is
    /// exhausted, then return.
    ///
    /// Dropping `events` closes the feed; ownership guarantees it closes
    /// exactly once and that nothing can be pushed afterwards. A failed send
    /// means the coordinator has shut down — stop pushing and return. The
    /// `simulator` reference is available for logging and state inspection.
    fn read(&mut self, simulator: &Simulator, events: Sender<Event>);
}

/// An output sink draining observations from a simulator.
pub trait Writer: Send + 'static {
    /// Receive observations until `observations` disconnects.
    ///
    /// Disconnection is the normal end of the stream, not an error.
    fn write(&mut self, simulator: &Simulator, observations: Receiver<Observations>);
}

/// The capability set a simulation exposes to the harness.
///
/// Variants are entirely external to this crate; the coordinator depends
/// only on this contract and never on a concrete algorithm.
pub trait Simulation: Send + Sync + 'static {
    /// Run the domain algorithm.
    ///
    /// Consume deliveries in order, answering each via its embedded reply
    /// channel. When `deliveries` disconnects (end of input), send exactly
    /// one terminal status on `outcome` and return. After answering a
    /// delivery with a terminal status, return without touching `outcome`.
    fn run(&self, deliveries: Receiver<Delivery>, outcome: Sender<RunStatus>);

    /// Forward the simulation's own observation stream onto the
    /// writer-facing channel until the stream ends.
    fn observe(&self, sink: Sender<Observations>);
}

/// A configuration option applied to a simulation before the coordinator
/// wraps it.
///
/// Recognized options are simulation-specific; the harness only applies
/// them in order.
pub type SimOption<S> = Box<dyn FnOnce(&mut S)>;
