//! Weft: a lifecycle harness for discrete-event simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Weft sub-crates. For most users, adding `weft` as a single dependency
//! is sufficient.
//!
//! A [`Simulator`](engine::Simulator) runs one simulation as an
//! independently controllable unit: a [`Reader`](engine::Reader) feeds
//! events in, a [`Writer`](engine::Writer) drains observations out, and the
//! coordination loop folds user commands (`start`/`pause`/`stop`) and
//! simulation statuses into one resting [`LifecycleState`](types::LifecycleState).
//!
//! # Quick start
//!
//! ```rust
//! use weft::prelude::*;
//!
//! // A simulation that sums the "x" entry of every event.
//! struct Accumulate;
//!
//! impl Simulation for Accumulate {
//!     fn run(&self, deliveries: Receiver<Delivery>, outcome: Sender<RunStatus>) {
//!         let mut total = 0;
//!         for delivery in deliveries {
//!             total += delivery.event.get("x").and_then(Value::as_int).unwrap_or(0);
//!             let _ = delivery.reply.send(RunStatus::Processing);
//!         }
//!         let _ = outcome.send(RunStatus::Finished);
//!     }
//!
//!     fn observe(&self, _sink: Sender<Observations>) {}
//! }
//!
//! // An input source over a fixed batch.
//! struct Batch(Vec<Event>);
//!
//! impl Reader for Batch {
//!     fn read(&mut self, _simulator: &Simulator, events: Sender<Event>) {
//!         for event in self.0.drain(..) {
//!             if events.send(event).is_err() {
//!                 break;
//!             }
//!         }
//!     }
//! }
//!
//! // A sink that discards everything.
//! struct Discard;
//!
//! impl Writer for Discard {
//!     fn write(&mut self, _simulator: &Simulator, observations: Receiver<Observations>) {
//!         for _ in observations {}
//!     }
//! }
//!
//! let registry = Registry::new();
//! let events = vec![
//!     [("x", 1i64)].into_iter().collect(),
//!     [("x", 2i64)].into_iter().collect(),
//! ];
//! let simulator = init_simulator(&registry, Batch(events), Discard, Accumulate, Vec::new());
//! simulator.run();
//! registry.wait_all();
//!
//! assert_eq!(simulator.state(), LifecycleState::Finished);
//! assert_eq!(simulator.err(), None);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `weft-core` | Value model, identifiers, states, commands, errors |
//! | [`engine`] | `weft-engine` | Simulator, capability contracts, registry |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core data model, identifiers, and status types (`weft-core`).
pub use weft_core as types;

/// The simulator, capability contracts, and registry (`weft-engine`).
pub use weft_engine as engine;

/// Common imports for typical Weft usage.
///
/// ```rust
/// use weft::prelude::*;
/// ```
pub mod prelude {
    pub use weft_core::{
        Command, Event, LifecycleState, LookupError, Observations, Parameters, RunError,
        RunStatus, SimulatorId, State, Value,
    };
    pub use weft_engine::{
        init_simulator, Delivery, Reader, Receiver, Registry, Sender, SimOption, Simulation,
        Simulator, Writer,
    };
}
