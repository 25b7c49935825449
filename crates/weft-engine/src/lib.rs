//! Coordination engine for the Weft simulation harness.
//!
//! One [`Simulator`] drives one simulation as an independently controllable
//! unit of concurrent execution: a reader feeds events in, a writer drains
//! observations out, and the coordination loop folds user lifecycle commands
//! and simulation run statuses into one resting state. The [`Registry`]
//! tracks live simulators for later lookup.
//!
//! # Architecture
//!
//! ```text
//! User Thread(s)             Coordination Loop           Simulation Threads
//!     |                            |                            |
//!     |--start()/pause()---------->| cmd_rx (bounded(1))        |
//!     |--stop()  [blocks on send]->|                            |
//!     |                            |<--events----- Reader thread
//!     |                            |--Delivery{event, reply}--->| run()
//!     |                            |<--reply: RunStatus---------|
//!     |                            |<--outcome on feed close----|
//!     |<--state()/err() read lock--|                            |
//!     |                            |         observe() --obs--> Writer thread
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod capability;
pub mod registry;
pub mod simulator;

pub use capability::{Delivery, Reader, SimOption, Simulation, Writer};
pub use registry::Registry;
pub use simulator::{init_simulator, Simulator};

/// Channel endpoints used throughout the capability contracts, re-exported
/// so implementors need not depend on `crossbeam-channel` directly.
pub use crossbeam_channel::{Receiver, Sender};
