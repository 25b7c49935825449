//! Test fixtures and mock capabilities for Weft development.
//!
//! Provides deterministic implementations of the capability contracts
//! ([`Reader`](weft_engine::Reader), [`Writer`](weft_engine::Writer),
//! [`Simulation`](weft_engine::Simulation)) for exercising the coordinator
//! without a real simulation behind it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{CollectingWriter, RepeatReader, ScriptedSimulation, VecReader};
