//! Operation histories for testing concurrent data structures against external
//! linearizability checkers.
//!
//! This crate synthesizes histories of stacks, queues and priority queues, either
//! linearizable by construction or forced to be non-linearizable, rebuilds histories
//! from the logs of real workload drivers, and re-encodes one canonical
//! [`History`](history::History) into the input formats of several checkers.
//!
//! * [`generator`] produces histories from a seeded random source.
//! * [`ingest`] pairs raw per-process event logs and remaps driver vocabularies.
//! * [`encode`] projects a history into interval and event-trace formats.
//! * [`config`] holds the mapping tables all of the above consult.

pub mod config;
pub mod encode;
pub mod error;
pub mod generator;
pub mod history;
pub mod ingest;

pub use error::{Error, Result};
