//! # Govnet Runtime
//!
//! The model, its network backend and everything measured from it.
//!
//! The runtime owns a population of organizational actors on a petgraph
//! relationship network, advances it one step at a time from a single
//! seeded generator, and records network and agent metrics after every
//! step. Scenarios bundle the scheduled interventions for comparison runs.

pub mod topology_impl;
pub mod population;
pub mod model;
pub mod events;
pub mod metrics;
pub mod export;
pub mod scenario;
pub mod prelude;
