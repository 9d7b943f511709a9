//! # Govnet Core
//!
//! Core types and traits for simulating a governance collaboration network.
//!
//! A population of organizational actors (government, civil society,
//! private enterprise, academia, and an optional resource provider) forms,
//! strengthens and loses ties on a weighted undirected graph. This crate
//! holds the pieces every other crate shares:
//!
//! - **types** — identifiers, agent types, roles, edge data, behavioral constants
//! - **config** — the validated, immutable run configuration
//! - **agent** — the agent record and its per-step behavior
//! - **topology** — the relationship graph trait
//! - **error** — the error taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use govnet_core::prelude::*;
//!
//! let config = ModelConfig::default().with_seed(42);
//! assert!(config.validate().is_ok());
//!
//! let agent = Agent::new(AgentId(0), AgentType::Academic, 30.0, 0.9, 0.5);
//! assert_eq!(agent.role, Role::None);
//! ```

pub mod types;
pub mod config;
pub mod agent;
pub mod topology;
pub mod error;
pub mod prelude;
