//! Govnet Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use govnet_core::prelude::*;
//! ```

pub use crate::agent::{ActivationOutcome, Agent, Population, StepContext};
pub use crate::config::{ModelConfig, NetworkSeed, PopulationCounts};
pub use crate::error::{ConfigError, GovnetError, Result};
pub use crate::topology::RelationshipGraph;
pub use crate::types::*;
