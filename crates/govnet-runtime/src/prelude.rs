//! Govnet Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use govnet_runtime::prelude::*;
//! ```

// Re-export the model
pub use crate::model::{GovernanceModel, ModelEvent};

// Re-export the graph backend
pub use crate::topology_impl::PetRelationshipGraph;

// Re-export metrics and export
pub use crate::metrics::{AgentRecord, MetricsLog, ModelRecord};
pub use crate::export::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};

// Re-export scenarios
pub use crate::scenario::{
    run_scenario, ComparisonRow, ComparisonTable, Scenario, ScenarioRun, ScenarioSuite,
    SCENARIO_EVENT_STEP,
};

// Re-export from core
pub use govnet_core::prelude::*;
