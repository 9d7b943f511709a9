//! # Govnet
//!
//! Agent-based simulation of a collaboration network among governance actors.
//!
//! Government bodies, civil society organizations, private enterprises and
//! academic institutions form ties, strengthen them through forums and joint
//! projects, and lose them to decay. Two interventions can be scheduled: the
//! departure of the broker, a government agent picked at random when the
//! population is built, and the arrival of a resource-rich provider.
//!
//! ## Quick Start
//!
//! ```rust
//! use govnet::prelude::*;
//!
//! // A seeded baseline run with the default population of 15
//! let mut model = GovernanceModel::new(ModelConfig::default().with_seed(42)).unwrap();
//!
//! // Run the simulation
//! model.run(20);
//!
//! let record = model.metrics().latest().unwrap();
//! assert_eq!(record.step, 20);
//! assert_eq!(record.population, 15);
//! println!("density {:.3}, gini {:.3}", record.network_density, record.gini_coefficient);
//! ```
//!
//! ## Scenarios
//!
//! ```rust
//! use govnet::prelude::*;
//!
//! let mut model = Scenario::BrokerDeparture.build(7).unwrap();
//! model.run(60);
//! assert!(model.broker().is_none());
//! assert_eq!(model.metrics().record_at(SCENARIO_EVENT_STEP).unwrap().population, 14);
//! ```
//!
//! ## Architecture
//!
//! - [`govnet_core`] - Shared types, configuration, agent behavior, graph trait
//! - [`govnet_runtime`] - The model, petgraph backend, metrics, export, scenarios
//!
//! ## Each step
//!
//! | Phase | What happens |
//! |-------|--------------|
//! | Schedule | Broker departure or resource node arrival, if due |
//! | Forum | With probability `forum_frequency`, attendees tie to each other |
//! | Decay | Every edge loses `link_decay_rate` of its strength |
//! | Activation | Every agent, in shuffled order, courts a partner and may propose a project |
//! | Projects | Queued projects pay both partners and strengthen their tie |
//! | Record | Network and agent metrics are appended to the log |

// Re-export all subcrates
pub use govnet_core as core;
pub use govnet_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use govnet::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use govnet_core::types::{
        AgentId, AgentType, Role, EdgeData, ProjectProposal, AttributeRanges, Step,
    };

    // Configuration
    pub use govnet_core::config::{ModelConfig, NetworkSeed, PopulationCounts};

    // Agents and the graph trait
    pub use govnet_core::agent::{Agent, Population};
    pub use govnet_core::topology::RelationshipGraph;

    // Error types
    pub use govnet_core::error::{ConfigError, GovnetError, Result};

    // Runtime
    pub use govnet_runtime::model::{GovernanceModel, ModelEvent};
    pub use govnet_runtime::topology_impl::PetRelationshipGraph;
    pub use govnet_runtime::metrics::{AgentRecord, MetricsLog, ModelRecord};
    pub use govnet_runtime::export::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};
    pub use govnet_runtime::scenario::{
        run_scenario, ComparisonTable, Scenario, ScenarioRun, ScenarioSuite,
        SCENARIO_EVENT_STEP,
    };
}
