//! Governance model — population, graph and the step loop.
//!
//! The model owns the relationship graph, the live agents, the pending
//! project queue and the single seeded generator everything draws from.
//!
//! Each step:
//! 1. The step counter advances
//! 2. Scheduled one-time events fire if due (broker departure, resource node)
//! 3. A forum may convene
//! 4. Every edge decays
//! 5. Every live agent acts, in a freshly shuffled order
//! 6. Queued joint projects execute and the queue is cleared
//! 7. A metrics snapshot is recorded

use crate::export::GraphSnapshot;
use crate::metrics::{self, MetricsLog};
use crate::population::{create_agents, designate_roles, seed_network};
use crate::topology_impl::PetRelationshipGraph;
use govnet_core::agent::{Agent, Population, StepContext};
use govnet_core::config::ModelConfig;
use govnet_core::error::Result;
use govnet_core::topology::RelationshipGraph;
use govnet_core::types::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, trace};

/// Event emitted by the model during a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ModelEvent {
    /// The broker left; its node and every incident edge are gone.
    BrokerDeparted { id: AgentId, edges_removed: usize },
    /// The resource node joined with no edges.
    ResourceNodeIntroduced { id: AgentId },
    /// A forum convened.
    ForumConvened {
        attendees: usize,
        edges_created: usize,
        edges_strengthened: usize,
    },
    /// An agent formed a new collaboration edge.
    Collaborated { agent: AgentId, partner: AgentId },
    /// An agent queued a joint project.
    ProjectProposed { proposer: AgentId, partner: AgentId },
    /// The pending queue was flushed.
    ProjectsExecuted { executed: usize, skipped: usize },
    /// A step completed.
    StepComplete { step: Step, population: usize, edges: usize },
}

/// The governance network simulation.
pub struct GovernanceModel {
    pub(crate) config: ModelConfig,
    pub(crate) seed: u64,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) graph: PetRelationshipGraph,
    pub(crate) agents: Population,
    pub(crate) pending_projects: Vec<ProjectProposal>,
    pub(crate) steps_elapsed: Step,
    pub(crate) next_id: AgentId,
    pub(crate) total_projects: u64,
    metrics: MetricsLog,
}

impl GovernanceModel {
    /// Build a model: validate the config, create and tag the population,
    /// lay down the initial network and record the step-0 snapshot.
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let (mut agents, next_id) = create_agents(&config.population, &mut rng);
        designate_roles(&mut agents, &mut rng);

        let mut graph = PetRelationshipGraph::new();
        seed_network(&agents, &mut graph, &config.network, &mut rng);

        info!(
            seed,
            agents = agents.len(),
            edges = graph.edge_count(),
            "governance model initialized"
        );

        let mut model = Self {
            config,
            seed,
            rng,
            graph,
            agents,
            pending_projects: Vec::new(),
            steps_elapsed: 0,
            next_id,
            total_projects: 0,
            metrics: MetricsLog::default(),
        };
        model.record_metrics();
        Ok(model)
    }

    /// Advance the model by exactly one step.
    pub fn step(&mut self) -> Vec<ModelEvent> {
        let mut events = Vec::new();
        self.steps_elapsed += 1;

        self.apply_scheduled_events(&mut events);

        if let Some(forum) = self.trigger_forum_event() {
            events.push(forum);
        }

        self.decay_links();
        self.activate_agents(&mut events);

        let (executed, skipped) = self.execute_joint_projects();
        events.push(ModelEvent::ProjectsExecuted { executed, skipped });

        self.record_metrics();

        trace!(
            step = self.steps_elapsed,
            population = self.agents.len(),
            edges = self.graph.edge_count(),
            "step complete"
        );
        events.push(ModelEvent::StepComplete {
            step: self.steps_elapsed,
            population: self.agents.len(),
            edges: self.graph.edge_count(),
        });

        events
    }

    /// Run `steps` steps and return the per-step events.
    pub fn run(&mut self, steps: u64) -> Vec<Vec<ModelEvent>> {
        (0..steps).map(|_| self.step()).collect()
    }

    /// Activate every live agent once, in an order shuffled for this step.
    fn activate_agents(&mut self, events: &mut Vec<ModelEvent>) {
        let mut order: Vec<AgentId> = self.agents.keys().copied().collect();
        order.shuffle(&mut self.rng);

        for id in order {
            let Some(agent) = self.agents.get(&id) else {
                continue;
            };
            let mut ctx = StepContext {
                graph: &mut self.graph,
                population: &self.agents,
                proposals: &mut self.pending_projects,
                rng: &mut self.rng,
                project_resource_threshold: self.config.project_resource_threshold,
            };
            let outcome = agent.step(&mut ctx);

            if let Some(partner) = outcome.linked {
                events.push(ModelEvent::Collaborated { agent: id, partner });
            }
            if let Some(partner) = outcome.proposed {
                events.push(ModelEvent::ProjectProposed { proposer: id, partner });
            }
        }
    }

    fn record_metrics(&mut self) {
        let (record, agent_records) = metrics::collect(
            self.steps_elapsed,
            &self.graph,
            &self.agents,
            self.total_projects,
        );
        self.metrics.push(record, agent_records);
    }

    /// Number of completed steps.
    pub fn steps_elapsed(&self) -> Step {
        self.steps_elapsed
    }

    /// The seed that reproduces this run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Live agents, ordered by id.
    pub fn agents(&self) -> &Population {
        &self.agents
    }

    pub fn agent(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn graph(&self) -> &PetRelationshipGraph {
        &self.graph
    }

    /// Projects queued so far in the current step.
    pub fn pending_projects(&self) -> &[ProjectProposal] {
        &self.pending_projects
    }

    /// Cumulative number of executed projects.
    pub fn total_projects(&self) -> u64 {
        self.total_projects
    }

    pub fn broker(&self) -> Option<&Agent> {
        self.agents.values().find(|a| a.is_broker())
    }

    pub fn catalyst(&self) -> Option<&Agent> {
        self.agents.values().find(|a| a.is_catalyst())
    }

    pub fn resource_node(&self) -> Option<&Agent> {
        self.agents.values().find(|a| a.is_resource_node())
    }

    /// Everything recorded so far, starting with the step-0 snapshot.
    pub fn metrics(&self) -> &MetricsLog {
        &self.metrics
    }

    /// Read-only view of the current nodes and edges.
    pub fn graph_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::capture(self.steps_elapsed, &self.graph, &self.agents)
    }
}

impl std::fmt::Debug for GovernanceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceModel")
            .field("seed", &self.seed)
            .field("steps_elapsed", &self.steps_elapsed)
            .field("agents", &self.agents.len())
            .field("edges", &self.graph.edge_count())
            .field("total_projects", &self.total_projects)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govnet_core::config::PopulationCounts;
    use govnet_core::error::{ConfigError, GovnetError};

    fn baseline(seed: u64) -> ModelConfig {
        ModelConfig::default().with_seed(seed)
    }

    #[test]
    fn construction_records_step_zero() {
        let model = GovernanceModel::new(baseline(42)).unwrap();
        assert_eq!(model.steps_elapsed(), 0);
        assert_eq!(model.agents().len(), 15);
        assert_eq!(model.metrics().model_records().len(), 1);
        assert_eq!(model.metrics().model_records()[0].step, 0);
        assert_eq!(model.metrics().agent_records().len(), 15);
        assert!(model.broker().is_some());
        assert!(model.catalyst().is_some());
        assert!(model.resource_node().is_none());
    }

    #[test]
    fn invalid_config_never_builds() {
        let config = baseline(1).with_population(PopulationCounts::new(-2, 5, 3, 2));
        let err = GovernanceModel::new(config).unwrap_err();
        assert!(matches!(err, GovnetError::Config(ConfigError::NegativeCount { .. })));
    }

    #[test]
    fn step_advances_counter_and_records() {
        let mut model = GovernanceModel::new(baseline(42)).unwrap();
        let events = model.step();

        assert_eq!(model.steps_elapsed(), 1);
        assert_eq!(model.metrics().model_records().len(), 2);
        assert!(model.pending_projects().is_empty());
        assert!(matches!(
            events.last(),
            Some(ModelEvent::StepComplete { step: 1, population: 15, .. })
        ));
    }

    #[test]
    fn run_executes_requested_steps() {
        let mut model = GovernanceModel::new(baseline(9)).unwrap();
        let events = model.run(10);
        assert_eq!(events.len(), 10);
        assert_eq!(model.steps_elapsed(), 10);
        assert_eq!(model.metrics().model_records().len(), 11);
    }

    #[test]
    fn unseeded_model_reports_its_seed() {
        let config = ModelConfig::default();
        let mut first = GovernanceModel::new(config).unwrap();
        let mut replay = GovernanceModel::new(baseline(first.seed())).unwrap();
        first.run(5);
        replay.run(5);
        assert_eq!(first.metrics(), replay.metrics());
    }

    #[test]
    fn empty_population_steps_cleanly() {
        let config = baseline(3).with_population(PopulationCounts::new(0, 0, 0, 0));
        let mut model = GovernanceModel::new(config).unwrap();
        model.run(3);

        let last = model.metrics().latest().unwrap();
        assert_eq!(last.population, 0);
        assert_eq!(last.network_density, 0.0);
        assert_eq!(last.average_clustering, 0.0);
        assert_eq!(last.largest_component, 0);
        assert_eq!(last.gini_coefficient, 0.0);
    }

    #[test]
    fn projects_accumulate_in_a_resourced_population() {
        // Private enterprises start with 50-100 resources and strong clique ties,
        // so projects over a threshold of 100 become likely quickly.
        let config = baseline(5)
            .with_population(PopulationCounts::new(0, 0, 6, 0))
            .with_forum_frequency(0.0);
        let mut model = GovernanceModel::new(config).unwrap();
        model.run(20);

        assert!(model.total_projects() > 0);
        let last = model.metrics().latest().unwrap();
        assert_eq!(last.successful_projects, model.total_projects());
        let counts: Vec<u64> = model
            .metrics()
            .model_records()
            .iter()
            .map(|r| r.successful_projects)
            .collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }
}
