//! Model-level phenomena: forums, link decay, joint project execution and
//! the two scheduled interventions.
//!
//! These run against the whole model rather than a single agent, so they
//! live here as `GovernanceModel` methods called from the step loop.

use crate::model::{GovernanceModel, ModelEvent};
use govnet_core::agent::Agent;
use govnet_core::topology::RelationshipGraph;
use govnet_core::types::*;
use rand::Rng;
use tracing::{debug, info};

impl GovernanceModel {
    /// Fire any one-time event scheduled for the current step.
    ///
    /// Both comparisons are against the already advanced counter, so an
    /// event scheduled at step k has taken effect in the record for step k.
    pub(crate) fn apply_scheduled_events(&mut self, events: &mut Vec<ModelEvent>) {
        let step = self.steps_elapsed;

        if self.config.broker_removal_step == Some(step) {
            if let Some(event) = self.remove_broker() {
                events.push(event);
            }
        }

        if self.config.resource_node_introduction_step == Some(step) {
            events.push(self.introduce_resource_node());
        }
    }

    /// Remove the broker and all of its edges. A no-op without a broker.
    pub(crate) fn remove_broker(&mut self) -> Option<ModelEvent> {
        let id = self.broker()?.id;
        self.agents.remove(&id);
        let edges_removed = self.graph.remove_node(&id).unwrap_or(0);

        info!(step = self.steps_elapsed, agent = %id, edges_removed, "broker departed");
        Some(ModelEvent::BrokerDeparted { id, edges_removed })
    }

    /// Add the resource node under the next free id, with no edges.
    pub(crate) fn introduce_resource_node(&mut self) -> ModelEvent {
        let id = self.next_id;
        self.next_id = id.next();
        self.agents.insert(id, Agent::resource_node(id));
        self.graph.add_node(id);

        info!(step = self.steps_elapsed, agent = %id, "resource node introduced");
        ModelEvent::ResourceNodeIntroduced { id }
    }

    /// With probability `forum_frequency`, convene a forum.
    ///
    /// The catalyst always attends; every other agent attends with
    /// probability equal to its commitment. Every attendee pair gets a tie
    /// strengthened by the forum strength, or created at that strength.
    /// No catalyst means no forum.
    pub(crate) fn trigger_forum_event(&mut self) -> Option<ModelEvent> {
        if self.rng.gen::<f64>() >= self.config.forum_frequency {
            return None;
        }
        let catalyst = self.catalyst()?.id;

        let mut attendees = vec![catalyst];
        for agent in self.agents.values() {
            if agent.id != catalyst && self.rng.gen::<f64>() < agent.commitment {
                attendees.push(agent.id);
            }
        }

        let mut edges_created = 0usize;
        let mut edges_strengthened = 0usize;
        for (i, a) in attendees.iter().enumerate() {
            for b in &attendees[i + 1..] {
                if self.graph.strengthen_or_create(*a, *b, FORUM_STRENGTH) {
                    edges_created += 1;
                } else {
                    edges_strengthened += 1;
                }
            }
        }

        debug!(
            step = self.steps_elapsed,
            attendees = attendees.len(),
            edges_created,
            edges_strengthened,
            "forum convened"
        );
        Some(ModelEvent::ForumConvened {
            attendees: attendees.len(),
            edges_created,
            edges_strengthened,
        })
    }

    /// Weaken every edge by the configured decay rate.
    pub(crate) fn decay_links(&mut self) {
        if self.config.link_decay_rate > 0.0 {
            self.graph.decay_edges(self.config.link_decay_rate);
        }
    }

    /// Execute every queued project, then clear the queue.
    ///
    /// A project pays both partners the project reward and strengthens the
    /// tie between them if it still exists. A project whose proposer or
    /// partner is no longer live is skipped as a whole. Returns
    /// `(executed, skipped)`.
    pub(crate) fn execute_joint_projects(&mut self) -> (usize, usize) {
        let proposals = std::mem::take(&mut self.pending_projects);
        let mut executed = 0usize;
        let mut skipped = 0usize;

        for ProjectProposal { proposer, partner } in proposals {
            if !self.agents.contains_key(&proposer) || !self.agents.contains_key(&partner) {
                skipped += 1;
                continue;
            }
            for id in [proposer, partner] {
                if let Some(agent) = self.agents.get_mut(&id) {
                    agent.resources += PROJECT_REWARD;
                }
            }
            if let Some(edge) = self.graph.get_edge_mut(&proposer, &partner) {
                edge.reinforce(PROJECT_STRENGTH_BONUS);
            }
            executed += 1;
        }

        self.total_projects += executed as u64;
        if executed > 0 || skipped > 0 {
            debug!(step = self.steps_elapsed, executed, skipped, "joint projects executed");
        }
        (executed, skipped)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{GovernanceModel, ModelEvent};
    use govnet_core::config::{ModelConfig, PopulationCounts};
    use govnet_core::topology::RelationshipGraph;
    use govnet_core::types::*;

    fn model(config: ModelConfig) -> GovernanceModel {
        GovernanceModel::new(config).unwrap()
    }

    #[test]
    fn broker_removal_drops_node_and_edges() {
        let mut m = model(ModelConfig::default().with_seed(42));
        let broker = m.broker().unwrap().clone();
        let degree = m.graph().degree(&broker.id);
        let before = m.agents().len();
        let others: Vec<_> = m.agents().values().filter(|a| a.id != broker.id).cloned().collect();
        let untouched: Vec<_> = m
            .graph_snapshot()
            .edges
            .into_iter()
            .filter(|e| e.source != broker.id && e.target != broker.id)
            .collect();

        let event = m.remove_broker().unwrap();

        assert_eq!(
            event,
            ModelEvent::BrokerDeparted { id: broker.id, edges_removed: degree }
        );
        assert_eq!(m.agents().len(), before - 1);
        assert!(m.broker().is_none());
        assert!(!m.graph().contains_node(&broker.id));
        assert!(m.graph().all_edges().iter().all(|(a, b, _)| *a != broker.id && *b != broker.id));

        // Everyone else keeps their attributes and their mutual ties.
        let remaining: Vec<_> = m.agents().values().cloned().collect();
        assert_eq!(remaining, others);
        assert_eq!(m.graph_snapshot().edges, untouched);
    }

    #[test]
    fn broker_removal_without_broker_is_noop() {
        let config = ModelConfig::default()
            .with_seed(1)
            .with_population(PopulationCounts::new(0, 3, 3, 2));
        let mut m = model(config);
        assert!(m.remove_broker().is_none());
        assert_eq!(m.agents().len(), 8);
    }

    #[test]
    fn resource_node_takes_next_free_id() {
        let mut m = model(ModelConfig::default().with_seed(42));
        let event = m.introduce_resource_node();

        assert_eq!(event, ModelEvent::ResourceNodeIntroduced { id: AgentId(15) });
        let node = m.resource_node().unwrap();
        assert_eq!(node.id, AgentId(15));
        assert_eq!(node.resources, RESOURCE_NODE_RESOURCES);
        assert_eq!(node.commitment, 1.0);
        assert_eq!(node.motivation_profile, 0.5);
        assert_eq!(m.graph().degree(&node.id), 0);
    }

    #[test]
    fn resource_node_id_survives_broker_removal() {
        let mut m = model(ModelConfig::default().with_seed(42));
        m.remove_broker();
        m.introduce_resource_node();
        // Ids are never reused, even after a departure.
        assert!(m.agent(&AgentId(15)).is_some());
        assert_eq!(m.agents().len(), 15);
    }

    #[test]
    fn forum_convenes_around_catalyst() {
        let config = ModelConfig::default()
            .with_seed(8)
            .with_forum_frequency(1.0)
            .with_population(PopulationCounts::new(0, 0, 0, 4));
        let mut m = model(config);
        let catalyst = m.catalyst().unwrap().id;

        let Some(ModelEvent::ForumConvened { attendees, .. }) = m.trigger_forum_event() else {
            panic!("forum frequency 1.0 must convene");
        };
        assert!(attendees >= 1);
        // Academics have commitment >= 0.8 and already form a clique.
        assert_eq!(m.graph().degree(&catalyst), 3);
    }

    #[test]
    fn forum_never_convenes_at_zero_frequency() {
        let config = ModelConfig::default().with_seed(8).with_forum_frequency(0.0);
        let mut m = model(config);
        for _ in 0..50 {
            assert!(m.trigger_forum_event().is_none());
        }
    }

    #[test]
    fn forum_needs_a_catalyst() {
        let config = ModelConfig::default()
            .with_seed(8)
            .with_forum_frequency(1.0)
            .with_population(PopulationCounts::new(3, 3, 0, 0));
        let mut m = model(config);
        assert!(m.trigger_forum_event().is_none());
    }

    #[test]
    fn forum_strengthens_existing_ties() {
        let config = ModelConfig::default()
            .with_seed(2)
            .with_forum_frequency(1.0)
            .with_population(PopulationCounts::new(0, 0, 0, 2));
        let mut m = model(config);
        let (a, b) = (AgentId(0), AgentId(1));
        let before = m.graph().get_edge(&a, &b).unwrap().strength;

        m.trigger_forum_event();
        let after = m.graph().get_edge(&a, &b).unwrap().strength;
        // The second academic attends with commitment >= 0.8, which is not
        // guaranteed, so accept either outcome but never a weakening.
        assert!(after >= before);
        assert!(after <= 1.0);
    }

    #[test]
    fn decay_zero_leaves_strengths_unchanged() {
        let config = ModelConfig::default().with_seed(4).with_link_decay_rate(0.0);
        let mut m = model(config);
        let before: Vec<f64> = m.graph().all_edges().iter().map(|(_, _, e)| e.strength).collect();
        m.decay_links();
        let after: Vec<f64> = m.graph().all_edges().iter().map(|(_, _, e)| e.strength).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn decay_scales_every_edge() {
        let config = ModelConfig::default().with_seed(4).with_link_decay_rate(0.5);
        let mut m = model(config);
        let before: Vec<f64> = m.graph().all_edges().iter().map(|(_, _, e)| e.strength).collect();
        m.decay_links();
        let after: Vec<f64> = m.graph().all_edges().iter().map(|(_, _, e)| e.strength).collect();
        for (b, a) in before.iter().zip(&after) {
            assert!((a - b * 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn projects_pay_both_partners_and_strengthen_tie() {
        let config = ModelConfig::default()
            .with_seed(6)
            .with_population(PopulationCounts::new(2, 0, 0, 0));
        let mut m = model(config);
        let (a, b) = (AgentId(0), AgentId(1));
        let res_a = m.agent(&a).unwrap().resources;
        let res_b = m.agent(&b).unwrap().resources;
        let strength = m.graph().get_edge(&a, &b).unwrap().strength;

        m.pending_projects.push(ProjectProposal { proposer: a, partner: b });
        assert_eq!(m.execute_joint_projects(), (1, 0));

        assert_eq!(m.agent(&a).unwrap().resources, res_a + PROJECT_REWARD);
        assert_eq!(m.agent(&b).unwrap().resources, res_b + PROJECT_REWARD);
        let expected = (strength + PROJECT_STRENGTH_BONUS).min(1.0);
        assert!((m.graph().get_edge(&a, &b).unwrap().strength - expected).abs() < 1e-12);
        assert_eq!(m.total_projects(), 1);
        assert!(m.pending_projects().is_empty());
    }

    #[test]
    fn duplicate_proposals_each_execute() {
        let config = ModelConfig::default()
            .with_seed(6)
            .with_population(PopulationCounts::new(2, 0, 0, 0));
        let mut m = model(config);
        let (a, b) = (AgentId(0), AgentId(1));
        let res_a = m.agent(&a).unwrap().resources;
        let res_b = m.agent(&b).unwrap().resources;
        let strength = m.graph().get_edge(&a, &b).unwrap().strength;

        let proposal = ProjectProposal { proposer: a, partner: b };
        m.pending_projects.push(proposal);
        m.pending_projects.push(proposal);
        assert_eq!(m.execute_joint_projects(), (2, 0));

        assert_eq!(m.agent(&a).unwrap().resources, res_a + 2.0 * PROJECT_REWARD);
        assert_eq!(m.agent(&b).unwrap().resources, res_b + 2.0 * PROJECT_REWARD);
        let expected = (strength + 2.0 * PROJECT_STRENGTH_BONUS).min(1.0);
        assert!((m.graph().get_edge(&a, &b).unwrap().strength - expected).abs() < 1e-12);
        assert_eq!(m.total_projects(), 2);
    }

    #[test]
    fn projects_with_departed_partner_are_skipped() {
        let mut m = model(ModelConfig::default().with_seed(42));
        let broker = m.broker().unwrap().id;
        let other = m
            .agents()
            .keys()
            .copied()
            .find(|id| *id != broker)
            .unwrap();
        let other_resources = m.agent(&other).unwrap().resources;

        m.pending_projects.push(ProjectProposal { proposer: other, partner: broker });
        m.remove_broker();

        assert_eq!(m.execute_joint_projects(), (0, 1));
        assert_eq!(m.agent(&other).unwrap().resources, other_resources);
        assert_eq!(m.total_projects(), 0);
    }

    #[test]
    fn scheduled_events_fire_at_their_step() {
        let config = ModelConfig::default()
            .with_seed(42)
            .with_broker_removal_step(2)
            .with_resource_node_introduction_step(3);
        let mut m = model(config);

        let first = m.step();
        assert!(!first.iter().any(|e| matches!(e, ModelEvent::BrokerDeparted { .. })));
        let second = m.step();
        assert!(second.iter().any(|e| matches!(e, ModelEvent::BrokerDeparted { .. })));
        let third = m.step();
        assert!(third.iter().any(|e| matches!(e, ModelEvent::ResourceNodeIntroduced { .. })));

        let records = m.metrics().model_records();
        assert_eq!(records[1].population, 15);
        assert_eq!(records[2].population, 14);
        assert_eq!(records[3].population, 15);
    }
}
