//! Scenario harness for running and comparing interventions.
//!
//! Three scenarios share every parameter except their scheduled event:
//! - Baseline: no intervention
//! - Broker departure: the broker leaves at the event step
//! - Resource windfall: a resource node joins at the event step
//!
//! A suite runs each scenario over the same list of seeds so that
//! differences between rows come from the intervention, not the draw.

use crate::metrics::ModelRecord;
use crate::model::GovernanceModel;
use govnet_core::config::ModelConfig;
use govnet_core::error::{GovnetError, Result};
use govnet_core::types::Step;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

/// Step at which the scheduled intervention fires.
pub const SCENARIO_EVENT_STEP: Step = 50;

/// Steps per run unless told otherwise.
pub const DEFAULT_SCENARIO_STEPS: u64 = 100;

/// A named experimental condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scenario {
    Baseline,
    BrokerDeparture,
    ResourceWindfall,
}

impl Scenario {
    pub fn all() -> [Scenario; 3] {
        [Scenario::Baseline, Scenario::BrokerDeparture, Scenario::ResourceWindfall]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Baseline => "baseline",
            Scenario::BrokerDeparture => "broker-departure",
            Scenario::ResourceWindfall => "resource-windfall",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::Baseline => "no intervention",
            Scenario::BrokerDeparture => "the broker leaves at step 50",
            Scenario::ResourceWindfall => "a resource node joins at step 50",
        }
    }

    /// Replace the schedule of `config` with this scenario's event.
    pub fn apply(&self, mut config: ModelConfig) -> ModelConfig {
        config.broker_removal_step = None;
        config.resource_node_introduction_step = None;
        match self {
            Scenario::Baseline => config,
            Scenario::BrokerDeparture => config.with_broker_removal_step(SCENARIO_EVENT_STEP),
            Scenario::ResourceWindfall => {
                config.with_resource_node_introduction_step(SCENARIO_EVENT_STEP)
            }
        }
    }

    /// Default parameters plus this scenario's scheduled event.
    pub fn config(&self, seed: u64) -> ModelConfig {
        self.apply(ModelConfig::default().with_seed(seed))
    }

    /// Build a fresh model for this scenario.
    pub fn build(&self, seed: u64) -> Result<GovernanceModel> {
        GovernanceModel::new(self.config(seed))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" | "baseline" => Ok(Scenario::Baseline),
            "b" | "broker-departure" | "broker_departure" => Ok(Scenario::BrokerDeparture),
            "c" | "resource-windfall" | "resource_windfall" => Ok(Scenario::ResourceWindfall),
            other => Err(format!(
                "unknown scenario '{}', expected baseline, broker-departure or resource-windfall",
                other
            )),
        }
    }
}

/// A single finished scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRun {
    pub scenario: Scenario,
    pub seed: u64,
    pub steps: u64,
    pub final_record: ModelRecord,
    pub wall_time_ms: u64,
}

/// Run one scenario to completion on top of `config`.
pub fn run_scenario(scenario: Scenario, config: ModelConfig, steps: u64) -> Result<ScenarioRun> {
    let mut model = GovernanceModel::new(scenario.apply(config))?;
    let seed = model.seed();

    let start = Instant::now();
    model.run(steps);
    let wall_time = start.elapsed();

    // Construction records step 0, so the log is never empty here.
    let final_record = model
        .metrics()
        .latest()
        .cloned()
        .ok_or_else(|| GovnetError::Serialization("model recorded no metrics".to_string()))?;

    debug!(scenario = %scenario, seed, steps, "scenario run finished");
    Ok(ScenarioRun {
        scenario,
        seed,
        steps,
        final_record,
        wall_time_ms: wall_time.as_millis() as u64,
    })
}

/// A collection of scenario runs for comparison.
pub struct ScenarioSuite {
    pub runs: Vec<ScenarioRun>,
}

impl ScenarioSuite {
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    pub fn add_run(&mut self, run: ScenarioRun) {
        self.runs.push(run);
    }

    /// Run every scenario on top of `base` once per seed in
    /// `base_seed..base_seed + runs`.
    pub fn run_all(base: &ModelConfig, runs: u64, steps: u64, base_seed: u64) -> Result<Self> {
        Self::run_all_with_progress(base, runs, steps, base_seed, |_| {})
    }

    /// Like [`run_all`](Self::run_all), calling `on_run` after each finished run.
    pub fn run_all_with_progress<F>(
        base: &ModelConfig,
        runs: u64,
        steps: u64,
        base_seed: u64,
        mut on_run: F,
    ) -> Result<Self>
    where
        F: FnMut(&ScenarioRun),
    {
        let mut suite = Self::new();
        for scenario in Scenario::all() {
            for offset in 0..runs {
                let config = base.clone().with_seed(base_seed.wrapping_add(offset));
                let run = run_scenario(scenario, config, steps)?;
                on_run(&run);
                suite.add_run(run);
            }
        }
        Ok(suite)
    }

    /// Average final metrics per scenario, in the order scenarios first appear.
    pub fn compare(&self) -> ComparisonTable {
        let mut order: Vec<Scenario> = Vec::new();
        for run in &self.runs {
            if !order.contains(&run.scenario) {
                order.push(run.scenario);
            }
        }

        let rows = order
            .into_iter()
            .map(|scenario| {
                let records: Vec<&ScenarioRun> =
                    self.runs.iter().filter(|r| r.scenario == scenario).collect();
                let mean = |f: &dyn Fn(&ModelRecord) -> f64| -> f64 {
                    records.iter().map(|r| f(&r.final_record)).sum::<f64>() / records.len() as f64
                };

                ComparisonRow {
                    scenario: scenario.name().to_string(),
                    runs: records.len(),
                    steps: records.iter().map(|r| r.steps).max().unwrap_or(0),
                    population: mean(&|r| r.population as f64),
                    edges: mean(&|r| r.edge_count as f64),
                    density: mean(&|r| r.network_density),
                    clustering: mean(&|r| r.average_clustering),
                    largest_component: mean(&|r| r.largest_component as f64),
                    projects: mean(&|r| r.successful_projects as f64),
                    resource_node_degree: mean(&|r| r.resource_node_degree as f64),
                    gini: mean(&|r| r.gini_coefficient),
                    wall_time_ms: records.iter().map(|r| r.wall_time_ms as f64).sum::<f64>()
                        / records.len() as f64,
                }
            })
            .collect();

        ComparisonTable { rows }
    }

    /// Export the comparison table to CSV format.
    pub fn to_csv(&self) -> String {
        self.compare().to_csv()
    }
}

impl Default for ScenarioSuite {
    fn default() -> Self {
        Self::new()
    }
}

/// Comparison table across scenarios.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonTable {
    pub rows: Vec<ComparisonRow>,
}

/// Mean final metrics of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub scenario: String,
    pub runs: usize,
    pub steps: u64,
    pub population: f64,
    pub edges: f64,
    pub density: f64,
    pub clustering: f64,
    pub largest_component: f64,
    pub projects: f64,
    pub resource_node_degree: f64,
    pub gini: f64,
    /// Mean wall-clock time per run.
    pub wall_time_ms: f64,
}

impl ComparisonTable {
    pub fn row(&self, scenario: Scenario) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.scenario == scenario.name())
    }

    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str(
            "scenario,runs,steps,population,edges,density,clustering,largest_component,\
             projects,resource_node_degree,gini,wall_time_ms\n",
        );
        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{:.2},{:.2},{:.4},{:.4},{:.2},{:.2},{:.2},{:.4},{:.1}\n",
                row.scenario,
                row.runs,
                row.steps,
                row.population,
                row.edges,
                row.density,
                row.clustering,
                row.largest_component,
                row.projects,
                row.resource_node_degree,
                row.gini,
                row.wall_time_ms,
            ));
        }
        csv
    }

    /// Print a formatted comparison table to the terminal.
    pub fn print(&self) {
        println!(
            "┌{:─<19}┬{:─<6}┬{:─<8}┬{:─<8}┬{:─<8}┬{:─<8}┬{:─<10}┬{:─<9}┬{:─<8}┬{:─<8}┐",
            "", "", "", "", "", "", "", "", "", ""
        );
        println!(
            "│{:<19}│{:>6}│{:>8}│{:>8}│{:>8}│{:>8}│{:>10}│{:>9}│{:>8}│{:>8}│",
            " Scenario", " Runs", " Agents", " Edges", " Dense", " Clust", " Projects", " RN deg", " Gini", " ms"
        );
        println!(
            "├{:─<19}┼{:─<6}┼{:─<8}┼{:─<8}┼{:─<8}┼{:─<8}┼{:─<10}┼{:─<9}┼{:─<8}┼{:─<8}┤",
            "", "", "", "", "", "", "", "", "", ""
        );
        for row in &self.rows {
            println!(
                "│{:<19}│{:>6}│{:>8.1}│{:>8.1}│{:>8.3}│{:>8.3}│{:>10.1}│{:>9.1}│{:>8.3}│{:>8.1}│",
                row.scenario,
                row.runs,
                row.population,
                row.edges,
                row.density,
                row.clustering,
                row.projects,
                row.resource_node_degree,
                row.gini,
                row.wall_time_ms,
            );
        }
        println!(
            "└{:─<19}┴{:─<6}┴{:─<8}┴{:─<8}┴{:─<8}┴{:─<8}┴{:─<10}┴{:─<9}┴{:─<8}┴{:─<8}┘",
            "", "", "", "", "", "", "", "", "", ""
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_names_parse_back() {
        for scenario in Scenario::all() {
            assert_eq!(scenario.name().parse::<Scenario>(), Ok(scenario));
        }
        assert_eq!("B".parse::<Scenario>(), Ok(Scenario::BrokerDeparture));
        assert!("collapse".parse::<Scenario>().is_err());
    }

    #[test]
    fn scenario_configs_differ_only_in_schedule() {
        let a = Scenario::Baseline.config(7);
        let b = Scenario::BrokerDeparture.config(7);
        let c = Scenario::ResourceWindfall.config(7);

        assert_eq!(a.broker_removal_step, None);
        assert_eq!(a.resource_node_introduction_step, None);
        assert_eq!(b.broker_removal_step, Some(SCENARIO_EVENT_STEP));
        assert_eq!(c.resource_node_introduction_step, Some(SCENARIO_EVENT_STEP));
        assert_eq!(a.seed, Some(7));
        assert_eq!(b.population, a.population);
        assert_eq!(c.forum_frequency, a.forum_frequency);
    }

    #[test]
    fn apply_replaces_existing_schedule() {
        let scheduled = ModelConfig::default()
            .with_broker_removal_step(10)
            .with_resource_node_introduction_step(20);

        let baseline = Scenario::Baseline.apply(scheduled.clone());
        assert_eq!(baseline.broker_removal_step, None);
        assert_eq!(baseline.resource_node_introduction_step, None);

        let windfall = Scenario::ResourceWindfall.apply(scheduled.with_link_decay_rate(0.1));
        assert_eq!(windfall.broker_removal_step, None);
        assert_eq!(windfall.resource_node_introduction_step, Some(SCENARIO_EVENT_STEP));
        assert_eq!(windfall.link_decay_rate, 0.1);
    }

    #[test]
    fn single_run_reports_final_record() {
        let run = run_scenario(Scenario::Baseline, ModelConfig::default().with_seed(42), 10).unwrap();
        assert_eq!(run.seed, 42);
        assert_eq!(run.steps, 10);
        assert_eq!(run.final_record.step, 10);
        assert_eq!(run.final_record.population, 15);

        let mut model = GovernanceModel::new(ModelConfig::default().with_seed(42)).unwrap();
        model.run(10);
        assert_eq!(Some(&run.final_record), model.metrics().latest());
    }

    #[test]
    fn suite_reports_each_finished_run() {
        let mut seen = Vec::new();
        let suite = ScenarioSuite::run_all_with_progress(&ModelConfig::default(), 2, 5, 3, |run| {
            seen.push((run.scenario, run.seed));
        })
        .unwrap();

        assert_eq!(seen.len(), suite.runs.len());
        assert_eq!(seen[0], (Scenario::Baseline, 3));
        assert_eq!(seen[5], (Scenario::ResourceWindfall, 4));

        let table = suite.compare();
        assert!(table.rows.iter().all(|r| r.wall_time_ms >= 0.0));
        assert!(suite.to_csv().lines().next().unwrap().ends_with(",gini,wall_time_ms"));
    }

    #[test]
    fn suite_comparison_works() {
        let suite = ScenarioSuite::run_all(&ModelConfig::default(), 2, 60, 100).unwrap();
        assert_eq!(suite.runs.len(), 6);

        let table = suite.compare();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.row(Scenario::Baseline).unwrap().population, 15.0);
        assert_eq!(table.row(Scenario::BrokerDeparture).unwrap().population, 14.0);
        assert_eq!(table.row(Scenario::ResourceWindfall).unwrap().population, 16.0);

        let csv = suite.to_csv();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.contains("broker-departure,2,60,14.00"));
        table.print();
    }
}
