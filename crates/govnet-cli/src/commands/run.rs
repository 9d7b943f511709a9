//! Run one simulation and export its results.

use anyhow::{Context, Result};
use colored::Colorize;
use govnet::prelude::*;
use govnet::runtime::metrics::print_report;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::config::Config;

pub fn run(
    scenario: Option<Scenario>,
    steps: Option<u64>,
    seed: Option<u64>,
    out: Option<String>,
    verbose: bool,
) -> Result<()> {
    let config = Config::load()?;
    let steps = steps.unwrap_or(config.run.steps);
    let out_dir = PathBuf::from(out.unwrap_or(config.run.output_dir));

    let mut model_config = config.model;
    if let Some(seed) = seed {
        model_config.seed = Some(seed);
    }
    if let Some(scenario) = scenario {
        println!("{} Scenario: {} ({})", "→".blue(), scenario.to_string().cyan(), scenario.description());
        model_config = scenario.apply(model_config);
    }

    let mut model = GovernanceModel::new(model_config).context("Invalid model configuration")?;
    println!(
        "  Initialized: {} agents, {} edges, seed {}",
        model.agents().len().to_string().cyan(),
        model.graph().edge_count().to_string().cyan(),
        model.seed().to_string().cyan()
    );
    let initial = model.graph_snapshot();

    println!("{} Running {} steps...", "→".blue(), steps.to_string().cyan());

    let pb = ProgressBar::new(steps);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} steps")?
            .progress_chars("#>-"),
    );

    for _ in 0..steps {
        for event in model.step() {
            match event {
                ModelEvent::BrokerDeparted { id, edges_removed } => pb.println(format!(
                    "  {} step {}: broker {} departed, {} ties lost",
                    "!".yellow(),
                    model.steps_elapsed(),
                    id,
                    edges_removed
                )),
                ModelEvent::ResourceNodeIntroduced { id } => pb.println(format!(
                    "  {} step {}: resource node {} introduced",
                    "+".green(),
                    model.steps_elapsed(),
                    id
                )),
                ModelEvent::ForumConvened { attendees, edges_created, .. } if verbose => {
                    pb.println(format!(
                        "  step {}: forum with {} attendees, {} new ties",
                        model.steps_elapsed(),
                        attendees,
                        edges_created
                    ))
                }
                _ => {}
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    initial.write_json(&out_dir.join("initial_graph.json"))?;
    model.graph_snapshot().write_json(&out_dir.join("final_graph.json"))?;
    model.metrics().write_csv(&out_dir)?;

    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    println!(
        "  Edges: {} → {}",
        initial.edges.len().to_string().yellow(),
        model.graph().edge_count().to_string().green()
    );
    println!(
        "  Projects: {}",
        model.total_projects().to_string().green()
    );
    if let Some(record) = model.metrics().latest() {
        println!();
        print_report(record);
    }
    println!();
    println!("  {} Wrote results to {}", "✓".green(), out_dir.display());

    Ok(())
}
