//! Compare the three scenarios over a common set of seeds.

use anyhow::{Context, Result};
use colored::Colorize;
use govnet::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;

pub fn run(runs: Option<u64>, steps: Option<u64>, seed: Option<u64>, csv: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let runs = runs.unwrap_or(config.run.runs);
    let steps = steps.unwrap_or(config.run.steps);
    let base_seed = seed.unwrap_or(config.run.base_seed);

    println!(
        "{} Comparing {} scenarios: {} runs x {} steps, seeds {}..{}",
        "→".blue(),
        Scenario::all().len(),
        runs.to_string().cyan(),
        steps.to_string().cyan(),
        base_seed,
        base_seed.wrapping_add(runs)
    );

    let total = runs * Scenario::all().len() as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} runs {msg}")?
            .progress_chars("#>-"),
    );

    let suite = ScenarioSuite::run_all_with_progress(&config.model, runs, steps, base_seed, |run| {
        pb.set_message(run.scenario.name());
        pb.inc(1);
    })
    .context("Invalid model configuration")?;
    pb.finish_and_clear();

    println!();
    suite.compare().print();

    if let Some(path) = csv {
        std::fs::write(&path, suite.to_csv())
            .with_context(|| format!("Failed to write {}", path))?;
        println!("  {} Wrote {}", "✓".green(), path);
    }

    Ok(())
}
