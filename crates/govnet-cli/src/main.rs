//! Govnet CLI - Command-line interface for the collaboration-network simulation.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use govnet::prelude::Scenario;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "govnet")]
#[command(author, version, about = "Govnet - Governance collaboration-network simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default govnet.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run one simulation and export its metrics and graphs
    Run {
        /// Scenario to run: baseline, broker-departure or resource-windfall
        /// (default: the schedule in govnet.toml)
        #[arg(short = 'S', long)]
        scenario: Option<Scenario>,

        /// Number of steps to run (default: from govnet.toml)
        #[arg(short, long)]
        steps: Option<u64>,

        /// Seed for the run (default: from govnet.toml, else random)
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory (default: from govnet.toml)
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Run every scenario over the same seeds and compare mean outcomes
    Compare {
        /// Runs per scenario (default: from govnet.toml)
        #[arg(short, long)]
        runs: Option<u64>,

        /// Steps per run (default: from govnet.toml)
        #[arg(short, long)]
        steps: Option<u64>,

        /// First seed; run i uses seed + i (default: from govnet.toml)
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the comparison table as CSV
        #[arg(short, long)]
        csv: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise warnings only, or debug with --verbose
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run { scenario, steps, seed, out } => {
            commands::run::run(scenario, steps, seed, out, cli.verbose)
        }
        Commands::Compare { runs, steps, seed, csv } => {
            commands::compare::run(runs, steps, seed, csv)
        }
    }
}
