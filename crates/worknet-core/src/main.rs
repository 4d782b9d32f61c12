//! Worknet Simulation Runner
//!
//! Runs one scenario on a random network and writes the per-tick
//! population counts as JSON.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use worknet_core::config::{SimConfig, DEFAULT_TUNING_PATH};
use worknet_core::{run_config, InitialAssignment, Scenario, SimError};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "worknet")]
#[command(about = "Stochastic state transitions on a random network")]
struct Args {
    /// TOML tuning file (defaults apply when absent)
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    config: PathBuf,

    /// Population model to simulate
    #[arg(long, value_enum)]
    scenario: Option<Scenario>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of nodes
    #[arg(long)]
    nodes: Option<usize>,

    /// Expected number of edges
    #[arg(long)]
    edges: Option<f64>,

    /// Fraction of nodes starting in the first base state
    #[arg(long)]
    initial_fraction: Option<f64>,

    /// Seed base states by node index instead of by draw
    #[arg(long)]
    by_index: bool,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    /// Flags take precedence over the tuning file.
    fn apply(&self, config: &mut SimConfig) {
        if let Some(scenario) = self.scenario {
            config.simulation.scenario = scenario;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            config.simulation.ticks = ticks;
        }
        if let Some(nodes) = self.nodes {
            config.network.node_count = nodes;
        }
        if let Some(edges) = self.edges {
            config.network.expected_edges = edges;
        }
        if let Some(fraction) = self.initial_fraction {
            config.network.initial_fraction = fraction;
        }
        if self.by_index {
            config.network.assignment = InitialAssignment::ByIndex;
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<(), SimError> {
    let mut config = SimConfig::load_or_default(&args.config)?;
    args.apply(&mut config);

    let report = run_config(&config)?;

    match &args.output {
        Some(path) => {
            report.write_to(path)?;
            tracing::info!("wrote {}", path.display());
        }
        None => println!("{}", report.to_json()?),
    }
    Ok(())
}
