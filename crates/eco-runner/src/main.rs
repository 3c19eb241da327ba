//! Command-line driver for the Eco-Sim ecosystem.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use eco_core::SimConfig;
use eco_world::Simulation;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "eco-runner")]
#[command(about = "Run a grid ecosystem of creatures and trees")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of turns to simulate
    #[arg(long, default_value_t = 5)]
    turns: u64,

    /// Initial number of creatures
    #[arg(long)]
    population: Option<usize>,

    /// Side length of the square grid
    #[arg(long)]
    grid_size: Option<i32>,

    /// Trees placed every turn
    #[arg(long)]
    trees: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Statistics output file
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn load_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                SimConfig::from_json(&text)?
            }
            None => SimConfig::default(),
        };

        if let Some(population) = self.population {
            config.start_population = population;
        }
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(trees) = self.trees {
            config.num_trees = trees;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(stats) = &self.stats {
            config.stats_path = stats.to_string_lossy().into_owned();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry(cli.json_logs)?;

    let config = cli.load_config()?;
    info!("Configuration: {}", serde_json::to_string(&config)?);

    let mut simulation = Simulation::from_config(config)?;
    simulation.start(cli.turns)?;

    info!(
        population = simulation.population(),
        stats_path = %simulation.config().stats_path,
        "Run complete: {}",
        simulation
    );

    Ok(())
}
