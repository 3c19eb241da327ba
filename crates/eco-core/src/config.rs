//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::MovementRule;
use serde::{Deserialize, Serialize};

/// Energy every creature starts a turn with
pub const DEFAULT_ENERGY: f64 = 10.0;

/// Food units a freshly placed tree holds
pub const DEFAULT_TREE_FOOD: u32 = 3;

/// Simulation configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square grid
    pub grid_size: i32,
    /// Creatures placed before turn 0
    pub start_population: usize,
    /// Trees placed at start and after every reset
    pub num_trees: usize,
    /// Energy restored to every creature at the epoch boundary
    pub default_energy: f64,
    /// Food units per tree
    pub tree_food: u32,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Energy rule applied to engine-issued moves
    pub movement: MovementRule,
    /// Statistics output file
    pub stats_path: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            start_population: 10,
            num_trees: 5,
            default_energy: DEFAULT_ENERGY,
            tree_food: DEFAULT_TREE_FOOD,
            seed: 0,
            movement: MovementRule::Unconditional,
            stats_path: "data/simulation.csv".to_string(),
        }
    }
}

impl SimConfig {
    /// Load a configuration from a JSON document, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size <= 0 {
            return Err(Error::Validation(format!(
                "grid_size must be positive, got {}",
                self.grid_size
            )));
        }
        if !self.default_energy.is_finite() || self.default_energy < 0.0 {
            return Err(Error::Validation(format!(
                "default_energy must be a non-negative number, got {}",
                self.default_energy
            )));
        }
        Ok(())
    }
}
