//! Runner configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `flapsim.ron` file (if exists), or the file passed with `--config`
//! 3. Environment variables prefixed with `FLAPSIM_`
//!
//! Example environment variable: `FLAPSIM_SIM__PIPE__SPEED=6.5`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use flapsim_core::SimConfig;
use serde::{Deserialize, Serialize};

/// Everything the runner needs: the simulation itself plus the training loop
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub sim: SimConfig,

    #[serde(default)]
    pub training: TrainingSettings,
}

/// Training loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    /// Number of generations to run
    pub generations: u32,
    /// Candidates proposed per generation
    pub population_size: usize,
    /// Hidden units in each feedforward controller
    pub hidden_dim: usize,
    /// Directory for `stats.json` and `best_controller.json`
    pub output_dir: String,
    /// Score that counts as solved; becomes the score budget when
    /// `sim.run.max_score` is unset
    pub target_score: Option<u32>,
    /// Stop once a generation reaches the target score
    pub stop_when_solved: bool,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            generations: 50,
            population_size: 50,
            hidden_dim: 6,
            output_dir: "training_output".to_string(),
            target_score: Some(50),
            stop_when_solved: true,
        }
    }
}

impl AppConfig {
    /// Load configuration with layered priority
    ///
    /// Without `path` a missing `flapsim.ron` is not an error; an explicit
    /// path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("flapsim")
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            .add_source(file)
            // FLAPSIM_SIM__RUN__SEED, FLAPSIM_TRAINING__GENERATIONS, ...
            .add_source(
                Environment::with_prefix("FLAPSIM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config
            .sim
            .validate()
            .context("Invalid simulation configuration")?;
        Ok(config)
    }
}
