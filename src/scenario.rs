use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    config::{LoggingConfig, WorldConfig},
    rng::RngManager,
    world::World,
};

/// Stream the world draws food-source placements from.
pub const FOOD_SOURCE_STREAM: &str = "food_sources";

fn default_name() -> String {
    "default".to_string()
}

fn default_seed() -> u64 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: None,
            seed: default_seed(),
            ticks: None,
            world: WorldConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Validate the world section and build a world seeded from `seed`.
    pub fn build_world(&self) -> Result<World> {
        let rng = RngManager::new(self.seed);
        let world = World::new(self.world.clone(), rng.fork(FOOD_SOURCE_STREAM))
            .with_context(|| format!("Invalid world in scenario '{}'", self.name))?;
        Ok(world)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(500)
    }
}
