//! World configuration

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::geometry::Position;
use crate::pheromone::{DecayOnly, DispersalPolicy, NeighbourAverage};

/// Upper bound on `width * height`. Each cell costs four f32 buffers plus an
/// owner slot, so this keeps a world under roughly half a gigabyte.
pub const MAX_CELLS: usize = 1 << 24;

fn default_width() -> usize {
    200
}

fn default_height() -> usize {
    200
}

fn default_food_sources() -> usize {
    5
}

fn default_food_source_radius() -> f32 {
    10.0
}

fn default_food_source_amount() -> u32 {
    50_000
}

fn default_max_pheromone() -> f32 {
    1.0
}

fn default_source_beacon() -> f32 {
    1.0
}

fn default_home_radius() -> f32 {
    20.0
}

fn default_keep() -> f32 {
    0.5
}

fn default_dropoff() -> f32 {
    0.95
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_food_sources")]
    pub food_sources: usize,
    #[serde(default = "default_food_source_radius")]
    pub food_source_radius: f32,
    #[serde(default = "default_food_source_amount")]
    pub food_source_amount: u32,
    #[serde(default = "default_max_pheromone")]
    pub max_pheromone: f32,
    /// Food pheromone re-dropped on every source after each step.
    #[serde(default = "default_source_beacon")]
    pub source_beacon: f32,
    /// Centre of the nest; `(width, height / 2)` when omitted.
    #[serde(default)]
    pub home: Option<Position>,
    #[serde(default = "default_home_radius")]
    pub home_radius: f32,
    #[serde(default)]
    pub dispersal: DispersalConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispersalKind {
    #[default]
    NeighbourAverage,
    DecayOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersalConfig {
    #[serde(default)]
    pub policy: DispersalKind,
    #[serde(default = "default_keep")]
    pub keep: f32,
    #[serde(default = "default_dropoff")]
    pub dropoff: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            food_sources: default_food_sources(),
            food_source_radius: default_food_source_radius(),
            food_source_amount: default_food_source_amount(),
            max_pheromone: default_max_pheromone(),
            source_beacon: default_source_beacon(),
            home: None,
            home_radius: default_home_radius(),
            dispersal: DispersalConfig::default(),
        }
    }
}

impl Default for DispersalConfig {
    fn default() -> Self {
        Self {
            policy: DispersalKind::default(),
            keep: default_keep(),
            dropoff: default_dropoff(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DispersalConfig {
    pub fn build_policy(&self) -> Box<dyn DispersalPolicy> {
        match self.policy {
            DispersalKind::NeighbourAverage => Box::new(NeighbourAverage {
                keep: self.keep,
                dropoff: self.dropoff,
            }),
            DispersalKind::DecayOnly => Box::new(DecayOnly {
                dropoff: self.dropoff,
            }),
        }
    }
}

impl WorldConfig {
    /// A small world, convenient for tests.
    pub fn with_size(width: usize, height: usize, food_sources: usize) -> Self {
        Self {
            width,
            height,
            food_sources,
            ..Self::default()
        }
    }

    pub fn home_position(&self) -> Position {
        self.home
            .unwrap_or_else(|| Position::new(self.width as f32, self.height as f32 / 2.0))
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::invalid_config("world dimensions must be non-zero"));
        }
        match self.width.checked_mul(self.height) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => {
                return Err(WorldError::invalid_config(format!(
                    "world of {}x{} cells exceeds the {MAX_CELLS} cell limit",
                    self.width, self.height
                )));
            }
        }
        if self.food_sources == 0 {
            return Err(WorldError::invalid_config("food_sources must be non-zero"));
        }
        if !(self.food_source_radius > 0.0) {
            return Err(WorldError::invalid_config("food_source_radius must be positive"));
        }
        if self.food_source_amount == 0 {
            return Err(WorldError::invalid_config("food_source_amount must be non-zero"));
        }
        if !(self.max_pheromone > 0.0) || !self.max_pheromone.is_finite() {
            return Err(WorldError::invalid_config("max_pheromone must be positive and finite"));
        }
        if !(self.source_beacon >= 0.0) {
            return Err(WorldError::invalid_config("source_beacon must be non-negative"));
        }
        if !(self.home_radius >= 0.0) {
            return Err(WorldError::invalid_config("home_radius must be non-negative"));
        }
        let dispersal = &self.dispersal;
        if !(0.0..=1.0).contains(&dispersal.keep) {
            return Err(WorldError::invalid_config("keep must be within [0, 1]"));
        }
        if !(0.0..1.0).contains(&dispersal.dropoff) {
            return Err(WorldError::invalid_config("dropoff must be within [0, 1)"));
        }
        Ok(())
    }

    /// Load a bare world configuration from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read world config {}", path.display()))?;
        let config: WorldConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }
}
