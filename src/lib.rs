pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod geometry;
pub mod pheromone;
pub mod rng;
pub mod scenario;
pub mod shared;
pub mod world;

pub use config::{DispersalConfig, DispersalKind, LoggingConfig, WorldConfig};
pub use engine::{Colony, Engine, EngineBuilder, EngineSettings, TickContext};
pub use error::WorldError;
pub use food::{FoodIndex, FoodSource};
pub use geometry::{Bounds, Cell, ObstacleMap, Position};
pub use pheromone::{DecayOnly, DispersalPolicy, NeighbourAverage, PheromoneGrid, PheromoneKind};
pub use scenario::{Scenario, ScenarioLoader};
pub use shared::SharedWorld;
pub use world::{World, WorldStats};
