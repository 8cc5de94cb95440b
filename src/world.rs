use std::fmt;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::food::{FoodIndex, FoodSource};
use crate::geometry::{Bounds, ObstacleMap, Position};
use crate::pheromone::{DispersalPolicy, PheromoneGrid, PheromoneKind};

/// Aggregate numbers for drivers and renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldStats {
    pub tick: u64,
    pub food_sources: usize,
    pub remaining_food: u64,
    pub replacements: u64,
    pub food_pheromone_total: f64,
    pub foraging_pheromone_total: f64,
    pub peak_food_pheromone: f32,
}

/// The environment agents live in: two pheromone fields plus a fixed-size
/// set of replenishing food sources.
///
/// Every position-taking call that touches a grid rejects positions whose
/// floor lies outside the grid with [`WorldError::OutOfBounds`].
pub struct World {
    config: WorldConfig,
    bounds: Bounds,
    home: Position,
    food_pheromone: PheromoneGrid,
    foraging_pheromone: PheromoneGrid,
    sources: Vec<FoodSource>,
    index: FoodIndex,
    policy: Box<dyn DispersalPolicy>,
    rng: ChaCha8Rng,
    tick: u64,
    replacements: u64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("width", &self.bounds.width())
            .field("height", &self.bounds.height())
            .field("tick", &self.tick)
            .field("policy", &self.policy.name())
            .field("food_sources", &self.sources)
            .finish()
    }
}

impl World {
    /// Build a world with `config.food_sources` randomly placed sources.
    pub fn new(config: WorldConfig, mut rng: ChaCha8Rng) -> Result<Self, WorldError> {
        config.validate()?;
        let bounds = Bounds::new(config.width, config.height);
        let sources = (0..config.food_sources)
            .map(|_| {
                FoodSource::random(
                    bounds,
                    config.food_source_radius,
                    config.food_source_amount,
                    &mut rng,
                )
            })
            .collect();
        Ok(Self::assemble(config, bounds, sources, rng))
    }

    /// Build a world around explicitly placed initial sources. Replacements
    /// are still drawn from `rng` using the configured radius and amount.
    pub fn with_sources(
        mut config: WorldConfig,
        sources: Vec<FoodSource>,
        rng: ChaCha8Rng,
    ) -> Result<Self, WorldError> {
        config.food_sources = sources.len();
        config.validate()?;
        let bounds = Bounds::new(config.width, config.height);
        if let Some(outside) = sources.iter().find(|s| bounds.is_obstacle(s.position())) {
            return Err(WorldError::invalid_config(format!(
                "food source at ({}, {}) lies outside the grid",
                outside.position().x,
                outside.position().y
            )));
        }
        if sources.iter().any(|s| !s.has_food()) {
            return Err(WorldError::invalid_config("initial food sources must hold food"));
        }
        Ok(Self::assemble(config, bounds, sources, rng))
    }

    fn assemble(
        config: WorldConfig,
        bounds: Bounds,
        sources: Vec<FoodSource>,
        rng: ChaCha8Rng,
    ) -> Self {
        let index = FoodIndex::build(bounds, &sources);
        let policy = config.dispersal.build_policy();
        info!(
            width = bounds.width(),
            height = bounds.height(),
            food_sources = sources.len(),
            covered_cells = index.covered_cells(),
            policy = policy.name(),
            "World constructed"
        );
        Self {
            home: config.home_position(),
            food_pheromone: PheromoneGrid::new(bounds, config.max_pheromone),
            foraging_pheromone: PheromoneGrid::new(bounds, config.max_pheromone),
            config,
            bounds,
            sources,
            index,
            policy,
            rng,
            tick: 0,
            replacements: 0,
        }
    }

    /// Swap in a different dispersal rule.
    ///
    /// `config().dispersal` keeps describing the configured rule; use
    /// [`World::policy_name`] to see which rule actually runs.
    pub fn with_policy(mut self, policy: Box<dyn DispersalPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.bounds.width()
    }

    pub fn height(&self) -> usize {
        self.bounds.height()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.bounds.is_obstacle(pos)
    }

    /// Whether `pos` lies within the nest radius. Pure geometry, valid anywhere.
    pub fn is_home(&self, pos: Position) -> bool {
        pos.is_within_radius(self.home, self.config.home_radius)
    }

    pub fn home(&self) -> Position {
        self.home
    }

    pub fn pheromone(&self, kind: PheromoneKind) -> &PheromoneGrid {
        match kind {
            PheromoneKind::Food => &self.food_pheromone,
            PheromoneKind::Foraging => &self.foraging_pheromone,
        }
    }

    fn pheromone_mut(&mut self, kind: PheromoneKind) -> &mut PheromoneGrid {
        match kind {
            PheromoneKind::Food => &mut self.food_pheromone,
            PheromoneKind::Foraging => &mut self.foraging_pheromone,
        }
    }

    pub fn strength(&self, kind: PheromoneKind, pos: Position) -> Result<f32, WorldError> {
        self.pheromone(kind).strength(pos)
    }

    pub fn food_strength(&self, pos: Position) -> Result<f32, WorldError> {
        self.strength(PheromoneKind::Food, pos)
    }

    pub fn foraging_strength(&self, pos: Position) -> Result<f32, WorldError> {
        self.strength(PheromoneKind::Foraging, pos)
    }

    pub fn drop_pheromone(
        &mut self,
        kind: PheromoneKind,
        pos: Position,
        amount: f32,
    ) -> Result<(), WorldError> {
        self.pheromone_mut(kind).deposit(pos, amount)
    }

    pub fn drop_food_pheromone(&mut self, pos: Position, amount: f32) -> Result<(), WorldError> {
        self.drop_pheromone(PheromoneKind::Food, pos, amount)
    }

    pub fn drop_foraging_pheromone(
        &mut self,
        pos: Position,
        amount: f32,
    ) -> Result<(), WorldError> {
        self.drop_pheromone(PheromoneKind::Foraging, pos, amount)
    }

    pub fn food_sources(&self) -> &[FoodSource] {
        &self.sources
    }

    /// Slot of the live source owning the cell under `pos`.
    pub fn food_owner(&self, pos: Position) -> Result<Option<usize>, WorldError> {
        self.index.owner_of(pos)
    }

    pub fn contains_food(&self, pos: Position) -> Result<bool, WorldError> {
        Ok(self.food_owner(pos)?.is_some())
    }

    /// Take one unit from the source owning `pos`. Returns whether food was
    /// taken. A source emptied by this call is replaced in its slot by a
    /// fresh, randomly placed one and the index is rebuilt.
    pub fn pick_up_food(&mut self, pos: Position) -> Result<bool, WorldError> {
        let Some(slot) = self.index.owner_of(pos)? else {
            return Ok(false);
        };
        let source = &mut self.sources[slot];
        assert!(
            source.has_food(),
            "food index points at depleted source in slot {slot}"
        );
        source.pick_up();
        if !source.has_food() {
            self.replace_source(slot);
        }
        Ok(true)
    }

    /// Agents never create food; accepted for interface symmetry only.
    pub fn drop_food(&mut self, pos: Position) -> Result<(), WorldError> {
        self.bounds.cell_of(pos)?;
        Ok(())
    }

    fn replace_source(&mut self, slot: usize) {
        let old = self.sources[slot].position();
        let fresh = FoodSource::random(
            self.bounds,
            self.config.food_source_radius,
            self.config.food_source_amount,
            &mut self.rng,
        );
        debug!(
            slot,
            old_x = old.x,
            old_y = old.y,
            new_x = fresh.position().x,
            new_y = fresh.position().y,
            "Food source depleted, replacing"
        );
        self.sources[slot] = fresh;
        self.replacements += 1;
        self.index.rebuild(&self.sources);
        debug!(covered_cells = self.index.covered_cells(), "Food index rebuilt");
    }

    /// Sum of food left across all sources.
    pub fn remaining_food(&self) -> u64 {
        self.sources.iter().map(|s| s.remaining() as u64).sum()
    }

    /// Number of depleted sources replaced so far.
    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    /// Advance one tick: disperse both fields, then re-mark every source.
    pub fn step(&mut self) {
        let obstacles = self.bounds;
        self.food_pheromone.diffuse(self.policy.as_ref(), &obstacles);
        self.foraging_pheromone.diffuse(self.policy.as_ref(), &obstacles);

        let beacon = self.config.source_beacon;
        for source in &self.sources {
            // Source positions are drawn inside the grid.
            if let Ok(cell) = self.bounds.cell_of(source.position()) {
                self.food_pheromone.deposit_at(cell, beacon);
            }
        }
        self.tick += 1;
        trace!(tick = self.tick, "World stepped");
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            tick: self.tick,
            food_sources: self.sources.len(),
            remaining_food: self.remaining_food(),
            replacements: self.replacements,
            food_pheromone_total: self.food_pheromone.total(),
            foraging_pheromone_total: self.foraging_pheromone.total(),
            peak_food_pheromone: self.food_pheromone.peak(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(5)
    }

    fn small_world() -> World {
        let config = WorldConfig {
            food_source_radius: 2.0,
            food_source_amount: 3,
            ..WorldConfig::with_size(10, 10, 1)
        };
        World::with_sources(
            config,
            vec![FoodSource::new(Position::new(5.0, 5.0), 2.0, 3)],
            rng(),
        )
        .unwrap()
    }

    #[test]
    fn test_random_sources_use_config() {
        let config = WorldConfig {
            food_source_radius: 3.0,
            food_source_amount: 7,
            ..WorldConfig::with_size(20, 15, 4)
        };
        let world = World::new(config, rng()).unwrap();
        assert_eq!(world.food_sources().len(), 4);
        for source in world.food_sources() {
            assert_eq!(source.radius(), 3.0);
            assert_eq!(source.remaining(), 7);
            assert!(!world.is_obstacle(source.position()));
        }
        assert_eq!(world.remaining_food(), 28);
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        assert!(World::new(WorldConfig::with_size(0, 10, 1), rng()).is_err());
        assert!(World::new(WorldConfig::with_size(10, 10, 0), rng()).is_err());
        assert!(World::with_sources(WorldConfig::with_size(10, 10, 1), vec![], rng()).is_err());
        let outside = FoodSource::new(Position::new(12.0, 1.0), 1.0, 1);
        assert!(
            World::with_sources(WorldConfig::with_size(10, 10, 1), vec![outside], rng()).is_err()
        );
    }

    #[test]
    fn test_pick_up_outside_any_source_is_noop() {
        let mut world = small_world();
        assert!(!world.pick_up_food(Position::new(0.0, 0.0)).unwrap());
        assert_eq!(world.remaining_food(), 3);
    }

    #[test]
    fn test_queries_reject_out_of_bounds() {
        let mut world = small_world();
        let outside = Position::new(10.0, 3.0);
        assert!(world.contains_food(outside).is_err());
        assert!(world.food_strength(outside).is_err());
        assert!(world.foraging_strength(outside).is_err());
        assert!(world.drop_food_pheromone(outside, 0.1).is_err());
        assert!(world.drop_foraging_pheromone(outside, 0.1).is_err());
        assert!(world.pick_up_food(outside).is_err());
        assert!(world.drop_food(outside).is_err());
        assert!(world.is_obstacle(outside));
    }

    #[test]
    fn test_home_defaults_to_right_edge() {
        let world = World::new(WorldConfig::with_size(100, 60, 1), rng()).unwrap();
        assert_eq!(world.home(), Position::new(100.0, 30.0));
        assert!(world.is_home(Position::new(85.0, 30.0)));
        assert!(world.is_home(Position::new(100.0, 50.0)));
        assert!(!world.is_home(Position::new(79.0, 30.0)));
    }

    #[test]
    fn test_step_redeposits_source_beacons() {
        let mut world = small_world();
        world.step();
        assert_eq!(world.food_strength(Position::new(5.0, 5.0)).unwrap(), 1.0);
        assert_eq!(world.foraging_strength(Position::new(5.0, 5.0)).unwrap(), 0.0);
        assert_eq!(world.tick(), 1);
        let stats = world.stats();
        assert_eq!(stats.tick, 1);
        assert_eq!(stats.peak_food_pheromone, 1.0);
    }

    #[test]
    fn test_with_policy_leaves_config_untouched() {
        let world = small_world().with_policy(Box::new(crate::pheromone::DecayOnly {
            dropoff: 0.5,
        }));
        assert_eq!(world.policy_name(), "decay_only");
        assert_eq!(
            world.config().dispersal.policy,
            crate::config::DispersalKind::NeighbourAverage
        );
    }

    #[test]
    fn test_debug_names_policy() {
        let world = small_world();
        let rendered = format!("{world:?}");
        assert!(rendered.contains("neighbour_average"));
    }
}
