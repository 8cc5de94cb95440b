//! Pheromone fields - capped scalar grids with double-buffered diffusion

mod dispersal;

pub use dispersal::{DecayOnly, DispersalPolicy, NeighbourAverage};

use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::geometry::{Bounds, Cell, ObstacleMap, Position};

/// Which of the two trails a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PheromoneKind {
    /// Trail laid by ants carrying food; leads to food.
    Food,
    /// Trail laid by foraging ants; leads home.
    Foraging,
}

/// A `width x height` grid of concentrations in `[0, max_level]`.
#[derive(Debug, Clone)]
pub struct PheromoneGrid {
    bounds: Bounds,
    max_level: f32,
    cells: Vec<f32>,
    scratch: Vec<f32>,
}

impl PheromoneGrid {
    pub fn new(bounds: Bounds, max_level: f32) -> Self {
        Self {
            bounds,
            max_level,
            cells: vec![0.0; bounds.cell_count()],
            scratch: vec![0.0; bounds.cell_count()],
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn max_level(&self) -> f32 {
        self.max_level
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    #[inline]
    pub fn at(&self, cell: Cell) -> f32 {
        self.cells[self.bounds.offset(cell)]
    }

    /// Concentration at `floor(pos)`.
    pub fn strength(&self, pos: Position) -> Result<f32, WorldError> {
        let cell = self.bounds.cell_of(pos)?;
        Ok(self.at(cell))
    }

    /// Add `amount` at `floor(pos)`, saturating at the max level.
    pub fn deposit(&mut self, pos: Position, amount: f32) -> Result<(), WorldError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(WorldError::InvalidAmount(amount));
        }
        let cell = self.bounds.cell_of(pos)?;
        self.deposit_at(cell, amount);
        Ok(())
    }

    pub(crate) fn deposit_at(&mut self, cell: Cell, amount: f32) {
        let offset = self.bounds.offset(cell);
        let current = self.cells[offset];
        self.cells[offset] = if current + amount > self.max_level {
            self.max_level
        } else {
            current + amount
        };
    }

    /// Replace every cell with the policy's value, computed from the
    /// pre-step snapshot, then swap buffers.
    pub fn diffuse(&mut self, policy: &dyn DispersalPolicy, obstacles: &dyn ObstacleMap) {
        let mut next = std::mem::take(&mut self.scratch);
        policy.disperse(self, obstacles, &mut next);
        self.scratch = std::mem::replace(&mut self.cells, next);
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().map(|&v| v as f64).sum()
    }

    pub fn peak(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }
}
