use crate::error::WorldError;
use crate::geometry::{Bounds, Position};

use super::FoodSource;

/// Per-cell lookup of the food source owning each cell.
///
/// Derived entirely from the source list; it is only ever recomputed from
/// scratch, never patched.
#[derive(Debug, Clone)]
pub struct FoodIndex {
    bounds: Bounds,
    owners: Vec<Option<usize>>,
}

impl FoodIndex {
    pub fn build(bounds: Bounds, sources: &[FoodSource]) -> Self {
        let mut index = Self {
            bounds,
            owners: vec![None; bounds.cell_count()],
        };
        index.rebuild(sources);
        index
    }

    /// Recompute every cell. On overlap the last covering live source wins.
    pub fn rebuild(&mut self, sources: &[FoodSource]) {
        let bounds = self.bounds;
        for cell in bounds.cells() {
            let sample = cell.position();
            self.owners[bounds.offset(cell)] = sources
                .iter()
                .rposition(|source| source.has_food() && source.covers(sample));
        }
    }

    pub fn owner_of(&self, pos: Position) -> Result<Option<usize>, WorldError> {
        let cell = self.bounds.cell_of(pos)?;
        Ok(self.owners[self.bounds.offset(cell)])
    }

    /// Number of cells owned by some source.
    pub fn covered_cells(&self) -> usize {
        self.owners.iter().filter(|owner| owner.is_some()).count()
    }
}
