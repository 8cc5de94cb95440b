use crate::geometry::{Cell, ObstacleMap};

use super::PheromoneGrid;

/// Moore neighbourhood, excluding the cell itself.
const NEIGHBOUR_OFFSETS: [(i64, i64); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Per-tick rule turning one field snapshot into the next.
pub trait DispersalPolicy: Send + Sync {
    fn name(&self) -> &str;

    /// New value of `cell`, reading only from `grid`.
    fn dispersed_value(
        &self,
        grid: &PheromoneGrid,
        obstacles: &dyn ObstacleMap,
        cell: Cell,
    ) -> f32;

    /// Fill `out` (row-major, same extent as `grid`) from the snapshot.
    fn disperse(&self, grid: &PheromoneGrid, obstacles: &dyn ObstacleMap, out: &mut [f32]) {
        let bounds = grid.bounds();
        debug_assert_eq!(out.len(), bounds.cell_count());
        for cell in bounds.cells() {
            out[bounds.offset(cell)] = self.dispersed_value(grid, obstacles, cell);
        }
    }
}

/// Blend each cell with the mean of its eight neighbours, then decay.
/// Neighbour offsets past the edge are clamped back onto the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighbourAverage {
    /// Share of the cell's own value retained before decay.
    pub keep: f32,
    pub dropoff: f32,
}

impl NeighbourAverage {
    pub fn neighbour_sum(grid: &PheromoneGrid, cell: Cell) -> f32 {
        let bounds = grid.bounds();
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|&(dx, dy)| grid.at(bounds.clamp(cell.x as i64 + dx, cell.y as i64 + dy)))
            .sum()
    }
}

impl Default for NeighbourAverage {
    fn default() -> Self {
        Self {
            keep: 0.5,
            dropoff: 0.95,
        }
    }
}

impl DispersalPolicy for NeighbourAverage {
    fn name(&self) -> &str {
        "neighbour_average"
    }

    fn dispersed_value(
        &self,
        grid: &PheromoneGrid,
        obstacles: &dyn ObstacleMap,
        cell: Cell,
    ) -> f32 {
        if obstacles.is_obstacle(cell.position()) {
            return 0.0;
        }
        let neighbours = Self::neighbour_sum(grid, cell);
        let blended = ((1.0 - self.keep) * neighbours) / NEIGHBOUR_OFFSETS.len() as f32
            + self.keep * grid.at(cell);
        blended * self.dropoff
    }
}

/// Plain exponential decay with no spreading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayOnly {
    pub dropoff: f32,
}

impl DispersalPolicy for DecayOnly {
    fn name(&self) -> &str {
        "decay_only"
    }

    fn dispersed_value(
        &self,
        grid: &PheromoneGrid,
        obstacles: &dyn ObstacleMap,
        cell: Cell,
    ) -> f32 {
        if obstacles.is_obstacle(cell.position()) {
            0.0
        } else {
            grid.at(cell) * self.dropoff
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Bounds, Position};

    struct Walls(Vec<Cell>);

    impl ObstacleMap for Walls {
        fn is_obstacle(&self, pos: Position) -> bool {
            self.0.iter().any(|c| c.position() == pos)
        }
    }

    fn grid_with(width: usize, height: usize, values: &[(usize, usize, f32)]) -> PheromoneGrid {
        let mut grid = PheromoneGrid::new(Bounds::new(width, height), 1.0);
        for &(x, y, v) in values {
            grid.deposit_at(Cell { x, y }, v);
        }
        grid
    }

    #[test]
    fn test_zero_field_stays_zero() {
        let mut grid = grid_with(5, 4, &[]);
        let bounds = grid.bounds();
        for _ in 0..10 {
            grid.diffuse(&NeighbourAverage::default(), &bounds);
        }
        assert!(grid.cells().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_corner_neighbours_are_clamped() {
        // 3x3 grid with distinct values so every sample is identifiable.
        let mut values = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                values.push((x, y, (1 + x + 3 * y) as f32 / 100.0));
            }
        }
        let grid = grid_with(3, 3, &values);
        let v = |x: usize, y: usize| grid.at(Cell { x, y });

        // Offsets around (0,0) clamp to (0,1) (0,1) (1,1) (0,0) (1,0) (0,0) (0,0) (1,0).
        let expected =
            v(0, 1) + v(0, 1) + v(1, 1) + v(0, 0) + v(1, 0) + v(0, 0) + v(0, 0) + v(1, 0);
        let sum = NeighbourAverage::neighbour_sum(&grid, Cell { x: 0, y: 0 });
        assert!((sum - expected).abs() < 1e-6);
        assert!((sum - 0.20).abs() < 1e-6);

        // Wrapping would have summed to 0.44.
        let wrapped =
            v(2, 1) + v(0, 1) + v(1, 1) + v(2, 0) + v(1, 0) + v(2, 2) + v(0, 2) + v(1, 2);
        assert!((wrapped - 0.44).abs() < 1e-6);
    }

    #[test]
    fn test_blend_formula() {
        let grid = grid_with(3, 3, &[(1, 1, 0.8), (0, 0, 0.4)]);
        let policy = NeighbourAverage::default();
        let centre = policy.dispersed_value(&grid, &grid.bounds(), Cell { x: 1, y: 1 });
        let expected = (0.5 * 0.4 / 8.0 + 0.5 * 0.8) * 0.95;
        assert!((centre - expected).abs() < 1e-6);
    }

    #[test]
    fn test_single_cell_grid_keeps_own_value() {
        // Every neighbour clamps onto the only cell.
        let grid = grid_with(1, 1, &[(0, 0, 1.0)]);
        let value =
            NeighbourAverage::default().dispersed_value(&grid, &grid.bounds(), Cell { x: 0, y: 0 });
        assert!((value - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_obstacle_cells_are_zeroed() {
        let grid = grid_with(3, 1, &[(0, 0, 1.0), (1, 0, 1.0), (2, 0, 1.0)]);
        let walls = Walls(vec![Cell { x: 1, y: 0 }]);
        let mut out = vec![0.0; 3];
        NeighbourAverage::default().disperse(&grid, &walls, &mut out);
        assert_eq!(out[1], 0.0);
        assert!((out[0] - 0.95).abs() < 1e-6);

        DecayOnly { dropoff: 0.5 }.disperse(&grid, &walls, &mut out);
        assert_eq!(out, vec![0.5, 0.0, 0.5]);
    }
}
