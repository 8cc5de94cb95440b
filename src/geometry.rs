//! Geometry - continuous positions over a cell grid

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A real-valued point in world space. Agents move in sub-cell steps, so
/// coordinates are not necessarily integral.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two positions
    pub fn distance(&self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_within_radius(&self, other: Position, radius: f32) -> bool {
        self.distance(other) <= radius
    }

    pub fn floor_x(&self) -> i64 {
        self.x.floor() as i64
    }

    pub fn floor_y(&self) -> i64 {
        self.y.floor() as i64
    }

    pub fn is_in_bounds(&self, width: usize, height: usize) -> bool {
        if !self.x.is_finite() || !self.y.is_finite() {
            return false;
        }
        let (x, y) = (self.floor_x(), self.floor_y());
        x >= 0 && y >= 0 && (x as u64) < width as u64 && (y as u64) < height as u64
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Integer cell coordinates, always inside the grid they were resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    /// The sample point used for coverage tests.
    pub fn position(&self) -> Position {
        Position::new(self.x as f32, self.y as f32)
    }
}

/// Anything a dispersal policy can ask "is this blocked?".
pub trait ObstacleMap {
    fn is_obstacle(&self, pos: Position) -> bool;
}

/// Rectangular grid extent. Out-of-bounds is the only obstacle the core knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    width: usize,
    height: usize,
}

impl Bounds {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Floor `pos` into a cell, rejecting anything outside the grid.
    pub fn cell_of(&self, pos: Position) -> Result<Cell, WorldError> {
        if pos.is_in_bounds(self.width, self.height) {
            Ok(Cell {
                x: pos.floor_x() as usize,
                y: pos.floor_y() as usize,
            })
        } else {
            Err(WorldError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Row-major offset of an in-bounds cell
    #[inline]
    pub fn offset(&self, cell: Cell) -> usize {
        cell.y * self.width + cell.x
    }

    /// Clamp a signed coordinate pair onto the grid edge.
    #[inline]
    pub fn clamp(&self, x: i64, y: i64) -> Cell {
        Cell {
            x: x.clamp(0, self.width as i64 - 1) as usize,
            y: y.clamp(0, self.height as i64 - 1) as usize,
        }
    }

    /// Iterate all cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell { x, y }))
    }
}

impl ObstacleMap for Bounds {
    fn is_obstacle(&self, pos: Position) -> bool {
        !pos.is_in_bounds(self.width, self.height)
    }
}
