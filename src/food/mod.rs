//! Food sources - depletable circular regions

mod index;

pub use index::FoodIndex;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSource {
    position: Position,
    radius: f32,
    remaining: u32,
}

impl FoodSource {
    pub fn new(position: Position, radius: f32, amount: u32) -> Self {
        Self {
            position,
            radius,
            remaining: amount,
        }
    }

    /// Place a source uniformly in `[0, width-1] x [0, height-1]`.
    pub fn random<R: Rng>(bounds: Bounds, radius: f32, amount: u32, rng: &mut R) -> Self {
        let x = rng.gen_range(0.0..=(bounds.width() - 1) as f32);
        let y = rng.gen_range(0.0..=(bounds.height() - 1) as f32);
        Self::new(Position::new(x, y), radius, amount)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn covers(&self, pos: Position) -> bool {
        self.position.is_within_radius(pos, self.radius)
    }

    pub fn has_food(&self) -> bool {
        self.remaining > 0
    }

    /// Take one unit of food. Saturates at zero; callers gate on `has_food`.
    pub fn pick_up(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}
