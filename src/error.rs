use thiserror::Error;

/// Errors surfaced by world construction and the agent-facing API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A position floored to a cell outside the grid.
    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: f32,
        y: f32,
        width: usize,
        height: usize,
    },
    /// Pheromone amounts must be finite and non-negative.
    #[error("pheromone amount {0} must be finite and non-negative")]
    InvalidAmount(f32),
}

impl WorldError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        WorldError::InvalidConfig(msg.into())
    }
}
