//! Domain errors for the simulation core

use thiserror::Error;

/// Errors raised by the grid, rules and scheduler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("cell id {id} is out of range for a grid of {cell_count} cells")]
    InvalidCellId { id: usize, cell_count: usize },

    #[error("speed index {index} is outside the speed table (0..{len})")]
    InvalidSpeedIndex { index: usize, len: usize },

    #[error("speed table must contain at least one step")]
    EmptySpeedTable,

    #[error("speed step {index} is invalid: {reason}")]
    InvalidSpeedStep { index: usize, reason: &'static str },

    #[error("invalid rule set: {0}")]
    InvalidRuleSet(String),

    #[error(
        "pattern of {pattern_width}x{pattern_height} at ({row}, {col}) \
         does not fit a {width}x{height} grid"
    )]
    PatternOutOfBounds {
        pattern_width: usize,
        pattern_height: usize,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },
}
