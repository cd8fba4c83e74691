//! Errors raised while building a [GridModel](crate::GridModel).

use crate::Cell;
use thiserror::Error;

/// A grid description that cannot be searched. Detected once at construction so that no search
/// ever runs against an invalid model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("grid of {rows}x{cols} exceeds the largest supported side of {max}", max = i32::MAX)]
    GridTooLarge { rows: usize, cols: usize },

    #[error("start {0} lies outside the grid")]
    StartOutOfBounds(Cell),

    #[error("goal {0} lies outside the grid")]
    GoalOutOfBounds(Cell),

    #[error("obstacle {0} lies outside the grid")]
    ObstacleOutOfBounds(Cell),

    #[error("start {0} is covered by an obstacle")]
    StartBlocked(Cell),

    #[error("goal {0} is covered by an obstacle")]
    GoalBlocked(Cell),
}

pub type Result<T> = std::result::Result<T, ModelError>;
