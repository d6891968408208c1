//! Error types for grid operations.

use crate::position::Position;
use std::fmt;

/// Errors arising from grid construction or out-of-range access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A position is outside the grid under the `Throw` policy.
    OutOfBounds {
        /// The offending position.
        position: Position,
        /// Grid width at the time of access.
        width: i32,
        /// Grid height at the time of access.
        height: i32,
    },
    /// A row or column operation was given a negative count.
    NegativeCount {
        /// The rejected count.
        count: i32,
    },
    /// Input data does not describe a rectangular grid.
    ShapeMismatch {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                position,
                width,
                height,
            } => {
                write!(f, "position {position} out of bounds for {width}x{height} grid")
            }
            Self::NegativeCount { count } => {
                write!(f, "count must be non-negative, got {count}")
            }
            Self::ShapeMismatch { reason } => write!(f, "shape mismatch: {reason}"),
        }
    }
}

impl std::error::Error for GridError {}
