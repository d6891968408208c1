//! Generation errors.

use rivulet_core::ConfigError;
use rivulet_grid::Position;
use thiserror::Error;

/// Why a single generation attempt was abandoned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathFailure {
    /// Every neighbour of the tail was filtered out.
    #[error("blocked at {tail} after placing {placed} cells")]
    Blocked {
        /// Last placed cell.
        tail: Position,
        /// Cells placed so far.
        placed: usize,
    },
    /// The target length was reached before the exit.
    #[error("reached the target of {placed} cells at {tail} without reaching the exit")]
    ExitNotReached {
        /// Last placed cell.
        tail: Position,
        /// Cells placed.
        placed: usize,
    },
    /// The exit was reached with too few cells.
    #[error("path of {placed} cells is shorter than the minimum of {minimum}")]
    TooShort {
        /// Cells placed.
        placed: usize,
        /// Required minimum.
        minimum: i32,
    },
}

/// Errors returned by [`RiverGenerator`](crate::RiverGenerator).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerationError {
    /// One attempt failed; retrying with another seed may succeed.
    #[error("attempt {attempt} failed: {reason}")]
    PathFailure {
        /// Zero-based attempt index.
        attempt: u32,
        /// What went wrong.
        reason: PathFailure,
    },
    /// Every attempt failed.
    #[error("no valid river after {attempts} attempts, last failure: {last}")]
    AttemptsExhausted {
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        last: PathFailure,
    },
    /// The settings cannot produce a river on this grid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GenerationError {
    /// Whether retrying with another seed can help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PathFailure { .. })
    }
}
