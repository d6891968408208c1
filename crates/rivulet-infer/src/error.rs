//! Inference errors.

use crate::wave::Wave;
use rivulet_core::{ConfigError, TerrainType};
use rivulet_grid::{Position, Size};
use thiserror::Error;

/// Errors returned by [`TerrainInference`](crate::TerrainInference).
///
/// None of these is recoverable by re-running: a contradiction means the
/// observations violate the constraints every generated river satisfies.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InferenceError {
    /// A wave tried to resolve a cell to the opposite of what it already is.
    #[error("{wave} tried to mark {position} as {attempted}, but it is already {existing}")]
    Contradiction {
        /// The conflicting cell.
        position: Position,
        /// Value the cell already held.
        existing: TerrainType,
        /// Value the wave deduced.
        attempted: TerrainType,
        /// Wave that made the deduction.
        wave: Wave,
    },
    /// The observation grid does not match the river parameters.
    #[error("observation is {actual} but the river parameters describe {expected}")]
    SizeMismatch {
        /// Grid size the parameters were derived for.
        expected: Size,
        /// Grid size of the observation.
        actual: Size,
    },
    /// Settings or inference configuration are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
