//! Configuration errors shared by the generator and the inference engine.
//!
//! Every variant is fatal: a degenerate grid or ratio set makes endpoint
//! selection impossible, so retrying with another seed cannot help.

use thiserror::Error;

/// Errors detected while validating settings or deriving river parameters.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid cannot hold a river with the configured edge distance.
    #[error("grid {width}x{height} is too small for a minimum edge distance of {min_edge_distance}")]
    GridTooSmall {
        /// Grid width in cells.
        width: i32,
        /// Grid height in cells.
        height: i32,
        /// Configured minimum distance between the river and the map edge.
        min_edge_distance: i32,
    },
    /// A ratio or modifier is NaN, infinite, or out of its valid range.
    #[error("invalid setting `{name}` = {value}: {reason}")]
    InvalidSetting {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Which constraint was violated.
        reason: &'static str,
    },
    /// No boundary cell is far enough from every corner to host an entrance.
    #[error("no boundary cell is at least {min_edge_distance} cells away from the corners")]
    NoEligibleEntrance {
        /// Configured minimum distance between the river and the map edge.
        min_edge_distance: i32,
    },
    /// No boundary cell is far enough from the chosen entrance to host an exit.
    #[error("no exit cell is at least {min_separation} cells away from entrance ({x}, {y})")]
    NoEligibleExit {
        /// Entrance column.
        x: i32,
        /// Entrance row.
        y: i32,
        /// Required Manhattan distance between entrance and exit.
        min_separation: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_dimensions() {
        let err = ConfigError::GridTooSmall {
            width: 3,
            height: 4,
            min_edge_distance: 2,
        };
        let text = err.to_string();
        assert!(text.contains("3x4"));
        assert!(text.contains('2'));
    }

    #[test]
    fn display_mentions_setting_name() {
        let err = ConfigError::InvalidSetting {
            name: "target_ratio",
            value: f64::NAN,
            reason: "must be finite and > 0",
        };
        assert!(err.to_string().contains("target_ratio"));
    }
}
