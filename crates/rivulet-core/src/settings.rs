//! River settings and the parameters derived from them for a given grid.
//!
//! [`RiverSettings`] holds the tunable constants shared by the generator
//! and the inference engine. [`derive`](RiverSettings::derive) turns them
//! into concrete cell counts for a grid size. The inference engine consumes
//! the same [`RiverParameters`] as the generator, never a live generator.

use crate::error::ConfigError;

// ── RiverSettings ──────────────────────────────────────────────────

/// Tunable constants controlling river shape.
#[derive(Clone, Debug, PartialEq)]
pub struct RiverSettings {
    /// Cells the river must keep from the map edge, except where it
    /// enters and leaves. Also the minimum distance of an end from a
    /// corner. Default: 2.
    pub min_edge_distance: i32,
    /// Minimum entrance/exit distance as a ratio of the worst-case maximum
    /// distance between two ends. Default: 1.0.
    pub separation_ratio: f64,
    /// Target water cells as a ratio of the minimum end separation.
    /// Default: 1.7.
    pub target_ratio: f64,
    /// Minimum water cells as a ratio of the target. Default: 0.85.
    pub min_ratio: f64,
    /// Weight multiplier of the `Closest` strategy. Default: 1.0.
    pub closest_modifier: f64,
    /// Weight multiplier of the `Furthest` strategy. Default: 0.5.
    pub furthest_modifier: f64,
    /// Weight multiplier of the `Center` strategy. Default: 3.0.
    pub center_modifier: f64,
    /// Generation attempts before giving up. Default: 10.
    pub max_attempts: u32,
}

impl Default for RiverSettings {
    fn default() -> Self {
        Self {
            min_edge_distance: 2,
            separation_ratio: 1.0,
            target_ratio: 1.7,
            min_ratio: 0.85,
            closest_modifier: 1.0,
            furthest_modifier: 0.5,
            center_modifier: 3.0,
            max_attempts: 10,
        }
    }
}

impl RiverSettings {
    /// Check that every ratio and modifier is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_edge_distance < 0 {
            return Err(ConfigError::InvalidSetting {
                name: "min_edge_distance",
                value: self.min_edge_distance as f64,
                reason: "must be >= 0",
            });
        }
        positive("separation_ratio", self.separation_ratio)?;
        positive("target_ratio", self.target_ratio)?;
        positive("min_ratio", self.min_ratio)?;
        if self.min_ratio > 1.0 {
            return Err(ConfigError::InvalidSetting {
                name: "min_ratio",
                value: self.min_ratio,
                reason: "must be <= 1",
            });
        }
        non_negative("closest_modifier", self.closest_modifier)?;
        non_negative("furthest_modifier", self.furthest_modifier)?;
        non_negative("center_modifier", self.center_modifier)?;
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "max_attempts",
                value: 0.0,
                reason: "must be >= 1",
            });
        }
        Ok(())
    }

    /// Derive concrete cell counts for a `width` x `height` grid.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the settings are invalid or the grid leaves no
    /// room inside the edge band.
    pub fn derive(&self, width: i32, height: i32) -> Result<RiverParameters, ConfigError> {
        self.validate()?;
        let padding = self.min_edge_distance * 2;
        if width < 3 || height < 3 || width <= padding || height <= padding {
            return Err(ConfigError::GridTooSmall {
                width,
                height,
                min_edge_distance: self.min_edge_distance,
            });
        }

        let worst_case = worst_case_end_distance(width, height, self.min_edge_distance);
        let min_endpoint_separation = (self.separation_ratio * worst_case as f64).floor() as i32;
        let target_water_cells = (self.target_ratio * min_endpoint_separation as f64).floor() as i32;
        let min_water_cells = (self.min_ratio * target_water_cells as f64).floor() as i32;

        Ok(RiverParameters {
            width,
            height,
            min_edge_distance: self.min_edge_distance,
            min_endpoint_separation,
            target_water_cells,
            min_water_cells,
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidSetting {
            name,
            value,
            reason: "must be finite and > 0",
        });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidSetting {
            name,
            value,
            reason: "must be finite and >= 0",
        });
    }
    Ok(())
}

/// Longest entrance/exit distance guaranteed to be reachable from any
/// eligible entrance, i.e. when the entrance sits mid-way along the
/// longest side.
fn worst_case_end_distance(width: i32, height: i32, min_edge_distance: i32) -> i32 {
    let padding = min_edge_distance * 2;
    let (mut inner_w, inner_h) = {
        let (w, h) = (width - padding, height - padding);
        if h > w {
            (h, w)
        } else {
            (w, h)
        }
    };
    inner_w = inner_w / 2 + 1;
    (inner_w - 1) + (inner_h - 1) + padding
}

// ── RiverParameters ────────────────────────────────────────────────

/// Concrete river constraints for one grid size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RiverParameters {
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
    /// Width of the near-edge band.
    pub min_edge_distance: i32,
    /// Minimum Manhattan distance between entrance and exit.
    pub min_endpoint_separation: i32,
    /// Expected number of water cells before the end-distance adjustment.
    pub target_water_cells: i32,
    /// Shortest acceptable river.
    pub min_water_cells: i32,
}

impl RiverParameters {
    /// Target length once the actual entrance/exit distance is known.
    ///
    /// Ends placed further apart than the minimum separation get the
    /// surplus added to the target.
    pub fn adjusted_target(&self, end_distance: i32) -> i32 {
        self.target_water_cells + (end_distance - self.min_endpoint_separation)
    }
}
