//! Entrance and exit selection.

use rand::Rng;
use rivulet_core::{ConfigError, RiverParameters};
use rivulet_grid::{Bounds, Position};

/// The two boundary cells a river connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RiverEnds {
    /// First placed cell.
    pub entrance: Position,
    /// Last placed cell.
    pub exit: Position,
}

impl RiverEnds {
    /// Manhattan distance between the ends.
    pub fn distance(&self) -> i32 {
        self.entrance.distance_to(self.exit)
    }

    /// Pick an entrance uniformly among eligible boundary cells, then an
    /// exit uniformly among the boundary cells far enough from it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either candidate set is empty.
    pub fn select<R: Rng + ?Sized>(
        params: &RiverParameters,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let entrances = eligible_entrances(params);
        if entrances.is_empty() {
            return Err(ConfigError::NoEligibleEntrance {
                min_edge_distance: params.min_edge_distance,
            });
        }
        let entrance = entrances[rng.random_range(0..entrances.len())];

        let exits = eligible_exits(params, entrance);
        if exits.is_empty() {
            return Err(ConfigError::NoEligibleExit {
                x: entrance.x,
                y: entrance.y,
                min_separation: params.min_endpoint_separation,
            });
        }
        let exit = exits[rng.random_range(0..exits.len())];
        Ok(Self { entrance, exit })
    }
}

/// Boundary cells of a `width x height` grid, row by row.
pub fn boundary_positions(width: i32, height: i32) -> impl Iterator<Item = Position> {
    Bounds::from_xywh(0, 0, width, height)
        .positions()
        .filter(move |p| p.x == 0 || p.y == 0 || p.x == width - 1 || p.y == height - 1)
}

/// Manhattan distance from `position` to the nearest grid corner.
pub fn corner_distance(width: i32, height: i32, position: Position) -> i32 {
    [
        Position::new(0, 0),
        Position::new(width - 1, 0),
        Position::new(0, height - 1),
        Position::new(width - 1, height - 1),
    ]
    .into_iter()
    .map(|c| c.distance_to(position))
    .min()
    .unwrap_or(0)
}

/// Boundary cells at least `min_edge_distance` away from every corner.
pub fn eligible_entrances(params: &RiverParameters) -> Vec<Position> {
    let (w, h) = (params.width, params.height);
    boundary_positions(w, h)
        .filter(|p| corner_distance(w, h, *p) >= params.min_edge_distance)
        .collect()
}

/// Eligible boundary cells at least `min_endpoint_separation` away from
/// `entrance`.
pub fn eligible_exits(params: &RiverParameters, entrance: Position) -> Vec<Position> {
    eligible_entrances(params)
        .into_iter()
        .filter(|p| *p != entrance && p.distance_to(entrance) >= params.min_endpoint_separation)
        .collect()
}
