//! Wave 1: near-edge band elimination.
//!
//! A river only enters the band at its two ends, and runs straight
//! through the band there. So:
//!
//! - boundary cells too close to a corner, and their strips, are ground;
//! - a known band cell fixes its whole strip (a water strip reaches one
//!   cell past the band);
//! - once one end is known, boundary cells too close to it are ground,
//!   and once both are known, every other boundary cell is ground.

use crate::board::Board;
use crate::error::InferenceError;
use crate::wave::{Wave, WaveReport};
use rivulet_core::TerrainType;

/// Run one pass of wave 1.
pub(crate) fn manage_edge(board: &mut Board<'_>) -> Result<WaveReport, InferenceError> {
    let mut report = WaveReport::new(Wave::Edge);
    let band = board.band();
    let edges = board.edge_positions();

    let corners: Vec<_> = edges
        .iter()
        .copied()
        .filter(|&p| board.grid.is_on_corner(p))
        .collect();
    for corner in corners {
        for p in board.corner_zone(corner, band) {
            board.resolve(p, TerrainType::Ground, &mut report)?;
        }
    }

    let band_cells: Vec<_> = board
        .grid
        .positions()
        .filter(|&p| board.edge_distance(p) < band)
        .collect();
    for cell in band_cells {
        let Some(terrain) = board.at(cell).terrain() else {
            continue;
        };
        let width = match terrain {
            TerrainType::Water => band + 1,
            TerrainType::Ground => band,
        };
        for p in board.band_strip(cell, width) {
            board.resolve(p, terrain, &mut report)?;
        }
    }

    let ends: Vec<_> = edges.iter().copied().filter(|&p| board.is_water(p)).collect();
    let eliminated: Vec<_> = match ends.as_slice() {
        [end] => edges
            .iter()
            .copied()
            .filter(|&p| p != *end && p.distance_to(*end) < board.params.min_endpoint_separation)
            .collect(),
        [_, _] => edges.iter().copied().filter(|p| !ends.contains(p)).collect(),
        _ => Vec::new(),
    };
    for edge in eliminated {
        for p in board.band_strip(edge, band) {
            board.resolve(p, TerrainType::Ground, &mut report)?;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certainty::TerrainCertainty;
    use rivulet_core::{RiverParameters, RiverSettings};
    use rivulet_grid::{Grid, Position};

    fn params() -> RiverParameters {
        RiverSettings::default().derive(16, 16).unwrap()
    }

    fn water(grid: &mut Grid<TerrainCertainty>, x: i32, y: i32) {
        grid[Position::new(x, y)] = TerrainCertainty::obvious(TerrainType::Water);
    }

    #[test]
    fn corners_become_ground() {
        let p = params();
        let mut board = Board::new(Grid::new(16, 16), &p);
        let report = manage_edge(&mut board).unwrap();
        assert_eq!(report.ground_found, 16);
        for corner in [(0, 0), (15, 0), (0, 15), (15, 15)] {
            assert!(board.is_ground(corner.into()));
        }
        assert!(board.is_ground(Position::new(1, 1)));
        assert!(!board.is_obvious(Position::new(2, 0)));
    }

    #[test]
    fn water_end_extends_one_past_the_band() {
        let p = params();
        let mut grid = Grid::new(16, 16);
        water(&mut grid, 0, 7);
        let mut board = Board::new(grid, &p);
        manage_edge(&mut board).unwrap();
        assert!(board.is_water(Position::new(1, 7)));
        assert!(board.is_water(Position::new(2, 7)));
        assert!(!board.is_obvious(Position::new(3, 7)));
        // Boundary cells near the single end cannot host the other end.
        assert!(board.is_ground(Position::new(0, 8)));
        assert!(board.is_ground(Position::new(1, 8)));
        assert!(!board.is_obvious(Position::new(2, 8)));
    }

    #[test]
    fn both_ends_clear_the_rest_of_the_boundary() {
        let p = params();
        let mut grid = Grid::new(16, 16);
        water(&mut grid, 0, 4);
        water(&mut grid, 15, 12);
        let mut board = Board::new(grid, &p);
        while manage_edge(&mut board).unwrap().changed() {}
        for edge in board.edge_positions() {
            let expected = edge == Position::new(0, 4) || edge == Position::new(15, 12);
            assert_eq!(board.is_water(edge), expected, "{edge}");
        }
        assert!(board.is_ground(Position::new(5, 1)));
        assert!(!board.is_obvious(Position::new(5, 2)));
    }

    #[test]
    fn water_in_a_corner_is_a_contradiction() {
        let p = params();
        let mut grid = Grid::new(16, 16);
        water(&mut grid, 0, 0);
        let mut board = Board::new(grid, &p);
        let err = manage_edge(&mut board).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::Contradiction {
                wave: Wave::Edge,
                attempted: TerrainType::Ground,
                ..
            }
        ));
    }
}
