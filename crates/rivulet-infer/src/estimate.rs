//! Remaining-water estimate and the final wave.

use crate::board::Board;
use rivulet_grid::Position;

/// Bounds on how many water cells are still undiscovered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemainingEstimate {
    /// Fewest undiscovered water cells consistent with the parameters.
    pub min: i32,
    /// Most undiscovered water cells consistent with the parameters.
    pub max: i32,
}

/// Estimate the undiscovered water from the river parameters, the
/// known ends, and the water already found.
pub(crate) fn remaining_water(board: &Board<'_>) -> RemainingEstimate {
    let params = board.params;
    let mut max = params.target_water_cells;
    let mut min = params.min_water_cells;

    if board.band() > 0 {
        max += max_end_distance(board) - params.min_endpoint_separation;
    }

    let found = board.water_cells().len() as i32;
    min = clamp_count(min - found, min);
    max = clamp_count(max - found, max);
    RemainingEstimate { min, max }
}

/// Longest distance the two river ends can still be apart.
fn max_end_distance(board: &Board<'_>) -> i32 {
    let edges = board.edge_positions();
    let ends: Vec<Position> = edges.iter().copied().filter(|&p| board.is_water(p)).collect();
    let open: Vec<Position> = edges
        .iter()
        .copied()
        .filter(|&p| !board.is_obvious(p))
        .collect();
    match ends.as_slice() {
        [a, b] => a.distance_to(*b),
        [end] => open.iter().map(|p| p.distance_to(*end)).max().unwrap_or(0),
        [] => open
            .iter()
            .flat_map(|a| open.iter().map(move |b| a.distance_to(*b)))
            .max()
            .unwrap_or(0),
        _ => 0,
    }
}

fn clamp_count(value: i32, upper: i32) -> i32 {
    value.min(upper).max(0)
}

/// Spread the remaining budget uniformly over cells no wave assigned a
/// probability: the band's share over unknown band cells, the rest over
/// unknown interior cells. Returns the estimate the shares came from.
pub(crate) fn apply_overall_probabilities(board: &mut Board<'_>) -> RemainingEstimate {
    let estimate = remaining_water(board);
    if board.grid.iter().all(|c| c.has_probability()) {
        return estimate;
    }
    let RemainingEstimate { mut min, mut max } = estimate;
    let band = board.band();

    if band > 0 {
        let band_cells: Vec<Position> = board
            .grid
            .positions()
            .filter(|&p| board.edge_distance(p) < band)
            .collect();
        let found = band_cells.iter().filter(|&&p| board.is_water(p)).count() as i32;
        let uncertain: Vec<Position> = band_cells
            .into_iter()
            .filter(|&p| !board.is_obvious(p))
            .collect();
        let missing = 2 * band - found;
        if !uncertain.is_empty() {
            let share = missing as f64 / uncertain.len() as f64;
            spread(board, &uncertain, share);
        }
        min = clamp_count(min - missing, min);
        max = clamp_count(max - missing, max);
    }

    let interior: Vec<Position> = board
        .grid
        .positions()
        .filter(|&p| board.edge_distance(p) >= band && !board.is_obvious(p))
        .collect();
    if !interior.is_empty() {
        let share = (min + max) as f64 / 2.0 / interior.len() as f64;
        spread(board, &interior, share);
    }

    tracing::debug!(
        target: "rivulet::infer",
        min = estimate.min,
        max = estimate.max,
        "infer.final"
    );
    estimate
}

fn spread(board: &mut Board<'_>, cells: &[Position], share: f64) {
    for &p in cells {
        if let Some(cell) = board.grid.get_mut(p) {
            if !cell.has_probability() {
                cell.add_probability(share);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;
    use rivulet_test_utils::fixtures::MEANDER_16;

    #[test]
    fn unknown_map_uses_the_farthest_boundary_pair() {
        let p = scenario::params(16, 16);
        let board = Board::new(scenario::unknown(16, 16), &p);
        // Farthest boundary pair is opposite corners: 30 apart.
        assert_eq!(
            remaining_water(&board),
            RemainingEstimate {
                min: p.min_water_cells,
                max: p.target_water_cells + 30 - p.min_endpoint_separation,
            }
        );
    }

    #[test]
    fn known_ends_and_water_shrink_the_budget() {
        let p = scenario::params(16, 16);
        let truth = scenario::truth(MEANDER_16);
        let mut observation = crate::observe(&truth, []);
        for end in [Position::new(0, 4), Position::new(15, 11), Position::new(8, 6)] {
            observation[end] = truth[end].into();
        }
        let board = Board::new(observation, &p);
        let estimate = remaining_water(&board);
        assert_eq!(estimate.max, p.target_water_cells + 22 - p.min_endpoint_separation - 3);
        assert_eq!(estimate.min, p.min_water_cells - 3);
    }

    #[test]
    fn shares_only_reach_cells_without_probability() {
        let p = scenario::params(16, 16);
        let mut grid = scenario::unknown(16, 16);
        grid[Position::new(7, 7)] = crate::TerrainCertainty::estimate(0.9);
        let mut board = Board::new(grid, &p);
        let estimate = apply_overall_probabilities(&mut board);
        assert_eq!(board.at(Position::new(7, 7)).probability(), Some(0.9));
        assert!(board.grid.iter().all(|c| c.has_probability()));

        let band_sum: f64 = board
            .grid
            .positions()
            .filter(|&q| board.edge_distance(q) < 2)
            .filter_map(|q| board.at(q).probability())
            .sum();
        assert!((band_sum - 4.0).abs() < 1e-9);
        assert!(estimate.min <= estimate.max);
    }
}
