//! Wave 3: connectivity pruning.
//!
//! A hidden water cell lies on a stretch of river joining two dangling
//! endpoints, so it needs two endpoints close enough that the stretch fits
//! in the remaining water budget, while leaving enough budget for every
//! other dangling water cell. Unknown cells with no such pair are ground.

use crate::board::Board;
use crate::certainty::TerrainCertainty;
use crate::error::InferenceError;
use crate::estimate::remaining_water;
use crate::wave::{Wave, WaveReport};
use rivulet_core::TerrainType;
use rivulet_grid::Position;

/// A cell the river still has to connect to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub(crate) position: Position,
    /// Water immediates it still lacks.
    pub(crate) missing: i32,
    /// Known water, as opposed to an unknown boundary cell.
    pub(crate) water: bool,
}

/// Known water cells and unknown boundary cells that still lack water
/// neighbours, row by row.
pub(crate) fn dangling_endpoints(board: &Board<'_>) -> Vec<Endpoint> {
    board
        .grid
        .positions()
        .filter_map(|position| {
            let here = board.at(position);
            let water = here.is_water();
            if !water && (here.is_obvious() || !board.is_on_edge(position)) {
                return None;
            }
            let missing = board.missing_water(position);
            (missing > 0).then_some(Endpoint {
                position,
                missing,
                water,
            })
        })
        .collect()
}

/// Run one pass of wave 3.
pub(crate) fn prune_unreachable(board: &mut Board<'_>) -> Result<WaveReport, InferenceError> {
    let mut report = WaveReport::new(Wave::Connectivity);
    let remaining = remaining_water(board).max;
    let endpoints = dangling_endpoints(board);
    if endpoints.is_empty() {
        return Ok(report);
    }

    let unknown = board.positions_where(|c| !c.is_obvious());
    for cell in unknown {
        let mut in_range: Vec<(Endpoint, i32)> = endpoints
            .iter()
            .filter_map(|e| {
                let distance = e.position.distance_to(cell);
                if distance > remaining {
                    return None;
                }
                if e.missing == 1 && distance > 1 && bound_to_diagonal(board, e.position) {
                    return None;
                }
                Some((*e, distance))
            })
            .collect();
        in_range.sort_by_key(|&(_, distance)| distance);

        let reachable = match in_range.len() {
            0 => false,
            1 => true,
            _ => has_valid_pair(&endpoints, &in_range, remaining),
        };
        if !reachable {
            board.resolve(cell, TerrainType::Ground, &mut report)?;
        }
    }
    Ok(report)
}

/// Whether `position` has a water diagonal it can only reach through one
/// of their shared immediates, which then uses up its last free side.
fn bound_to_diagonal(board: &Board<'_>, position: Position) -> bool {
    board
        .diagonals_where_shared(position, |c: &TerrainCertainty| !c.is_water())
        .iter()
        .any(|&d| board.is_water(d))
}

/// Search `in_range` (sorted by distance) for two endpoints a stretch
/// through the cell could join within `remaining` cells.
pub(crate) fn has_valid_pair(
    endpoints: &[Endpoint],
    in_range: &[(Endpoint, i32)],
    remaining: i32,
) -> bool {
    for (i, &(a, da)) in in_range.iter().enumerate() {
        for &(b, db) in &in_range[i + 1..] {
            let stretch = da + db - 1;
            if stretch > remaining {
                break;
            }
            if a.position.is_adjacent(b.position) {
                continue;
            }
            if remaining - stretch < cells_to_leave(endpoints, a, b) {
                continue;
            }
            return true;
        }
    }
    false
}

/// Fewest cells the other dangling water cells need, when each hidden
/// cell fills at most two missing sides.
fn cells_to_leave(endpoints: &[Endpoint], a: Endpoint, b: Endpoint) -> i32 {
    let (mut twos, mut ones) = (0, 0);
    for e in endpoints
        .iter()
        .filter(|e| e.water && e.position != a.position && e.position != b.position)
    {
        match e.missing {
            2 => twos += 1,
            1 => ones += 1,
            _ => {}
        }
    }
    let pair_twos = [a, b].iter().filter(|e| e.missing == 2).count() as i32;
    twos + (ones + pair_twos + 1) / 2
}
