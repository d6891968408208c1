//! Wave 2: local deduction.
//!
//! Every river cell has exactly two water immediates (one for an end on
//! the boundary), and no two river cells touch unless they are at most two
//! steps apart along the river. Both facts let small neighbourhoods pin
//! down cells. Cells are visited row by row and deductions apply at once,
//! so later cells see earlier results within the same pass.

use crate::board::Board;
use crate::certainty::TerrainCertainty;
use crate::error::InferenceError;
use crate::wave::{Wave, WaveReport};
use rivulet_core::TerrainType;
use rivulet_grid::Position;
use smallvec::SmallVec;

/// Run one pass of wave 2.
pub(crate) fn spread_obviousness(board: &mut Board<'_>) -> Result<WaveReport, InferenceError> {
    let mut report = WaveReport::new(Wave::Local);
    let positions: Vec<Position> = board.grid.positions().collect();
    for cell in positions {
        let here = board.at(cell);
        if here.is_water() {
            complete_water(board, cell, &mut report)?;
        } else if !here.is_obvious() {
            match deduce_unknown(board, cell) {
                Some(terrain) => {
                    board.resolve(cell, terrain, &mut report)?;
                }
                None => rule_out_u_turns(board, cell, &mut report)?,
            }
        }
    }
    Ok(report)
}

/// Rules for a known water cell.
fn complete_water(
    board: &mut Board<'_>,
    cell: Position,
    report: &mut WaveReport,
) -> Result<(), InferenceError> {
    let goal = if board.is_on_edge(cell) && board.band() > 0 {
        1
    } else {
        2
    };
    let fill = if board.count_immediates(cell, TerrainCertainty::is_water) == goal {
        TerrainType::Ground
    } else if board.count_immediates(cell, TerrainCertainty::is_ground) == 2 {
        TerrainType::Water
    } else {
        return Ok(());
    };
    for n in board.immediates(cell) {
        if !board.is_obvious(n) {
            board.resolve(n, fill, report)?;
        }
    }
    Ok(())
}

/// Rules for an unknown cell that decide it alone, first match wins.
fn deduce_unknown(board: &Board<'_>, cell: Position) -> Option<TerrainType> {
    if board.count_immediates(cell, TerrainCertainty::is_ground) >= 3 {
        return Some(TerrainType::Ground);
    }
    let diagonals = board.diagonals(cell);
    if diagonals.iter().filter(|&&d| board.is_water(d)).count() >= 3 {
        return Some(TerrainType::Ground);
    }

    let water_cornered = board.diagonals_where_shared(cell, TerrainCertainty::is_water);
    let ground_cornered = board.diagonals_where_shared(cell, TerrainCertainty::is_ground);

    // Water on three sides of a square would close it.
    if water_cornered.iter().any(|&d| board.is_water(d)) {
        return Some(TerrainType::Ground);
    }
    if ground_cornered
        .iter()
        .any(|&d| board.is_water(cell + (cell - d)))
    {
        return Some(TerrainType::Ground);
    }
    // Two diagonal water cells must meet through this cell.
    if water_cornered.iter().any(|&d| board.is_ground(d)) {
        return Some(TerrainType::Water);
    }
    if ground_cornered.iter().any(|&d| board.is_water(d)) {
        return Some(TerrainType::Ground);
    }
    None
}

/// Two adjacent unknown cells boxed in by ground, with only two adjacent
/// unknown cells on one side, could only hold a U-turn, which would touch
/// itself.
fn rule_out_u_turns(
    board: &mut Board<'_>,
    cell: Position,
    report: &mut WaveReport,
) -> Result<(), InferenceError> {
    for neighbour in board.immediates(cell) {
        if board.is_obvious(neighbour) {
            continue;
        }
        let mut around: SmallVec<[Position; 6]> = SmallVec::new();
        for p in board
            .immediates(cell)
            .into_iter()
            .chain(board.immediates(neighbour))
        {
            if p != cell && p != neighbour && !around.contains(&p) {
                around.push(p);
            }
        }
        let unknown: SmallVec<[Position; 6]> = around
            .iter()
            .copied()
            .filter(|&p| !board.is_obvious(p))
            .collect();
        let ground = around.iter().filter(|&&p| board.is_ground(p)).count();
        if unknown.len() == 2 && ground == 4 && unknown[0].is_adjacent(unknown[1]) {
            board.resolve(cell, TerrainType::Ground, report)?;
            board.resolve(neighbour, TerrainType::Ground, report)?;
            return Ok(());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;
    use rivulet_core::RiverParameters;

    fn run<'p>(params: &'p RiverParameters, map: &str) -> (Board<'p>, WaveReport) {
        let mut board = Board::new(scenario::observation(map), params);
        let report = spread_obviousness(&mut board).unwrap();
        (board, report)
    }

    #[test]
    fn satisfied_water_cell_closes_its_other_sides() {
        let p = scenario::params(9, 9);
        let (board, _) = run(&p, "
            ?????????
            ?????????
            ?????????
            ?????????
            ???~~~???
            ?????????
            ?????????
            ?????????
            ?????????
        ");
        assert!(board.is_ground(Position::new(4, 3)));
        assert!(board.is_ground(Position::new(4, 5)));
    }

    #[test]
    fn water_between_two_ground_cells_continues() {
        let p = scenario::params(9, 9);
        let (board, report) = run(&p, "
            ?????????
            ?????????
            ?????????
            ????.????
            ????~????
            ????.????
            ?????????
            ?????????
            ?????????
        ");
        assert!(board.is_water(Position::new(3, 4)));
        assert!(board.is_water(Position::new(5, 4)));
        assert!(report.water_found >= 2);
    }

    #[test]
    fn boundary_end_needs_a_single_neighbour() {
        let p = scenario::params(9, 9);
        let (board, _) = run(&p, "
            ?????????
            ?????????
            ?????????
            ?????????
            ~~???????
            ?????????
            ?????????
            ?????????
            ?????????
        ");
        assert!(board.is_ground(Position::new(0, 3)));
        assert!(board.is_ground(Position::new(0, 5)));
    }

    #[test]
    fn water_on_three_corners_of_a_square_excludes_the_fourth() {
        let p = scenario::params(9, 9);
        let (board, _) = run(&p, "
            ?????????
            ?????????
            ?????????
            ?????????
            ?????~???
            ????~~???
            ?????????
            ?????????
            ?????????
        ");
        assert!(board.is_ground(Position::new(4, 4)));
    }

    #[test]
    fn diagonal_water_meets_through_the_only_open_corner() {
        let p = scenario::params(9, 9);
        let (board, _) = run(&p, "
            ?????????
            ?????????
            ?????????
            ?????????
            ?????~???
            ????~.???
            ?????????
            ?????????
            ?????????
        ");
        assert!(board.is_water(Position::new(4, 4)));
    }

    #[test]
    fn boxed_in_square_is_ground() {
        let p = scenario::params(9, 9);
        let (board, report) = run(&p, "
            .........
            .........
            .........
            ...??....
            ...??....
            .........
            .........
            .........
            .........
        ");
        for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
            assert!(board.is_ground(Position::new(x, y)));
        }
        assert_eq!(report.ground_found, 4);
    }
}
