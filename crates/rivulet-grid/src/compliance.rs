//! Grid neighbourhood invariant helpers.
//!
//! Shared by the test modules of the grid, cell, and submatrix types.

use crate::grid::Grid;
use crate::position::Position;
use indexmap::IndexSet;

/// Assert that `b in immediates(a)` implies `a in immediates(b)`, and the
/// same for diagonals.
pub fn assert_neighbours_symmetric<T>(grid: &Grid<T>) {
    for cell in grid.cells() {
        let p = cell.position();
        for n in cell.immediates() {
            let back = grid.get_cell(n.position()).map(|c| {
                c.immediates()
                    .iter()
                    .map(|m| m.position())
                    .collect::<IndexSet<_>>()
            });
            assert!(
                back.is_some_and(|set| set.contains(&p)),
                "{p} -> {} not symmetric",
                n.position()
            );
        }
        for n in cell.diagonals() {
            assert!(
                grid.get_cell(n.position())
                    .is_some_and(|c| c.diagonals().iter().any(|m| m.position() == p)),
                "diagonal {p} -> {} not symmetric",
                n.position()
            );
        }
    }
}

/// Assert that surrounding cells are exactly immediates plus diagonals.
pub fn assert_surrounding_is_union<T>(grid: &Grid<T>) {
    for cell in grid.cells() {
        let around: IndexSet<Position> = cell.surrounding().iter().map(|c| c.position()).collect();
        let union: IndexSet<Position> = cell
            .immediates()
            .iter()
            .chain(cell.diagonals().iter())
            .map(|c| c.position())
            .collect();
        assert_eq!(around.len(), union.len(), "at {}", cell.position());
        assert!(around.iter().all(|p| union.contains(p)));
    }
}

/// Assert that edge distance is 0 exactly on the edge and changes by at
/// most 1 between immediate neighbours.
pub fn assert_edge_distance_lipschitz<T>(grid: &Grid<T>) {
    for cell in grid.cells() {
        let d = cell.edge_distance();
        assert_eq!(d == 0, cell.is_on_edge(), "at {}", cell.position());
        for n in cell.immediates() {
            assert!((n.edge_distance() - d).abs() <= 1);
        }
    }
}

/// Run all compliance checks on a grid.
pub fn run_full_compliance<T>(grid: &Grid<T>) {
    assert_neighbours_symmetric(grid);
    assert_surrounding_is_union(grid);
    assert_edge_distance_lipschitz(grid);
}
