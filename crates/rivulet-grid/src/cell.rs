//! Borrowed cell views with neighbour lookups.
//!
//! A [`GridCell`] pairs a position with its value and a reference back to
//! the grid it came from, so neighbours can be resolved without passing
//! the grid around. Cells produced under
//! [`OutOfBounds::TreatAsDefault`] for off-grid positions own a default
//! placeholder value instead of borrowing one.
//!
//! Neighbour order is fixed:
//! - immediates: top, left, right, bottom;
//! - diagonals: top-left, top-right, bottom-left, bottom-right;
//! - surrounding: row by row, skipping the centre.

use crate::bounds::Bounds;
use crate::error::GridError;
use crate::grid::Grid;
use crate::policy::OutOfBounds;
use crate::position::Position;
use crate::submatrix::Submatrix;
use smallvec::{Array, SmallVec};
use std::fmt;

/// Offsets of the four orthogonal neighbours.
pub const IMMEDIATE_OFFSETS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Offsets of the four diagonal neighbours.
pub const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Offsets of the eight surrounding cells.
pub const SURROUNDING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

enum Slot<'g, T> {
    Stored(&'g T),
    Placeholder(T),
}

/// A position in a grid together with its value.
pub struct GridCell<'g, T> {
    grid: &'g Grid<T>,
    position: Position,
    slot: Slot<'g, T>,
}

impl<'g, T> GridCell<'g, T> {
    pub(crate) fn stored(grid: &'g Grid<T>, position: Position, value: &'g T) -> Self {
        Self {
            grid,
            position,
            slot: Slot::Stored(value),
        }
    }

    pub(crate) fn placeholder(grid: &'g Grid<T>, position: Position, value: T) -> Self {
        Self {
            grid,
            position,
            slot: Slot::Placeholder(value),
        }
    }

    /// Position inside the source grid.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The cell's value.
    pub fn value(&self) -> &T {
        match &self.slot {
            Slot::Stored(v) => *v,
            Slot::Placeholder(v) => v,
        }
    }

    /// The grid this cell was read from.
    pub fn grid(&self) -> &'g Grid<T> {
        self.grid
    }

    /// Whether this is an off-grid placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.slot, Slot::Placeholder(_))
    }

    /// Whether the cell lies on the outermost ring.
    pub fn is_on_edge(&self) -> bool {
        self.grid.is_on_edge(self.position)
    }

    /// Whether the cell is a grid corner.
    pub fn is_on_corner(&self) -> bool {
        self.grid.is_on_corner(self.position)
    }

    /// Distance to the nearest boundary; 0 on the edge.
    pub fn edge_distance(&self) -> i32 {
        self.grid.edge_distance(self.position)
    }

    fn in_grid<A>(&self, offsets: &[(i32, i32)]) -> SmallVec<A>
    where
        A: Array<Item = GridCell<'g, T>>,
    {
        offsets
            .iter()
            .filter_map(|&(dx, dy)| self.grid.get_cell(self.position.offset(dx, dy)))
            .collect()
    }

    /// In-grid orthogonal neighbours.
    pub fn immediates(&self) -> SmallVec<[GridCell<'g, T>; 4]> {
        self.in_grid(&IMMEDIATE_OFFSETS)
    }

    /// In-grid diagonal neighbours.
    pub fn diagonals(&self) -> SmallVec<[GridCell<'g, T>; 4]> {
        self.in_grid(&DIAGONAL_OFFSETS)
    }

    /// In-grid surrounding cells.
    pub fn surrounding(&self) -> SmallVec<[GridCell<'g, T>; 8]> {
        self.in_grid(&SURROUNDING_OFFSETS)
    }

    /// In-grid diagonal neighbours whose two shared orthogonal neighbours
    /// (the cells touching both this cell and the diagonal) all satisfy
    /// `predicate`.
    pub fn diagonals_where_shared_immediates(
        &self,
        mut predicate: impl FnMut(&GridCell<'g, T>) -> bool,
    ) -> SmallVec<[GridCell<'g, T>; 4]> {
        let p = self.position;
        self.diagonals()
            .into_iter()
            .filter(|d| {
                let q = d.position();
                [Position::new(q.x, p.y), Position::new(p.x, q.y)]
                    .into_iter()
                    .filter_map(|s| self.grid.get_cell(s))
                    .all(|s| predicate(&s))
            })
            .collect()
    }
}

impl<'g, T: Default> GridCell<'g, T> {
    /// The neighbour at `(dx, dy)` under `policy`.
    pub fn neighbour(
        &self,
        dx: i32,
        dy: i32,
        policy: OutOfBounds,
    ) -> Result<Option<GridCell<'g, T>>, GridError> {
        self.grid.cell(self.position.offset(dx, dy), policy)
    }

    fn collect_neighbours<A>(
        &self,
        offsets: &[(i32, i32)],
        policy: OutOfBounds,
    ) -> Result<SmallVec<A>, GridError>
    where
        A: Array<Item = GridCell<'g, T>>,
    {
        let mut out = SmallVec::new();
        for &(dx, dy) in offsets {
            if let Some(cell) = self.neighbour(dx, dy, policy)? {
                out.push(cell);
            }
        }
        Ok(out)
    }

    /// Orthogonal neighbours under `policy`.
    pub fn immediate_neighbours(
        &self,
        policy: OutOfBounds,
    ) -> Result<SmallVec<[GridCell<'g, T>; 4]>, GridError> {
        self.collect_neighbours(&IMMEDIATE_OFFSETS, policy)
    }

    /// Diagonal neighbours under `policy`.
    pub fn diagonal_neighbours(
        &self,
        policy: OutOfBounds,
    ) -> Result<SmallVec<[GridCell<'g, T>; 4]>, GridError> {
        self.collect_neighbours(&DIAGONAL_OFFSETS, policy)
    }

    /// Surrounding cells under `policy`.
    pub fn surrounding_neighbours(
        &self,
        policy: OutOfBounds,
    ) -> Result<SmallVec<[GridCell<'g, T>; 8]>, GridError> {
        self.collect_neighbours(&SURROUNDING_OFFSETS, policy)
    }

    /// The neighbour on the far side of this cell from `neighbour`.
    ///
    /// Returns `Ok(None)` when `neighbour` does not touch this cell.
    pub fn opposite_neighbour(
        &self,
        neighbour: Position,
        policy: OutOfBounds,
    ) -> Result<Option<GridCell<'g, T>>, GridError> {
        if !self.position.touches(neighbour) {
            return Ok(None);
        }
        let delta = neighbour - self.position;
        self.neighbour(-delta.x, -delta.y, policy)
    }

    /// Cells of this cell's row.
    pub fn row(&self, policy: OutOfBounds) -> Result<Vec<GridCell<'g, T>>, GridError> {
        self.grid.row(self.position.y, policy)
    }

    /// Cells of this cell's column.
    pub fn column(&self, policy: OutOfBounds) -> Result<Vec<GridCell<'g, T>>, GridError> {
        self.grid.column(self.position.x, policy)
    }
}

impl<T: Clone + Default> GridCell<'_, T> {
    /// Square of side `2 * distance + 1` centred on this cell.
    pub fn square_neighbourhood(
        &self,
        distance: i32,
        policy: OutOfBounds,
    ) -> Result<Submatrix<T>, GridError> {
        let side = distance * 2 + 1;
        self.grid.submatrix(
            Bounds::from_xywh(
                self.position.x - distance,
                self.position.y - distance,
                side,
                side,
            ),
            policy,
        )
    }
}

impl<T: Clone> Clone for GridCell<'_, T> {
    fn clone(&self) -> Self {
        Self {
            grid: self.grid,
            position: self.position,
            slot: match &self.slot {
                Slot::Stored(v) => Slot::Stored(*v),
                Slot::Placeholder(v) => Slot::Placeholder(v.clone()),
            },
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for GridCell<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridCell")
            .field("position", &self.position)
            .field("value", self.value())
            .field("placeholder", &self.is_placeholder())
            .finish()
    }
}
