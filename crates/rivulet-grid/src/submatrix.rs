//! Grids cut out of a larger grid.

use crate::bounds::Bounds;
use crate::grid::Grid;
use crate::position::Position;
use std::ops::{Deref, DerefMut};

/// An owned copy of part of a parent grid, remembering where it came from.
///
/// Positions inside the submatrix are local; [`master_position`]
/// translates them back into the parent's frame.
///
/// [`master_position`]: Submatrix::master_position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submatrix<T> {
    grid: Grid<T>,
    offset: Position,
}

impl<T> Default for Submatrix<T> {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            offset: Position::ORIGIN,
        }
    }
}

impl<T> Submatrix<T> {
    /// Wrap `grid` as sitting at `offset` in its parent.
    pub fn new(grid: Grid<T>, offset: Position) -> Self {
        Self { grid, offset }
    }

    /// Origin of this submatrix in the parent.
    pub fn offset(&self) -> Position {
        self.offset
    }

    /// Move the submatrix within the parent's frame.
    pub fn set_offset(&mut self, offset: Position) {
        self.offset = offset;
    }

    /// Rectangle covered in the parent's frame.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.offset, self.grid.size())
    }

    /// Translate a local position into the parent's frame.
    pub fn master_position(&self, local: Position) -> Position {
        self.offset + local
    }

    /// Drop the offset and keep the values.
    pub fn into_grid(self) -> Grid<T> {
        self.grid
    }
}

impl<T> Deref for Submatrix<T> {
    type Target = Grid<T>;

    fn deref(&self) -> &Grid<T> {
        &self.grid
    }
}

impl<T> DerefMut for Submatrix<T> {
    fn deref_mut(&mut self) -> &mut Grid<T> {
        &mut self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutOfBounds;

    #[test]
    fn bounds_follow_offset() {
        let mut s = Submatrix::new(Grid::filled(2, 3, 1u8), Position::new(4, 1));
        assert_eq!(s.bounds(), Bounds::from_xywh(4, 1, 2, 3));
        s.set_offset(Position::new(0, 0));
        assert_eq!(s.master_position(Position::new(1, 2)), Position::new(1, 2));
    }

    #[test]
    fn submatrix_of_submatrix_stays_local() {
        let parent = Grid::from_fn(6, 6, |p| p.x + p.y * 6);
        let outer = parent
            .submatrix(Bounds::from_xywh(1, 1, 4, 4), OutOfBounds::Throw)
            .unwrap();
        let inner = outer
            .submatrix(Bounds::from_xywh(1, 1, 2, 2), OutOfBounds::Throw)
            .unwrap();
        let in_parent = outer.master_position(inner.master_position(Position::ORIGIN));
        assert_eq!(in_parent, Position::new(2, 2));
        assert_eq!(inner[Position::ORIGIN], parent[in_parent]);
    }

    #[test]
    fn into_grid_keeps_values() {
        let s = Submatrix::new(Grid::filled(1, 1, 'a'), Position::new(3, 3));
        assert_eq!(s.into_grid()[Position::ORIGIN], 'a');
    }
}
