//! The generic 2D container.

use crate::bounds::{Bounds, Size};
use crate::cell::GridCell;
use crate::error::GridError;
use crate::policy::OutOfBounds;
use crate::position::Position;
use crate::submatrix::Submatrix;
use std::ops::{Index, IndexMut};

/// A dense `width x height` grid stored row-major.
///
/// Negative dimensions passed to constructors are clamped to zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    cells: Vec<T>,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }
}

// ── Construction ───────────────────────────────────────────────────

impl<T> Grid<T> {
    /// Build a grid by evaluating `f` at every position, row by row.
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(Position) -> T) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(Position::new(x, y)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a grid from rows of equal length.
    ///
    /// Returns `Err(GridError::ShapeMismatch)` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len()) as i32;
        if let Some((y, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() as i32 != width)
        {
            return Err(GridError::ShapeMismatch {
                reason: format!("row {y} has {} cells, expected {width}", row.len()),
            });
        }
        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// A `len x 1` grid.
    pub fn from_row(row: Vec<T>) -> Self {
        Self {
            width: row.len() as i32,
            height: if row.is_empty() { 0 } else { 1 },
            cells: row,
        }
    }

    /// A `1 x len` grid.
    pub fn from_column(column: Vec<T>) -> Self {
        Self {
            width: if column.is_empty() { 0 } else { 1 },
            height: column.len() as i32,
            cells: column,
        }
    }

    /// Grid with every cell set to `value`.
    pub fn filled(width: i32, height: i32, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(width, height, |_| value.clone())
    }

    /// Grid of default values.
    pub fn new(width: i32, height: i32) -> Self
    where
        T: Default,
    {
        Self::from_fn(width, height, |_| T::default())
    }

    /// Apply `f` to every value, keeping the shape.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(&mut f).collect(),
        }
    }
}

// ── Shape and access ───────────────────────────────────────────────

impl<T> Grid<T> {
    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// `(0, 0, width, height)`.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(Position::ORIGIN, self.size())
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `position` addresses a cell.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| (position.y * self.width + position.x) as usize)
    }

    fn out_of_bounds(&self, position: Position) -> GridError {
        GridError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        }
    }

    /// Value at `position`, or `None` off-grid.
    pub fn get(&self, position: Position) -> Option<&T> {
        self.index_of(position).map(|i| &self.cells[i])
    }

    /// Mutable value at `position`, or `None` off-grid.
    pub fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        self.index_of(position).map(|i| &mut self.cells[i])
    }

    /// Overwrite the value at `position`.
    pub fn set(&mut self, position: Position, value: T) -> Result<(), GridError> {
        let err = self.out_of_bounds(position);
        let slot = self.get_mut(position).ok_or(err)?;
        *slot = value;
        Ok(())
    }

    /// Cell view at `position`, or `None` off-grid.
    pub fn get_cell(&self, position: Position) -> Option<GridCell<'_, T>> {
        self.get(position)
            .map(|value| GridCell::stored(self, position, value))
    }

    /// Values row by row.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Mutable values row by row.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.cells.iter_mut()
    }

    /// Every position row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        self.bounds().positions()
    }

    /// Every cell row by row.
    pub fn cells(&self) -> impl Iterator<Item = GridCell<'_, T>> {
        self.positions()
            .zip(self.cells.iter())
            .map(move |(p, v)| GridCell::stored(self, p, v))
    }

    /// Cells satisfying `predicate`, row by row.
    pub fn cells_where<'g>(
        &'g self,
        mut predicate: impl FnMut(&GridCell<'g, T>) -> bool,
    ) -> Vec<GridCell<'g, T>> {
        self.cells().filter(|c| predicate(c)).collect()
    }

    /// Whether `position` lies on the outermost ring.
    pub fn is_on_edge(&self, position: Position) -> bool {
        position.x == 0
            || position.y == 0
            || position.x == self.width - 1
            || position.y == self.height - 1
    }

    /// Whether `position` is one of the four corners.
    pub fn is_on_corner(&self, position: Position) -> bool {
        (position.x == 0 || position.x == self.width - 1)
            && (position.y == 0 || position.y == self.height - 1)
    }

    /// Distance to the nearest boundary row or column; 0 on the edge.
    pub fn edge_distance(&self, position: Position) -> i32 {
        if self.is_on_edge(position) {
            return 0;
        }
        position
            .x
            .abs()
            .min((self.width - 1 - position.x).abs())
            .min(position.y.abs())
            .min((self.height - 1 - position.y).abs())
    }

    /// Cells on the outermost ring, row by row.
    pub fn edge_cells(&self) -> Vec<GridCell<'_, T>> {
        self.cells_where(|c| c.is_on_edge())
    }

    /// The (up to four) corner cells, row by row.
    pub fn corner_cells(&self) -> Vec<GridCell<'_, T>> {
        self.cells_where(|c| c.is_on_corner())
    }

    /// Whether `bounds` lies entirely inside the grid.
    pub fn includes_completely(&self, bounds: Bounds) -> bool {
        self.includes_partially(bounds)
            && self.bounds().union(bounds).size.total() == self.size().total()
    }

    /// Whether `bounds` overlaps the grid by at least one cell.
    pub fn includes_partially(&self, bounds: Bounds) -> bool {
        self.bounds().intersection(bounds).size.total() > 0
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    fn index(&self, position: Position) -> &T {
        match self.get(position) {
            Some(v) => v,
            None => panic!(
                "position {position} out of bounds for {}x{} grid",
                self.width, self.height
            ),
        }
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    fn index_mut(&mut self, position: Position) -> &mut T {
        let (width, height) = (self.width, self.height);
        match self.get_mut(position) {
            Some(v) => v,
            None => panic!("position {position} out of bounds for {width}x{height} grid"),
        }
    }
}

// ── Policy-driven access ───────────────────────────────────────────

impl<T: Default> Grid<T> {
    /// Cell at `position` under `policy`.
    ///
    /// `Ignore` yields `Ok(None)` off-grid; `TreatAsDefault` yields a
    /// placeholder; `Throw` fails.
    pub fn cell(
        &self,
        position: Position,
        policy: OutOfBounds,
    ) -> Result<Option<GridCell<'_, T>>, GridError> {
        if let Some(cell) = self.get_cell(position) {
            return Ok(Some(cell));
        }
        match policy {
            OutOfBounds::Throw => Err(self.out_of_bounds(position)),
            OutOfBounds::Ignore => Ok(None),
            OutOfBounds::TreatAsDefault => {
                Ok(Some(GridCell::placeholder(self, position, T::default())))
            }
        }
    }

    fn cells_at(
        &self,
        positions: impl IntoIterator<Item = Position>,
        policy: OutOfBounds,
    ) -> Result<Vec<GridCell<'_, T>>, GridError> {
        let mut out = Vec::new();
        for p in positions {
            if let Some(cell) = self.cell(p, policy)? {
                out.push(cell);
            }
        }
        Ok(out)
    }

    /// Cells of row `y`, left to right.
    pub fn row(&self, y: i32, policy: OutOfBounds) -> Result<Vec<GridCell<'_, T>>, GridError> {
        self.cells_at((0..self.width).map(|x| Position::new(x, y)), policy)
    }

    /// Cells of column `x`, top to bottom.
    pub fn column(&self, x: i32, policy: OutOfBounds) -> Result<Vec<GridCell<'_, T>>, GridError> {
        self.cells_at((0..self.height).map(|y| Position::new(x, y)), policy)
    }

    /// Insert `count` default-valued columns before `index`, or at the
    /// right edge when `index` is `None`.
    pub fn add_columns(&mut self, index: Option<i32>, count: i32) -> Result<(), GridError> {
        let index = index.unwrap_or(self.width);
        if count < 0 {
            return Err(GridError::NegativeCount { count });
        }
        if index < 0 || index > self.width {
            return Err(self.out_of_bounds(Position::new(index, 0)));
        }
        let old = std::mem::take(&mut self.cells);
        let mut it = old.into_iter();
        let mut cells = Vec::with_capacity(((self.width + count) * self.height) as usize);
        for _ in 0..self.height {
            cells.extend(it.by_ref().take(index as usize));
            cells.extend(std::iter::repeat_with(T::default).take(count as usize));
            cells.extend(it.by_ref().take((self.width - index) as usize));
        }
        self.cells = cells;
        self.width += count;
        Ok(())
    }

    /// Insert `count` default-valued rows before `index`, or at the bottom
    /// edge when `index` is `None`.
    pub fn add_rows(&mut self, index: Option<i32>, count: i32) -> Result<(), GridError> {
        let index = index.unwrap_or(self.height);
        if count < 0 {
            return Err(GridError::NegativeCount { count });
        }
        if index < 0 || index > self.height {
            return Err(self.out_of_bounds(Position::new(0, index)));
        }
        let at = (index * self.width) as usize;
        let added = (count * self.width) as usize;
        let tail = self.cells.split_off(at);
        self.cells
            .extend(std::iter::repeat_with(T::default).take(added));
        self.cells.extend(tail);
        self.height += count;
        Ok(())
    }

    /// Reset `count` columns starting at `index` to default values.
    /// Columns off the grid are skipped.
    pub fn clear_columns(&mut self, index: i32, count: i32) -> Result<(), GridError> {
        if count < 0 {
            return Err(GridError::NegativeCount { count });
        }
        for x in index.max(0)..(index + count).min(self.width) {
            for y in 0..self.height {
                self[Position::new(x, y)] = T::default();
            }
        }
        Ok(())
    }

    /// Reset `count` rows starting at `index` to default values.
    /// Rows off the grid are skipped.
    pub fn clear_rows(&mut self, index: i32, count: i32) -> Result<(), GridError> {
        if count < 0 {
            return Err(GridError::NegativeCount { count });
        }
        for y in index.max(0)..(index + count).min(self.height) {
            for x in 0..self.width {
                self[Position::new(x, y)] = T::default();
            }
        }
        Ok(())
    }
}

// ── Row and column removal ─────────────────────────────────────────

impl<T> Grid<T> {
    /// Remove `count` columns starting at `index`.
    pub fn remove_columns(&mut self, index: i32, count: i32) -> Result<(), GridError> {
        if count < 0 {
            return Err(GridError::NegativeCount { count });
        }
        if index < 0 || index + count > self.width {
            return Err(self.out_of_bounds(Position::new(index + count - 1, 0)));
        }
        let width = self.width;
        let old = std::mem::take(&mut self.cells);
        self.cells = old
            .into_iter()
            .enumerate()
            .filter(|(i, _)| {
                let x = *i as i32 % width;
                x < index || x >= index + count
            })
            .map(|(_, v)| v)
            .collect();
        self.width -= count;
        Ok(())
    }

    /// Remove `count` rows starting at `index`.
    pub fn remove_rows(&mut self, index: i32, count: i32) -> Result<(), GridError> {
        if count < 0 {
            return Err(GridError::NegativeCount { count });
        }
        if index < 0 || index + count > self.height {
            return Err(self.out_of_bounds(Position::new(0, index + count - 1)));
        }
        let start = (index * self.width) as usize;
        let end = ((index + count) * self.width) as usize;
        self.cells.drain(start..end);
        self.height -= count;
        Ok(())
    }
}

// ── Submatrices ────────────────────────────────────────────────────

impl<T: Clone + Default> Grid<T> {
    /// Copy the cells covered by `bounds` into a new submatrix.
    ///
    /// `Ignore` clips the request to the grid, `TreatAsDefault` fills
    /// off-grid cells with default values, and `Throw` fails on the first
    /// off-grid cell. A request covering no cell yields an empty
    /// submatrix at the origin.
    pub fn submatrix(&self, bounds: Bounds, policy: OutOfBounds) -> Result<Submatrix<T>, GridError> {
        let mut bounds = bounds.positify();
        if policy == OutOfBounds::Ignore {
            bounds = bounds.intersection(self.bounds());
        }
        if bounds.is_empty() {
            return Ok(Submatrix::default());
        }
        if policy == OutOfBounds::Throw {
            if let Some(p) = bounds.positions().find(|p| !self.contains(*p)) {
                return Err(self.out_of_bounds(p));
            }
        }
        let offset = bounds.position;
        let grid = Grid::from_fn(bounds.size.width, bounds.size.height, |p| {
            self.get(offset + p).cloned().unwrap_or_default()
        });
        Ok(Submatrix::new(grid, offset))
    }

    /// Single-cell submatrix at `position`.
    pub fn cell_as_submatrix(
        &self,
        position: Position,
        policy: OutOfBounds,
    ) -> Result<Submatrix<T>, GridError> {
        self.submatrix(Bounds::new(position, Size::new(1, 1)), policy)
    }

    /// Row `y` as a `width x 1` submatrix.
    pub fn row_as_submatrix(&self, y: i32, policy: OutOfBounds) -> Result<Submatrix<T>, GridError> {
        self.submatrix(Bounds::from_xywh(0, y, self.width, 1), policy)
    }

    /// Column `x` as a `1 x height` submatrix.
    pub fn column_as_submatrix(
        &self,
        x: i32,
        policy: OutOfBounds,
    ) -> Result<Submatrix<T>, GridError> {
        self.submatrix(Bounds::from_xywh(x, 0, 1, self.height), policy)
    }

    /// Copy `source` into this grid with its origin at `position`.
    ///
    /// `Ignore` drops values that land off-grid, `TreatAsDefault` first
    /// grows this grid to the union of both rectangles (shifting existing
    /// contents so that `position` keeps its meaning relative to them),
    /// and `Throw` fails before writing anything.
    pub fn set_submatrix(
        &mut self,
        position: Position,
        source: &Grid<T>,
        policy: OutOfBounds,
    ) -> Result<(), GridError> {
        let mut target = position;
        let source_bounds = Bounds::new(position, source.size());
        match policy {
            OutOfBounds::Throw => {
                if let Some(p) = source_bounds.positions().find(|p| !self.contains(*p)) {
                    return Err(self.out_of_bounds(p));
                }
            }
            OutOfBounds::TreatAsDefault => {
                let union = self.bounds().union(source_bounds);
                if union.size.total() != self.size().total() {
                    let shift = Position::ORIGIN - union.position;
                    let mut grown = Grid::new(union.size.width, union.size.height);
                    for (p, v) in self.positions().zip(self.cells.drain(..)) {
                        grown[p + shift] = v;
                    }
                    *self = grown;
                    target = target + shift;
                }
            }
            OutOfBounds::Ignore => {}
        }
        for (p, v) in source.positions().zip(source.iter()) {
            if let Some(slot) = self.get_mut(target + p) {
                *slot = v.clone();
            }
        }
        Ok(())
    }

    /// Overwrite column `x` from the top with `values`.
    pub fn set_column(&mut self, x: i32, values: &[T], policy: OutOfBounds) -> Result<(), GridError> {
        self.set_submatrix(Position::new(x, 0), &Grid::from_column(values.to_vec()), policy)
    }

    /// Overwrite row `y` from the left with `values`.
    pub fn set_row(&mut self, y: i32, values: &[T], policy: OutOfBounds) -> Result<(), GridError> {
        self.set_submatrix(Position::new(0, y), &Grid::from_row(values.to_vec()), policy)
    }

    /// Insert a new column before `index` holding `values`.
    pub fn insert_column(
        &mut self,
        index: i32,
        values: &[T],
        policy: OutOfBounds,
    ) -> Result<(), GridError> {
        if policy == OutOfBounds::Throw && values.len() as i32 > self.height {
            return Err(self.out_of_bounds(Position::new(index, self.height)));
        }
        self.add_columns(Some(index), 1)?;
        self.set_column(index, values, policy)
    }

    /// Insert a new row before `index` holding `values`.
    pub fn insert_row(&mut self, index: i32, values: &[T], policy: OutOfBounds) -> Result<(), GridError> {
        if policy == OutOfBounds::Throw && values.len() as i32 > self.width {
            return Err(self.out_of_bounds(Position::new(self.width, index)));
        }
        self.add_rows(Some(index), 1)?;
        self.set_row(index, values, policy)
    }

    /// Append a column at the right edge.
    pub fn append_column(&mut self, values: &[T], policy: OutOfBounds) -> Result<(), GridError> {
        self.insert_column(self.width, values, policy)
    }

    /// Append a row at the bottom edge.
    pub fn append_row(&mut self, values: &[T], policy: OutOfBounds) -> Result<(), GridError> {
        self.insert_row(self.height, values, policy)
    }
}

// ── Geometry ───────────────────────────────────────────────────────

impl<T: Clone> Grid<T> {
    /// Rotate clockwise by `times` quarter turns; `times` is taken
    /// modulo 4.
    pub fn rotate_90_clockwise(&self, times: u32) -> Grid<T> {
        let mut result = self.clone();
        for _ in 0..times % 4 {
            result = result.rotate_once();
        }
        result
    }

    fn rotate_once(&self) -> Grid<T> {
        let h = self.height;
        Grid::from_fn(self.height, self.width, |p| {
            self[Position::new(p.y, h - 1 - p.x)].clone()
        })
    }

    /// Mirror left to right.
    pub fn flip_x(&self) -> Grid<T> {
        let w = self.width;
        Grid::from_fn(self.width, self.height, |p| {
            self[Position::new(w - 1 - p.x, p.y)].clone()
        })
    }

    /// Mirror top to bottom.
    pub fn flip_y(&self) -> Grid<T> {
        let h = self.height;
        Grid::from_fn(self.width, self.height, |p| {
            self[Position::new(p.x, h - 1 - p.y)].clone()
        })
    }
}

// ── Matching ───────────────────────────────────────────────────────

/// A pair of aligned cells; either side may be missing.
pub type CellPair<'a, 'b, T, U> = (Option<GridCell<'a, T>>, Option<GridCell<'b, U>>);

impl<T> Grid<T> {
    /// Align `other` at `offset` and pair up cells inside `working`.
    ///
    /// Coordinates are in this grid's frame. Positions where neither grid
    /// has a cell are skipped.
    pub fn match_cells<'a, 'b, U>(
        &'a self,
        working: Bounds,
        offset: Position,
        other: &'b Grid<U>,
    ) -> Vec<CellPair<'a, 'b, T, U>> {
        working
            .positions()
            .filter_map(|p| {
                let mine = self.get_cell(p);
                let theirs = other.get_cell(p - offset);
                (mine.is_some() || theirs.is_some()).then_some((mine, theirs))
            })
            .collect()
    }

    /// Pairs where both grids have a cell.
    pub fn match_cells_intersection<'a, 'b, U>(
        &'a self,
        offset: Position,
        other: &'b Grid<U>,
    ) -> Vec<(GridCell<'a, T>, GridCell<'b, U>)> {
        let working = self.bounds().intersection(Bounds::new(offset, other.size()));
        self.match_cells(working, offset, other)
            .into_iter()
            .filter_map(|pair| match pair {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            })
            .collect()
    }

    /// Pairs across the union of both grids.
    pub fn match_cells_union<'a, 'b, U>(
        &'a self,
        offset: Position,
        other: &'b Grid<U>,
    ) -> Vec<CellPair<'a, 'b, T, U>> {
        let working = self.bounds().union(Bounds::new(offset, other.size()));
        self.match_cells(working, offset, other)
    }

    /// Pairs for every cell of this grid.
    pub fn match_cells_only_self<'a, 'b, U>(
        &'a self,
        offset: Position,
        other: &'b Grid<U>,
    ) -> Vec<(GridCell<'a, T>, Option<GridCell<'b, U>>)> {
        self.match_cells(self.bounds(), offset, other)
            .into_iter()
            .filter_map(|(a, b)| a.map(|a| (a, b)))
            .collect()
    }

    /// Pairs for every cell of `other`.
    pub fn match_cells_only_other<'a, 'b, U>(
        &'a self,
        offset: Position,
        other: &'b Grid<U>,
    ) -> Vec<(Option<GridCell<'a, T>>, GridCell<'b, U>)> {
        self.match_cells(Bounds::new(offset, other.size()), offset, other)
            .into_iter()
            .filter_map(|(a, b)| b.map(|b| (a, b)))
            .collect()
    }
}

// ── Rendering ──────────────────────────────────────────────────────

impl<T> Grid<T> {
    /// Render row by row, one line per row.
    pub fn to_text(
        &self,
        mut render: impl FnMut(&GridCell<'_, T>) -> String,
        separator: Option<&str>,
    ) -> String {
        let separator = separator.unwrap_or("");
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .filter_map(|x| self.get_cell(Position::new(x, y)))
                    .map(|c| render(&c))
                    .collect::<Vec<_>>()
                    .join(separator)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
