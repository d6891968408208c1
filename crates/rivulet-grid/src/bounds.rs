//! Rectangle arithmetic: [`Size`] and [`Bounds`].
//!
//! A size may be transiently negative while bounds are being assembled
//! from arbitrary corner points. [`Bounds::positify`] normalizes such a
//! rectangle into the equivalent one with a non-negative size anchored at
//! its top-left corner. Every set operation positifies its inputs first.

use crate::position::Position;
use std::fmt;

// ── Size ───────────────────────────────────────────────────────────

/// Width and height of a rectangle. Either may be negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Extent along `x`.
    pub width: i32,
    /// Extent along `y`.
    pub height: i32,
}

impl Size {
    /// Create a size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Absolute area.
    pub fn total(self) -> i32 {
        (self.width * self.height).abs()
    }

    /// Whether width equals height.
    pub fn is_square(self) -> bool {
        self.width == self.height
    }

    /// Whether either extent is negative.
    pub fn is_inverted(self) -> bool {
        self.width < 0 || self.height < 0
    }

    /// Swap width and height.
    pub fn flip(self) -> Self {
        Self::new(self.height, self.width)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ── Bounds ─────────────────────────────────────────────────────────

/// An axis-aligned rectangle: origin plus size.
///
/// The end point is exclusive: `Bounds::from_xywh(0, 0, 2, 2)` covers
/// `(0,0)`, `(1,0)`, `(0,1)` and `(1,1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Origin corner.
    pub position: Position,
    /// Extent from the origin.
    pub size: Size,
}

impl Bounds {
    /// The canonical empty rectangle `(0, 0, 0, 0)`.
    pub const ZERO: Bounds = Bounds {
        position: Position::ORIGIN,
        size: Size::new(0, 0),
    };

    /// Create bounds from an origin and a size.
    pub const fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    /// Create bounds from raw coordinates.
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(Position::new(x, y), Size::new(width, height))
    }

    /// Build a rectangle spanning two corner points (end exclusive).
    pub fn from_corners(start: Position, end: Position) -> Self {
        Self::new(start, Size::new(end.x - start.x, end.y - start.y))
    }

    /// Smallest bounds containing every position, or [`Bounds::ZERO`] for
    /// an empty input.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let mut iter = positions.into_iter();
        let Some(first) = iter.next() else {
            return Self::ZERO;
        };
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (
                Position::new(min.x.min(p.x), min.y.min(p.y)),
                Position::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Self::from_corners(min, max.offset(1, 1))
    }

    /// Origin corner. Not necessarily an included cell for inverted bounds.
    pub fn start(&self) -> Position {
        self.position
    }

    /// Opposite corner, exclusive.
    pub fn end(&self) -> Position {
        Position::new(
            self.position.x + self.size.width,
            self.position.y + self.size.height,
        )
    }

    /// Move the start point while keeping the end point fixed.
    pub fn with_start(self, start: Position) -> Self {
        Self::from_corners(start, self.end())
    }

    /// Move the end point while keeping the start point fixed.
    pub fn with_end(self, end: Position) -> Self {
        Self::from_corners(self.position, end)
    }

    /// Mirror the rectangle around its start along `x`; the covered area
    /// is unchanged.
    pub fn flip_x(self) -> Self {
        Self::from_xywh(
            self.position.x + self.size.width,
            self.position.y,
            -self.size.width,
            self.size.height,
        )
    }

    /// Mirror the rectangle around its start along `y`; the covered area
    /// is unchanged.
    pub fn flip_y(self) -> Self {
        Self::from_xywh(
            self.position.x,
            self.position.y + self.size.height,
            self.size.width,
            -self.size.height,
        )
    }

    /// Equivalent bounds with non-negative extents.
    pub fn positify(self) -> Self {
        let mut result = self;
        if result.size.width < 0 {
            result = result.flip_x();
        }
        if result.size.height < 0 {
            result = result.flip_y();
        }
        result
    }

    /// Largest rectangle inside both. Disjoint or touching rectangles
    /// yield [`Bounds::ZERO`].
    pub fn intersection(self, other: Bounds) -> Self {
        let (a, b) = (self.positify(), other.positify());
        let (a_end, b_end) = (a.end(), b.end());
        let result = Self::from_corners(
            Position::new(a.position.x.max(b.position.x), a.position.y.max(b.position.y)),
            Position::new(a_end.x.min(b_end.x), a_end.y.min(b_end.y)),
        );
        if result.size.total() == 0 || result.size.is_inverted() {
            Self::ZERO
        } else {
            result
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: Bounds) -> Self {
        let (a, b) = (self.positify(), other.positify());
        let (a_end, b_end) = (a.end(), b.end());
        Self::from_corners(
            Position::new(a.position.x.min(b.position.x), a.position.y.min(b.position.y)),
            Position::new(a_end.x.max(b_end.x), a_end.y.max(b_end.y)),
        )
    }

    /// Whether `position` is one of the covered cells.
    pub fn contains(&self, position: Position) -> bool {
        let b = self.positify();
        let end = b.end();
        position.x >= b.position.x && position.x < end.x && position.y >= b.position.y && position.y < end.y
    }

    /// Whether the rectangle covers no cell.
    pub fn is_empty(&self) -> bool {
        self.size.total() == 0
    }

    /// Covered cells, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let b = self.positify();
        let end = b.end();
        let start = b.position;
        (start.y..end.y).flat_map(move |y| (start.x..end.x).map(move |x| Position::new(x, y)))
    }

    /// Offsets at which a template of `size` overlaps these bounds by at
    /// least one cell, row by row.
    pub fn template_offsets(&self, size: Size) -> impl Iterator<Item = Position> {
        let b = self.positify();
        let end = b.end();
        let (w, h) = (size.width.abs(), size.height.abs());
        let (x0, y0) = (b.position.x - w + 1, b.position.y - h + 1);
        (y0..end.y).flat_map(move |y| (x0..end.x).map(move |x| Position::new(x, y)))
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.position, self.size)
    }
}
