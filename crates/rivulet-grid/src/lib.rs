//! Grid geometry kernel for Rivulet.
//!
//! This crate defines the generic 2D container shared by the river
//! generator and the terrain inference engine, along with the coordinate
//! and rectangle arithmetic it is built on.
//!
//! # Coordinates
//!
//! Grids are 0-indexed with the origin at the top-left corner. `x` is the
//! column and grows to the right, `y` is the row and grows downwards.
//! [`Position::distance_to`] is the Manhattan distance.
//!
//! # Out-of-bounds handling
//!
//! Every access that can leave the grid takes an explicit [`OutOfBounds`]
//! policy: fail, skip the cell, or substitute a default-valued placeholder.
//!
//! # Template matching
//!
//! [`Grid::match_cells`] and its variants align a smaller grid against a
//! larger one at an offset and pair up the overlapping cells. The kernel
//! knows nothing about what the grids hold.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bounds;
pub mod cell;
pub mod error;
pub mod grid;
pub mod policy;
pub mod position;
pub mod submatrix;

#[cfg(test)]
pub(crate) mod compliance;

pub use bounds::{Bounds, Size};
pub use cell::GridCell;
pub use error::GridError;
pub use grid::Grid;
pub use policy::OutOfBounds;
pub use position::Position;
pub use submatrix::Submatrix;
