//! River path generator for Rivulet.
//!
//! [`RiverGenerator`] synthesizes a single 4-connected, one-cell-wide
//! water path between two boundary cells of a rectangular grid. The path
//! keeps away from the map edge except where it enters and leaves, never
//! touches itself, and has a length close to a target derived from the
//! grid size.
//!
//! # Determinism
//!
//! Every attempt draws from its own `ChaCha8Rng` seeded with the attempt
//! seed. Attempt `i` of a call seeded with `s` uses seed `s + i`, so a
//! given seed always reproduces the same river.
//!
//! # Failure
//!
//! A single attempt can walk into a dead end. The generator retries with
//! the next seed up to [`RiverSettings::max_attempts`] times before
//! reporting [`GenerationError::AttemptsExhausted`].
//!
//! [`RiverSettings::max_attempts`]: rivulet_core::RiverSettings::max_attempts

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod decision;
pub mod ends;
pub mod error;
pub mod generator;
pub mod path;

pub use decision::{PathDecision, Strategy};
pub use ends::RiverEnds;
pub use error::{GenerationError, PathFailure};
pub use generator::RiverGenerator;
pub use path::RiverPath;
