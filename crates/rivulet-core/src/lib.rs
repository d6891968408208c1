//! Core types and settings for the Rivulet workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! abstractions shared by the river generator and the terrain inference
//! engine: terrain kinds, river settings and their derived parameters,
//! configuration errors, and the diagnostics sink interface.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod settings;
pub mod stats;
pub mod terrain;

pub use error::ConfigError;
pub use settings::{RiverParameters, RiverSettings};
pub use stats::{NoopSink, RecordingSink, StatsSink, TracingSink};
pub use terrain::TerrainType;
