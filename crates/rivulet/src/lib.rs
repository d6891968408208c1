//! Rivulet: procedural single-river maps and inference of hidden river
//! cells.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Rivulet sub-crates. For most users, adding `rivulet` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use rivulet::prelude::*;
//!
//! // Generate a river on a 16×16 map.
//! let generator = RiverGenerator::with_defaults(16, 16).unwrap();
//! let river = generator.generate(42, &mut NoopSink).unwrap();
//! let truth = river.terrain();
//!
//! // Reveal a diamond around the map centre and infer the rest.
//! let revealed: Vec<Position> = truth
//!     .positions()
//!     .filter(|p| p.distance_to(Position::new(8, 8)) <= 3)
//!     .collect();
//! let engine = TerrainInference::new(*generator.parameters(), InferenceConfig::default()).unwrap();
//! let outcome = engine.infer(observe(&truth, revealed), &mut NoopSink).unwrap();
//!
//! for p in truth.positions() {
//!     if let Some(terrain) = outcome.certainty[p].terrain() {
//!         assert_eq!(terrain, truth[p]);
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rivulet-core` | Terrain, river settings, diagnostics sinks |
//! | [`grid`] | `rivulet-grid` | Grid container, positions, template matching |
//! | [`generator`] | `rivulet-gen` | Seeded river path generator |
//! | [`infer`] | `rivulet-infer` | Terrain inference engine |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, settings and diagnostics (`rivulet-core`).
///
/// Contains [`types::TerrainType`], [`types::RiverSettings`] and the
/// [`types::StatsSink`] trait with its sinks.
pub use rivulet_core as types;

/// Grid geometry kernel (`rivulet-grid`).
///
/// Provides [`grid::Grid`], [`grid::Position`], [`grid::Bounds`] and the
/// [`grid::Submatrix`] used for template matching.
pub use rivulet_grid as grid;

/// River path generator (`rivulet-gen`).
///
/// [`generator::RiverGenerator`] produces a [`generator::RiverPath`] per seed.
pub use rivulet_gen as generator;

/// Terrain inference engine (`rivulet-infer`).
///
/// [`infer::TerrainInference`] turns a partial observation into per-cell
/// water probabilities.
pub use rivulet_infer as infer;

/// Common imports for typical Rivulet usage.
///
/// ```rust
/// use rivulet::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use rivulet_core::{
        ConfigError, NoopSink, RecordingSink, RiverParameters, RiverSettings, StatsSink,
        TerrainType, TracingSink,
    };

    // Grid
    pub use rivulet_grid::{Bounds, Grid, GridCell, OutOfBounds, Position, Size};

    // Generation
    pub use rivulet_gen::{GenerationError, RiverGenerator, RiverPath};

    // Inference
    pub use rivulet_infer::{
        observe, reveal_all, InferenceConfig, InferenceError, InferenceOutcome,
        TerrainCertainty, TerrainInference,
    };
}
