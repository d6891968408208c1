//! Terrain inference engine for Rivulet.
//!
//! Given a partial observation of a map holding one generated river,
//! [`TerrainInference`] estimates the probability that each hidden cell
//! is water. It knows the river's construction rules (how far it keeps
//! from the edge, how far apart its ends are, how long it is, that it
//! never touches itself) and deduces what it can from them in waves of
//! increasing cost:
//!
//! | Wave | Reasoning |
//! |------|-----------|
//! | 1 | near-edge band: corners and strips behind known boundary cells |
//! | 2 | local neighbourhood patterns around single cells |
//! | 3 | cells too far from any dangling water end to be reached |
//! | 4 | enumeration of candidate continuations from each dangling end |
//!
//! Whatever is still undecided then receives a uniform share of the
//! estimated remaining water budget.
//!
//! # Beliefs
//!
//! Every cell holds a [`TerrainCertainty`]: unknown, an estimate in
//! `[0, 1]`, or resolved ground or water. Only the first four waves
//! resolve cells, and a wave that would flip a resolved cell reports
//! [`InferenceError::Contradiction`] instead.
//!
//! # Determinism
//!
//! The engine holds no randomness; the same observation always yields the
//! same outcome.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod board;
pub mod certainty;
pub mod config;
mod connectivity;
mod edge;
pub mod engine;
pub mod error;
pub mod estimate;
mod local;
mod paths;
pub mod wave;

pub use certainty::{observe, reveal_all, TerrainCertainty};
pub use config::InferenceConfig;
pub use engine::{InferenceOutcome, TerrainInference};
pub use error::InferenceError;
pub use estimate::RemainingEstimate;
pub use wave::{Wave, WaveReport};
