//! Benchmark profiles for Rivulet.
//!
//! Provides ready-made inputs for benchmarks:
//!
//! - [`reference_profile`]: 16x16 river with a 40% random observation
//! - [`large_profile`]: 32x32 river with a 40% random observation
//! - [`sample_observation`]: deterministic partial observation via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rivulet_core::{NoopSink, RiverSettings, TerrainType};
use rivulet_gen::{GenerationError, RiverGenerator};
use rivulet_grid::{Grid, Position};
use rivulet_infer::{observe, InferenceConfig, TerrainCertainty, TerrainInference};

/// Everything one inference benchmark iteration needs.
pub struct InferenceProfile {
    /// Ground truth the observation was sampled from.
    pub truth: Grid<TerrainType>,
    /// Partial observation fed to the engine.
    pub observation: Grid<TerrainCertainty>,
    /// Engine configured for the profile's grid.
    pub engine: TerrainInference,
}

/// Build a profile for a `size x size` grid.
///
/// The river is generated from `seed`; each cell is revealed with
/// probability `revealed`.
pub fn profile(size: i32, seed: u64, revealed: f64) -> Result<InferenceProfile, GenerationError> {
    let generator = RiverGenerator::new(RiverSettings::default(), size, size)?;
    let truth = generator.generate(seed, &mut NoopSink)?.terrain();
    let observation = sample_observation(&truth, revealed, seed);
    let engine = TerrainInference::new(*generator.parameters(), InferenceConfig::default())?;
    Ok(InferenceProfile {
        truth,
        observation,
        engine,
    })
}

/// Reference profile: 16x16 grid, 40% revealed.
pub fn reference_profile(seed: u64) -> Result<InferenceProfile, GenerationError> {
    profile(16, seed, 0.4)
}

/// Large profile: 32x32 grid, 40% revealed.
pub fn large_profile(seed: u64) -> Result<InferenceProfile, GenerationError> {
    profile(32, seed, 0.4)
}

/// Reveal each cell of `truth` independently with probability `fraction`.
pub fn sample_observation(
    truth: &Grid<TerrainType>,
    fraction: f64,
    seed: u64,
) -> Grid<TerrainCertainty> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let fraction = fraction.clamp(0.0, 1.0);
    let revealed: Vec<Position> = truth
        .positions()
        .filter(|_| rng.random_bool(fraction))
        .collect();
    observe(truth, revealed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_matches_its_grid() {
        let p = reference_profile(42).unwrap();
        assert_eq!(p.truth.size(), p.observation.size());
        assert_eq!(p.engine.parameters().width, 16);
    }

    #[test]
    fn observation_is_deterministic() {
        let p = reference_profile(7).unwrap();
        let again = sample_observation(&p.truth, 0.4, 7);
        assert_eq!(p.observation, again);
    }
}
