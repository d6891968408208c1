//! End-to-end inference over generated and hand-drawn rivers.
//!
//! Each test: build ground truth → reveal part of it → infer → compare the
//! resolved cells and probabilities against the truth.

use proptest::prelude::*;
use rivulet_core::{NoopSink, RecordingSink, RiverSettings, TerrainType};
use rivulet_gen::RiverGenerator;
use rivulet_grid::{Grid, Position};
use rivulet_infer::{
    observe, reveal_all, InferenceConfig, InferenceError, InferenceOutcome, TerrainCertainty,
    TerrainInference, Wave,
};
use rivulet_test_utils::fixtures::{all_but, diamond, sample_positions, MEANDER_16};
use rivulet_test_utils::parse_truth;

// ── Helpers ─────────────────────────────────────────────────────

fn engine(width: i32, height: i32) -> TerrainInference {
    TerrainInference::for_grid(
        &RiverSettings::default(),
        width,
        height,
        InferenceConfig::default(),
    )
    .unwrap()
}

fn generated_truth(seed: u64) -> Grid<TerrainType> {
    RiverGenerator::with_defaults(16, 16)
        .unwrap()
        .generate(seed, &mut NoopSink)
        .unwrap()
        .terrain()
}

/// Every cell the engine resolved matches `truth`.
fn assert_resolved_match(outcome: &InferenceOutcome, truth: &Grid<TerrainType>) {
    for p in truth.positions() {
        if let Some(terrain) = outcome.certainty[p].terrain() {
            assert_eq!(terrain, truth[p], "resolved {p} wrongly");
        }
    }
}

/// Exhaustive search with a step budget small enough for debug builds.
fn exhaustive_engine() -> TerrainInference {
    let config = InferenceConfig {
        path_certainty_threshold: 0.0,
        path_search_budget: 5_000,
        ..Default::default()
    };
    TerrainInference::for_grid(&RiverSettings::default(), 16, 16, config).unwrap()
}

fn assert_probabilities_in_range(outcome: &InferenceOutcome) {
    for &p in outcome.probabilities.iter() {
        assert!((0.0..=1.0).contains(&p), "probability {p} out of range");
    }
}

// ── Whole-map observations ──────────────────────────────────────

#[test]
fn fully_revealed_map_is_returned_unchanged() {
    let truth = generated_truth(3);
    let outcome = engine(16, 16)
        .infer(reveal_all(&truth), &mut NoopSink)
        .unwrap();
    assert!(outcome.waves.is_empty());
    for p in truth.positions() {
        assert_eq!(outcome.probabilities[p], truth[p].water_probability());
    }
}

#[test]
fn fully_unknown_map_spreads_the_estimate() {
    let outcome = engine(16, 16)
        .infer(Grid::new(16, 16), &mut NoopSink)
        .unwrap();
    assert_probabilities_in_range(&outcome);

    let estimate = outcome.remaining_estimate;
    assert!(estimate.min <= estimate.max);
    let total: f64 = outcome.probabilities.iter().sum();
    assert!(
        total >= estimate.min as f64 - 1e-9 && total <= estimate.max as f64 + 1e-9,
        "total {total} outside [{}, {}]",
        estimate.min,
        estimate.max
    );

    // Corners can never hold water.
    for corner in [(0, 0), (15, 0), (0, 15), (15, 15)] {
        assert_eq!(outcome.probabilities[Position::from(corner)], 0.0);
    }
}

#[test]
fn same_observation_gives_identical_outcome() {
    let truth = generated_truth(11);
    let revealed = sample_positions(&truth, 0.4, 5);
    let engine = engine(16, 16);
    let a = engine.infer(observe(&truth, revealed.clone()), &mut NoopSink).unwrap();
    let b = engine.infer(observe(&truth, revealed), &mut NoopSink).unwrap();
    assert_eq!(a.probabilities, b.probabilities);
    assert_eq!(a.waves, b.waves);
    assert_eq!(a.remaining_estimate, b.remaining_estimate);
}

// ── Generated rivers ────────────────────────────────────────────

#[test]
fn sampled_observations_never_contradict_the_truth() {
    let engine = engine(16, 16);
    for seed in [1, 2, 7, 42] {
        let truth = generated_truth(seed);
        for (i, fraction) in [0.3, 0.6].into_iter().enumerate() {
            let revealed = sample_positions(&truth, fraction, seed * 10 + i as u64);
            let outcome = engine
                .infer(observe(&truth, revealed), &mut NoopSink)
                .unwrap_or_else(|e| panic!("seed {seed} fraction {fraction}: {e}"));
            assert_resolved_match(&outcome, &truth);
            assert_probabilities_in_range(&outcome);
        }
    }
}

#[test]
fn revealed_cells_keep_their_values() {
    let truth = generated_truth(5);
    let revealed = diamond(&truth, Position::new(8, 8), 4);
    let outcome = engine(16, 16)
        .infer(observe(&truth, revealed.iter().copied()), &mut NoopSink)
        .unwrap();
    for p in revealed {
        assert_eq!(outcome.probabilities[p], truth[p].water_probability());
    }
}

// ── Hand-drawn rivers ───────────────────────────────────────────

#[test]
fn hidden_stretch_of_the_meander_is_found() {
    let truth = parse_truth(MEANDER_16);
    let hidden = [
        Position::new(8, 6),
        Position::new(8, 7),
        Position::new(7, 7),
        Position::new(9, 7),
    ];
    let outcome = engine(16, 16)
        .infer(observe(&truth, all_but(&truth, &hidden)), &mut NoopSink)
        .unwrap();
    assert_resolved_match(&outcome, &truth);
    assert_eq!(outcome.certainty[Position::new(8, 6)].terrain(), Some(TerrainType::Water));
    assert_eq!(outcome.certainty[Position::new(8, 7)].terrain(), Some(TerrainType::Water));
    assert_eq!(outcome.certainty[Position::new(7, 7)].terrain(), Some(TerrainType::Ground));
    assert_eq!(outcome.certainty[Position::new(9, 7)].terrain(), Some(TerrainType::Ground));
}

#[test]
fn hidden_ground_far_from_the_river_is_pruned() {
    let truth = parse_truth(MEANDER_16);
    let hidden = diamond(&truth, Position::new(4, 13), 1);
    let hidden_len = hidden.len();
    let outcome = engine(16, 16)
        .infer(observe(&truth, all_but(&truth, &hidden)), &mut NoopSink)
        .unwrap();
    for p in hidden {
        assert!(outcome.certainty[p].is_ground(), "{p} not pruned");
    }
    let (ground, water) = outcome.resolved_counts();
    assert_eq!((ground, water), (hidden_len, 0));
}

#[test]
fn exhaustive_search_resolves_every_unreached_cell() {
    let truth = parse_truth(MEANDER_16);
    let hidden = diamond(&truth, Position::new(8, 6), 1);
    let config = InferenceConfig {
        path_certainty_threshold: 0.0,
        ..Default::default()
    };
    let engine = TerrainInference::for_grid(&RiverSettings::default(), 16, 16, config).unwrap();
    let outcome = engine
        .infer(observe(&truth, all_but(&truth, &hidden)), &mut NoopSink)
        .unwrap();
    for p in hidden {
        assert!(outcome.certainty[p].has_probability(), "{p} left blank");
    }
}

#[test]
fn exhaustive_search_never_contradicts_generated_rivers() {
    let engine = exhaustive_engine();
    for seed in [1, 2, 4, 6] {
        let truth = generated_truth(seed);
        for (i, fraction) in [0.1, 0.3, 0.5, 0.7].into_iter().enumerate() {
            let revealed = sample_positions(&truth, fraction, seed * 10 + i as u64);
            let outcome = engine
                .infer(observe(&truth, revealed), &mut NoopSink)
                .unwrap_or_else(|e| panic!("seed {seed} fraction {fraction}: {e}"));
            assert_resolved_match(&outcome, &truth);
            assert_probabilities_in_range(&outcome);
        }
    }
}

#[test]
fn exhaustive_search_keeps_a_hidden_river_end() {
    // Hiding (11, 11) leaves (12, 11)-(13, 11) as a loose two-cell segment
    // whose continuation to the exit is hidden as well.
    let truth = parse_truth(MEANDER_16);
    let hidden = [Position::new(11, 11), Position::new(14, 11), Position::new(15, 11)];
    let outcome = exhaustive_engine()
        .infer(observe(&truth, all_but(&truth, &hidden)), &mut NoopSink)
        .unwrap();
    assert_resolved_match(&outcome, &truth);
    for p in hidden {
        assert!(outcome.probabilities[p] > 0.0, "{p} ruled out");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn exhaustive_search_is_sound(
        seed in 0u64..500,
        fraction in 0.1f64..0.9,
        mask in any::<u64>(),
    ) {
        let truth = generated_truth(seed);
        let revealed = sample_positions(&truth, fraction, mask);
        let outcome = exhaustive_engine().infer(observe(&truth, revealed), &mut NoopSink);
        prop_assert!(outcome.is_ok(), "seed {} fraction {}: {:?}", seed, fraction, outcome.err());
        let outcome = outcome.unwrap();
        for p in truth.positions() {
            if let Some(terrain) = outcome.certainty[p].terrain() {
                prop_assert_eq!(terrain, truth[p], "resolved {} wrongly", p);
            }
        }
    }
}

// ── Failures ────────────────────────────────────────────────────

#[test]
fn water_in_a_corner_is_a_contradiction() {
    let mut observation: Grid<TerrainCertainty> = Grid::new(16, 16);
    observation[Position::new(0, 0)] = TerrainCertainty::obvious(TerrainType::Water);
    let err = engine(16, 16).infer(observation, &mut NoopSink).unwrap_err();
    match err {
        InferenceError::Contradiction {
            position,
            existing,
            attempted,
            wave,
        } => {
            assert_eq!(position, Position::new(0, 0));
            assert_eq!(existing, TerrainType::Water);
            assert_eq!(attempted, TerrainType::Ground);
            assert_eq!(wave, Wave::Edge);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn wrong_grid_size_is_rejected() {
    let err = engine(16, 16)
        .infer(Grid::new(12, 16), &mut NoopSink)
        .unwrap_err();
    assert!(matches!(err, InferenceError::SizeMismatch { .. }));
}

// ── Diagnostics ─────────────────────────────────────────────────

#[test]
fn diagnostics_do_not_change_the_outcome() {
    let truth = generated_truth(9);
    let revealed = sample_positions(&truth, 0.5, 9);
    let engine = engine(16, 16);
    let quiet = engine
        .infer(observe(&truth, revealed.clone()), &mut NoopSink)
        .unwrap();
    let mut sink = RecordingSink::new("run");
    let recorded = engine.infer(observe(&truth, revealed), &mut sink).unwrap();
    assert_eq!(quiet.probabilities, recorded.probabilities);
    assert!(sink.child("terrain inference").is_some());
}
