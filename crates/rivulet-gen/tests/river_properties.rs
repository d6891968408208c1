//! Structural properties of generated rivers on the reference 16x16 grid.

use proptest::prelude::*;
use rivulet_core::{NoopSink, RecordingSink, RiverSettings, TerrainType};
use rivulet_gen::ends::corner_distance;
use rivulet_gen::{RiverGenerator, RiverPath};
use rivulet_grid::Grid;
use rivulet_test_utils::{scope_names, water_positions};

// ── Helpers ─────────────────────────────────────────────────────

fn generator() -> RiverGenerator {
    RiverGenerator::with_defaults(16, 16).unwrap()
}

fn river(seed: u64) -> RiverPath {
    generator().generate(seed, &mut NoopSink).unwrap()
}

/// Path cells inside the near-edge band, by path index.
fn band_indices(path: &RiverPath, band: i32) -> Vec<usize> {
    let grid: Grid<()> = Grid::new(path.width, path.height);
    path.positions
        .iter()
        .enumerate()
        .filter(|(_, p)| grid.edge_distance(**p) < band)
        .map(|(i, _)| i)
        .collect()
}

// ── Fixed seeds ─────────────────────────────────────────────────

#[test]
fn reference_grid_parameters() {
    let params = *generator().parameters();
    assert_eq!(params.min_edge_distance, 2);
    assert_eq!(params.min_endpoint_separation, 21);
    assert_eq!(params.target_water_cells, 35);
    assert_eq!(params.min_water_cells, 29);
}

#[test]
fn ends_sit_on_the_boundary_away_from_corners() {
    for seed in 0..20 {
        let path = river(seed);
        let grid: Grid<()> = Grid::new(16, 16);
        for end in [path.entrance, path.exit] {
            assert!(grid.is_on_edge(end), "seed {seed}: {end} not on the edge");
            assert!(corner_distance(16, 16, end) >= 2);
        }
        assert!(path.entrance.distance_to(path.exit) >= 21);
        assert_eq!(path.positions.first(), Some(&path.entrance));
        assert_eq!(path.positions.last(), Some(&path.exit));
    }
}

#[test]
fn river_crosses_the_band_only_at_its_ends() {
    let band = 2;
    for seed in 0..20 {
        let path = river(seed);
        let n = path.len();
        assert_eq!(band_indices(&path, band), vec![0, 1, n - 2, n - 1], "seed {seed}");
    }
}

#[test]
fn terrain_agrees_with_the_path() {
    let path = river(17);
    let terrain = path.terrain();
    let mut water = water_positions(&terrain);
    let mut expected = path.positions.clone();
    water.sort();
    expected.sort();
    assert_eq!(water, expected);
    assert_eq!(
        terrain.iter().filter(|t| **t == TerrainType::Ground).count(),
        256 - path.len()
    );
}

#[test]
fn four_rotations_restore_the_map() {
    let terrain = river(23).terrain();
    assert_eq!(terrain.rotate_90_clockwise(4), terrain);
}

#[test]
fn stats_report_one_scope_per_attempt() {
    let mut sink = RecordingSink::new("run");
    let path = generator().generate(31, &mut sink).unwrap();
    let root = sink.child("river generator").unwrap();
    assert_eq!(root.value("attempts"), Some((path.attempt + 1) as f64));
    let attempts = scope_names(root)
        .iter()
        .filter(|n| n.starts_with("attempt "))
        .count();
    assert_eq!(attempts, path.attempt as usize + 1);
}

#[test]
fn rectangular_grids_use_their_own_parameters() {
    let generator = RiverGenerator::new(RiverSettings::default(), 20, 12).unwrap();
    let path = generator.generate(8, &mut NoopSink).unwrap();
    assert_eq!((path.width, path.height), (20, 12));
    assert!(path.len() as i32 >= generator.parameters().min_water_cells);
}

// ── Properties ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_seed_yields_a_thin_connected_river(seed in any::<u64>()) {
        let generator = generator();
        let params = *generator.parameters();
        let path = generator.generate(seed, &mut NoopSink).unwrap();

        prop_assert!(path.attempt < RiverSettings::default().max_attempts);
        prop_assert!(path.len() as i32 >= params.min_water_cells);
        prop_assert!(path.len() as i32 <= path.target_water_cells);

        for pair in path.positions.windows(2) {
            prop_assert!(pair[0].is_adjacent(pair[1]));
        }
        for (i, a) in path.positions.iter().enumerate() {
            for b in path.positions.iter().skip(i + 3) {
                prop_assert!(!a.touches(*b), "{} touches {}", a, b);
            }
        }
    }
}
