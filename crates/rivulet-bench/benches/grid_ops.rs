//! Criterion micro-benchmarks for grid kernel operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rivulet_grid::{Bounds, Grid, OutOfBounds, Position, Size};

/// Benchmark: Collect surrounding() of all 10K cells of a 100x100 grid.
fn bench_surrounding_10k(c: &mut Criterion) {
    let grid: Grid<u8> = Grid::new(100, 100);

    c.bench_function("surrounding_10k", |b| {
        b.iter(|| {
            for cell in grid.cells() {
                black_box(cell.surrounding());
            }
        });
    });
}

/// Benchmark: Rotate a 100x100 grid a full turn.
fn bench_rotate_full_turn(c: &mut Criterion) {
    let grid = Grid::from_fn(100, 100, |p| p.x * 100 + p.y);

    c.bench_function("rotate_100x100_x4", |b| {
        b.iter(|| black_box(grid.rotate_90_clockwise(4)));
    });
}

/// Benchmark: Slide a 5x5 template over every overlapping offset of a
/// 32x32 grid, pairing the intersecting cells.
fn bench_template_sweep(c: &mut Criterion) {
    let grid = Grid::from_fn(32, 32, |p| (p.x + p.y) % 3);
    let template = Grid::from_fn(5, 5, |p| p.x == 2 || p.y == 2);

    c.bench_function("template_sweep_32x32_5x5", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for offset in grid.bounds().template_offsets(Size::new(5, 5)) {
                hits += grid.match_cells_intersection(offset, &template).len();
            }
            black_box(hits)
        });
    });
}

/// Benchmark: Extract and reinsert 8x8 submatrices across a 64x64 grid.
fn bench_submatrix_round_trip(c: &mut Criterion) {
    let mut grid = Grid::from_fn(64, 64, |p| p.x ^ p.y);

    c.bench_function("submatrix_8x8_round_trip_64", |b| {
        b.iter(|| {
            for y in (0..64).step_by(8) {
                for x in (0..64).step_by(8) {
                    let bounds = Bounds::new(Position::new(x, y), Size::new(8, 8));
                    let sub = grid.submatrix(bounds, OutOfBounds::Throw).unwrap();
                    let offset = sub.offset();
                    grid.set_submatrix(offset, &sub.into_grid(), OutOfBounds::Throw)
                        .unwrap();
                }
            }
            black_box(&grid);
        });
    });
}

criterion_group!(
    benches,
    bench_surrounding_10k,
    bench_rotate_full_turn,
    bench_template_sweep,
    bench_submatrix_round_trip
);
criterion_main!(benches);
