//! Criterion micro-benchmarks for river generation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rivulet_core::{NoopSink, RiverSettings};
use rivulet_gen::RiverGenerator;

/// Benchmark: Generate 100 rivers on the reference 16x16 grid.
fn bench_generate_16x16(c: &mut Criterion) {
    let generator = RiverGenerator::with_defaults(16, 16).unwrap();

    c.bench_function("generate_16x16_x100", |b| {
        b.iter(|| {
            for seed in 0..100u64 {
                let path = generator.generate(seed, &mut NoopSink);
                black_box(&path);
            }
        });
    });
}

/// Benchmark: Generate 20 rivers on a 64x64 grid.
fn bench_generate_64x64(c: &mut Criterion) {
    let generator = RiverGenerator::new(RiverSettings::default(), 64, 64).unwrap();

    c.bench_function("generate_64x64_x20", |b| {
        b.iter(|| {
            for seed in 0..20u64 {
                let path = generator.generate(seed, &mut NoopSink);
                black_box(&path);
            }
        });
    });
}

criterion_group!(benches, bench_generate_16x16, bench_generate_64x64);
criterion_main!(benches);
