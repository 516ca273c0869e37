mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use wallgen::prelude::{
    contrasting_background, generate_analogous_palette, generate_random_palette, Gradient,
};

const COLOR_COUNTS: [usize; 4] = [5, 10, 50, 256];

fn random_palette_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive/random_palette");
    for &count in &COLOR_COUNTS {
        group.throughput(common::shapes_throughput(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(generate_random_palette(count, Some(123))));
        });
    }
    group.finish();
}

fn gradient_benches(c: &mut Criterion) {
    let gradient = Gradient::from_hex(&["#ff5555", "#f1fa8c", "#8be9fd", "#bd93f9"])
        .expect("valid stops");
    let mut group = c.benchmark_group("derive/lch_gradient");
    for &count in &COLOR_COUNTS {
        group.throughput(common::shapes_throughput(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(gradient.colors(count)));
        });
    }
    group.finish();
}

fn analogous_and_background_benches(c: &mut Criterion) {
    c.bench_function("derive/analogous_7", |b| {
        b.iter(|| black_box(generate_analogous_palette(black_box("#3b82f6"), 7)))
    });

    let colors = generate_random_palette(10, Some(1));
    c.bench_function("derive/contrasting_background_10", |b| {
        b.iter(|| black_box(contrasting_background(black_box(&colors))))
    });
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = random_palette_benches, gradient_benches, analogous_and_background_benches
}
criterion_main!(benches);
