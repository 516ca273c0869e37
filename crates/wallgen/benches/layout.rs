mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use wallgen::prelude::{layout, GeneratorOptions, LayoutPolicy, PaletteSpec};

const SHAPE_COUNTS: [usize; 5] = [3, 7, 15, 50, 200];

fn options(count: usize, palette: PaletteSpec, policy: LayoutPolicy) -> GeneratorOptions {
    GeneratorOptions::new(3840, 2160, palette)
        .with_shape_count(count)
        .with_seed(0x5EED ^ count as u64)
        .with_layout(policy)
}

fn layout_themed_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/overlap/themed");
    for &count in &SHAPE_COUNTS {
        let opts = options(count, PaletteSpec::named("dracula"), LayoutPolicy::default());
        group.throughput(common::shapes_throughput(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &opts, |b, opts| {
            b.iter(|| black_box(layout(opts).map(|c| c.shapes.len())));
        });
    }
    group.finish();
}

fn layout_gradient_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/overlap/gradient");
    let palette = PaletteSpec::colors(["#22c55e", "#3b82f6", "#a855f7", "#ef4444", "#eab308"]);
    for &count in &SHAPE_COUNTS {
        let opts = options(count, palette.clone(), LayoutPolicy::default());
        group.throughput(common::shapes_throughput(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &opts, |b, opts| {
            b.iter(|| black_box(layout(opts).map(|c| c.shapes.len())));
        });
    }
    group.finish();
}

fn layout_random_size_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/random_size");
    for &count in &SHAPE_COUNTS {
        let opts = options(
            count,
            PaletteSpec::named("ocean"),
            LayoutPolicy::default_random_size(),
        );
        group.throughput(common::shapes_throughput(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &opts, |b, opts| {
            b.iter(|| black_box(layout(opts).map(|c| c.shapes.len())));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = layout_themed_benches, layout_gradient_benches, layout_random_size_benches
}
criterion_main!(benches);
