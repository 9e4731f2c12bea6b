//! Benchmark skeleton generation stages.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::prelude::*;
use std::hint::black_box;
use vastu_skeleton::graph::GraphBuilder;
use vastu_skeleton::topology::{Occupancy, count_branches, is_end_point, is_simple_point};
use vastu_skeleton::{
    DistanceCell, DistanceField, GridCoord, SkeletonClassifier, SkeletonConfig, SkeletonField,
    SkeletonGenerator,
};

/// Square tunnel along x, walls at `|y| == 3` or `|z| == 3`.
fn tunnel_esdf(length: i32) -> DistanceField {
    let h = 3;
    let mut field = DistanceField::new(8, 0.1);
    for x in 0..length {
        for y in -h..=h {
            for z in -h..=h {
                let coord = GridCoord::new(x, y, z);
                if y.abs() == h || z.abs() == h {
                    field.set_cell(coord, DistanceCell::observed(-0.05));
                    continue;
                }
                // Nearest wall is straight across the shorter gap
                let to_y = h - y.abs();
                let to_z = h - z.abs();
                let sy = if y < 0 { -1 } else { 1 };
                let sz = if z < 0 { -1 } else { 1 };
                let parent = if to_y <= to_z {
                    GridCoord::new(0, sy * to_y, 0)
                } else {
                    GridCoord::new(0, 0, sz * to_z)
                };
                let distance = to_y.min(to_z) as f32 * 0.1;
                field.set_cell(coord, DistanceCell::with_parent(distance, parent));
            }
        }
    }
    field
}

fn bench_topology(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let samples: Vec<Occupancy> = (0..1024)
        .map(|_| Occupancy::new(rng.gen_range(0..(1u32 << 27))).with_center())
        .collect();

    c.bench_function("topology_predicates", |b| {
        b.iter(|| {
            let mut count = 0u32;
            for &occ in &samples {
                count += is_simple_point(occ) as u32;
                count += is_end_point(occ) as u32;
                count += count_branches(occ);
            }
            black_box(count)
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let config = SkeletonConfig::default();
    let classifier = SkeletonClassifier::new(&config);

    for length in [16, 32, 64] {
        let esdf = tunnel_esdf(length);
        group.bench_with_input(BenchmarkId::from_parameter(length), &esdf, |b, esdf| {
            b.iter(|| {
                let mut layer = SkeletonField::with_layout_of(esdf);
                black_box(classifier.classify(esdf, &mut layer))
            })
        });
    }
    group.finish();
}

fn bench_build_graph(c: &mut Criterion) {
    let config = SkeletonConfig::default();
    let esdf = tunnel_esdf(32);
    let mut classified = SkeletonField::with_layout_of(&esdf);
    SkeletonClassifier::new(&config).classify(&esdf, &mut classified);
    let builder = GraphBuilder::new(&config);

    c.bench_function("build_graph", |b| {
        b.iter(|| {
            let mut layer = classified.clone();
            let result = builder.build(&mut layer, &esdf);
            black_box(result.graph.num_edges())
        })
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let esdf = tunnel_esdf(32);

    c.bench_function("full_pipeline", |b| {
        b.iter(|| {
            let mut generator = SkeletonGenerator::new(&esdf, SkeletonConfig::default())
                .expect("default config is valid");
            black_box(generator.run())
        })
    });
}

criterion_group!(
    benches,
    bench_topology,
    bench_classify,
    bench_build_graph,
    bench_full_pipeline
);
criterion_main!(benches);
