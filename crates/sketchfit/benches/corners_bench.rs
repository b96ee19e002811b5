//! Criterion microbenches for curvature analysis and corner detection.
//!
//! - Raw and smoothed curvature over a resampled path.
//! - Full detection (fixed vs adaptive threshold) on a clean corner and a
//!   jittered circle.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector2;
use sketchfit::corners::{detect, raw_curvature, smooth_series, CornerCfg};
use sketchfit::synth::{stroke_events, ReplayToken, ShapeKind, SynthCfg};

fn path(kind: ShapeKind, jitter: f64) -> Vec<Vector2<f64>> {
    let cfg = SynthCfg {
        jitter,
        ..SynthCfg::default()
    };
    stroke_events(&kind.preset(), &cfg, ReplayToken::new(5))
        .into_iter()
        .map(|e| e.raw)
        .collect()
}

fn bench_curvature(c: &mut Criterion) {
    let mut group = c.benchmark_group("curvature");
    let pts = path(ShapeKind::Circle, 0.5);
    group.bench_function(BenchmarkId::new("raw", pts.len()), |b| {
        b.iter(|| raw_curvature(&pts, 3))
    });
    let raw = raw_curvature(&pts, 3);
    group.bench_function(BenchmarkId::new("smooth", raw.len()), |b| {
        b.iter(|| smooth_series(&raw))
    });
    group.finish();
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");
    for (name, kind, jitter) in [
        ("corner", ShapeKind::Corner, 0.0),
        ("circle_jitter", ShapeKind::Circle, 0.5),
    ] {
        let pts = path(kind, jitter);
        for adaptive in [false, true] {
            let cfg = CornerCfg {
                adaptive,
                ..CornerCfg::default()
            };
            let label = if adaptive { "adaptive" } else { "fixed" };
            group.bench_function(BenchmarkId::new(name, label), |b| {
                b.iter(|| detect(&pts, &cfg))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_curvature, bench_detect);
criterion_main!(benches);
