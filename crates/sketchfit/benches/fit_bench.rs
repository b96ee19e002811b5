//! Criterion microbenches for the per-run fitters and run selection.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector2;
use sketchfit::fit::{fit_arc, fit_circle, fit_line, fit_run, FitCfg};
use sketchfit::synth::{ShapeKind, ShapeSpec};

fn bench_fitters(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    let cfg = FitCfg::default();
    let line = ShapeKind::Line.preset().points(5.0);
    let arc = ShapeKind::Arc.preset().points(5.0);
    let circle = ShapeKind::Circle.preset().points(5.0);
    group.bench_function(BenchmarkId::new("line", line.len()), |b| {
        b.iter(|| fit_line(&line, &cfg))
    });
    group.bench_function(BenchmarkId::new("arc", arc.len()), |b| {
        b.iter(|| fit_arc(&arc, &cfg))
    });
    group.bench_function(BenchmarkId::new("circle", circle.len()), |b| {
        b.iter(|| fit_circle(&circle, &cfg))
    });
    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_run");
    let cfg = FitCfg::default();
    for radius in [20.0, 80.0, 320.0] {
        let pts: Vec<Vector2<f64>> = ShapeSpec::Circle {
            center: Vector2::zeros(),
            radius,
            start_angle: 0.0,
        }
        .points(5.0);
        group.bench_function(BenchmarkId::new("circle", pts.len()), |b| {
            b.iter(|| fit_run(&pts, &cfg))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fitters, bench_select);
criterion_main!(benches);
