use super::*;
use crate::corners::RunKind;
use nalgebra::{vector, Vector2};

fn sample(x: f64, y: f64, t: f64) -> PointerSample {
    PointerSample::at(x, y, t)
}

fn feed(proc: &mut StrokeProcessor, pts: &[(f64, f64)]) -> StrokeId {
    let (x0, y0) = pts[0];
    let id = proc.start(sample(x0, y0, 0.0)).unwrap();
    for (i, &(x, y)) in pts.iter().enumerate().skip(1) {
        proc.add(sample(x, y, i as f64 * 8.0)).unwrap();
    }
    id
}

#[test]
fn add_and_end_without_stroke_are_reported() {
    let mut proc = StrokeProcessor::default();
    assert_eq!(proc.add(sample(0.0, 0.0, 0.0)), Err(StrokeError::NoActiveStroke));
    assert!(matches!(proc.end(), Err(StrokeError::NoActiveStroke)));
    assert_eq!(proc.cancel(), None);
    let id = proc.start(sample(0.0, 0.0, 0.0)).unwrap();
    assert_eq!(
        proc.start(sample(1.0, 1.0, 1.0)),
        Err(StrokeError::AlreadyActive(id))
    );
}

#[test]
fn ids_are_monotonic_and_cancel_discards() {
    let mut proc = StrokeProcessor::default();
    let a = proc.start(sample(0.0, 0.0, 0.0)).unwrap();
    proc.add(sample(5.0, 0.0, 10.0)).unwrap();
    assert_eq!(proc.cancel(), Some(a));
    assert!(!proc.is_active());
    assert!(proc.points().is_empty());
    assert_eq!(proc.add(sample(6.0, 0.0, 12.0)), Err(StrokeError::NoActiveStroke));
    let b = proc.start(sample(0.0, 0.0, 20.0)).unwrap();
    assert!(b > a);
}

#[test]
fn point_cap_drops_samples_without_failing() {
    let cfg = StrokeCfg {
        max_points: 5,
        ..StrokeCfg::default()
    };
    let mut proc = StrokeProcessor::new(cfg);
    proc.start(sample(0.0, 0.0, 0.0)).unwrap();
    let outcomes: Vec<AddOutcome> = (1..10)
        .map(|i| proc.add(sample(i as f64 * 4.0, 0.0, i as f64)).unwrap())
        .collect();
    assert_eq!(
        outcomes.iter().filter(|o| **o == AddOutcome::Appended).count(),
        4
    );
    let stroke = proc.active().unwrap();
    assert_eq!(stroke.len(), 5);
    assert_eq!(stroke.stats().dropped, 5);
    let done = proc.end().unwrap();
    assert_eq!(done.samples.len(), 5);
}

#[test]
fn velocity_uses_trailing_window() {
    let mut proc = StrokeProcessor::default();
    proc.start(sample(0.0, 0.0, 0.0)).unwrap();
    proc.add(sample(10.0, 0.0, 10.0)).unwrap();
    proc.add(sample(20.0, 0.0, 20.0)).unwrap();
    proc.add(sample(25.0, 0.0, 20.0)).unwrap();
    let s = proc.active().unwrap().samples();
    assert_eq!(s[0].velocity, Vector2::zeros());
    assert!((s[1].velocity - vector![1.0, 0.0]).norm() < 1e-12);
    assert!((s[2].velocity - vector![1.0, 0.0]).norm() < 1e-12);
    // Anchored at the first sample of the window, not the previous one.
    assert!((s[3].velocity - vector![1.25, 0.0]).norm() < 1e-12);
    let stats = proc.active().unwrap().stats();
    assert!((stats.length - 25.0).abs() < 1e-12);
    assert!((stats.peak_speed - 1.25).abs() < 1e-12);
}

#[test]
fn stalled_timestamps_carry_previous_velocity() {
    let cfg = StrokeCfg {
        velocity_window: 1,
        ..StrokeCfg::default()
    };
    let mut proc = StrokeProcessor::new(cfg);
    proc.start(sample(0.0, 0.0, 0.0)).unwrap();
    proc.add(sample(0.0, 8.0, 4.0)).unwrap();
    proc.add(sample(0.0, 9.0, 4.0)).unwrap();
    let s = proc.active().unwrap().samples();
    assert!((s[1].velocity - vector![0.0, 2.0]).norm() < 1e-12);
    assert_eq!(s[2].velocity, s[1].velocity);
}

#[test]
fn realtime_smoothing_stays_behind_newest_points() {
    let cfg = StrokeCfg::default();
    let lag = cfg.realtime_lag;
    let mut proc = StrokeProcessor::new(cfg);
    proc.start(sample(0.0, 0.0, 0.0)).unwrap();
    for i in 1..30 {
        let y = if i % 2 == 0 { 3.0 } else { -3.0 };
        proc.add(sample(i as f64 * 4.0, y, i as f64)).unwrap();
        let stroke = proc.active().unwrap();
        let n = stroke.len();
        // The newest `lag` points are untouched captures.
        for j in n.saturating_sub(lag)..n {
            assert_eq!(stroke.points()[j], stroke.samples()[j].world);
        }
        assert_eq!(stroke.points()[0], vector![0.0, 0.0]);
    }
    // Raw samples keep their zig-zag; the path is flattened.
    let stroke = proc.active().unwrap();
    assert_eq!(stroke.samples()[5].world.y, -3.0);
    assert!(stroke.points()[5].y.abs() < 3.0);
}

#[test]
fn straight_stroke_resamples_uniformly_with_exact_endpoints() {
    let mut proc = StrokeProcessor::default();
    let pts: Vec<(f64, f64)> = (0..=50).map(|i| (0.0, i as f64 * 2.0)).collect();
    feed(&mut proc, &pts);
    let done = proc.end().unwrap();
    let first = done.points[0];
    let last = *done.points.last().unwrap();
    assert!((first - vector![0.0, 0.0]).norm() < 1e-9);
    assert!((last - vector![0.0, 100.0]).norm() < 1e-9);
    assert_eq!(done.points.len(), 21);
    for w in done.points.windows(2) {
        assert!(((w[1] - w[0]).norm() - 5.0).abs() < 1e-6);
    }
    assert!(done.corners.corners.is_empty());
    assert_eq!(done.corners.runs.len(), 1);
    assert_eq!(done.corners.runs[0].kind, RunKind::Line);
    assert!(done.quality.score > 0.7);
}

#[test]
fn elbow_stroke_splits_into_two_line_runs() {
    let mut pts: Vec<(f64, f64)> = (0..=100).map(|i| (i as f64, 0.0)).collect();
    pts.extend((1..=100).map(|j| (100.0, j as f64)));
    let mut proc = StrokeProcessor::default();
    feed(&mut proc, &pts);
    let done = proc.end().unwrap();
    assert_eq!(done.corners.corners.len(), 1);
    let c = done.points[done.corners.corners[0]];
    assert!((c - vector![100.0, 0.0]).norm() < 8.0);
    assert_eq!(done.corners.runs.len(), 2);
    assert!(done.corners.runs.iter().all(|r| r.kind == RunKind::Line));
    let run0 = done.run_points(0).unwrap();
    assert_eq!(run0.first(), done.points.first());
}

#[test]
fn quality_prefers_long_steady_strokes() {
    let mut proc = StrokeProcessor::default();
    let long: Vec<(f64, f64)> = (0..=60).map(|i| (i as f64 * 3.0, 0.0)).collect();
    feed(&mut proc, &long);
    let good = proc.end().unwrap().quality;

    let short: Vec<(f64, f64)> = vec![(0.0, 0.0), (4.0, 3.0), (1.0, 6.0)];
    feed(&mut proc, &short);
    let poor = proc.end().unwrap().quality;

    assert!(good.score > poor.score);
    assert!(poor.length < 1.0);
    assert!(poor.density < 1.0);
    assert!((good.velocity - 1.0).abs() < 1e-9);
}

#[test]
fn smoothing_passes_scale_with_factor() {
    let mut cfg = StrokeCfg::default();
    assert_eq!(cfg.smoothing_passes(), 2);
    cfg.smoothing_factor = 0.0;
    assert_eq!(cfg.smoothing_passes(), 0);
    cfg.smoothing_factor = 3.0;
    assert_eq!(cfg.smoothing_passes(), MAX_SMOOTHING_PASSES);
}

#[test]
fn dedupe_keeps_endpoints() {
    let pts = [
        vector![0.0, 0.0],
        vector![0.5, 0.0],
        vector![3.0, 0.0],
        vector![3.2, 0.0],
        vector![3.4, 0.0],
    ];
    let out = dedupe(&pts, 2.5);
    assert_eq!(out, vec![vector![0.0, 0.0], vector![3.4, 0.0]]);
    assert!(dedupe(&[], 1.0).is_empty());
    assert_eq!(dedupe(&[vector![1.0, 1.0]], 1.0).len(), 1);
}

#[test]
fn resample_folds_short_remainder() {
    let pts = [vector![0.0, 0.0], vector![10.0, 0.0], vector![10.0, 7.0]];
    let out = resample(&pts, 5.0);
    // 17 units: samples at 0, 5, 10, 15; the 2-unit remainder folds 15 into the endpoint.
    assert_eq!(out.len(), 4);
    assert_eq!(out[0], vector![0.0, 0.0]);
    assert!((out[1] - vector![5.0, 0.0]).norm() < 1e-12);
    assert!((out[2] - vector![10.0, 0.0]).norm() < 1e-12);
    assert_eq!(out[3], vector![10.0, 7.0]);
}

#[test]
fn smoothing_fixes_endpoints() {
    let pts = [vector![0.0, 0.0], vector![1.0, 4.0], vector![2.0, 0.0]];
    let out = smooth_passes(&pts, 3);
    assert_eq!(out[0], pts[0]);
    assert_eq!(out[2], pts[2]);
    assert!((out[1] - vector![1.0, 0.5]).norm() < 1e-12);
}
