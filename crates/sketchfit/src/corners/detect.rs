use nalgebra::Vector2;
use tracing::trace;

use super::curvature::{angle_curvature, raw_curvature, smooth_series};
use super::threshold::{AdaptiveThreshold, FixedThreshold, ThresholdPolicy};
use super::{CornerCfg, CornerResult, Run, RunKind};
use crate::geom::{coeff_of_variation, perpendicular_distance};

/// Detect corners with the policy selected by `cfg.adaptive`.
pub fn detect(points: &[Vector2<f64>], cfg: &CornerCfg) -> CornerResult {
    if cfg.adaptive {
        detect_with_policy(points, cfg, &AdaptiveThreshold::default())
    } else {
        detect_with_policy(points, cfg, &FixedThreshold)
    }
}

/// Detect corners using an explicit threshold policy.
pub fn detect_with_policy(
    points: &[Vector2<f64>],
    cfg: &CornerCfg,
    policy: &dyn ThresholdPolicy,
) -> CornerResult {
    let n = points.len();
    if n < 3 {
        return CornerResult {
            corners: Vec::new(),
            curvature: vec![0.0; n],
            confidence: Vec::new(),
            runs: vec![degenerate_run(points)],
            threshold: cfg.curvature_threshold,
        };
    }

    let raw = raw_curvature(points, cfg.window);
    let smooth = smooth_series(&raw);
    let threshold = policy.threshold(&smooth, cfg.curvature_threshold);

    // Strict local maxima above threshold, endpoints excluded.
    let candidates: Vec<usize> = (1..n - 1)
        .filter(|&i| smooth[i] > threshold && smooth[i] > smooth[i - 1] && smooth[i] > smooth[i + 1])
        .collect();

    // Spacing filter in sequence order, then refine each survivor.
    let mut accepted: Vec<usize> = Vec::with_capacity(candidates.len());
    for c in candidates {
        if let Some(&last) = accepted.last() {
            if c - last < cfg.min_segment_len {
                trace!(candidate = c, last, "corner candidate too close");
                continue;
            }
        }
        accepted.push(c);
    }
    let mut refined: Vec<usize> = accepted
        .into_iter()
        .map(|c| refine(&smooth, c, cfg.refine_radius))
        .collect();
    refined.dedup();

    let peak = smooth.iter().copied().fold(0.0, f64::max);
    let mut corners = Vec::with_capacity(refined.len());
    let mut confidence = Vec::with_capacity(refined.len());
    for c in refined {
        if corners.last().is_some_and(|&last| c <= last) {
            continue;
        }
        let conf = corner_confidence(points, &raw, &smooth, c, peak, cfg);
        if conf < cfg.confidence_threshold {
            trace!(corner = c, conf, "corner below confidence threshold");
            continue;
        }
        corners.push(c);
        confidence.push(conf);
    }

    let runs = build_runs(points, &raw, &corners, cfg);
    CornerResult {
        corners,
        curvature: smooth,
        confidence,
        runs,
        threshold,
    }
}

/// Snap to the largest smoothed curvature within `radius`, endpoints excluded.
fn refine(smooth: &[f64], c: usize, radius: usize) -> usize {
    let n = smooth.len();
    let lo = c.saturating_sub(radius).max(1);
    let hi = (c + radius).min(n - 2);
    let mut best = c;
    for i in lo..=hi {
        if smooth[i] > smooth[best] {
            best = i;
        }
    }
    best
}

fn corner_confidence(
    points: &[Vector2<f64>],
    raw: &[f64],
    smooth: &[f64],
    c: usize,
    peak: f64,
    cfg: &CornerCfg,
) -> f64 {
    let k = smooth[c];
    if peak <= 0.0 || k <= 0.0 {
        return 0.0;
    }
    let magnitude = k / peak;

    let n = smooth.len();
    let lo = c.saturating_sub(cfg.neighborhood);
    let hi = (c + cfg.neighborhood).min(n - 1);
    let (sum, count) = (lo..=hi)
        .filter(|&j| j != c)
        .fold((0.0, 0usize), |(s, m), j| (s + smooth[j], m + 1));
    let local_mean = if count > 0 { sum / count as f64 } else { 0.0 };
    let prominence = ((k - local_mean) / k).clamp(0.0, 1.0);

    let circ = raw[c];
    let ang = angle_curvature(points, c, cfg.window);
    let agreement = if circ.max(ang) > 0.0 {
        circ.min(ang) / circ.max(ang)
    } else {
        0.0
    };

    (magnitude * prominence * agreement).clamp(0.0, 1.0)
}

/// `1 − scale·(max perpendicular deviation)/chord`, clamped to [0, 1].
/// A vanishing chord (closed or single-point run) has linearity 0.
pub fn linearity(points: &[Vector2<f64>], scale: f64) -> f64 {
    let (Some(&a), Some(&b)) = (points.first(), points.last()) else {
        return 0.0;
    };
    let chord = (b - a).norm();
    if chord <= f64::EPSILON {
        return 0.0;
    }
    let max_dev = points
        .iter()
        .map(|p| perpendicular_distance(*p, a, b))
        .fold(0.0, f64::max);
    (1.0 - scale * max_dev / chord).clamp(0.0, 1.0)
}

fn degenerate_run(points: &[Vector2<f64>]) -> Run {
    let end = points.len().saturating_sub(1);
    let lin = if points.len() == 2 {
        linearity(points, 1.0)
    } else {
        0.0
    };
    Run {
        start: 0,
        end,
        kind: RunKind::Line,
        linearity: lin,
        quality: lin,
    }
}

fn build_runs(
    points: &[Vector2<f64>],
    raw: &[f64],
    corners: &[usize],
    cfg: &CornerCfg,
) -> Vec<Run> {
    let n = points.len();
    let mut bounds = Vec::with_capacity(corners.len() + 2);
    bounds.push(0);
    bounds.extend_from_slice(corners);
    bounds.push(n - 1);

    bounds
        .windows(2)
        .map(|w| {
            let (start, end) = (w[0], w[1]);
            let slice = &points[start..=end];
            let lin = linearity(slice, cfg.linearity_scale);
            if lin >= cfg.line_linearity {
                Run {
                    start,
                    end,
                    kind: RunKind::Line,
                    linearity: lin,
                    quality: lin,
                }
            } else {
                let interior = if end > start + 1 {
                    &raw[start + 1..end]
                } else {
                    &raw[start..=end]
                };
                Run {
                    start,
                    end,
                    kind: RunKind::Curve,
                    linearity: lin,
                    quality: 1.0 / (1.0 + coeff_of_variation(interior)),
                }
            }
        })
        .collect()
}
