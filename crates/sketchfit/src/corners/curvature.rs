use nalgebra::Vector2;

use crate::geom::{circumcurvature, turning_angle};

/// Binomial smoothing kernel.
const KERNEL: [f64; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];

/// Largest symmetric half-width available at `i`, capped by `w`.
#[inline]
fn half_width(i: usize, n: usize, w: usize) -> usize {
    w.min(i).min(n.saturating_sub(1 + i))
}

/// Circumcircle curvature per point over a symmetric window of half-width `w`.
/// Endpoints (no room for a window) get zero.
pub fn raw_curvature(points: &[Vector2<f64>], w: usize) -> Vec<f64> {
    let n = points.len();
    let w = w.max(1);
    (0..n)
        .map(|i| {
            let k = half_width(i, n, w);
            if k == 0 {
                0.0
            } else {
                circumcurvature(points[i - k], points[i], points[i + k])
            }
        })
        .collect()
}

/// Independent estimate: |turning angle| over the mean arm length.
pub fn angle_curvature(points: &[Vector2<f64>], i: usize, w: usize) -> f64 {
    let n = points.len();
    if i >= n {
        return 0.0;
    }
    let k = half_width(i, n, w.max(1));
    if k == 0 {
        return 0.0;
    }
    let (a, b, c) = (points[i - k], points[i], points[i + k]);
    let arms = 0.5 * ((b - a).norm() + (c - b).norm());
    if arms <= f64::EPSILON {
        return 0.0;
    }
    turning_angle(a, b, c).abs() / arms
}

/// Convolve with the fixed kernel, renormalizing where it hangs off the ends.
pub fn smooth_series(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let half = KERNEL.len() / 2;
    (0..n)
        .map(|i| {
            let mut acc = 0.0;
            let mut weight = 0.0;
            for (k, wk) in KERNEL.iter().enumerate() {
                let Some(j) = (i + k).checked_sub(half) else {
                    continue;
                };
                if j >= n {
                    continue;
                }
                acc += wk * values[j];
                weight += wk;
            }
            if weight > 0.0 {
                acc / weight
            } else {
                0.0
            }
        })
        .collect()
}
