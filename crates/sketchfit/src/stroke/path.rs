//! Polyline clean-up used at stroke end.

use nalgebra::Vector2;

/// Drop points closer than `min_dist` to the previously kept point.
/// The first and last input points always survive.
pub fn dedupe(points: &[Vector2<f64>], min_dist: f64) -> Vec<Vector2<f64>> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(points.len());
    out.push(first);
    for &p in rest {
        if let Some(&last) = out.last() {
            if (p - last).norm() >= min_dist {
                out.push(p);
            }
        }
    }
    if let Some(&end) = points.last() {
        if out.last() != Some(&end) {
            if out.len() >= 2 {
                if let Some(last) = out.last_mut() {
                    *last = end;
                }
            } else if (end - first).norm() > 0.0 {
                out.push(end);
            }
        }
    }
    out
}

/// `passes` rounds of (¼, ½, ¼) smoothing with fixed endpoints.
pub fn smooth_passes(points: &[Vector2<f64>], passes: usize) -> Vec<Vector2<f64>> {
    let mut cur = points.to_vec();
    if cur.len() < 3 {
        return cur;
    }
    let mut next = cur.clone();
    for _ in 0..passes {
        for i in 1..cur.len() - 1 {
            next[i] = cur[i - 1] * 0.25 + cur[i] * 0.5 + cur[i + 1] * 0.25;
        }
        std::mem::swap(&mut cur, &mut next);
    }
    cur
}

/// Resample to uniform arc-length `spacing` by linear interpolation where the
/// walked distance crosses each multiple of `spacing`. Endpoints are kept
/// exactly; a trailing remainder under half a spacing is folded into the end.
pub fn resample(points: &[Vector2<f64>], spacing: f64) -> Vec<Vector2<f64>> {
    if points.len() < 2 || !(spacing > 0.0) {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    let mut carried = 0.0;
    for w in points.windows(2) {
        let (mut a, b) = (w[0], w[1]);
        let mut d = (b - a).norm();
        while d > 0.0 && carried + d >= spacing {
            let t = (spacing - carried) / d;
            let q = a + (b - a) * t;
            out.push(q);
            a = q;
            d = (b - q).norm();
            carried = 0.0;
        }
        carried += d;
    }
    let end = points[points.len() - 1];
    if carried < 0.5 * spacing && out.len() > 1 {
        if let Some(last) = out.last_mut() {
            *last = end;
        }
    } else if out.last() != Some(&end) {
        out.push(end);
    }
    out
}
