use std::f64::consts::{PI, TAU};

use nalgebra::Vector2;

#[inline]
fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Twice the signed area of triangle (a, b, c); positive for counterclockwise.
#[inline]
pub fn triangle_area2(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    cross(b - a, c - a)
}

/// Curvature of the circle through (a, b, c): `4·Area / (|ab|·|bc|·|ca|)`.
///
/// Returns 0 for coincident points; collinear points give 0 naturally.
pub fn circumcurvature(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let denom = (b - a).norm() * (c - b).norm() * (a - c).norm();
    if !(denom.is_finite()) || denom <= f64::EPSILON {
        return 0.0;
    }
    // 4·Area = 2·|cross|
    2.0 * triangle_area2(a, b, c).abs() / denom
}

/// Circumscribed circle `(center, radius)` of three points.
///
/// None when the points are (near-)collinear: the sine of the angle at `a`,
/// `|cross| / (|ab|·|ac|)`, must exceed `eps_det`.
pub fn circumcircle(
    a: Vector2<f64>,
    b: Vector2<f64>,
    c: Vector2<f64>,
    eps_det: f64,
) -> Option<(Vector2<f64>, f64)> {
    let ab = b - a;
    let ac = c - a;
    let lab = ab.norm();
    let lac = ac.norm();
    if lab <= f64::EPSILON || lac <= f64::EPSILON {
        return None;
    }
    let det = cross(ab, ac);
    if (det / (lab * lac)).abs() < eps_det {
        return None;
    }
    // Center relative to `a`: solve |x|² = 2 x·ab and |x|² = 2 x·ac.
    let d = 2.0 * det;
    let ab2 = ab.norm_squared();
    let ac2 = ac.norm_squared();
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    let rel = Vector2::new(ux, uy);
    let r = rel.norm();
    if !r.is_finite() {
        return None;
    }
    Some((a + rel, r))
}

/// Signed turning angle at `b` when walking a → b → c, in (−π, π].
#[inline]
pub fn turning_angle(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let v_in = b - a;
    let v_out = c - b;
    if v_in.norm_squared() <= f64::EPSILON || v_out.norm_squared() <= f64::EPSILON {
        return 0.0;
    }
    cross(v_in, v_out).atan2(v_in.dot(&v_out))
}

/// Distance from `p` to the infinite line through `a` and `b`
/// (distance to `a` when the chord is degenerate).
pub fn perpendicular_distance(p: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    let chord = b - a;
    let len = chord.norm();
    if len <= f64::EPSILON {
        return (p - a).norm();
    }
    cross(chord, p - a).abs() / len
}

pub fn polyline_length(points: &[Vector2<f64>]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Wrap an angle into (−π, π].
#[inline]
pub fn wrap_angle(theta: f64) -> f64 {
    let t = theta.rem_euclid(TAU);
    if t > PI {
        t - TAU
    } else {
        t
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Linearly interpolated quantile, `q ∈ [0, 1]`. 0 for empty input.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[inline]
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Population standard deviation over |mean|; 0 when the mean vanishes.
pub fn coeff_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if values.len() < 2 || m.abs() <= 1e-12 {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt() / m.abs()
}

/// Arithmetic mean of a point set; `None` when empty.
pub fn centroid(points: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vector2::zeros(), |acc, p| acc + p);
    Some(sum / points.len() as f64)
}

/// Mean distance of `points` from `center`.
pub fn spread(points: &[Vector2<f64>], center: Vector2<f64>) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| (p - center).norm()).sum::<f64>() / points.len() as f64
}
