use nalgebra::{Matrix2, Vector2};

use super::{
    closure_stats, error_confidence, is_near_closed, rms, FitCfg, FitError, FitMeta, GeometryFit,
    Primitive,
};

/// Relative radius deviation that zeroes the radius-consistency term.
const RADIUS_TOLERANCE: f64 = 0.2;

/// Algebraic (Kåsa) circle fit on a near-closed run of at least five points.
///
/// With centered coordinates `u = x − x̄`, `v = y − ȳ` the center solves
/// `[Suu Suv; Suv Svv]·c = ½·[Suuu + Suvv; Svvv + Svuu]` and
/// `r² = |c|² + (Suu + Svv)/n`.
pub fn fit_circle(points: &[Vector2<f64>], cfg: &FitCfg) -> Result<GeometryFit, FitError> {
    let n = points.len();
    if n < 5 {
        return Err(FitError::TooFewPoints { needed: 5, got: n });
    }
    let (gap, spacing) = closure_stats(points);
    if !is_near_closed(points, cfg) {
        return Err(FitError::NotClosed { gap });
    }

    let nf = n as f64;
    let mean = points.iter().sum::<Vector2<f64>>() / nf;
    let (mut suu, mut suv, mut svv) = (0.0, 0.0, 0.0);
    let (mut suuu, mut svvv, mut suvv, mut svuu) = (0.0, 0.0, 0.0, 0.0);
    for p in points {
        let (u, v) = (p.x - mean.x, p.y - mean.y);
        suu += u * u;
        suv += u * v;
        svv += v * v;
        suuu += u * u * u;
        svvv += v * v * v;
        suvv += u * v * v;
        svuu += v * u * u;
    }
    let a = Matrix2::new(suu, suv, suv, svv);
    let det = a.determinant();
    if det.abs() <= cfg.geom.eps_det * (suu * svv).abs().max(f64::MIN_POSITIVE) {
        return Err(FitError::Singular);
    }
    let rhs = Vector2::new(suuu + suvv, svvv + svuu) * 0.5;
    let c = a.try_inverse().ok_or(FitError::Singular)? * rhs;
    let center = mean + c;
    let radius = (c.norm_squared() + (suu + svv) / nf).sqrt();
    if !(center.x.is_finite() && center.y.is_finite() && radius.is_finite()) || radius <= 0.0 {
        return Err(FitError::NonFinite);
    }

    let err = rms(points.iter().map(|p| (p - center).norm() - radius));
    let rel = rms(points.iter().map(|p| ((p - center).norm() - radius) / radius));
    let radius_consistency = (1.0 - rel / RADIUS_TOLERANCE).clamp(0.0, 1.0);
    // One spacing of gap is what a uniformly sampled closed loop leaves.
    let slack = (cfg.closure_factor - 1.0).max(f64::EPSILON) * spacing;
    let closure = (1.0 - (gap - spacing).max(0.0) / slack).clamp(0.0, 1.0);
    let confidence = (error_confidence(err, cfg.circle_max_error)
        * (0.5 + 0.25 * closure + 0.25 * radius_consistency))
        .clamp(0.0, 1.0);

    Ok(GeometryFit {
        primitive: Primitive::Circle { center, radius },
        confidence,
        rms_error: err,
        points: points.to_vec(),
        meta: FitMeta {
            consistency: radius_consistency,
            closure: Some(closure),
            ..FitMeta::default()
        },
    })
}
