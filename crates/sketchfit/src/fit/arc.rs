use std::f64::consts::TAU;

use nalgebra::Vector2;

use super::{error_confidence, is_near_closed, rms, FitCfg, FitError, FitMeta, GeometryFit, Primitive};
use crate::geom::{circumcircle, circumcurvature, coeff_of_variation, triangle_area2};

/// Three-point arc through the first, middle and last points.
///
/// Near-closed runs report `ZeroChord`: their endpoints do not pin down an
/// arc and belong to the circle fitter.
pub fn fit_arc(points: &[Vector2<f64>], cfg: &FitCfg) -> Result<GeometryFit, FitError> {
    let n = points.len();
    if n < 3 {
        return Err(FitError::TooFewPoints { needed: 3, got: n });
    }
    let (first, mid, last) = (points[0], points[n / 2], points[n - 1]);
    if (last - first).norm() <= cfg.geom.eps_len || is_near_closed(points, cfg) {
        return Err(FitError::ZeroChord);
    }
    let (center, radius) =
        circumcircle(first, mid, last, cfg.geom.eps_det).ok_or(FitError::Collinear)?;
    if !(center.x.is_finite() && center.y.is_finite() && radius.is_finite()) {
        return Err(FitError::NonFinite);
    }

    let err = rms(points.iter().map(|p| (p - center).norm() - radius));
    let consistency = curvature_consistency(points);
    let confidence =
        (error_confidence(err, cfg.arc_max_error) * (0.6 + 0.4 * consistency)).clamp(0.0, 1.0);

    let start_angle = (first.y - center.y).atan2(first.x - center.x);
    let end_angle = (last.y - center.y).atan2(last.x - center.x);
    let sweep = if triangle_area2(first, mid, last) > 0.0 {
        (end_angle - start_angle).rem_euclid(TAU)
    } else {
        -(start_angle - end_angle).rem_euclid(TAU)
    };

    Ok(GeometryFit {
        primitive: Primitive::Arc {
            center,
            radius,
            start_angle,
            sweep,
            start: first,
            end: last,
        },
        confidence,
        rms_error: err,
        points: points.to_vec(),
        meta: FitMeta {
            consistency,
            ..FitMeta::default()
        },
    })
}

/// `1 / (1 + CV)` of pointwise circumcircle curvature. The stencil spans about
/// a tenth of the run so sample noise does not dominate.
fn curvature_consistency(points: &[Vector2<f64>]) -> f64 {
    let n = points.len();
    let step = (n / 10).max(1);
    if n < 2 * step + 1 {
        return 0.0;
    }
    let ks: Vec<f64> = (step..n - step)
        .map(|i| circumcurvature(points[i - step], points[i], points[i + step]))
        .collect();
    1.0 / (1.0 + coeff_of_variation(&ks))
}
