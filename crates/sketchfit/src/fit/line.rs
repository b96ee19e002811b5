use nalgebra::Vector2;

use super::{error_confidence, rms, FitCfg, FitError, FitMeta, GeometryFit, Primitive};
use crate::corners::linearity;
use crate::geom::perpendicular_distance;

/// Chord fit between the first and last point.
///
/// Two points always fit exactly. Fails only on a zero-length chord.
pub fn fit_line(points: &[Vector2<f64>], cfg: &FitCfg) -> Result<GeometryFit, FitError> {
    let (Some(&start), Some(&end)) = (points.first(), points.last()) else {
        return Err(FitError::TooFewPoints {
            needed: 2,
            got: points.len(),
        });
    };
    if points.len() < 2 {
        return Err(FitError::TooFewPoints {
            needed: 2,
            got: points.len(),
        });
    }
    if (end - start).norm() <= cfg.geom.eps_len {
        return Err(FitError::ZeroChord);
    }
    let err = rms(points.iter().map(|p| perpendicular_distance(*p, start, end)));
    let lin = linearity(points, cfg.linearity_scale);
    let confidence = (error_confidence(err, cfg.line_max_error) * (0.6 + 0.4 * lin)).clamp(0.0, 1.0);
    Ok(GeometryFit {
        primitive: Primitive::Line { start, end },
        confidence,
        rms_error: err,
        points: points.to_vec(),
        meta: FitMeta {
            consistency: lin,
            ..FitMeta::default()
        },
    })
}
