use nalgebra::Vector2;

use super::StrokeCfg;
use crate::geom::{coeff_of_variation, polyline_length, turning_angle};
use crate::input::PointerSample;

/// Turning radians per world unit that halve the smoothness score.
const JITTER_GAIN: f64 = 10.0;

/// Quality of a processed stroke.
///
/// - length: short strokes penalized (`length / min_length`, capped at 1)
/// - density: sparse captures penalized (`samples / min_points`, capped at 1)
/// - smoothness: `1 / (1 + gain·total_turning/length)`
/// - velocity: `1 / (1 + CV(speed))`
pub fn score_quality(
    points: &[Vector2<f64>],
    samples: &[PointerSample],
    cfg: &StrokeCfg,
) -> super::StrokeQuality {
    let length = polyline_length(points);
    let length_score = if cfg.min_length > 0.0 {
        (length / cfg.min_length).min(1.0)
    } else {
        1.0
    };
    let density = if cfg.min_points > 0 {
        (samples.len() as f64 / cfg.min_points as f64).min(1.0)
    } else {
        1.0
    };

    let turning: f64 = points
        .windows(3)
        .map(|w| turning_angle(w[0], w[1], w[2]).abs())
        .sum();
    let smoothness = if length > 0.0 {
        1.0 / (1.0 + JITTER_GAIN * turning / length)
    } else {
        0.0
    };

    // First sample has no velocity yet.
    let speeds: Vec<f64> = samples.iter().skip(1).map(PointerSample::speed).collect();
    let velocity = if speeds.is_empty() {
        0.0
    } else {
        1.0 / (1.0 + coeff_of_variation(&speeds))
    };

    let score = 0.3 * length_score + 0.2 * density + 0.3 * smoothness + 0.2 * velocity;
    super::StrokeQuality {
        score: score.clamp(0.0, 1.0),
        length: length_score,
        density,
        smoothness,
        velocity,
    }
}
