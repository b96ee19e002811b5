//! Stroke-to-geometry conversion: fit each corner-delimited run to a line,
//! arc or circle and keep the best-scoring candidate.
//!
//! Purpose
//! - Turn a processed stroke into typed primitives with confidence and RMS
//!   error, so the caller can snap freehand input to clean geometry.
//!
//! Model
//! - Line: chord between the run's endpoints, RMS perpendicular error,
//!   confidence boosted by linearity.
//! - Arc: circumscribed circle of first/middle/last points, RMS radial
//!   error, confidence boosted by curvature consistency.
//! - Circle: algebraic least squares (power-sum moments, 2×2 system) on
//!   near-closed runs of ≥5 points, confidence boosted by closure quality and
//!   radius consistency.
//! - Selection maximizes `confidence + simplicity bonus − error penalty`,
//!   clipped to [0, 1]; ties keep the simpler primitive.
//!
//! Degenerate inputs (zero chord, collinear triple, singular system) only drop
//! that candidate; fitting continues with the rest.
//!
//! Code cross-refs: `corners::{Run,linearity}`, `stroke::ProcessedStroke`

mod arc;
mod circle;
mod line;
mod select;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::{polyline_length, GeomCfg};

pub use arc::fit_arc;
pub use circle::fit_circle;
pub use line::fit_line;
pub use select::{convert, convert_runs, fit_run, selection_score};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitCfg {
    /// RMS error ceilings, in world units.
    pub line_max_error: f64,
    pub arc_max_error: f64,
    pub circle_max_error: f64,
    /// Runs with fewer points are skipped.
    pub min_run_points: usize,
    pub detect_circles: bool,
    /// Best candidates below this confidence are not reported.
    pub min_confidence: f64,
    /// Near-closed: closure distance ≤ factor × average point spacing.
    pub closure_factor: f64,
    /// Same gain as `CornerCfg::linearity_scale`.
    pub linearity_scale: f64,
    pub line_bonus: f64,
    pub arc_bonus: f64,
    pub circle_bonus: f64,
    /// Weight of `min(rms/ceiling, 1)` subtracted from the selection score.
    pub error_penalty: f64,
    pub geom: GeomCfg,
}

impl Default for FitCfg {
    fn default() -> Self {
        Self {
            line_max_error: 3.0,
            arc_max_error: 4.0,
            circle_max_error: 5.0,
            min_run_points: 2,
            detect_circles: true,
            min_confidence: 0.3,
            closure_factor: 3.0,
            linearity_scale: 4.0,
            line_bonus: 0.10,
            arc_bonus: 0.05,
            circle_bonus: 0.02,
            error_penalty: 0.1,
            geom: GeomCfg::default(),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum FitError {
    #[error("need at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },
    #[error("chord between endpoints has zero length")]
    ZeroChord,
    #[error("points are collinear")]
    Collinear,
    #[error("least-squares system is singular")]
    Singular,
    #[error("endpoints are not near-closed (gap {gap:.3})")]
    NotClosed { gap: f64 },
    #[error("fit produced non-finite parameters")]
    NonFinite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Line,
    Arc,
    Circle,
}

/// A fitted primitive with its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Line {
        start: Vector2<f64>,
        end: Vector2<f64>,
    },
    Arc {
        center: Vector2<f64>,
        radius: f64,
        /// Angle of `start` about `center`.
        start_angle: f64,
        /// Signed; positive is counterclockwise.
        sweep: f64,
        start: Vector2<f64>,
        end: Vector2<f64>,
    },
    Circle {
        center: Vector2<f64>,
        radius: f64,
    },
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Line { .. } => PrimitiveKind::Line,
            Primitive::Arc { .. } => PrimitiveKind::Arc,
            Primitive::Circle { .. } => PrimitiveKind::Circle,
        }
    }
}

/// Per-fit bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FitMeta {
    pub run_index: usize,
    /// Inclusive index range of the run in the processed stroke.
    pub run_start: usize,
    pub run_end: usize,
    /// Selection score the candidate achieved.
    pub score: f64,
    /// Method-specific boost term: linearity, curvature or radius consistency.
    pub consistency: f64,
    /// Closure quality (circles only).
    pub closure: Option<f64>,
    /// Number of candidates that survived for this run.
    pub candidates: usize,
}

/// One candidate primitive for a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryFit {
    pub primitive: Primitive,
    /// In [0, 1].
    pub confidence: f64,
    pub rms_error: f64,
    pub points: Vec<Vector2<f64>>,
    pub meta: FitMeta,
}

impl GeometryFit {
    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.primitive.kind()
    }
}

/// All candidates for one run and the index of the selected one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunFit {
    pub candidates: Vec<GeometryFit>,
    pub best: Option<usize>,
}

impl RunFit {
    pub fn best(&self) -> Option<&GeometryFit> {
        self.best.and_then(|i| self.candidates.get(i))
    }
    pub fn into_best(mut self) -> Option<GeometryFit> {
        let i = self.best?;
        (i < self.candidates.len()).then(|| self.candidates.swap_remove(i))
    }
}

/// Confidence from RMS error against a ceiling: gentle decay up to the
/// ceiling, quadratic falloff past it.
pub(crate) fn error_confidence(err: f64, ceiling: f64) -> f64 {
    if !err.is_finite() {
        return 0.0;
    }
    if ceiling <= 0.0 {
        return if err <= f64::EPSILON { 1.0 } else { 0.0 };
    }
    let ratio = err / ceiling;
    if ratio <= 1.0 {
        1.0 - 0.3 * ratio
    } else {
        0.7 / (ratio * ratio)
    }
}

pub(crate) fn rms(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v * v, n + 1));
    if n == 0 {
        0.0
    } else {
        (sum / n as f64).sqrt()
    }
}

/// Closure gap and average spacing of a run.
pub(crate) fn closure_stats(points: &[Vector2<f64>]) -> (f64, f64) {
    let (Some(&a), Some(&b)) = (points.first(), points.last()) else {
        return (0.0, 0.0);
    };
    let gap = (b - a).norm();
    let spacing = if points.len() > 1 {
        polyline_length(points) / (points.len() - 1) as f64
    } else {
        0.0
    };
    (gap, spacing)
}

/// Whether a run qualifies as closed: ≥5 points and a gap within
/// `closure_factor` average spacings.
pub fn is_near_closed(points: &[Vector2<f64>], cfg: &FitCfg) -> bool {
    if points.len() < 5 {
        return false;
    }
    let (gap, spacing) = closure_stats(points);
    spacing > 0.0 && gap <= cfg.closure_factor * spacing
}
