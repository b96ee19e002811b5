//! Curvature-based corner detection on ordered point sequences.
//!
//! Purpose
//! - Split a stroke into line-like and curve-like runs at curvature peaks so
//!   each run can be fitted by a single primitive.
//!
//! Model
//! - Curvature at point i over a symmetric window of half-width w is the
//!   circumscribed-circle curvature `4·Area(p[i−w], p[i], p[i+w]) / (abc)`,
//!   shrinking the window near the ends. The series is smoothed with a fixed
//!   binomial kernel.
//! - Candidates are strict local maxima above a threshold chosen by a
//!   `ThresholdPolicy`; candidates closer than `min_segment_len` to the last
//!   accepted corner are dropped in sequence order, survivors are refined to
//!   the local maximum within `refine_radius`.
//! - Confidence = relative magnitude × local prominence × agreement between
//!   the circumcircle and turning-angle curvature estimates.
//!
//! Never fails: fewer than three points yield no corners and one degenerate
//! line run.
//!
//! Code cross-refs: `stroke::StrokeProcessor::end`, `fit::convert`

mod curvature;
mod detect;
mod threshold;

use serde::{Deserialize, Serialize};

pub use curvature::{angle_curvature, raw_curvature, smooth_series};
pub use detect::{detect, detect_with_policy, linearity};
pub use threshold::{AdaptiveThreshold, FixedThreshold, ThresholdPolicy};

/// Corner detector tunables. Lengths are in points, curvature in 1/world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerCfg {
    /// Half-width of the curvature window.
    pub window: usize,
    /// Fixed threshold, and the floor of the adaptive threshold.
    pub curvature_threshold: f64,
    /// Minimum index distance between accepted corners.
    pub min_segment_len: usize,
    /// Corners below this confidence are discarded.
    pub confidence_threshold: f64,
    /// Use `AdaptiveThreshold` instead of `FixedThreshold`.
    pub adaptive: bool,
    /// Search radius when snapping an accepted candidate to its local maximum.
    pub refine_radius: usize,
    /// Half-width of the neighborhood used for prominence.
    pub neighborhood: usize,
    /// Gain applied to the relative chord deviation in `linearity`.
    pub linearity_scale: f64,
    /// Runs with linearity at or above this are labeled `Line`.
    pub line_linearity: f64,
}

impl Default for CornerCfg {
    fn default() -> Self {
        Self {
            window: 3,
            curvature_threshold: 0.04,
            min_segment_len: 5,
            confidence_threshold: 0.15,
            adaptive: true,
            refine_radius: 2,
            neighborhood: 6,
            linearity_scale: 4.0,
            line_linearity: 0.8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    Line,
    Curve,
}

/// Contiguous points `start..=end` between consecutive corners (or an
/// endpoint and a corner). Neighboring runs share their boundary point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub start: usize,
    pub end: usize,
    pub kind: RunKind,
    /// `1 − scale·max_deviation/chord`, clamped to [0, 1].
    pub linearity: f64,
    /// Line runs: linearity. Curve runs: curvature consistency `1/(1+CV)`.
    pub quality: f64,
}

impl Run {
    #[inline]
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
    #[inline]
    pub fn range(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Output of corner detection for one stroke.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerResult {
    /// Strictly increasing corner indices.
    pub corners: Vec<usize>,
    /// Smoothed curvature per point.
    pub curvature: Vec<f64>,
    /// Confidence in [0, 1], parallel to `corners`.
    pub confidence: Vec<f64>,
    pub runs: Vec<Run>,
    /// Threshold the candidates had to exceed.
    pub threshold: f64,
}

impl CornerResult {
    pub fn line_runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter().filter(|r| r.kind == RunKind::Line)
    }
    pub fn curve_runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter().filter(|r| r.kind == RunKind::Curve)
    }
}
