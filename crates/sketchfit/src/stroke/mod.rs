//! In-progress stroke capture and end-of-stroke processing.
//!
//! Purpose
//! - Own one stroke from first sample to `end`/`cancel`: velocity capture,
//!   point cap, causal realtime smoothing of the display path, then
//!   dedupe → smoothing passes → uniform resampling → corner detection →
//!   quality scoring.
//!
//! Invariants
//! - Captured `PointerSample`s are never mutated; realtime smoothing works on
//!   a separate path and only touches points `realtime_lag` behind the newest.
//! - `Stroke` becomes `ProcessedStroke` by value, so processing happens once.
//! - `add`/`end` without an active stroke return `StrokeError::NoActiveStroke`.
//!
//! Code cross-refs: `corners::detect`, `fit::convert`, `session::InputSession`

mod path;
mod processor;
mod quality;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::corners::{CornerCfg, CornerResult};
use crate::geom::Bounds2;
use crate::input::PointerSample;

pub use path::{dedupe, resample, smooth_passes};
pub use processor::StrokeProcessor;
pub use quality::score_quality;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeId(pub u64);

/// Smoothing passes at `smoothing_factor == 1`.
pub const MAX_SMOOTHING_PASSES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeCfg {
    /// Samples beyond this are dropped; the stroke continues.
    pub max_points: usize,
    /// Trailing samples used for the velocity estimate.
    pub velocity_window: usize,
    pub realtime_smoothing: bool,
    /// Realtime smoothing only touches points this far behind the newest.
    pub realtime_lag: usize,
    /// Blend toward the neighbor midpoint, in [0, 1].
    pub realtime_strength: f64,
    /// Resampling spacing in world units.
    pub target_spacing: f64,
    /// In [0, 1]; scales the number of end-of-stroke smoothing passes.
    pub smoothing_factor: f64,
    /// Length below which quality is penalized.
    pub min_length: f64,
    /// Sample count below which quality is penalized.
    pub min_points: usize,
    pub corner: CornerCfg,
}

impl Default for StrokeCfg {
    fn default() -> Self {
        Self {
            max_points: 10_000,
            velocity_window: 4,
            realtime_smoothing: true,
            realtime_lag: 3,
            realtime_strength: 0.5,
            target_spacing: 5.0,
            smoothing_factor: 0.5,
            min_length: 20.0,
            min_points: 8,
            corner: CornerCfg::default(),
        }
    }
}

impl StrokeCfg {
    pub fn smoothing_passes(&self) -> usize {
        (self.smoothing_factor.clamp(0.0, 1.0) * MAX_SMOOTHING_PASSES as f64).round() as usize
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StrokeError {
    #[error("no active stroke")]
    NoActiveStroke,
    #[error("stroke {0:?} is already in progress")]
    AlreadyActive(StrokeId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Appended,
    /// Point cap reached; the sample was discarded.
    Dropped,
}

/// Running aggregates over captured samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeStats {
    pub bounds: Bounds2,
    /// Length of the raw world-space path.
    pub length: f64,
    pub avg_speed: f64,
    pub peak_speed: f64,
    pub avg_pressure: f64,
    pub sample_count: usize,
    pub dropped: usize,
}

/// Component and overall quality scores, each in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeQuality {
    pub score: f64,
    pub length: f64,
    pub density: f64,
    pub smoothness: f64,
    pub velocity: f64,
}

/// A stroke still receiving samples.
#[derive(Clone, Debug)]
pub struct Stroke {
    id: StrokeId,
    samples: Vec<PointerSample>,
    path: Vec<Vector2<f64>>,
    stats: StrokeStats,
    speed_sum: f64,
    pressure_sum: f64,
}

impl Stroke {
    #[inline]
    pub fn id(&self) -> StrokeId {
        self.id
    }
    #[inline]
    pub fn samples(&self) -> &[PointerSample] {
        &self.samples
    }
    /// Display path (world space, realtime-smoothed behind the lag).
    #[inline]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.path
    }
    #[inline]
    pub fn stats(&self) -> &StrokeStats {
        &self.stats
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A finished stroke: resampled points plus derived analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessedStroke {
    pub id: StrokeId,
    pub samples: Vec<PointerSample>,
    /// Uniformly resampled world-space points.
    pub points: Vec<Vector2<f64>>,
    pub stats: StrokeStats,
    pub corners: CornerResult,
    pub quality: StrokeQuality,
}

impl ProcessedStroke {
    /// Points belonging to run `i` (boundary points shared with neighbors).
    pub fn run_points(&self, i: usize) -> Option<&[Vector2<f64>]> {
        let run = self.corners.runs.get(i)?;
        self.points.get(run.start..=run.end)
    }
}

#[cfg(test)]
mod tests;
