//! Corner candidate threshold policies.
//!
//! The adaptive rule is empirically tuned; callers needing a different
//! heuristic implement `ThresholdPolicy` and use `detect_with_policy`.

use crate::geom::{median, quantile};

pub trait ThresholdPolicy {
    /// Threshold for the smoothed `curvature` series; `floor` is the configured
    /// fixed threshold.
    fn threshold(&self, curvature: &[f64], floor: f64) -> f64;
}

/// Always the configured value.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedThreshold;

impl ThresholdPolicy for FixedThreshold {
    fn threshold(&self, _curvature: &[f64], floor: f64) -> f64 {
        floor
    }
}

/// `max(median + iqr_gain·(Q75 − median), peak_fraction·max, floor)`.
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveThreshold {
    pub iqr_gain: f64,
    pub peak_fraction: f64,
}

impl Default for AdaptiveThreshold {
    fn default() -> Self {
        Self {
            iqr_gain: 2.0,
            peak_fraction: 0.30,
        }
    }
}

impl ThresholdPolicy for AdaptiveThreshold {
    fn threshold(&self, curvature: &[f64], floor: f64) -> f64 {
        if curvature.is_empty() {
            return floor;
        }
        let med = median(curvature);
        let q75 = quantile(curvature, 0.75);
        let peak = curvature.iter().copied().fold(0.0, f64::max);
        (med + self.iqr_gain * (q75 - med))
            .max(self.peak_fraction * peak)
            .max(floor)
    }
}
