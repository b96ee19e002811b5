//! Fine-grained gesture recognition over the live pointer set.
//!
//! Purpose
//! - Recognize tap (with multi-tap count), long-press, swipe, pan, zoom,
//!   rotate and the three-finger undo hold, each with its own phase
//!   life-cycle and confidence.
//!
//! Model
//! - One recognizer owns lazily created accumulators: a single-pointer track
//!   (tap/long-press/swipe), a two-pointer baseline (pan/zoom/rotate) and a
//!   hold timer (undo). All are cleared on `reset`.
//! - Thresholds are evaluated against event timestamps; `advance` lets a host
//!   re-evaluate time-based ones without a pointer event.
//! - At most one live gesture per `GestureKind`; different kinds may overlap.
//!   Terminal gestures go to a bounded history.
//!
//! Code cross-refs: `touch::TouchStateMachine`, `session::InputSession`

mod recognizer;
mod types;

use serde::{Deserialize, Serialize};

pub use recognizer::GestureRecognizer;
pub use types::{Gesture, GestureId, GestureKind, GesturePayload, GesturePhase, SwipeDirection};

/// Gesture thresholds. Distances in world units, times in milliseconds,
/// velocities in world units per millisecond.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureCfg {
    pub tap_radius: f64,
    pub tap_timeout_ms: f64,
    /// Max gap between a tap's release and the next tap's press.
    pub multi_tap_window_ms: f64,
    pub long_press_ms: f64,
    pub swipe_min_distance: f64,
    pub swipe_min_velocity: f64,
    /// Centroid displacement.
    pub pan_threshold: f64,
    /// |spread ratio − 1|.
    pub zoom_threshold: f64,
    /// Radians.
    pub rotate_threshold: f64,
    pub undo_hold_ms: f64,
    /// Max drift of any held pointer before the undo hold fails.
    pub undo_move_tolerance: f64,
    /// Terminal gestures retained.
    pub history_len: usize,
}

impl Default for GestureCfg {
    fn default() -> Self {
        Self {
            tap_radius: 10.0,
            tap_timeout_ms: 250.0,
            multi_tap_window_ms: 300.0,
            long_press_ms: 500.0,
            swipe_min_distance: 50.0,
            swipe_min_velocity: 0.3,
            pan_threshold: 10.0,
            zoom_threshold: 0.05,
            rotate_threshold: 0.1,
            undo_hold_ms: 600.0,
            undo_move_tolerance: 40.0,
            history_len: 16,
        }
    }
}

/// Confidence for "measured must exceed threshold": 0.5 at the threshold,
/// 1 at twice the threshold.
pub(crate) fn exceed_confidence(measured: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 1.0;
    }
    (0.5 + 0.5 * (measured - threshold) / threshold).clamp(0.0, 1.0)
}

/// Confidence for "measured must stay within threshold": 1 at zero,
/// 0.5 at the threshold.
pub(crate) fn within_confidence(measured: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return if measured <= 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - 0.5 * measured / threshold).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests;
