//! Normalized pointer input.
//!
//! `PointerEvent` is what the platform dispatch hands us; `PointerSample` is
//! the immutable, transformed capture of one event that the rest of the crate
//! consumes.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::geom::{CoordSpace, TransformContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerPhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, PointerPhase::Up | PointerPhase::Cancel)
    }
}

fn default_pressure() -> f64 {
    0.5
}

fn default_primary() -> bool {
    true
}

/// Platform-neutral pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub id: PointerId,
    pub phase: PointerPhase,
    /// Raw device position.
    pub raw: Vector2<f64>,
    #[serde(default = "default_pressure")]
    pub pressure: f64,
    /// Tilt (x, y) in degrees; zero for touch.
    #[serde(default)]
    pub tilt: Vector2<f64>,
    pub timestamp_ms: Millis,
    #[serde(default = "default_primary")]
    pub is_primary: bool,
    #[serde(default)]
    pub buttons: u8,
}

impl PointerEvent {
    pub fn new(id: u32, phase: PointerPhase, raw: Vector2<f64>, timestamp_ms: Millis) -> Self {
        Self {
            id: PointerId(id),
            phase,
            raw,
            pressure: default_pressure(),
            tilt: Vector2::zeros(),
            timestamp_ms,
            is_primary: id == 0,
            buttons: 0,
        }
    }
    pub fn down(id: u32, x: f64, y: f64, t: Millis) -> Self {
        Self::new(id, PointerPhase::Down, Vector2::new(x, y), t)
    }
    pub fn moved(id: u32, x: f64, y: f64, t: Millis) -> Self {
        Self::new(id, PointerPhase::Move, Vector2::new(x, y), t)
    }
    pub fn up(id: u32, x: f64, y: f64, t: Millis) -> Self {
        Self::new(id, PointerPhase::Up, Vector2::new(x, y), t)
    }
    pub fn cancel(id: u32, x: f64, y: f64, t: Millis) -> Self {
        Self::new(id, PointerPhase::Cancel, Vector2::new(x, y), t)
    }
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    /// Capture this event as a sample under `ctx`.
    pub fn capture(&self, ctx: &TransformContext) -> PointerSample {
        PointerSample::new(
            self.raw,
            ctx.to_space(self.raw, CoordSpace::World),
            self.pressure,
            self.tilt,
            self.timestamp_ms,
        )
    }
}

/// One captured pointer sample. Positions are fixed at capture time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub raw: Vector2<f64>,
    pub world: Vector2<f64>,
    /// Clamped to [0, 1].
    pub pressure: f64,
    pub tilt: Vector2<f64>,
    pub timestamp_ms: Millis,
    /// World units per millisecond; zero until the stroke processor captures it.
    pub velocity: Vector2<f64>,
}

impl PointerSample {
    pub fn new(
        raw: Vector2<f64>,
        world: Vector2<f64>,
        pressure: f64,
        tilt: Vector2<f64>,
        timestamp_ms: Millis,
    ) -> Self {
        let pressure = if pressure.is_finite() {
            pressure.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            raw,
            world,
            pressure,
            tilt,
            timestamp_ms,
            velocity: Vector2::zeros(),
        }
    }
    /// Sample whose raw and world positions coincide (identity transform).
    pub fn at(x: f64, y: f64, timestamp_ms: Millis) -> Self {
        let p = Vector2::new(x, y);
        Self::new(p, p, 0.5, Vector2::zeros(), timestamp_ms)
    }
    #[inline]
    pub(crate) fn with_velocity(mut self, velocity: Vector2<f64>) -> Self {
        self.velocity = velocity;
        self
    }
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// A captured sample tagged with its pointer and phase; the unit consumed by
/// the touch state machine and the gesture recognizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerUpdate {
    pub id: PointerId,
    pub phase: PointerPhase,
    pub sample: PointerSample,
    pub is_primary: bool,
}

impl PointerUpdate {
    pub fn from_event(event: &PointerEvent, ctx: &TransformContext) -> Self {
        Self {
            id: event.id,
            phase: event.phase,
            sample: event.capture(ctx),
            is_primary: event.is_primary,
        }
    }
    #[inline]
    pub fn position(&self) -> Vector2<f64> {
        self.sample.world
    }
    #[inline]
    pub fn time(&self) -> Millis {
        self.sample.timestamp_ms
    }
}
