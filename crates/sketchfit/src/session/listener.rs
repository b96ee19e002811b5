use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::fit::GeometryFit;
use crate::gesture::Gesture;
use crate::stroke::{ProcessedStroke, StrokeId, StrokeQuality};
use crate::touch::TouchMode;

/// Callbacks invoked synchronously by `InputSession`. Every method defaults to
/// a no-op.
pub trait SessionListener {
    fn drawing_started(&mut self, _stroke: StrokeId, _position: Vector2<f64>) {}
    /// Display path so far, after realtime smoothing.
    fn drawing_progress(&mut self, _stroke: StrokeId, _points: &[Vector2<f64>]) {}
    /// Fired when the deferred fit runs.
    fn drawing_ended(&mut self, _stroke: &ProcessedStroke, _geometry: &[GeometryFit]) {}
    fn drawing_cancelled(&mut self, _stroke: StrokeId) {}
    fn mode_changed(&mut self, _from: TouchMode, _to: TouchMode) {}
    fn gesture_recognized(&mut self, _gesture: &Gesture) {}
}

impl SessionListener for () {}

impl<L: SessionListener + ?Sized> SessionListener for &mut L {
    fn drawing_started(&mut self, stroke: StrokeId, position: Vector2<f64>) {
        (**self).drawing_started(stroke, position)
    }
    fn drawing_progress(&mut self, stroke: StrokeId, points: &[Vector2<f64>]) {
        (**self).drawing_progress(stroke, points)
    }
    fn drawing_ended(&mut self, stroke: &ProcessedStroke, geometry: &[GeometryFit]) {
        (**self).drawing_ended(stroke, geometry)
    }
    fn drawing_cancelled(&mut self, stroke: StrokeId) {
        (**self).drawing_cancelled(stroke)
    }
    fn mode_changed(&mut self, from: TouchMode, to: TouchMode) {
        (**self).mode_changed(from, to)
    }
    fn gesture_recognized(&mut self, gesture: &Gesture) {
        (**self).gesture_recognized(gesture)
    }
}

/// Serializable record of one listener callback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    DrawingStarted {
        stroke: StrokeId,
        position: Vector2<f64>,
    },
    DrawingProgress {
        stroke: StrokeId,
        points: usize,
    },
    DrawingEnded {
        stroke: StrokeId,
        points: Vec<Vector2<f64>>,
        quality: StrokeQuality,
        geometry: Vec<GeometryFit>,
    },
    DrawingCancelled {
        stroke: StrokeId,
    },
    ModeChanged {
        from: TouchMode,
        to: TouchMode,
    },
    GestureRecognized {
        gesture: Gesture,
    },
}

/// Listener that keeps every callback as a `SessionEvent`.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub events: Vec<SessionEvent>,
    /// Progress callbacks fire per move; off by default.
    pub record_progress: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_progress() -> Self {
        Self {
            events: Vec::new(),
            record_progress: true,
        }
    }
    pub fn modes(&self) -> Vec<(TouchMode, TouchMode)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::ModeChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
    pub fn gestures(&self) -> impl Iterator<Item = &Gesture> {
        self.events.iter().filter_map(|e| match e {
            SessionEvent::GestureRecognized { gesture } => Some(gesture),
            _ => None,
        })
    }
    /// Geometry of every fitted stroke, in order.
    pub fn geometry(&self) -> impl Iterator<Item = &[GeometryFit]> {
        self.events.iter().filter_map(|e| match e {
            SessionEvent::DrawingEnded { geometry, .. } => Some(geometry.as_slice()),
            _ => None,
        })
    }
}

impl SessionListener for Recorder {
    fn drawing_started(&mut self, stroke: StrokeId, position: Vector2<f64>) {
        self.events.push(SessionEvent::DrawingStarted { stroke, position });
    }
    fn drawing_progress(&mut self, stroke: StrokeId, points: &[Vector2<f64>]) {
        if self.record_progress {
            self.events.push(SessionEvent::DrawingProgress {
                stroke,
                points: points.len(),
            });
        }
    }
    fn drawing_ended(&mut self, stroke: &ProcessedStroke, geometry: &[GeometryFit]) {
        self.events.push(SessionEvent::DrawingEnded {
            stroke: stroke.id,
            points: stroke.points.clone(),
            quality: stroke.quality,
            geometry: geometry.to_vec(),
        });
    }
    fn drawing_cancelled(&mut self, stroke: StrokeId) {
        self.events.push(SessionEvent::DrawingCancelled { stroke });
    }
    fn mode_changed(&mut self, from: TouchMode, to: TouchMode) {
        self.events.push(SessionEvent::ModeChanged { from, to });
    }
    fn gesture_recognized(&mut self, gesture: &Gesture) {
        self.events.push(SessionEvent::GestureRecognized {
            gesture: gesture.clone(),
        });
    }
}
