use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::gesture::GesturePhase;
use crate::input::PointerId;

/// Coarse interaction mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchMode {
    Idle,
    Drawing,
    PanZoom,
    Undo,
    AmbiguousMulti,
}

impl TouchMode {
    /// 0 → idle, 1 → drawing, 2 → pan-zoom, 3 → undo, more → ambiguous.
    #[inline]
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => TouchMode::Idle,
            1 => TouchMode::Drawing,
            2 => TouchMode::PanZoom,
            3 => TouchMode::Undo,
            _ => TouchMode::AmbiguousMulti,
        }
    }
}

/// Per-pointer tracking record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub id: PointerId,
    pub start: Vector2<f64>,
    pub position: Vector2<f64>,
    pub start_ms: Millis,
    pub last_ms: Millis,
    pub pressure: f64,
    pub is_primary: bool,
}

impl PointerState {
    #[inline]
    pub fn displacement(&self) -> Vector2<f64> {
        self.position - self.start
    }
}

/// Mode-specific data of the live gesture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModePayload {
    Draw {
        position: Vector2<f64>,
    },
    PanZoom {
        /// Centroid displacement since the mode began.
        translation: Vector2<f64>,
        /// Current spread over initial spread; 1 when the initial spread vanishes.
        scale: f64,
        rotation: f64,
    },
    Undo {
        held_ms: Millis,
    },
    Ambiguous {
        count: usize,
    },
}

/// The single live gesture of the current mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchGesture {
    pub mode: TouchMode,
    pub phase: GesturePhase,
    pub started_ms: Millis,
    pub updated_ms: Millis,
    pub pointers: Vec<PointerId>,
    pub centroid: Vector2<f64>,
    pub start_centroid: Vector2<f64>,
    pub payload: ModePayload,
}

/// Output of `TouchStateMachine::handle`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TouchTransition {
    /// Previous gesture ended (or cancelled) and the next began, atomically.
    ModeChanged {
        from: TouchMode,
        to: TouchMode,
        ended: Option<TouchGesture>,
        began: Option<TouchGesture>,
    },
    /// The live gesture changed without a mode change.
    Updated(TouchGesture),
}

impl TouchTransition {
    pub fn mode_change(&self) -> Option<(TouchMode, TouchMode)> {
        match self {
            TouchTransition::ModeChanged { from, to, .. } => Some((*from, *to)),
            TouchTransition::Updated(_) => None,
        }
    }
}
