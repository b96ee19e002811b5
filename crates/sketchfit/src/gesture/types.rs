use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::input::PointerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GestureId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Tap,
    LongPress,
    Swipe,
    Pan,
    Zoom,
    Rotate,
    Undo,
}

/// possible → began → changed → ended | cancelled | failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl GesturePhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    /// Dominant axis of `delta`; y grows downward (screen convention).
    pub fn from_delta(delta: Vector2<f64>) -> Self {
        if delta.x.abs() >= delta.y.abs() {
            if delta.x >= 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            }
        } else if delta.y >= 0.0 {
            SwipeDirection::Down
        } else {
            SwipeDirection::Up
        }
    }
}

/// Type-specific gesture data, tagged by kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GesturePayload {
    Tap {
        position: Vector2<f64>,
        /// 1 for a single tap, 2 for a double tap, ...
        count: u32,
    },
    LongPress {
        position: Vector2<f64>,
        held_ms: Millis,
    },
    Swipe {
        direction: SwipeDirection,
        /// World units per millisecond.
        velocity: f64,
        delta: Vector2<f64>,
    },
    Pan {
        translation: Vector2<f64>,
        centroid: Vector2<f64>,
    },
    Zoom {
        /// Current spread over initial spread.
        scale: f64,
        focus: Vector2<f64>,
    },
    Rotate {
        /// Signed radians in (−π, π].
        angle: f64,
        focus: Vector2<f64>,
    },
    Undo {
        /// Fraction of the hold completed, in [0, 1].
        progress: f64,
        /// 1 once the hold completes, else 0.
        confirmation: f64,
    },
}

impl GesturePayload {
    pub fn kind(&self) -> GestureKind {
        match self {
            GesturePayload::Tap { .. } => GestureKind::Tap,
            GesturePayload::LongPress { .. } => GestureKind::LongPress,
            GesturePayload::Swipe { .. } => GestureKind::Swipe,
            GesturePayload::Pan { .. } => GestureKind::Pan,
            GesturePayload::Zoom { .. } => GestureKind::Zoom,
            GesturePayload::Rotate { .. } => GestureKind::Rotate,
            GesturePayload::Undo { .. } => GestureKind::Undo,
        }
    }
}

/// One recognized interaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    pub id: GestureId,
    pub phase: GesturePhase,
    pub started_ms: Millis,
    pub updated_ms: Millis,
    pub pointers: Vec<PointerId>,
    /// How far past its threshold the measured quantity lies, in [0, 1].
    pub confidence: f64,
    pub payload: GesturePayload,
}

impl Gesture {
    #[inline]
    pub fn kind(&self) -> GestureKind {
        self.payload.kind()
    }
    #[inline]
    pub fn duration_ms(&self) -> Millis {
        self.updated_ms - self.started_ms
    }
}
