//! Freehand stroke beautification and multi-touch gesture recognition.
//!
//! The pipeline: platform pointer events are captured into world-space samples
//! (`input`), arbitrated by pointer count (`touch`), recognized as gestures
//! (`gesture`), and, while drawing, accumulated into strokes (`stroke`) that
//! are segmented at corners (`corners`) and fitted to lines, arcs and circles
//! (`fit`). `session` wires it together behind a listener interface.
//!
//! API Policy
//! - Single-threaded and event-driven; nothing here spawns threads or timers.
//! - Configuration lives in plain `*Cfg` structs with tuned defaults, all
//!   serde (de)serializable.

pub mod clock;
pub mod corners;
pub mod fit;
pub mod geom;
pub mod gesture;
pub mod input;
pub mod session;
pub mod stroke;
pub mod synth;
pub mod touch;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom::{Affine2, GeomCfg, TransformContext};
pub use nalgebra::{Matrix2 as Mat2, Vector2 as Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, Millis, MonotonicClock};
    pub use crate::corners::{detect, CornerCfg, CornerResult, Run, RunKind};
    pub use crate::fit::{convert, FitCfg, GeometryFit, Primitive, PrimitiveKind};
    pub use crate::geom::{Affine2, Bounds2, CoordSpace, GeomCfg, TransformContext};
    pub use crate::gesture::{
        Gesture, GestureCfg, GestureKind, GesturePayload, GesturePhase, GestureRecognizer,
    };
    pub use crate::input::{PointerEvent, PointerId, PointerPhase, PointerSample, PointerUpdate};
    pub use crate::session::{InputSession, Recorder, SessionCfg, SessionEvent, SessionListener};
    pub use crate::stroke::{ProcessedStroke, StrokeCfg, StrokeId, StrokeProcessor};
    pub use crate::synth::{stroke_events, ReplayToken, ShapeKind, ShapeSpec, SynthCfg};
    pub use crate::touch::{TouchMode, TouchStateMachine, TouchTransition};
    pub use nalgebra::{Matrix2 as Mat2, Vector2 as Vec2};
}
