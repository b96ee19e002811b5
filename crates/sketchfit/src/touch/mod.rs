//! Coarse touch-mode state machine.
//!
//! Purpose
//! - Arbitrate between drawing, canvas manipulation and the undo hold from
//!   the number of active pointers, and report one live gesture per mode.
//!
//! Model
//! - The mode is a pure function of the pointer count (`TouchMode::from_count`);
//!   it is derived on demand and never stored separately.
//! - Each mode change ends the previous live gesture (or cancels it when the
//!   triggering pointer was cancelled) and begins the next one in the same
//!   transition. Moves inside a mode update the live gesture.
//! - Events for untracked pointers and duplicate downs are ignored.
//!
//! Code cross-refs: `gesture::GestureRecognizer`, `session::InputSession`

mod machine;
mod types;

pub use machine::TouchStateMachine;
pub use types::{ModePayload, PointerState, TouchGesture, TouchMode, TouchTransition};
