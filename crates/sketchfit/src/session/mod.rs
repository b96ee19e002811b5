//! Orchestration-facing facade over the input pipeline.
//!
//! Purpose
//! - Route platform pointer events through transform capture, the touch
//!   state machine, the gesture recognizer and the stroke processor, and
//!   report the outcome through one `SessionListener`.
//!
//! Model
//! - A drawing stroke starts only on an idle → drawing transition and is
//!   cancelled as soon as a second pointer arrives.
//! - Stroke end schedules a deferred fit `fit_delay_ms` later on the injected
//!   `Clock`; `poll` fires it when due. Starting a new stroke flushes a pending
//!   fit first; `cancel_pending_fit` and `reset` suppress it.
//! - Everything runs synchronously inside `handle`/`poll`; there are no
//!   background timers.
//!
//! Code cross-refs: `touch::TouchStateMachine`, `gesture::GestureRecognizer`,
//! `stroke::StrokeProcessor`, `fit::convert`

mod driver;
mod listener;

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::fit::FitCfg;
use crate::gesture::GestureCfg;
use crate::stroke::StrokeCfg;

pub use driver::InputSession;
pub use listener::{Recorder, SessionEvent, SessionListener};

/// Full pipeline configuration; what the CLI loads from JSON.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionCfg {
    pub stroke: StrokeCfg,
    pub fit: FitCfg,
    pub gesture: GestureCfg,
    /// Delay between stroke end and fitting; zero fits immediately.
    pub fit_delay_ms: Millis,
}

impl Default for SessionCfg {
    fn default() -> Self {
        Self {
            stroke: StrokeCfg::default(),
            fit: FitCfg::default(),
            gesture: GestureCfg::default(),
            fit_delay_ms: 50.0,
        }
    }
}
