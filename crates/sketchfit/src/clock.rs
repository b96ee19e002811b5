//! Injectable monotonic time source.
//!
//! Pointer events carry their own timestamps and the two origins may differ.
//! The session schedules the deferred stroke fit on the clock, and maps clock
//! readings back to event time before re-evaluating gesture holds.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic milliseconds.
pub type Millis = f64;

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Wall-clock backed monotonic time, zeroed at construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_secs_f64() * 1e3
    }
}

/// Hand-driven clock for tests and trace replay.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }
    /// Jump to `t`; earlier values are ignored to keep time monotonic.
    pub fn set(&self, t: Millis) {
        if t > self.now.get() {
            self.now.set(t);
        }
    }
    pub fn advance(&self, dt: Millis) {
        self.now.set(self.now.get() + dt.max(0.0));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}
