use std::collections::BTreeMap;

use nalgebra::Vector2;
use tracing::debug;

use super::types::{ModePayload, PointerState, TouchGesture, TouchMode, TouchTransition};
use crate::clock::Millis;
use crate::geom::{centroid, spread, wrap_angle};
use crate::gesture::GesturePhase;
use crate::input::{PointerId, PointerPhase, PointerUpdate};

/// Pan-zoom reference captured when the mode begins.
#[derive(Clone, Copy, Debug)]
struct PairBaseline {
    spread: f64,
    angle: f64,
}

#[derive(Clone, Debug, Default)]
pub struct TouchStateMachine {
    pointers: BTreeMap<PointerId, PointerState>,
    live: Option<TouchGesture>,
    baseline: Option<PairBaseline>,
}

impl TouchStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode, derived from the pointer count.
    #[inline]
    pub fn mode(&self) -> TouchMode {
        TouchMode::from_count(self.pointers.len())
    }
    #[inline]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }
    pub fn pointer(&self, id: PointerId) -> Option<&PointerState> {
        self.pointers.get(&id)
    }
    pub fn pointers(&self) -> impl Iterator<Item = &PointerState> {
        self.pointers.values()
    }
    pub fn live(&self) -> Option<&TouchGesture> {
        self.live.as_ref()
    }

    /// Feed one pointer update. Returns `None` for ignored events.
    pub fn handle(&mut self, update: &PointerUpdate) -> Option<TouchTransition> {
        let now = update.time();
        match update.phase {
            PointerPhase::Down => {
                if self.pointers.contains_key(&update.id) {
                    return None;
                }
                let from = self.mode();
                self.refresh(now);
                self.pointers.insert(
                    update.id,
                    PointerState {
                        id: update.id,
                        start: update.position(),
                        position: update.position(),
                        start_ms: now,
                        last_ms: now,
                        pressure: update.sample.pressure,
                        is_primary: update.is_primary,
                    },
                );
                Some(self.transition(from, now, GesturePhase::Ended))
            }
            PointerPhase::Move => {
                self.track(update)?;
                self.refresh(now);
                let live = self.live.as_mut()?;
                live.phase = GesturePhase::Changed;
                Some(TouchTransition::Updated(live.clone()))
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                self.track(update)?;
                let from = self.mode();
                self.refresh(now);
                self.pointers.remove(&update.id);
                let terminal = if update.phase == PointerPhase::Cancel {
                    GesturePhase::Cancelled
                } else {
                    GesturePhase::Ended
                };
                Some(self.transition(from, now, terminal))
            }
        }
    }

    /// Drop every pointer and cancel the live gesture.
    pub fn reset(&mut self) -> Option<TouchTransition> {
        if self.pointers.is_empty() && self.live.is_none() {
            return None;
        }
        let from = self.mode();
        self.pointers.clear();
        self.baseline = None;
        let ended = self.live.take().map(|mut g| {
            g.phase = GesturePhase::Cancelled;
            g
        });
        Some(TouchTransition::ModeChanged {
            from,
            to: TouchMode::Idle,
            ended,
            began: None,
        })
    }

    fn track(&mut self, update: &PointerUpdate) -> Option<()> {
        let state = self.pointers.get_mut(&update.id)?;
        state.position = update.position();
        state.last_ms = update.time();
        state.pressure = update.sample.pressure;
        Some(())
    }

    /// Emit the transition after the pointer set changed. Counts above three
    /// all map to the ambiguous mode, so a change in count alone is only an
    /// update.
    fn transition(&mut self, from: TouchMode, now: Millis, terminal: GesturePhase) -> TouchTransition {
        let to = self.mode();
        if from == to {
            if let Some(live) = self.live.as_mut() {
                live.pointers = self.pointers.keys().copied().collect();
                live.phase = GesturePhase::Changed;
            }
            self.refresh(now);
            if let Some(live) = self.live.as_ref() {
                return TouchTransition::Updated(live.clone());
            }
        }
        let ended = self.live.take().map(|mut g| {
            g.phase = terminal;
            g
        });
        let began = self.begin(to, now);
        debug!(?from, ?to, "touch mode changed");
        TouchTransition::ModeChanged {
            from,
            to,
            ended,
            began,
        }
    }

    fn begin(&mut self, mode: TouchMode, now: Millis) -> Option<TouchGesture> {
        self.baseline = None;
        if mode == TouchMode::Idle {
            return None;
        }
        let positions = self.positions();
        let c = centroid(&positions).unwrap_or_else(Vector2::zeros);
        if mode == TouchMode::PanZoom {
            self.baseline = Some(PairBaseline {
                spread: spread(&positions, c),
                angle: pair_angle(&positions),
            });
        }
        let mut gesture = TouchGesture {
            mode,
            phase: GesturePhase::Began,
            started_ms: now,
            updated_ms: now,
            pointers: self.pointers.keys().copied().collect(),
            centroid: c,
            start_centroid: c,
            payload: ModePayload::Ambiguous { count: 0 },
        };
        gesture.payload = self.payload(&gesture, &positions, now);
        self.live = Some(gesture.clone());
        Some(gesture)
    }

    /// Recompute centroid and payload of the live gesture from current positions.
    fn refresh(&mut self, now: Millis) {
        let positions = self.positions();
        let Some(mut live) = self.live.take() else {
            return;
        };
        if let Some(c) = centroid(&positions) {
            live.centroid = c;
        }
        live.updated_ms = now;
        live.payload = self.payload(&live, &positions, now);
        self.live = Some(live);
    }

    fn payload(&self, gesture: &TouchGesture, positions: &[Vector2<f64>], now: Millis) -> ModePayload {
        match gesture.mode {
            TouchMode::Drawing => ModePayload::Draw {
                position: positions.first().copied().unwrap_or(gesture.centroid),
            },
            TouchMode::PanZoom => {
                let (scale, rotation) = match (self.baseline, positions.len()) {
                    (Some(base), 2) => {
                        let s = spread(positions, gesture.centroid);
                        let scale = if base.spread > 1e-9 { s / base.spread } else { 1.0 };
                        (scale, wrap_angle(pair_angle(positions) - base.angle))
                    }
                    _ => (1.0, 0.0),
                };
                ModePayload::PanZoom {
                    translation: gesture.centroid - gesture.start_centroid,
                    scale,
                    rotation,
                }
            }
            TouchMode::Undo => ModePayload::Undo {
                held_ms: now - gesture.started_ms,
            },
            TouchMode::AmbiguousMulti | TouchMode::Idle => ModePayload::Ambiguous {
                count: positions.len(),
            },
        }
    }

    fn positions(&self) -> Vec<Vector2<f64>> {
        self.pointers.values().map(|p| p.position).collect()
    }
}

fn pair_angle(positions: &[Vector2<f64>]) -> f64 {
    match positions {
        [a, b, ..] => {
            let d = b - a;
            d.y.atan2(d.x)
        }
        _ => 0.0,
    }
}
