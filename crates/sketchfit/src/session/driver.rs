use tracing::debug;

use super::{SessionCfg, SessionListener};
use crate::clock::{Clock, Millis};
use crate::fit::convert;
use crate::geom::TransformContext;
use crate::gesture::GestureRecognizer;
use crate::input::{PointerEvent, PointerId, PointerPhase, PointerUpdate};
use crate::stroke::{ProcessedStroke, StrokeError, StrokeId, StrokeProcessor};
use crate::touch::{TouchMode, TouchStateMachine, TouchTransition};

#[derive(Clone, Debug)]
struct PendingFit {
    stroke: ProcessedStroke,
    due_ms: Millis,
}

/// Event-driven input pipeline with an injectable clock.
pub struct InputSession<L: SessionListener, C: Clock> {
    cfg: SessionCfg,
    transform: TransformContext,
    touch: TouchStateMachine,
    gestures: GestureRecognizer,
    strokes: StrokeProcessor,
    drawing_pointer: Option<PointerId>,
    pending: Option<PendingFit>,
    /// Clock time minus event time at the latest event.
    event_offset: Option<Millis>,
    listener: L,
    clock: C,
}

impl<L: SessionListener, C: Clock> InputSession<L, C> {
    pub fn new(cfg: SessionCfg, listener: L, clock: C) -> Self {
        Self {
            cfg,
            transform: TransformContext::default(),
            touch: TouchStateMachine::new(),
            gestures: GestureRecognizer::new(cfg.gesture),
            strokes: StrokeProcessor::new(cfg.stroke),
            drawing_pointer: None,
            pending: None,
            event_offset: None,
            listener,
            clock,
        }
    }

    pub fn cfg(&self) -> &SessionCfg {
        &self.cfg
    }
    pub fn mode(&self) -> TouchMode {
        self.touch.mode()
    }
    pub fn touch(&self) -> &TouchStateMachine {
        &self.touch
    }
    pub fn gestures(&self) -> &GestureRecognizer {
        &self.gestures
    }
    pub fn strokes(&self) -> &StrokeProcessor {
        &self.strokes
    }
    pub fn transform(&self) -> &TransformContext {
        &self.transform
    }
    pub fn listener(&self) -> &L {
        &self.listener
    }
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }
    pub fn into_listener(self) -> L {
        self.listener
    }
    pub fn has_pending_fit(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the transform context. Samples already captured keep their
    /// world positions; later events use the new mapping.
    pub fn set_transform(&mut self, transform: TransformContext) {
        self.transform = transform;
    }

    /// Process one platform pointer event.
    ///
    /// Errors only on internal sequencing bugs between the touch state machine
    /// and the stroke processor.
    pub fn handle(&mut self, event: &PointerEvent) -> Result<(), StrokeError> {
        self.event_offset = Some(self.clock.now_ms() - event.timestamp_ms);
        let update = PointerUpdate::from_event(event, &self.transform);
        let transition = self.touch.handle(&update);
        if let Some((from, to)) = transition.as_ref().and_then(TouchTransition::mode_change) {
            self.listener.mode_changed(from, to);
        }
        if let Some(transition) = &transition {
            self.route_stroke(&update, transition)?;
        }
        for gesture in self.gestures.handle(&update) {
            self.listener.gesture_recognized(&gesture);
        }
        Ok(())
    }

    /// Fire a due deferred fit and re-evaluate time-based gesture thresholds.
    /// Returns the id of the stroke that was fitted, if any.
    ///
    /// Gesture thresholds run on event time: the clock reading is mapped back
    /// through the offset observed at the latest event.
    pub fn poll(&mut self) -> Option<StrokeId> {
        let now = self.clock.now_ms();
        if let Some(offset) = self.event_offset {
            for gesture in self.gestures.advance(now - offset) {
                self.listener.gesture_recognized(&gesture);
            }
        }
        match &self.pending {
            Some(p) if p.due_ms <= now => self.flush_fit(),
            _ => None,
        }
    }

    /// Drop a scheduled fit so it never runs.
    pub fn cancel_pending_fit(&mut self) -> Option<StrokeId> {
        let id = self.pending.take().map(|p| p.stroke.id)?;
        debug!(stroke = id.0, "pending fit cancelled");
        Some(id)
    }

    /// Return to idle: cancel the live touch gesture, every recognized
    /// gesture in flight, the active stroke and any pending fit.
    pub fn reset(&mut self) {
        let transition = self.touch.reset();
        if let Some((from, to)) = transition.as_ref().and_then(TouchTransition::mode_change) {
            self.listener.mode_changed(from, to);
        }
        for gesture in self.gestures.reset() {
            self.listener.gesture_recognized(&gesture);
        }
        self.cancel_stroke();
        self.cancel_pending_fit();
    }

    fn route_stroke(
        &mut self,
        update: &PointerUpdate,
        transition: &TouchTransition,
    ) -> Result<(), StrokeError> {
        match transition {
            TouchTransition::ModeChanged {
                from: TouchMode::Idle,
                to: TouchMode::Drawing,
                ..
            } => {
                self.flush_fit();
                let id = self.strokes.start(update.sample)?;
                self.drawing_pointer = Some(update.id);
                self.listener.drawing_started(id, update.position());
            }
            TouchTransition::ModeChanged {
                from: TouchMode::Drawing,
                to: TouchMode::Idle,
                ..
            } if self.drawing_pointer == Some(update.id) => {
                if update.phase == PointerPhase::Up {
                    self.strokes.add(update.sample)?;
                    let stroke = self.strokes.end()?;
                    self.drawing_pointer = None;
                    self.schedule_fit(stroke);
                } else {
                    self.cancel_stroke();
                }
            }
            TouchTransition::ModeChanged {
                from: TouchMode::Drawing,
                ..
            } => self.cancel_stroke(),
            TouchTransition::Updated(gesture)
                if gesture.mode == TouchMode::Drawing
                    && update.phase == PointerPhase::Move
                    && self.drawing_pointer == Some(update.id) =>
            {
                self.strokes.add(update.sample)?;
                if let Some(stroke) = self.strokes.active() {
                    self.listener.drawing_progress(stroke.id(), stroke.points());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn cancel_stroke(&mut self) {
        self.drawing_pointer = None;
        if let Some(id) = self.strokes.cancel() {
            self.listener.drawing_cancelled(id);
        }
    }

    fn schedule_fit(&mut self, stroke: ProcessedStroke) {
        let delay = self.cfg.fit_delay_ms;
        self.pending = Some(PendingFit {
            due_ms: self.clock.now_ms() + delay.max(0.0),
            stroke,
        });
        if delay <= 0.0 {
            self.flush_fit();
        }
    }

    fn flush_fit(&mut self) -> Option<StrokeId> {
        let PendingFit { stroke, .. } = self.pending.take()?;
        let geometry = convert(&stroke, &self.cfg.fit);
        debug!(stroke = stroke.id.0, primitives = geometry.len(), "stroke fitted");
        self.listener.drawing_ended(&stroke, &geometry);
        Some(stroke.id)
    }
}
