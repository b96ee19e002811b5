use std::collections::{BTreeMap, VecDeque};

use nalgebra::Vector2;
use tracing::{debug, trace};

use super::types::{Gesture, GestureId, GestureKind, GesturePayload, GesturePhase, SwipeDirection};
use super::{exceed_confidence, within_confidence, GestureCfg};
use crate::clock::Millis;
use crate::geom::{centroid, spread, wrap_angle};
use crate::input::{PointerId, PointerPhase, PointerUpdate};

#[derive(Clone, Copy, Debug)]
struct Track {
    start: Vector2<f64>,
    position: Vector2<f64>,
    start_ms: Millis,
}

impl Track {
    #[inline]
    fn displacement(&self) -> Vector2<f64> {
        self.position - self.start
    }
}

/// Accumulator for the lone pointer of a 0 → 1 press.
#[derive(Clone, Copy, Debug)]
struct SingleTrack {
    id: PointerId,
    left_tap_radius: bool,
    long_pressed: bool,
}

/// Baseline captured when exactly two pointers become active.
#[derive(Clone, Copy, Debug)]
struct PairTrack {
    ids: [PointerId; 2],
    centroid: Vector2<f64>,
    spread: f64,
    angle: f64,
}

#[derive(Clone, Copy, Debug)]
struct HoldTrack {
    start_ms: Millis,
    settled: bool,
}

#[derive(Clone, Copy, Debug)]
struct TapRecord {
    ended_ms: Millis,
    position: Vector2<f64>,
    count: u32,
}

/// Recognizes fine-grained gestures from pointer updates.
#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    cfg: GestureCfg,
    tracks: BTreeMap<PointerId, Track>,
    single: Option<SingleTrack>,
    pair: Option<PairTrack>,
    hold: Option<HoldTrack>,
    last_tap: Option<TapRecord>,
    live: BTreeMap<GestureKind, Gesture>,
    history: VecDeque<Gesture>,
    next_id: u64,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureCfg::default())
    }
}

impl GestureRecognizer {
    pub fn new(cfg: GestureCfg) -> Self {
        Self {
            cfg,
            tracks: BTreeMap::new(),
            single: None,
            pair: None,
            hold: None,
            last_tap: None,
            live: BTreeMap::new(),
            history: VecDeque::with_capacity(cfg.history_len),
            next_id: 0,
        }
    }

    pub fn cfg(&self) -> &GestureCfg {
        &self.cfg
    }
    pub fn live(&self, kind: GestureKind) -> Option<&Gesture> {
        self.live.get(&kind)
    }
    pub fn live_gestures(&self) -> impl Iterator<Item = &Gesture> {
        self.live.values()
    }
    /// Most recent terminal gestures, oldest first.
    pub fn history(&self) -> &VecDeque<Gesture> {
        &self.history
    }
    #[inline]
    pub fn pointer_count(&self) -> usize {
        self.tracks.len()
    }

    /// Feed one pointer update; returns every gesture whose phase changed.
    pub fn handle(&mut self, update: &PointerUpdate) -> Vec<Gesture> {
        let mut out = Vec::new();
        let now = update.time();
        match update.phase {
            PointerPhase::Down => {
                if self.tracks.contains_key(&update.id) {
                    return out;
                }
                let before = self.tracks.len();
                self.tracks.insert(
                    update.id,
                    Track {
                        start: update.position(),
                        position: update.position(),
                        start_ms: now,
                    },
                );
                self.on_count_change(before, now, false, &mut out);
            }
            PointerPhase::Move | PointerPhase::Up | PointerPhase::Cancel => {
                let Some(track) = self.tracks.get_mut(&update.id) else {
                    return out;
                };
                track.position = update.position();
                self.evaluate(now, &mut out);
                if update.phase.is_terminal() {
                    self.release(update.id, now, update.phase == PointerPhase::Cancel, &mut out);
                }
            }
        }
        out
    }

    /// Re-evaluate time-based thresholds (long-press, undo hold) at `now`.
    pub fn advance(&mut self, now: Millis) -> Vec<Gesture> {
        let mut out = Vec::new();
        self.evaluate(now, &mut out);
        out
    }

    /// Cancel every live gesture and clear all accumulators.
    pub fn reset(&mut self) -> Vec<Gesture> {
        let now = self.live.values().map(|g| g.updated_ms).fold(0.0, f64::max);
        let kinds: Vec<GestureKind> = self.live.keys().copied().collect();
        let mut out: Vec<Gesture> = kinds
            .into_iter()
            .filter_map(|k| self.finish(k, GesturePhase::Cancelled, now, None))
            .collect();
        out.sort_by_key(|g| g.id);
        self.tracks.clear();
        self.single = None;
        self.pair = None;
        self.hold = None;
        self.last_tap = None;
        self.history.clear();
        out
    }

    fn on_count_change(
        &mut self,
        before: usize,
        now: Millis,
        cancelled: bool,
        out: &mut Vec<Gesture>,
    ) {
        let after = self.tracks.len();
        if before == after {
            return;
        }
        if before == 1
            && self.single.take().is_some()
            && self.live.contains_key(&GestureKind::LongPress)
        {
            let phase = if after == 0 && !cancelled {
                GesturePhase::Ended
            } else {
                GesturePhase::Cancelled
            };
            out.extend(self.finish(GestureKind::LongPress, phase, now, None));
        }
        if before == 2 {
            self.pair = None;
            let phase = if cancelled || after > 2 {
                GesturePhase::Cancelled
            } else {
                GesturePhase::Ended
            };
            for kind in [GestureKind::Pan, GestureKind::Zoom, GestureKind::Rotate] {
                out.extend(self.finish(kind, phase, now, None));
            }
        }
        if before >= 3 && after < 3 {
            self.hold = None;
            let phase = if cancelled {
                GesturePhase::Cancelled
            } else {
                GesturePhase::Failed
            };
            out.extend(self.finish(GestureKind::Undo, phase, now, None));
        }

        match after {
            1 if before == 0 => {
                self.single = self.tracks.keys().next().map(|&id| SingleTrack {
                    id,
                    left_tap_radius: false,
                    long_pressed: false,
                });
            }
            2 => {
                let ids: Vec<PointerId> = self.tracks.keys().copied().collect();
                let positions = self.positions();
                if let (Some(c), [a, b]) = (centroid(&positions), ids.as_slice()) {
                    self.pair = Some(PairTrack {
                        ids: [*a, *b],
                        centroid: c,
                        spread: spread(&positions, c),
                        angle: pair_angle(positions[0], positions[1]),
                    });
                }
            }
            n if n >= 3 && before < 3 => {
                self.hold = Some(HoldTrack {
                    start_ms: now,
                    settled: false,
                });
                let pointers = self.tracks.keys().copied().collect();
                let g = self.begin(
                    GesturePayload::Undo {
                        progress: 0.0,
                        confirmation: 0.0,
                    },
                    pointers,
                    now,
                    0.0,
                );
                out.push(g);
            }
            _ => {}
        }
    }

    fn evaluate(&mut self, now: Millis, out: &mut Vec<Gesture>) {
        match self.tracks.len() {
            1 => self.evaluate_single(now, out),
            2 => self.evaluate_pair(now, out),
            n if n >= 3 => self.evaluate_hold(now, out),
            _ => {}
        }
    }

    fn evaluate_single(&mut self, now: Millis, out: &mut Vec<Gesture>) {
        let Some(mut single) = self.single else {
            return;
        };
        let Some(track) = self.tracks.get(&single.id).copied() else {
            return;
        };
        let drift = track.displacement().norm();
        let held = now - track.start_ms;
        if drift > self.cfg.tap_radius {
            single.left_tap_radius = true;
        }
        let payload = GesturePayload::LongPress {
            position: track.position,
            held_ms: held,
        };
        if self.live.contains_key(&GestureKind::LongPress) {
            if single.left_tap_radius {
                let ended = self.finish(GestureKind::LongPress, GesturePhase::Ended, now, Some(payload));
                out.extend(ended);
            } else {
                let conf = exceed_confidence(held, self.cfg.long_press_ms);
                out.extend(self.change(GestureKind::LongPress, payload, now, conf));
            }
        } else if !single.long_pressed && !single.left_tap_radius && held >= self.cfg.long_press_ms {
            single.long_pressed = true;
            let conf = exceed_confidence(held, self.cfg.long_press_ms);
            let mut began = self.begin(payload, vec![single.id], track.start_ms, conf);
            began.updated_ms = now;
            if let Some(g) = self.live.get_mut(&GestureKind::LongPress) {
                g.updated_ms = now;
            }
            out.push(began);
        }
        self.single = Some(single);
    }

    fn evaluate_pair(&mut self, now: Millis, out: &mut Vec<Gesture>) {
        let Some(pair) = self.pair else {
            return;
        };
        let (Some(a), Some(b)) = (
            self.tracks.get(&pair.ids[0]),
            self.tracks.get(&pair.ids[1]),
        ) else {
            return;
        };
        let (pa, pb) = (a.position, b.position);
        let c = (pa + pb) * 0.5;
        let translation = c - pair.centroid;
        let scale = if pair.spread > 1e-9 {
            spread(&[pa, pb], c) / pair.spread
        } else {
            1.0
        };
        let angle = wrap_angle(pair_angle(pa, pb) - pair.angle);
        let pointers = pair.ids.to_vec();

        let measured = [
            (
                translation.norm(),
                self.cfg.pan_threshold,
                GesturePayload::Pan {
                    translation,
                    centroid: c,
                },
            ),
            (
                (scale - 1.0).abs(),
                self.cfg.zoom_threshold,
                GesturePayload::Zoom { scale, focus: c },
            ),
            (
                angle.abs(),
                self.cfg.rotate_threshold,
                GesturePayload::Rotate { angle, focus: c },
            ),
        ];
        for (value, threshold, payload) in measured {
            let conf = exceed_confidence(value, threshold);
            if self.live.contains_key(&payload.kind()) {
                out.extend(self.change(payload.kind(), payload, now, conf));
            } else if value >= threshold {
                out.push(self.begin(payload, pointers.clone(), now, conf));
            }
        }
    }

    fn evaluate_hold(&mut self, now: Millis, out: &mut Vec<Gesture>) {
        let Some(mut hold) = self.hold else {
            return;
        };
        if hold.settled || !self.live.contains_key(&GestureKind::Undo) {
            return;
        }
        let drift = self
            .tracks
            .values()
            .map(|t| t.displacement().norm())
            .fold(0.0, f64::max);
        let progress = ((now - hold.start_ms) / self.cfg.undo_hold_ms.max(1e-9)).clamp(0.0, 1.0);
        if drift > self.cfg.undo_move_tolerance {
            hold.settled = true;
            let payload = GesturePayload::Undo {
                progress,
                confirmation: 0.0,
            };
            debug!(drift, "undo hold failed: pointers moved");
            out.extend(self.finish(GestureKind::Undo, GesturePhase::Failed, now, Some(payload)));
        } else if progress >= 1.0 {
            hold.settled = true;
            let payload = GesturePayload::Undo {
                progress: 1.0,
                confirmation: 1.0,
            };
            out.extend(self.finish(GestureKind::Undo, GesturePhase::Ended, now, Some(payload)));
        } else {
            let payload = GesturePayload::Undo {
                progress,
                confirmation: 0.0,
            };
            out.extend(self.change(GestureKind::Undo, payload, now, progress));
        }
        self.hold = Some(hold);
    }

    /// Handle the release of `id`, still present in `tracks`.
    fn release(&mut self, id: PointerId, now: Millis, cancelled: bool, out: &mut Vec<Gesture>) {
        let lone = self.tracks.len() == 1;
        if let (true, false, Some(single), Some(track)) =
            (lone, cancelled, self.single, self.tracks.get(&id).copied())
        {
            if single.id == id && !single.long_pressed {
                out.extend(self.discrete(track, id, now));
            }
        }
        let before = self.tracks.len();
        self.tracks.remove(&id);
        self.on_count_change(before, now, cancelled, out);
    }

    /// Tap or swipe for a lone pointer lifted at `now`.
    fn discrete(&mut self, track: Track, id: PointerId, now: Millis) -> Option<Gesture> {
        let delta = track.displacement();
        let dist = delta.norm();
        let duration = (now - track.start_ms).max(0.0);
        if dist <= self.cfg.tap_radius && duration <= self.cfg.tap_timeout_ms {
            let count = match self.last_tap {
                Some(prev)
                    if track.start_ms - prev.ended_ms <= self.cfg.multi_tap_window_ms
                        && (track.position - prev.position).norm() <= 2.0 * self.cfg.tap_radius =>
                {
                    prev.count + 1
                }
                _ => 1,
            };
            self.last_tap = Some(TapRecord {
                ended_ms: now,
                position: track.position,
                count,
            });
            let conf = within_confidence(dist, self.cfg.tap_radius)
                .min(within_confidence(duration, self.cfg.tap_timeout_ms));
            let payload = GesturePayload::Tap {
                position: track.position,
                count,
            };
            return Some(self.instant(payload, vec![id], track.start_ms, now, conf));
        }
        if dist >= self.cfg.swipe_min_distance {
            let velocity = if duration > 0.0 {
                dist / duration
            } else {
                f64::INFINITY
            };
            if velocity >= self.cfg.swipe_min_velocity {
                let conf = exceed_confidence(dist, self.cfg.swipe_min_distance)
                    .min(exceed_confidence(velocity, self.cfg.swipe_min_velocity));
                let payload = GesturePayload::Swipe {
                    direction: SwipeDirection::from_delta(delta),
                    velocity,
                    delta,
                };
                return Some(self.instant(payload, vec![id], track.start_ms, now, conf));
            }
            trace!(velocity, "release too slow for a swipe");
        }
        None
    }

    fn allocate_id(&mut self) -> GestureId {
        let id = GestureId(self.next_id);
        self.next_id += 1;
        id
    }

    fn begin(
        &mut self,
        payload: GesturePayload,
        pointers: Vec<PointerId>,
        started_ms: Millis,
        confidence: f64,
    ) -> Gesture {
        let gesture = Gesture {
            id: self.allocate_id(),
            phase: GesturePhase::Began,
            started_ms,
            updated_ms: started_ms,
            pointers,
            confidence,
            payload,
        };
        debug!(kind = ?gesture.kind(), id = gesture.id.0, "gesture began");
        self.live.insert(gesture.kind(), gesture.clone());
        gesture
    }

    fn change(
        &mut self,
        kind: GestureKind,
        payload: GesturePayload,
        now: Millis,
        confidence: f64,
    ) -> Option<Gesture> {
        let g = self.live.get_mut(&kind)?;
        g.phase = GesturePhase::Changed;
        g.updated_ms = now;
        g.payload = payload;
        g.confidence = confidence;
        Some(g.clone())
    }

    fn finish(
        &mut self,
        kind: GestureKind,
        phase: GesturePhase,
        now: Millis,
        payload: Option<GesturePayload>,
    ) -> Option<Gesture> {
        let mut g = self.live.remove(&kind)?;
        g.phase = phase;
        g.updated_ms = g.updated_ms.max(now);
        if let Some(p) = payload {
            g.payload = p;
        }
        debug!(?kind, id = g.id.0, ?phase, "gesture finished");
        self.remember(g.clone());
        Some(g)
    }

    /// A gesture recognized only at release; reported directly as ended.
    fn instant(
        &mut self,
        payload: GesturePayload,
        pointers: Vec<PointerId>,
        started_ms: Millis,
        now: Millis,
        confidence: f64,
    ) -> Gesture {
        let g = Gesture {
            id: self.allocate_id(),
            phase: GesturePhase::Ended,
            started_ms,
            updated_ms: now,
            pointers,
            confidence,
            payload,
        };
        debug!(kind = ?g.kind(), id = g.id.0, "gesture recognized");
        self.remember(g.clone());
        g
    }

    fn remember(&mut self, g: Gesture) {
        if self.cfg.history_len == 0 {
            return;
        }
        while self.history.len() >= self.cfg.history_len {
            self.history.pop_front();
        }
        self.history.push_back(g);
    }

    fn positions(&self) -> Vec<Vector2<f64>> {
        self.tracks.values().map(|t| t.position).collect()
    }
}

fn pair_angle(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    let d = b - a;
    d.y.atan2(d.x)
}
