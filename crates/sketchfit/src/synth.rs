//! Synthetic strokes with replay tokens.
//!
//! Purpose
//! - Generate reproducible pointer-event streams for lines, arcs, circles and
//!   L-shaped corners, optionally jittered, for benches, the CLI and
//!   noise-robustness tests.
//!
//! Model
//! - The ideal path is sampled at a fixed arc-length spacing; each sample is
//!   displaced by uniform jitter in `[-jitter, jitter]` per axis and stamped at
//!   a fixed frame interval.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG,
//!   so stroke `index` of a batch can be regenerated on its own.

use std::f64::consts::TAU;

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::input::{PointerEvent, PointerPhase};

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64) -> Self {
        Self { seed, index: 0 }
    }
    /// Token for the next stroke of the same batch.
    pub fn next(self) -> Self {
        Self {
            index: self.index.wrapping_add(1),
            ..self
        }
    }
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Ideal stroke geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeSpec {
    Line {
        from: Vector2<f64>,
        to: Vector2<f64>,
    },
    Arc {
        center: Vector2<f64>,
        radius: f64,
        start_angle: f64,
        /// Signed; positive is counter-clockwise.
        sweep: f64,
    },
    /// Full turn starting and ending at `start_angle`.
    Circle {
        center: Vector2<f64>,
        radius: f64,
        start_angle: f64,
    },
    /// Two straight legs meeting at `corner`.
    Corner {
        from: Vector2<f64>,
        corner: Vector2<f64>,
        to: Vector2<f64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Arc,
    Circle,
    Corner,
}

impl ShapeKind {
    /// A canvas-sized instance of this shape.
    pub fn preset(self) -> ShapeSpec {
        match self {
            ShapeKind::Line => ShapeSpec::Line {
                from: Vector2::new(20.0, 40.0),
                to: Vector2::new(220.0, 140.0),
            },
            ShapeKind::Arc => ShapeSpec::Arc {
                center: Vector2::new(120.0, 120.0),
                radius: 80.0,
                start_angle: 0.0,
                sweep: 0.6 * std::f64::consts::PI,
            },
            ShapeKind::Circle => ShapeSpec::Circle {
                center: Vector2::new(120.0, 120.0),
                radius: 60.0,
                start_angle: 0.0,
            },
            ShapeKind::Corner => ShapeSpec::Corner {
                from: Vector2::new(20.0, 20.0),
                corner: Vector2::new(120.0, 20.0),
                to: Vector2::new(120.0, 120.0),
            },
        }
    }
}

impl ShapeSpec {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeSpec::Line { .. } => ShapeKind::Line,
            ShapeSpec::Arc { .. } => ShapeKind::Arc,
            ShapeSpec::Circle { .. } => ShapeKind::Circle,
            ShapeSpec::Corner { .. } => ShapeKind::Corner,
        }
    }

    /// Noise-free points at roughly `spacing` arc length, endpoints included.
    pub fn points(&self, spacing: f64) -> Vec<Vector2<f64>> {
        let spacing = spacing.max(1e-6);
        match *self {
            ShapeSpec::Line { from, to } => segment(from, to, spacing, true),
            ShapeSpec::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => arc(center, radius, start_angle, sweep, spacing),
            ShapeSpec::Circle {
                center,
                radius,
                start_angle,
            } => arc(center, radius, start_angle, TAU, spacing),
            ShapeSpec::Corner { from, corner, to } => {
                let mut pts = segment(from, corner, spacing, false);
                pts.extend(segment(corner, to, spacing, true));
                pts
            }
        }
    }
}

fn steps(length: f64, spacing: f64) -> usize {
    ((length / spacing).round() as usize).max(1)
}

fn segment(a: Vector2<f64>, b: Vector2<f64>, spacing: f64, include_end: bool) -> Vec<Vector2<f64>> {
    let n = steps((b - a).norm(), spacing);
    let last = if include_end { n } else { n - 1 };
    (0..=last).map(|i| a.lerp(&b, i as f64 / n as f64)).collect()
}

fn arc(center: Vector2<f64>, radius: f64, start: f64, sweep: f64, spacing: f64) -> Vec<Vector2<f64>> {
    let n = steps((radius * sweep).abs(), spacing);
    (0..=n)
        .map(|i| {
            let th = start + sweep * i as f64 / n as f64;
            center + Vector2::new(th.cos(), th.sin()) * radius
        })
        .collect()
}

/// Event-stream parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthCfg {
    /// Arc length between consecutive samples.
    pub spacing: f64,
    /// Time between consecutive samples.
    pub frame_ms: Millis,
    /// Per-axis uniform displacement bound.
    pub jitter: f64,
    pub pointer: u32,
    pub start_ms: Millis,
}

impl Default for SynthCfg {
    fn default() -> Self {
        Self {
            spacing: 2.0,
            frame_ms: 16.0,
            jitter: 0.0,
            pointer: 0,
            start_ms: 0.0,
        }
    }
}

/// Down, moves and up for one pointer tracing `shape`.
pub fn stroke_events(shape: &ShapeSpec, cfg: &SynthCfg, tok: ReplayToken) -> Vec<PointerEvent> {
    let mut rng = tok.to_std_rng();
    let jitter = cfg.jitter.max(0.0);
    let pts = shape.points(cfg.spacing);
    let last = pts.len().saturating_sub(1);
    pts.into_iter()
        .enumerate()
        .map(|(i, p)| {
            let u = Vector2::new(rng.gen::<f64>(), rng.gen::<f64>());
            let noise = (u * 2.0 - Vector2::repeat(1.0)) * jitter;
            let phase = match i {
                0 => PointerPhase::Down,
                i if i == last => PointerPhase::Up,
                _ => PointerPhase::Move,
            };
            let t = cfg.start_ms + cfg.frame_ms * i as f64;
            PointerEvent::new(cfg.pointer, phase, p + noise, t)
        })
        .collect()
}

/// `count` strokes of the same shape, one token index each, separated by
/// `gap_ms` of idle time.
pub fn stroke_batch(
    shape: &ShapeSpec,
    cfg: &SynthCfg,
    tok: ReplayToken,
    count: usize,
    gap_ms: Millis,
) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    let mut tok = tok;
    let mut start_ms = cfg.start_ms;
    for _ in 0..count {
        let stroke = stroke_events(shape, &SynthCfg { start_ms, ..*cfg }, tok);
        start_ms = stroke.last().map_or(start_ms, |e| e.timestamp_ms) + gap_ms;
        events.extend(stroke);
        tok = tok.next();
    }
    events
}
