use nalgebra::Vector2;
use tracing::{debug, trace};

use super::path::{dedupe, resample, smooth_passes};
use super::quality::score_quality;
use super::{AddOutcome, ProcessedStroke, Stroke, StrokeCfg, StrokeError, StrokeId, StrokeStats};
use crate::corners::detect;
use crate::input::PointerSample;

/// Owns at most one in-progress stroke.
#[derive(Clone, Debug)]
pub struct StrokeProcessor {
    cfg: StrokeCfg,
    active: Option<Stroke>,
    next_id: u64,
}

impl Default for StrokeProcessor {
    fn default() -> Self {
        Self::new(StrokeCfg::default())
    }
}

impl StrokeProcessor {
    pub fn new(cfg: StrokeCfg) -> Self {
        Self {
            cfg,
            active: None,
            next_id: 1,
        }
    }

    #[inline]
    pub fn cfg(&self) -> &StrokeCfg {
        &self.cfg
    }

    #[inline]
    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Display points captured so far (empty when idle).
    pub fn points(&self) -> &[Vector2<f64>] {
        match &self.active {
            Some(stroke) => stroke.points(),
            None => &[],
        }
    }

    /// Begin a stroke with its first sample.
    pub fn start(&mut self, sample: PointerSample) -> Result<StrokeId, StrokeError> {
        if let Some(active) = &self.active {
            return Err(StrokeError::AlreadyActive(active.id));
        }
        let id = StrokeId(self.next_id);
        self.next_id += 1;
        let mut stroke = Stroke {
            id,
            samples: Vec::with_capacity(256.min(self.cfg.max_points.max(1))),
            path: Vec::with_capacity(256.min(self.cfg.max_points.max(1))),
            stats: StrokeStats::default(),
            speed_sum: 0.0,
            pressure_sum: 0.0,
        };
        push_sample(&mut stroke, sample, &self.cfg);
        debug!(stroke = id.0, x = sample.world.x, y = sample.world.y, "stroke start");
        self.active = Some(stroke);
        Ok(id)
    }

    /// Append a sample. Past `max_points` the sample is dropped, not an error.
    pub fn add(&mut self, sample: PointerSample) -> Result<AddOutcome, StrokeError> {
        let stroke = self.active.as_mut().ok_or(StrokeError::NoActiveStroke)?;
        if stroke.samples.len() >= self.cfg.max_points {
            stroke.stats.dropped += 1;
            trace!(stroke = stroke.id.0, dropped = stroke.stats.dropped, "point cap reached");
            return Ok(AddOutcome::Dropped);
        }
        push_sample(stroke, sample, &self.cfg);
        Ok(AddOutcome::Appended)
    }

    /// Finish the active stroke and run end-of-stroke processing.
    pub fn end(&mut self) -> Result<ProcessedStroke, StrokeError> {
        let stroke = self.active.take().ok_or(StrokeError::NoActiveStroke)?;
        let processed = finalize(stroke, &self.cfg);
        debug!(
            stroke = processed.id.0,
            points = processed.points.len(),
            corners = processed.corners.corners.len(),
            quality = processed.quality.score,
            "stroke end"
        );
        Ok(processed)
    }

    /// Discard the active stroke, if any.
    pub fn cancel(&mut self) -> Option<StrokeId> {
        let id = self.active.take().map(|s| s.id);
        if let Some(id) = id {
            debug!(stroke = id.0, "stroke cancelled");
        }
        id
    }
}

fn push_sample(stroke: &mut Stroke, sample: PointerSample, cfg: &StrokeCfg) {
    let velocity = trailing_velocity(&stroke.samples, &sample, cfg.velocity_window);
    let captured = sample.with_velocity(velocity);

    let stats = &mut stroke.stats;
    if let Some(prev) = stroke.samples.last() {
        stats.length += (captured.world - prev.world).norm();
    }
    stats.bounds.extend(captured.world);
    stats.sample_count += 1;
    let speed = captured.speed();
    stroke.speed_sum += speed;
    stroke.pressure_sum += captured.pressure;
    stats.peak_speed = stats.peak_speed.max(speed);
    stats.avg_speed = stroke.speed_sum / stats.sample_count as f64;
    stats.avg_pressure = stroke.pressure_sum / stats.sample_count as f64;

    stroke.samples.push(captured);
    stroke.path.push(captured.world);
    if cfg.realtime_smoothing {
        smooth_behind(&mut stroke.path, cfg.realtime_lag, cfg.realtime_strength);
    }
}

/// Velocity over the last `window` samples; reuses the previous estimate when
/// timestamps do not advance.
fn trailing_velocity(history: &[PointerSample], sample: &PointerSample, window: usize) -> Vector2<f64> {
    let Some(last) = history.last() else {
        return Vector2::zeros();
    };
    let k = window.max(1).min(history.len());
    let anchor = &history[history.len() - k];
    let dt = sample.timestamp_ms - anchor.timestamp_ms;
    if dt > 0.0 {
        (sample.world - anchor.world) / dt
    } else {
        last.velocity
    }
}

/// Smooth the single point exactly `lag` behind the newest one. Each point is
/// visited once as the stroke grows.
fn smooth_behind(path: &mut [Vector2<f64>], lag: usize, strength: f64) {
    let n = path.len();
    let lag = lag.max(1);
    if n < lag + 2 {
        return;
    }
    let j = n - 1 - lag;
    let mid = (path[j - 1] + path[j + 1]) * 0.5;
    path[j] += (mid - path[j]) * strength.clamp(0.0, 1.0);
}

fn finalize(stroke: Stroke, cfg: &StrokeCfg) -> ProcessedStroke {
    let spacing = cfg.target_spacing.max(f64::EPSILON);
    let deduped = dedupe(&stroke.path, 0.5 * spacing);
    let smoothed = smooth_passes(&deduped, cfg.smoothing_passes());
    let points = resample(&smoothed, spacing);
    let corners = detect(&points, &cfg.corner);
    let quality = score_quality(&points, &stroke.samples, cfg);
    ProcessedStroke {
        id: stroke.id,
        samples: stroke.samples,
        points,
        stats: stroke.stats,
        corners,
        quality,
    }
}
