use nalgebra::Vector2;
use tracing::{debug, trace};

use super::{fit_arc, fit_circle, fit_line, FitCfg, GeometryFit, PrimitiveKind, RunFit};
use crate::corners::Run;
use crate::stroke::ProcessedStroke;

/// `confidence + simplicity bonus − error penalty`, clipped to [0, 1].
pub fn selection_score(fit: &GeometryFit, cfg: &FitCfg) -> f64 {
    let (bonus, ceiling) = match fit.kind() {
        PrimitiveKind::Line => (cfg.line_bonus, cfg.line_max_error),
        PrimitiveKind::Arc => (cfg.arc_bonus, cfg.arc_max_error),
        PrimitiveKind::Circle => (cfg.circle_bonus, cfg.circle_max_error),
    };
    let err_ratio = if ceiling > 0.0 {
        (fit.rms_error / ceiling).min(1.0)
    } else {
        1.0
    };
    (fit.confidence + bonus - cfg.error_penalty * err_ratio).clamp(0.0, 1.0)
}

/// Fit every method to one run and select the best candidate.
pub fn fit_run(points: &[Vector2<f64>], cfg: &FitCfg) -> RunFit {
    let mut attempts = vec![
        (PrimitiveKind::Line, fit_line(points, cfg)),
        (PrimitiveKind::Arc, fit_arc(points, cfg)),
    ];
    if cfg.detect_circles {
        attempts.push((PrimitiveKind::Circle, fit_circle(points, cfg)));
    }

    let mut candidates = Vec::with_capacity(attempts.len());
    for (kind, attempt) in attempts {
        match attempt {
            Ok(mut fit) => {
                fit.meta.score = selection_score(&fit, cfg);
                candidates.push(fit);
            }
            Err(err) => trace!(?kind, %err, "candidate omitted"),
        }
    }
    let count = candidates.len();
    for c in &mut candidates {
        c.meta.candidates = count;
    }

    // Strictly greater keeps the earlier, simpler primitive on ties.
    let mut best: Option<usize> = None;
    for (i, c) in candidates.iter().enumerate() {
        if best.is_none_or(|b| c.meta.score > candidates[b].meta.score) {
            best = Some(i);
        }
    }
    RunFit { candidates, best }
}

/// Fit each run of `points`; one result per run clearing `min_confidence`.
pub fn convert_runs(points: &[Vector2<f64>], runs: &[Run], cfg: &FitCfg) -> Vec<GeometryFit> {
    let mut out = Vec::with_capacity(runs.len());
    for (index, run) in runs.iter().enumerate() {
        if run.len() < cfg.min_run_points.max(1) {
            continue;
        }
        let Some(slice) = points.get(run.range()) else {
            continue;
        };
        let Some(mut fit) = fit_run(slice, cfg).into_best() else {
            trace!(run = index, "no candidate survived");
            continue;
        };
        fit.meta.run_index = index;
        fit.meta.run_start = run.start;
        fit.meta.run_end = run.end;
        debug!(
            run = index,
            kind = ?fit.kind(),
            confidence = fit.confidence,
            rms = fit.rms_error,
            "run fitted"
        );
        if fit.confidence >= cfg.min_confidence {
            out.push(fit);
        }
    }
    out
}

/// Fit every run of a processed stroke.
pub fn convert(stroke: &ProcessedStroke, cfg: &FitCfg) -> Vec<GeometryFit> {
    convert_runs(&stroke.points, &stroke.corners.runs, cfg)
}
