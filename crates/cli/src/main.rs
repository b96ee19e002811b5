use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use sketchfit::clock::ManualClock;
use sketchfit::fit::convert;
use sketchfit::input::PointerEvent;
use sketchfit::session::{InputSession, Recorder};
use sketchfit::stroke::StrokeProcessor;
use sketchfit::synth::{stroke_batch, ReplayToken, ShapeKind, SynthCfg};
use sketchfit::TransformContext;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod trace;

use trace::{load_cfg, load_trace, write_json, Trace};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Replay, fit and synthesize pen/touch traces")]
struct Cmd {
    /// Log pipeline decisions (mode changes, stroke lifecycle, fit selection)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run a trace through the full session and print the recorded events
    Replay {
        #[arg(long)]
        trace: PathBuf,
        /// JSON session configuration; defaults apply to missing fields
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also record per-move drawing progress
        #[arg(long)]
        progress: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Process the primary pointer's stroke and print its geometry
    Fit {
        #[arg(long)]
        trace: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a synthetic trace
    Synth {
        #[arg(long, value_enum)]
        shape: Shape,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Per-axis uniform jitter in world units
        #[arg(long, default_value_t = 0.0)]
        jitter: f64,
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the default session configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Line,
    Arc,
    Circle,
    Corner,
}

impl From<Shape> for ShapeKind {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Line => ShapeKind::Line,
            Shape::Arc => ShapeKind::Arc,
            Shape::Circle => ShapeKind::Circle,
            Shape::Corner => ShapeKind::Corner,
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Replay {
            trace,
            config,
            progress,
            out,
        } => replay(trace, config, progress, out),
        Action::Fit { trace, config, out } => fit(trace, config, out),
        Action::Synth {
            shape,
            seed,
            jitter,
            count,
            out,
        } => synth(shape.into(), seed, jitter, count, out),
        Action::Config => write_json(None, &sketchfit::session::SessionCfg::default()),
    }
}

fn replay(
    trace: PathBuf,
    config: Option<PathBuf>,
    progress: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let cfg = load_cfg(config.as_deref())?;
    let trace = load_trace(&trace)?;
    tracing::info!(events = trace.events.len(), label = ?trace.label, "replay");
    let start = trace.events.first().map_or(0.0, |e| e.timestamp_ms);
    let clock = ManualClock::new(start);
    let recorder = if progress {
        Recorder::with_progress()
    } else {
        Recorder::new()
    };
    let mut session = InputSession::new(cfg, recorder, &clock);
    for (i, event) in trace.events.iter().enumerate() {
        clock.set(event.timestamp_ms);
        session.poll();
        session
            .handle(event)
            .with_context(|| format!("event {i} ({:?} pointer {})", event.phase, event.id.0))?;
    }
    clock.advance(cfg.fit_delay_ms.max(0.0));
    session.poll();
    let recorder = session.into_listener();
    tracing::info!(recorded = recorder.events.len(), "replay done");
    write_json(out.as_deref(), &recorder.events)
}

fn fit(trace: PathBuf, config: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let cfg = load_cfg(config.as_deref())?;
    let trace = load_trace(&trace)?;
    let events: Vec<&PointerEvent> = match trace.events.first() {
        Some(first) => trace.events.iter().filter(|e| e.id == first.id).collect(),
        None => bail!("trace has no events"),
    };
    let ctx = TransformContext::default();
    let mut processor = StrokeProcessor::new(cfg.stroke);
    let mut samples = events.iter().map(|e| e.capture(&ctx));
    if let Some(first) = samples.next() {
        processor.start(first)?;
    }
    for sample in samples {
        processor.add(sample)?;
    }
    let stroke = processor.end()?;
    let geometry = convert(&stroke, &cfg.fit);
    tracing::info!(
        points = stroke.points.len(),
        corners = stroke.corners.corners.len(),
        primitives = geometry.len(),
        "fit"
    );
    let doc = json!({
        "stroke": stroke.id,
        "points": stroke.points,
        "corners": stroke.corners.corners,
        "runs": stroke.corners.runs,
        "quality": stroke.quality,
        "geometry": geometry,
    });
    write_json(out.as_deref(), &doc)
}

fn synth(kind: ShapeKind, seed: u64, jitter: f64, count: usize, out: Option<PathBuf>) -> Result<()> {
    let cfg = SynthCfg {
        jitter,
        ..SynthCfg::default()
    };
    let events = stroke_batch(&kind.preset(), &cfg, ReplayToken::new(seed), count.max(1), 400.0);
    tracing::info!(?kind, seed, jitter, events = events.len(), "synth");
    let trace = Trace {
        label: Some(format!("{kind:?} seed={seed} jitter={jitter}").to_lowercase()),
        events,
    };
    write_json(out.as_deref(), &trace)
}
