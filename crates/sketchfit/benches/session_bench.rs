//! Criterion bench for full session replay: capture, touch arbitration,
//! gesture recognition, stroke processing and fitting for a batch of strokes.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use sketchfit::clock::ManualClock;
use sketchfit::session::{InputSession, SessionCfg};
use sketchfit::synth::{stroke_batch, ReplayToken, ShapeKind, SynthCfg};

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_replay");
    let cfg = SessionCfg {
        fit_delay_ms: 0.0,
        ..SessionCfg::default()
    };
    let synth = SynthCfg {
        jitter: 0.5,
        ..SynthCfg::default()
    };
    for kind in [ShapeKind::Line, ShapeKind::Corner, ShapeKind::Circle] {
        let events = stroke_batch(&kind.preset(), &synth, ReplayToken::new(9), 8, 400.0);
        group.bench_function(BenchmarkId::new(format!("{kind:?}"), events.len()), |b| {
            b.iter_batched(
                || InputSession::new(cfg, (), ManualClock::new(0.0)),
                |mut session| {
                    for e in &events {
                        let _ = session.handle(e);
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
