use super::*;
use crate::geom::TransformContext;
use crate::input::{PointerEvent, PointerUpdate};
use nalgebra::vector;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn feed(r: &mut GestureRecognizer, event: PointerEvent) -> Vec<Gesture> {
    r.handle(&PointerUpdate::from_event(&event, &TransformContext::default()))
}

fn run(r: &mut GestureRecognizer, events: &[PointerEvent]) -> Vec<Gesture> {
    events.iter().flat_map(|&e| feed(r, e)).collect()
}

fn of_kind(out: &[Gesture], kind: GestureKind) -> Vec<&Gesture> {
    out.iter().filter(|g| g.kind() == kind).collect()
}

#[test]
fn confidence_helpers() {
    assert_eq!(exceed_confidence(10.0, 10.0), 0.5);
    assert_eq!(exceed_confidence(20.0, 10.0), 1.0);
    assert_eq!(exceed_confidence(100.0, 10.0), 1.0);
    assert_eq!(within_confidence(0.0, 10.0), 1.0);
    assert_eq!(within_confidence(10.0, 10.0), 0.5);
    assert_eq!(within_confidence(30.0, 10.0), 0.0);
}

#[test]
fn two_finger_parallel_drag_is_a_pan_only() {
    let mut r = GestureRecognizer::default();
    let mut events = vec![
        PointerEvent::down(0, 0.0, 0.0, 0.0),
        PointerEvent::down(1, 100.0, 0.0, 0.0),
    ];
    for step in 1..=25 {
        let dx = 2.0 * step as f64;
        let t = 4.0 * step as f64;
        events.push(PointerEvent::moved(0, dx, 0.0, t));
        events.push(PointerEvent::moved(1, 100.0 + dx, 0.0, t));
    }
    events.push(PointerEvent::up(0, 50.0, 0.0, 120.0));
    events.push(PointerEvent::up(1, 150.0, 0.0, 120.0));
    let out = run(&mut r, &events);

    let pans = of_kind(&out, GestureKind::Pan);
    assert_eq!(pans.first().map(|g| g.phase), Some(GesturePhase::Began));
    let last = pans.last().unwrap();
    assert_eq!(last.phase, GesturePhase::Ended);
    let GesturePayload::Pan { translation, .. } = last.payload else {
        panic!("pan payload expected");
    };
    assert!((translation - vector![50.0, 0.0]).norm() < 1e-9);
    assert!(of_kind(&out, GestureKind::Zoom).is_empty());
    assert!(of_kind(&out, GestureKind::Rotate).is_empty());
    assert!(of_kind(&out, GestureKind::Tap).is_empty());
}

#[test]
fn three_finger_hold_confirms_undo() {
    let mut r = GestureRecognizer::default();
    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 0.0, 0.0, 0.0),
            PointerEvent::down(1, 40.0, 0.0, 0.0),
            PointerEvent::down(2, 80.0, 0.0, 0.0),
        ],
    );
    let undo = of_kind(&out, GestureKind::Undo);
    assert_eq!(undo.len(), 1);
    assert_eq!(undo[0].phase, GesturePhase::Began);

    let out = run(&mut r, &[PointerEvent::moved(1, 42.0, 1.0, 300.0)]);
    let GesturePayload::Undo { progress, confirmation } = out[0].payload else {
        panic!("undo payload expected");
    };
    assert_eq!(out[0].phase, GesturePhase::Changed);
    assert!((progress - 0.5).abs() < 1e-9);
    assert_eq!(confirmation, 0.0);

    let out = r.advance(700.0);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].phase, GesturePhase::Ended);
    assert_eq!(
        out[0].payload,
        GesturePayload::Undo {
            progress: 1.0,
            confirmation: 1.0
        }
    );

    // lifting after confirmation does not report a failure
    let out = run(
        &mut r,
        &[
            PointerEvent::up(0, 0.0, 0.0, 800.0),
            PointerEvent::up(1, 42.0, 1.0, 800.0),
            PointerEvent::up(2, 80.0, 0.0, 800.0),
        ],
    );
    assert!(of_kind(&out, GestureKind::Undo).is_empty());
}

#[test]
fn undo_fails_on_early_lift_or_drift() {
    let mut r = GestureRecognizer::default();
    let downs = [
        PointerEvent::down(0, 0.0, 0.0, 0.0),
        PointerEvent::down(1, 40.0, 0.0, 0.0),
        PointerEvent::down(2, 80.0, 0.0, 0.0),
    ];
    run(&mut r, &downs);
    let out = run(&mut r, &[PointerEvent::up(2, 80.0, 0.0, 200.0)]);
    let undo = of_kind(&out, GestureKind::Undo);
    assert_eq!(undo.last().unwrap().phase, GesturePhase::Failed);
    assert!(r.live(GestureKind::Undo).is_none());

    let mut r = GestureRecognizer::default();
    run(&mut r, &downs);
    let out = run(&mut r, &[PointerEvent::moved(0, 0.0, 60.0, 100.0)]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].phase, GesturePhase::Failed);
    assert!(r.advance(1000.0).is_empty());
}

#[test]
fn quick_press_is_a_tap_and_repeats_count_up() {
    let mut r = GestureRecognizer::default();
    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 10.0, 10.0, 0.0),
            PointerEvent::up(0, 12.0, 10.0, 80.0),
        ],
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].phase, GesturePhase::Ended);
    assert_eq!(
        out[0].payload,
        GesturePayload::Tap {
            position: vector![12.0, 10.0],
            count: 1
        }
    );
    assert!(out[0].confidence > 0.5);

    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 11.0, 11.0, 200.0),
            PointerEvent::up(0, 11.0, 11.0, 260.0),
        ],
    );
    assert!(matches!(out[0].payload, GesturePayload::Tap { count: 2, .. }));

    // too late for a triple tap
    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 11.0, 11.0, 1000.0),
            PointerEvent::up(0, 11.0, 11.0, 1050.0),
        ],
    );
    assert!(matches!(out[0].payload, GesturePayload::Tap { count: 1, .. }));
}

#[test]
fn slow_or_far_press_is_not_a_tap() {
    let mut r = GestureRecognizer::default();
    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 0.0, 0.0, 0.0),
            PointerEvent::up(0, 0.0, 0.0, 400.0),
        ],
    );
    assert!(out.is_empty());
    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 0.0, 0.0, 1000.0),
            PointerEvent::moved(0, 30.0, 0.0, 1050.0),
            PointerEvent::up(0, 30.0, 0.0, 1100.0),
        ],
    );
    assert!(out.is_empty());
}

#[test]
fn long_press_begins_on_timer_and_suppresses_tap() {
    let mut r = GestureRecognizer::default();
    run(&mut r, &[PointerEvent::down(0, 5.0, 5.0, 0.0)]);
    assert!(r.advance(400.0).is_empty());
    let out = r.advance(600.0);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind(), GestureKind::LongPress);
    assert_eq!(out[0].phase, GesturePhase::Began);
    assert_eq!(out[0].started_ms, 0.0);
    assert!(r.advance(700.0)[0].phase == GesturePhase::Changed);

    let out = run(&mut r, &[PointerEvent::up(0, 5.0, 5.0, 800.0)]);
    assert!(out.iter().all(|g| g.kind() == GestureKind::LongPress));
    let last = out.last().unwrap();
    assert_eq!(last.phase, GesturePhase::Ended);
    let GesturePayload::LongPress { held_ms, .. } = last.payload else {
        panic!("long-press payload expected");
    };
    assert_eq!(held_ms, 800.0);
}

#[test]
fn long_press_began_is_stamped_with_the_triggering_time() {
    let mut r = GestureRecognizer::default();
    run(&mut r, &[PointerEvent::down(0, 5.0, 5.0, 0.0)]);
    let out = r.advance(600.0);
    assert_eq!(out[0].phase, GesturePhase::Began);
    assert_eq!(out[0].started_ms, 0.0);
    assert_eq!(out[0].updated_ms, 600.0);
    assert_eq!(out[0], *r.live(GestureKind::LongPress).unwrap());

    let mut r = GestureRecognizer::default();
    run(&mut r, &[PointerEvent::down(0, 5.0, 5.0, 0.0)]);
    let out = run(&mut r, &[PointerEvent::moved(0, 6.0, 5.0, 550.0)]);
    let began = out
        .iter()
        .find(|g| g.kind() == GestureKind::LongPress)
        .unwrap();
    assert_eq!(began.updated_ms, 550.0);
}

#[test]
fn second_finger_cancels_long_press() {
    let mut r = GestureRecognizer::default();
    run(&mut r, &[PointerEvent::down(0, 5.0, 5.0, 0.0)]);
    r.advance(600.0);
    let out = run(&mut r, &[PointerEvent::down(1, 90.0, 5.0, 650.0)]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].kind(), GestureKind::LongPress);
    assert_eq!(out[0].phase, GesturePhase::Cancelled);
}

#[test]
fn fast_flick_is_a_swipe() {
    let mut r = GestureRecognizer::default();
    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 0.0, 0.0, 0.0),
            PointerEvent::moved(0, 40.0, 5.0, 40.0),
            PointerEvent::moved(0, 100.0, 10.0, 100.0),
            PointerEvent::up(0, 100.0, 10.0, 100.0),
        ],
    );
    assert_eq!(out.len(), 1);
    let GesturePayload::Swipe { direction, velocity, delta } = out[0].payload else {
        panic!("swipe payload expected");
    };
    assert_eq!(direction, SwipeDirection::Right);
    assert!((velocity - delta.norm() / 100.0).abs() < 1e-12);
    assert_eq!(out[0].phase, GesturePhase::Ended);

    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 0.0, 0.0, 1000.0),
            PointerEvent::up(0, 0.0, -100.0, 1500.0),
        ],
    );
    assert!(out.is_empty(), "0.2 px/ms is below the swipe velocity");
}

#[test]
fn swipe_direction_uses_dominant_axis() {
    assert_eq!(SwipeDirection::from_delta(vector![-5.0, 1.0]), SwipeDirection::Left);
    assert_eq!(SwipeDirection::from_delta(vector![1.0, -5.0]), SwipeDirection::Up);
    assert_eq!(SwipeDirection::from_delta(vector![1.0, 5.0]), SwipeDirection::Down);
}

#[test]
fn pinch_out_is_a_zoom() {
    let mut r = GestureRecognizer::default();
    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 0.0, 0.0, 0.0),
            PointerEvent::down(1, 100.0, 0.0, 0.0),
            PointerEvent::moved(0, -10.0, 0.0, 10.0),
            PointerEvent::moved(1, 110.0, 0.0, 10.0),
            PointerEvent::up(0, -10.0, 0.0, 20.0),
        ],
    );
    let zoom = of_kind(&out, GestureKind::Zoom);
    assert_eq!(zoom[0].phase, GesturePhase::Began);
    let last = zoom.last().unwrap();
    assert_eq!(last.phase, GesturePhase::Ended);
    let GesturePayload::Zoom { scale, focus } = last.payload else {
        panic!("zoom payload expected");
    };
    assert!((scale - 1.2).abs() < 1e-9);
    assert!((focus - vector![50.0, 0.0]).norm() < 1e-9);
    assert!(of_kind(&out, GestureKind::Pan).is_empty());
}

#[test]
fn twist_is_a_rotate() {
    let mut r = GestureRecognizer::default();
    let theta: f64 = 0.2;
    let (c, s) = (theta.cos(), theta.sin());
    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 0.0, 0.0, 0.0),
            PointerEvent::down(1, 100.0, 0.0, 0.0),
            PointerEvent::moved(0, 50.0 - 50.0 * c, -50.0 * s, 10.0),
            PointerEvent::moved(1, 50.0 + 50.0 * c, 50.0 * s, 10.0),
            PointerEvent::up(1, 50.0 + 50.0 * c, 50.0 * s, 20.0),
        ],
    );
    let rotate = of_kind(&out, GestureKind::Rotate);
    let last = rotate.last().unwrap();
    assert_eq!(last.phase, GesturePhase::Ended);
    let GesturePayload::Rotate { angle, .. } = last.payload else {
        panic!("rotate payload expected");
    };
    assert!((angle - theta).abs() < 1e-9);
    assert!(of_kind(&out, GestureKind::Pan).is_empty());
    assert!(of_kind(&out, GestureKind::Zoom).is_empty());
}

#[test]
fn third_finger_cancels_pair_gestures() {
    let mut r = GestureRecognizer::default();
    let mut events = vec![
        PointerEvent::down(0, 0.0, 0.0, 0.0),
        PointerEvent::down(1, 100.0, 0.0, 0.0),
    ];
    for step in 1..=10 {
        let dx = 2.0 * step as f64;
        events.push(PointerEvent::moved(0, dx, 0.0, step as f64));
        events.push(PointerEvent::moved(1, 100.0 + dx, 0.0, step as f64));
    }
    run(&mut r, &events);
    assert!(r.live(GestureKind::Pan).is_some());
    assert!(r.live(GestureKind::Zoom).is_none());
    let out = run(&mut r, &[PointerEvent::down(2, 60.0, 50.0, 20.0)]);
    let pan = of_kind(&out, GestureKind::Pan);
    assert_eq!(pan.len(), 1);
    assert_eq!(pan[0].phase, GesturePhase::Cancelled);
    assert_eq!(of_kind(&out, GestureKind::Undo)[0].phase, GesturePhase::Began);
    assert!(r.live(GestureKind::Pan).is_none());
}

#[test]
fn cancelled_pointer_never_taps() {
    let mut r = GestureRecognizer::default();
    let out = run(
        &mut r,
        &[
            PointerEvent::down(0, 0.0, 0.0, 0.0),
            PointerEvent::cancel(0, 0.0, 0.0, 50.0),
        ],
    );
    assert!(out.is_empty());
    assert_eq!(r.pointer_count(), 0);
}

#[test]
fn reset_cancels_live_and_clears_history() {
    let mut r = GestureRecognizer::default();
    run(
        &mut r,
        &[
            PointerEvent::down(0, 0.0, 0.0, 0.0),
            PointerEvent::up(0, 0.0, 0.0, 10.0),
            PointerEvent::down(1, 0.0, 0.0, 20.0),
            PointerEvent::down(2, 100.0, 0.0, 20.0),
            PointerEvent::moved(2, 150.0, 0.0, 30.0),
        ],
    );
    assert_eq!(r.history().len(), 1);
    let out = r.reset();
    assert!(!out.is_empty());
    assert!(out.iter().all(|g| g.phase == GesturePhase::Cancelled));
    assert_eq!(r.live_gestures().count(), 0);
    assert!(r.history().is_empty());
    assert_eq!(r.pointer_count(), 0);
}

#[test]
fn history_is_bounded() {
    let cfg = GestureCfg {
        history_len: 2,
        ..GestureCfg::default()
    };
    let mut r = GestureRecognizer::new(cfg);
    for i in 0..3 {
        let t = 1000.0 * i as f64;
        run(
            &mut r,
            &[
                PointerEvent::down(0, 0.0, 0.0, t),
                PointerEvent::up(0, 0.0, 0.0, t + 10.0),
            ],
        );
    }
    assert_eq!(r.history().len(), 2);
    assert_eq!(r.history()[1].id, GestureId(2));
}

#[derive(Clone, Debug)]
enum Op {
    Down(u32, f64, f64),
    Move(u32, f64, f64),
    Up(u32),
    Cancel(u32),
    Wait(f64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..4, -200.0..200.0f64, -200.0..200.0f64).prop_map(|(i, x, y)| Op::Down(i, x, y)),
        (0u32..4, -200.0..200.0f64, -200.0..200.0f64).prop_map(|(i, x, y)| Op::Move(i, x, y)),
        (0u32..4).prop_map(Op::Up),
        (0u32..4).prop_map(Op::Cancel),
        (1.0..800.0f64).prop_map(Op::Wait),
    ]
}

proptest! {
    #[test]
    fn phases_are_consistent_per_kind(ops in prop::collection::vec(op(), 0..80)) {
        let mut r = GestureRecognizer::default();
        let mut live: BTreeSet<GestureKind> = BTreeSet::new();
        let mut t = 0.0;
        for op in ops {
            t += 1.0;
            let out = match op {
                Op::Down(i, x, y) => feed(&mut r, PointerEvent::down(i, x, y, t)),
                Op::Move(i, x, y) => feed(&mut r, PointerEvent::moved(i, x, y, t)),
                Op::Up(i) => feed(&mut r, PointerEvent::up(i, 0.0, 0.0, t)),
                Op::Cancel(i) => feed(&mut r, PointerEvent::cancel(i, 0.0, 0.0, t)),
                Op::Wait(dt) => {
                    t += dt;
                    r.advance(t)
                }
            };
            for g in out {
                prop_assert!((0.0..=1.0).contains(&g.confidence));
                match g.phase {
                    GesturePhase::Began => prop_assert!(live.insert(g.kind())),
                    GesturePhase::Changed => prop_assert!(live.contains(&g.kind())),
                    GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed => {
                        // taps and swipes are reported directly as ended
                        live.remove(&g.kind());
                    }
                    GesturePhase::Possible => prop_assert!(false, "possible is never emitted"),
                }
            }
            let expected: BTreeSet<GestureKind> = r.live_gestures().map(|g| g.kind()).collect();
            prop_assert_eq!(&live, &expected);
        }
    }
}
