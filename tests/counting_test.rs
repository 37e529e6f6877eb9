use zonecount_rs::{CounterConfig, Detection, EventKind, FrameResult, ZoneCounter};

const W: f32 = 1000.0;
const H: f32 = 800.0;

fn counter() -> ZoneCounter {
    ZoneCounter::new(CounterConfig::default(), W, H)
}

fn det(tid: u64, cx: f32, cy: f32) -> Detection {
    Detection::new(cx, cy, 60.0, 60.0, 0, tid)
}

/// Scenario A: a single moving object confirms once its displacement clears
/// the motion floor, minting display id 1.
#[test]
fn test_single_object_counted_once() {
    let mut c = counter();

    // Frame 0: first sighting, inside the zone
    let r0 = c.process_frame(&[det(7, 500.0, 400.0)], 0);
    assert_eq!(r0.occupancy, 1);
    assert_eq!(r0.total_count, 0);
    assert!(r0.new_events.is_empty());

    // Frame 1: hysteresis satisfied but displacement (3px) under the floor
    let r1 = c.process_frame(&[det(7, 503.0, 400.0)], 1);
    assert_eq!(r1.total_count, 0);

    // Frame 2: displacement 8px > 5px, confirmation fires
    let r2 = c.process_frame(&[det(7, 508.0, 400.0)], 2);
    assert_eq!(r2.total_count, 1);
    assert_eq!(r2.new_events.len(), 1);
    assert_eq!(r2.new_events[0].message, "Sack 1 Entered (+1)");
    assert_eq!(r2.new_events[0].kind, EventKind::Entered);
    assert_eq!(r2.new_events[0].frame, 2);
}

/// Scenario B: a confirmed object observed outside the zone for the exit
/// threshold produces one Left event; the total never decreases.
#[test]
fn test_confirmed_object_leaves_visibly() {
    let mut c = counter();
    c.process_frame(&[det(7, 500.0, 400.0)], 0);
    c.process_frame(&[det(7, 503.0, 400.0)], 1);
    c.process_frame(&[det(7, 508.0, 400.0)], 2);
    assert_eq!(c.total_count(), 1);

    // Outside the zone (left of the inset) for 50 consecutive frames
    let mut left_events = Vec::new();
    for frame in 3..=52 {
        let r = c.process_frame(&[det(7, 60.0, 400.0)], frame);
        assert_eq!(r.occupancy, 0);
        left_events.extend(r.new_events);
    }
    assert_eq!(left_events.len(), 1);
    assert_eq!(left_events[0].message, "Sack 1 Left (-1)");
    assert_eq!(left_events[0].kind, EventKind::Left);
    assert_eq!(left_events[0].frame, 52);
    assert_eq!(c.total_count(), 1);
}

/// A confirmed object that the detector drops entirely is aged out through
/// the disappearance path: one Left event, state deleted.
#[test]
fn test_confirmed_object_vanishes() {
    let mut c = counter();
    c.process_frame(&[det(7, 500.0, 400.0)], 0);
    c.process_frame(&[det(7, 503.0, 400.0)], 1);
    c.process_frame(&[det(7, 508.0, 400.0)], 2);

    let mut events = Vec::new();
    for frame in 3..=52 {
        events.extend(c.process_frame(&[], frame).new_events);
    }
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::Left);
    assert_eq!(c.total_count(), 1);
    assert_eq!(c.live_tracks(), 0);
}

/// A track that vanishes before ever confirming is reaped silently.
#[test]
fn test_unconfirmed_vanish_is_silent() {
    let mut c = counter();
    c.process_frame(&[det(5, 500.0, 400.0)], 0);
    for frame in 1..=60 {
        c.process_frame(&[], frame);
    }
    assert!(c.events().is_empty());
    assert_eq!(c.total_count(), 0);
    assert_eq!(c.live_tracks(), 0);
}

/// Scenario C: a new track id appearing within 60px of an unconfirmed state
/// inherits its progress, so a tracker id swap does not double-count.
#[test]
fn test_id_swap_inherits_progress() {
    let mut c = counter();

    // Track 7 seen once, then dropped by the detector
    c.process_frame(&[det(7, 500.0, 400.0)], 0);
    c.process_frame(&[], 1);

    // Track 15 appears 20px away: inherits inside_frames = 1 and the
    // original start center, so displacement is measured from (500, 400)
    let r = c.process_frame(&[det(15, 520.0, 400.0)], 2);
    assert_eq!(r.total_count, 1);
    assert_eq!(r.new_events.len(), 1);
    assert_eq!(r.new_events[0].message, "Sack 1 Entered (+1)");

    // The continuation stays a single object
    let r = c.process_frame(&[det(15, 525.0, 400.0)], 3);
    assert_eq!(r.total_count, 1);
    assert!(r.new_events.is_empty());
}

/// Scenario D: two simultaneous detections 20px apart collapse to one track.
#[test]
fn test_in_frame_duplicate_collapse() {
    let mut c = counter();
    let r = c.process_frame(&[det(1, 500.0, 400.0), det(2, 520.0, 400.0)], 0);
    assert_eq!(r.occupancy, 1);
    assert_eq!(c.live_tracks(), 1);
}

/// Idempotent suppression: a second track id confirming at a location that
/// was already counted within the lookback window adds nothing.
#[test]
fn test_reconfirmation_suppressed() {
    let mut c = counter();

    // Track 1 confirms at (508, 400) on frame 2
    c.process_frame(&[det(1, 500.0, 400.0)], 0);
    c.process_frame(&[det(1, 503.0, 400.0)], 1);
    c.process_frame(&[det(1, 508.0, 400.0)], 2);
    assert_eq!(c.total_count(), 1);

    // Track 1 disappears; track 2 builds up a confirmation 30px away, well
    // inside the 6%-of-width match radius and the 100-frame window
    c.process_frame(&[], 3);
    c.process_frame(&[], 4);
    c.process_frame(&[det(2, 530.0, 400.0)], 5);
    c.process_frame(&[det(2, 533.0, 400.0)], 6);
    let r = c.process_frame(&[det(2, 538.0, 400.0)], 7);

    assert_eq!(r.total_count, 1);
    assert!(r.new_events.is_empty());
    assert_eq!(c.events().len(), 1);
}

/// After the lookback window expires, the same location counts again as a
/// genuinely new object, and events per display id strictly alternate.
#[test]
fn test_recount_after_window_and_alternation() {
    let mut c = counter();

    // Object 1: enter, then vanish until the exit threshold fires
    c.process_frame(&[det(7, 500.0, 400.0)], 0);
    c.process_frame(&[det(7, 503.0, 400.0)], 1);
    c.process_frame(&[det(7, 508.0, 400.0)], 2);
    for frame in 3..=52 {
        c.process_frame(&[], frame);
    }

    // Quiet gap past the 100-frame lookback
    for frame in 53..160 {
        c.process_frame(&[], frame);
    }

    // Object 2 at the same location
    c.process_frame(&[det(30, 500.0, 400.0)], 160);
    c.process_frame(&[det(30, 503.0, 400.0)], 161);
    c.process_frame(&[det(30, 508.0, 400.0)], 162);

    let messages: Vec<&str> = c.events().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Sack 1 Entered (+1)",
            "Sack 1 Left (-1)",
            "Sack 2 Entered (+1)",
        ]
    );
    assert_eq!(c.total_count(), 2);

    // Alternation per display id: no two consecutive events of the same kind
    for id in ["Sack 1", "Sack 2"] {
        let kinds: Vec<EventKind> = c
            .events()
            .iter()
            .filter(|e| e.message.starts_with(id))
            .map(|e| e.kind)
            .collect();
        for pair in kinds.windows(2) {
            assert_ne!(pair[0], pair[1], "consecutive {:?} for {}", pair[0], id);
        }
    }
}

/// Monotonicity: across an arbitrary busy sequence the total never drops.
#[test]
fn test_total_count_monotonic() {
    let mut c = counter();
    let mut last_total = 0;

    for frame in 0..200i64 {
        let mut dets = Vec::new();
        // A drifting object that periodically disappears
        if frame % 7 != 0 {
            let x = 300.0 + frame as f32 * 2.0 % 400.0;
            dets.push(det(1 + (frame as u64 / 40), x, 300.0));
        }
        // A second, distant object
        if frame % 3 != 0 {
            dets.push(det(1000 + (frame as u64 / 55), 700.0, 600.0 - frame as f32));
        }
        let r = c.process_frame(&dets, frame);
        assert!(r.total_count >= last_total, "total decreased at frame {frame}");
        last_total = r.total_count;
    }
}

/// Reset purity: after reset the engine replays a session exactly like a
/// freshly constructed one.
#[test]
fn test_reset_purity() {
    let script: Vec<Vec<Detection>> = vec![
        vec![det(7, 500.0, 400.0)],
        vec![det(7, 503.0, 400.0)],
        vec![det(7, 508.0, 400.0)],
        vec![],
        vec![det(9, 700.0, 600.0)],
    ];

    let run = |c: &mut ZoneCounter| -> Vec<FrameResult> {
        script
            .iter()
            .enumerate()
            .map(|(i, dets)| c.process_frame(dets, i as i64))
            .collect()
    };

    let mut fresh = counter();
    let baseline = run(&mut fresh);

    let mut reused = counter();
    run(&mut reused);
    reused.reset();
    assert_eq!(reused.total_count(), 0);
    assert!(reused.events().is_empty());

    let replay = run(&mut reused);
    assert_eq!(replay, baseline);
}

/// The presentation window surfaces at most five non-expired events.
#[test]
fn test_recent_event_window() {
    let mut c = counter();
    c.process_frame(&[det(7, 500.0, 400.0)], 0);
    c.process_frame(&[det(7, 503.0, 400.0)], 1);
    c.process_frame(&[det(7, 508.0, 400.0)], 2);

    assert_eq!(c.recent_events(10).len(), 1);
    // 101 frames later the entry is expired for display but kept for audit
    assert!(c.recent_events(103).is_empty());
    assert_eq!(c.events().len(), 1);
}
