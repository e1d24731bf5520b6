//! End-to-end pipeline runs over synthetic drawn frames: background
//! training, hand appearance, fist press, open-hand release.

use airkeys_client::engine::GestureEngine;
use airkeys_shared::Settings;
use airkeys_vision::{Frame, HandExtractor, Rgb, Segmenter};

const SKIN: Rgb = Rgb {
    r: 180,
    g: 150,
    b: 120,
};

fn paint_rect(frame: &mut Frame, x0: usize, y0: usize, x1: usize, y1: usize) {
    for y in y0..y1 {
        for x in x0..x1 {
            frame.set_rgb(x, y, SKIN);
        }
    }
}

fn blank_frame() -> Frame {
    Frame::new(200, 200)
}

/// A palm with three extended fingers of distinct heights; the outer
/// fingers sit flush with the palm edges so the silhouette's sides are
/// convex and only the finger valleys dent the hull.
fn open_hand_frame() -> Frame {
    let mut frame = blank_frame();
    paint_rect(&mut frame, 40, 100, 160, 180);
    paint_rect(&mut frame, 40, 44, 48, 100);
    paint_rect(&mut frame, 86, 36, 94, 100);
    paint_rect(&mut frame, 152, 46, 160, 100);
    frame
}

/// The same palm with every finger bent away.
fn fist_frame() -> Frame {
    let mut frame = blank_frame();
    paint_rect(&mut frame, 40, 100, 160, 180);
    frame
}

fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.tracker.frames_per_batch = 3;
    settings
}

/// Replays the engine's frame sequence through a standalone segmenter and
/// extractor to learn how many fingertips the vision stages report for the
/// open hand. Keeps the scenario's assertions independent of exact
/// morphology rounding.
fn probe_finger_count(settings: &Settings) -> usize {
    let mut segmenter = Segmenter::new(&settings.segmenter);
    segmenter.set_training(true);
    for _ in 0..3 {
        segmenter.segment(&blank_frame().flipped_horizontal());
    }
    segmenter.set_training(false);

    let mask = segmenter.segment(&open_hand_frame().flipped_horizontal());
    let extractor = HandExtractor::new(settings.extractor.clone());
    let (hand, other) = extractor.extract(&mask);
    assert!(hand.is_detected());
    assert!(!other.is_detected());
    hand.finger_count()
}

#[test]
fn test_fist_presses_and_open_hand_releases() {
    let settings = test_settings();
    let expected_fingers = probe_finger_count(&settings);
    assert!(
        (2..=4).contains(&expected_fingers),
        "synthetic hand should show about three fingers, got {expected_fingers}"
    );

    let mut engine = GestureEngine::new(&settings);

    // Train the background model on the empty scene.
    engine.toggle_background_training();
    for _ in 0..3 {
        assert!(engine.update(&blank_frame()).is_empty());
    }
    engine.toggle_background_training();
    engine.toggle_recognition();

    // The first full batch only establishes the reference hand.
    for _ in 0..3 {
        assert!(engine.update(&open_hand_frame()).is_empty());
    }

    // A fist presses every previously extended finger.
    let mut clicks = Vec::new();
    for _ in 0..3 {
        clicks = engine.update(&fist_frame());
    }
    assert_eq!(clicks.len(), expected_fingers);

    // Raising the fingers again releases everything.
    for _ in 0..3 {
        clicks = engine.update(&open_hand_frame());
    }
    assert!(clicks.is_empty());
}

#[test]
fn test_empty_scene_never_clicks() {
    let mut engine = GestureEngine::new(&test_settings());
    engine.toggle_background_training();
    engine.update(&blank_frame());
    engine.toggle_background_training();
    engine.toggle_recognition();
    for _ in 0..9 {
        assert!(engine.update(&blank_frame()).is_empty());
    }
}
