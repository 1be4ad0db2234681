use glam::Vec2;
use guillemot_surface::{BoundingBox, InputTracker, SharedInput};

#[test]
fn test_pointer_is_relative_to_surface() {
    let bounds = BoundingBox::new(Vec2::new(30.0, 15.0), Vec2::new(800.0, 600.0));
    let mut tracker = InputTracker::new(Vec2::new(600.0, 600.0));

    tracker.pointer_moved(Vec2::new(150.0, 60.0), &bounds);
    let state = tracker.snapshot();
    assert_eq!(state.pointer.position, Vec2::new(120.0, 45.0));
    assert!(!state.pointer.down);
}

#[test]
fn test_pointer_down_up() {
    let mut tracker = InputTracker::default();
    tracker.pointer_down();
    assert!(tracker.snapshot().pointer.down);
    tracker.pointer_up();
    assert!(!tracker.snapshot().pointer.down);
}

#[test]
fn test_viewport_refresh_overwrites() {
    let mut tracker = InputTracker::new(Vec2::new(600.0, 600.0));
    assert_eq!(tracker.snapshot().viewport, Vec2::new(600.0, 600.0));

    let bounds = BoundingBox::new(Vec2::new(5.0, 5.0), Vec2::new(1024.0, 768.0));
    tracker.refresh_viewport(&bounds);
    assert_eq!(tracker.snapshot().viewport, Vec2::new(1024.0, 768.0));
}

#[test]
fn test_snapshot_is_not_retroactive() {
    let bounds = BoundingBox::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
    let shared = SharedInput::default();

    shared.pointer_moved(Vec2::new(1.0, 2.0), &bounds);
    let taken = shared.snapshot();
    shared.pointer_moved(Vec2::new(50.0, 60.0), &bounds);

    assert_eq!(taken.pointer.position, Vec2::new(1.0, 2.0));
    assert_eq!(shared.snapshot().pointer.position, Vec2::new(50.0, 60.0));
}

#[test]
fn test_shared_input_across_threads() {
    let bounds = BoundingBox::new(Vec2::ZERO, Vec2::new(100.0, 100.0));
    let shared = SharedInput::default();

    let writer = shared.clone();
    std::thread::spawn(move || {
        writer.pointer_moved(Vec2::new(7.0, 8.0), &bounds);
        writer.pointer_down();
    })
    .join()
    .unwrap();

    let state = shared.snapshot();
    assert_eq!(state.pointer.position, Vec2::new(7.0, 8.0));
    assert!(state.pointer.down);
}
