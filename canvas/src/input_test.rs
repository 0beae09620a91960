#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// dist_sq
// =============================================================

#[test]
fn dist_sq_zero_for_same_point() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(dist_sq(p, p), 0.0);
}

#[test]
fn dist_sq_is_squared_euclidean() {
    // 3-4-5 triangle: squared distance is 25, never square-rooted.
    assert_eq!(dist_sq(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 25.0);
}

#[test]
fn dist_sq_symmetric() {
    let a = Point::new(-2.0, 7.0);
    let b = Point::new(5.0, -1.0);
    assert_eq!(dist_sq(a, b), dist_sq(b, a));
}

#[test]
fn dist_sq_drag_threshold_example() {
    // (100,100) -> (130,124): 30^2 + 24^2 = 1476.
    assert_eq!(
        dist_sq(Point::new(100.0, 100.0), Point::new(130.0, 124.0)),
        1476.0
    );
}

// =============================================================
// GestureState
// =============================================================

#[test]
fn default_gesture_is_idle() {
    assert_eq!(GestureState::default(), GestureState::Idle);
}

#[test]
fn idle_involves_no_pointer() {
    assert!(!GestureState::Idle.involves(0));
    assert!(!GestureState::Idle.involves(7));
}

#[test]
fn pending_tap_involves_only_its_pointer() {
    let g = GestureState::PendingTap { pointer: 3, start: Point::new(0.0, 0.0) };
    assert!(g.involves(3));
    assert!(!g.involves(4));
}

#[test]
fn dragging_involves_only_its_pointer() {
    let g = GestureState::Dragging { pointer: 1, last: Point::new(5.0, 5.0) };
    assert!(g.involves(1));
    assert!(!g.involves(2));
}

#[test]
fn zooming_involves_both_pointers() {
    let g = GestureState::Zooming { a: 1, b: 2, start_dist_sq: 100.0, start_scale: 10 };
    assert!(g.involves(1));
    assert!(g.involves(2));
    assert!(!g.involves(3));
}

// =============================================================
// Button
// =============================================================

#[test]
fn button_equality() {
    assert_eq!(Button::Primary, Button::Primary);
    assert_ne!(Button::Primary, Button::Secondary);
    assert_ne!(Button::Middle, Button::Secondary);
}
