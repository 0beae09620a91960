//! Event-driven input engine: raw pointer/wheel events in, [`Action`]s out.
//!
//! The engine owns the viewport and the gesture state machine. The host
//! feeds it pointer events exactly as the browser reports them and reacts
//! to the returned action: re-apply the CSS transform on
//! [`Action::ViewportChanged`], hand [`Action::Tapped`] to the session's
//! paint path. All handlers run on the host's single event-handling context;
//! nothing here blocks or suspends.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use crate::camera::{Point, Viewport};
use crate::consts::{DRAG_RANGE, WHEEL_STEP};
use crate::input::{ActivePointer, Button, GestureState, PointerId, dist_sq};

/// What the host must do after feeding the engine one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Nothing to do.
    None,
    /// The viewport transform changed; re-apply
    /// [`Viewport::css_transform`] to the canvas element.
    ViewportChanged,
    /// A tap resolved to a grid cell. Coordinates are unclamped; the
    /// session's paint path clamps them into the grid before emitting.
    Tapped { grid_x: i64, grid_y: i64 },
}

/// Gesture and viewport state for one client.
#[derive(Debug, Default)]
pub struct InputEngine {
    pub viewport: Viewport,
    gesture: GestureState,
    pointers: HashMap<PointerId, ActivePointer>,
}

impl InputEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active gesture, for host-side cursor feedback.
    #[must_use]
    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// Number of currently active pointers.
    #[must_use]
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// Pointer-down: start a pending tap, or reclassify to a pinch-zoom the
    /// moment a second pointer lands. Reclassification terminates any
    /// in-progress tap or drag; pan already applied by a drag is kept.
    pub fn on_pointer_down(&mut self, id: PointerId, at: Point, _button: Button) -> Action {
        self.pointers.insert(id, ActivePointer { start: at, current: at });

        match self.pointers.len() {
            1 => {
                self.gesture = GestureState::PendingTap { pointer: id, start: at };
                Action::None
            }
            2 => {
                let mut ids = self.pointers.keys();
                let (Some(&a), Some(&b)) = (ids.next(), ids.next()) else {
                    return Action::None;
                };
                let start = dist_sq(self.pointers[&a].current, self.pointers[&b].current);
                self.gesture = GestureState::Zooming {
                    a,
                    b,
                    start_dist_sq: start,
                    start_scale: self.viewport.scale(),
                };
                Action::None
            }
            // Third and further pointers are ignored; the zoom keeps its
            // original pair.
            _ => Action::None,
        }
    }

    /// Pointer-move: accumulate tap displacement, pan incrementally while
    /// dragging, or recompute the pinch scale candidate.
    pub fn on_pointer_move(&mut self, id: PointerId, at: Point) -> Action {
        let Some(pointer) = self.pointers.get_mut(&id) else {
            return Action::None;
        };
        pointer.current = at;

        match self.gesture {
            GestureState::PendingTap { pointer, start } if pointer == id => {
                if dist_sq(start, at) >= DRAG_RANGE {
                    // Irreversible reclassification: apply the displacement
                    // accumulated so far and keep panning incrementally.
                    self.viewport.pan_by(at.x - start.x, at.y - start.y);
                    self.gesture = GestureState::Dragging { pointer: id, last: at };
                    Action::ViewportChanged
                } else {
                    Action::None
                }
            }
            GestureState::Dragging { pointer, last } if pointer == id => {
                self.viewport.pan_by(at.x - last.x, at.y - last.y);
                self.gesture = GestureState::Dragging { pointer: id, last: at };
                Action::ViewportChanged
            }
            GestureState::Zooming { a, b, start_dist_sq, start_scale } if a == id || b == id => {
                let (Some(pa), Some(pb)) = (self.pointers.get(&a), self.pointers.get(&b)) else {
                    return Action::None;
                };
                let ratio = dist_sq(pa.current, pb.current) / start_dist_sq;
                #[allow(clippy::cast_possible_truncation)]
                let candidate = (f64::from(start_scale) * ratio).round() as i32;
                self.viewport.set_scale(candidate);
                Action::ViewportChanged
            }
            _ => Action::None,
        }
    }

    /// Pointer-up: a still-pending tap released with the primary button is a
    /// paint intent at the release coordinates. A drag commits its final
    /// delta; a zoom ends, keeping the last clamped scale as the baseline.
    pub fn on_pointer_up(&mut self, id: PointerId, at: Point, button: Button) -> Action {
        self.pointers.remove(&id);

        if !self.gesture.involves(id) {
            return Action::None;
        }

        match self.gesture {
            GestureState::PendingTap { .. } => {
                self.gesture = GestureState::Idle;
                if button == Button::Primary {
                    let (grid_x, grid_y) = self.viewport.screen_to_grid(at);
                    Action::Tapped { grid_x, grid_y }
                } else {
                    Action::None
                }
            }
            GestureState::Dragging { last, .. } => {
                self.viewport.pan_by(at.x - last.x, at.y - last.y);
                self.gesture = GestureState::Idle;
                Action::ViewportChanged
            }
            GestureState::Zooming { .. } => {
                // Scale was committed on every move; dropping below two
                // pointers just ends the gesture. A pointer that stays down
                // is idle until it is released or a new pointer joins it.
                self.gesture = GestureState::Idle;
                Action::None
            }
            GestureState::Idle => Action::None,
        }
    }

    /// Pointer-cancel: destroy the pointer and end any gesture it owned.
    /// No paint intent is generated; pan already applied is kept.
    pub fn on_pointer_cancel(&mut self, id: PointerId) -> Action {
        self.pointers.remove(&id);
        if self.gesture.involves(id) {
            self.gesture = GestureState::Idle;
        }
        Action::None
    }

    /// Wheel zoom: one scale tick per notch, clamped, committed immediately.
    pub fn on_wheel(&mut self, delta_y: f64) -> Action {
        let step = if delta_y < 0.0 { WHEEL_STEP } else { -WHEEL_STEP };
        self.viewport.set_scale(self.viewport.scale() + step);
        Action::ViewportChanged
    }
}
