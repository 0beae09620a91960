//! Input model: pointer buttons, active pointer tracking, and the gesture
//! state machine.
//!
//! A gesture starts as a pending tap on pointer-down. It is reclassified —
//! irreversibly for its lifetime — to a drag once squared displacement from
//! the start point reaches [`crate::consts::DRAG_RANGE`], or to a pinch-zoom
//! the moment a second pointer lands. Squared distances are never
//! square-rooted; both the drag threshold and the zoom ratio compare the
//! same proxy metric, so the comparisons stay internally consistent.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;

/// Device-assigned pointer identifier, as reported by pointer events.
pub type PointerId = i32;

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, pen contact, or touch.
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// One currently-active pointer: where it went down and where it is now.
#[derive(Debug, Clone, Copy)]
pub struct ActivePointer {
    pub start: Point,
    pub current: Point,
}

/// Squared Euclidean distance between two points.
#[must_use]
pub fn dist_sq(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

/// The active gesture, carrying per-variant context for delta computation.
///
/// At most one drag is active at a time; a zoom requires exactly two
/// concurrent pointers. Starting either while the other is active first
/// terminates the other cleanly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// One pointer down, displacement still under the drag threshold.
    /// A primary-button release from here is a paint intent.
    PendingTap {
        /// The pointer that started the gesture.
        pointer: PointerId,
        /// Screen position at pointer-down, the displacement origin.
        start: Point,
    },
    /// One pointer down and moving the viewport. Never reverts to a tap.
    Dragging {
        /// The pointer that owns the drag.
        pointer: PointerId,
        /// Position at the previous event, used for incremental pan deltas.
        last: Point,
    },
    /// Two pointers pinching. Scale follows the ratio of the current squared
    /// inter-pointer distance to the squared distance at zoom start.
    Zooming {
        /// First participating pointer.
        a: PointerId,
        /// Second participating pointer.
        b: PointerId,
        /// Squared inter-pointer distance when the zoom began.
        start_dist_sq: f64,
        /// Viewport scale when the zoom began; candidates derive from this.
        start_scale: i32,
    },
}

impl Default for GestureState {
    fn default() -> Self {
        Self::Idle
    }
}

impl GestureState {
    /// Whether the gesture involves the given pointer.
    #[must_use]
    pub fn involves(&self, id: PointerId) -> bool {
        match self {
            Self::Idle => false,
            Self::PendingTap { pointer, .. } | Self::Dragging { pointer, .. } => *pointer == id,
            Self::Zooming { a, b, .. } => *a == id || *b == id,
        }
    }
}
