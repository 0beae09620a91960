//! Tuning constants for gestures and zoom.

// ── Gesture classification ──────────────────────────────────────

/// Squared pointer displacement (px²) at which a pending tap becomes a drag.
///
/// Compared against squared distances directly; the proxy is consistent
/// because both sides of every comparison stay squared.
pub const DRAG_RANGE: f64 = 300.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Minimum viewport scale, in tenths (5 = 0.5x).
pub const ZOOM_MIN: i32 = 5;

/// Maximum viewport scale, in tenths (30 = 3.0x).
pub const ZOOM_MAX: i32 = 30;

/// Scale denominator: a scale of `BASE_SCALE` renders 1:1.
pub const BASE_SCALE: i32 = 10;

/// Scale ticks applied per wheel notch.
pub const WHEEL_STEP: i32 = 1;
