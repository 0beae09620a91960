#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use tiles::TILE_SIZE;

use crate::consts::{BASE_SCALE, ZOOM_MAX, ZOOM_MIN};

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Clamp a scale candidate into the allowed zoom range. Total function.
#[must_use]
pub fn clamp_scale(candidate: i32) -> i32 {
    candidate.clamp(ZOOM_MIN, ZOOM_MAX)
}

/// Per-client pan/zoom transform.
///
/// `translate_x` / `translate_y` are in CSS pixels. `scale` is an integer in
/// tenths (`BASE_SCALE` = 1:1), always inside `[ZOOM_MIN, ZOOM_MAX]`. The
/// host must keep the displayed canvas transform equal to
/// `translate(x,y) scale(scale/BASE_SCALE)` — see [`Viewport::css_transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub translate_x: f64,
    pub translate_y: f64,
    scale: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { translate_x: 0.0, translate_y: 0.0, scale: BASE_SCALE }
    }
}

impl Viewport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scale in tenths.
    #[must_use]
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Effective zoom factor (1.0 = no zoom).
    #[must_use]
    pub fn zoom_factor(&self) -> f64 {
        f64::from(self.scale) / f64::from(BASE_SCALE)
    }

    /// Invert the translate+scale transform, then floor-divide by the tile
    /// size. Out-of-bounds results are valid output; rejection happens at the
    /// paint-validation boundary.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn screen_to_grid(&self, screen: Point) -> (i64, i64) {
        let factor = self.zoom_factor();
        let world_x = (screen.x - self.translate_x) / factor;
        let world_y = (screen.y - self.translate_y) / factor;
        (
            (world_x / f64::from(TILE_SIZE)).floor() as i64,
            (world_y / f64::from(TILE_SIZE)).floor() as i64,
        )
    }

    /// Shift the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Set the scale, clamping into the allowed zoom range.
    pub fn set_scale(&mut self, candidate: i32) {
        self.scale = clamp_scale(candidate);
    }

    /// The CSS transform the host must apply to the canvas element.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate_x,
            self.translate_y,
            self.zoom_factor()
        )
    }
}
