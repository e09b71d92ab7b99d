//! Pan/zoom viewport over the infinite sketch canvas.
//!
//! The viewport maps world coordinates onto the rendering surface with
//! `screen = world * scale + offset`. Every scale mutation is clamped to
//! [`MIN_SCALE`, `MAX_SCALE`]; nothing here can fail.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{BUTTON_ZOOM_STEP, MAX_SCALE, MIN_SCALE};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Viewport state for pan/zoom on the infinite canvas.
///
/// `offset` is in screen pixels and applied after `scale`.
/// `surface_width` / `surface_height` are the reported size of the rendering
/// surface; zero means "not yet laid out".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: Point,
    pub scale: f64,
    pub surface_width: f64,
    pub surface_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { offset: Point::default(), scale: 1.0, surface_width: 0.0, surface_height: 0.0 }
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

impl Viewport {
    /// Record the size of the rendering surface.
    pub fn set_surface(&mut self, width: f64, height: f64) {
        self.surface_width = width.max(0.0);
        self.surface_height = height.max(0.0);
    }

    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn to_world(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.offset.x) / self.scale, y: (screen.y - self.offset.y) / self.scale }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Point) -> Point {
        Point { x: world.x * self.scale + self.offset.x, y: world.y * self.scale + self.offset.y }
    }

    /// Convert a screen-space distance to a world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// Multiply the scale by `scale_delta`, keeping the world point under
    /// `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, scale_delta: f64) {
        let world = self.to_world(anchor);
        self.scale = clamp_scale(self.scale * scale_delta);
        self.offset = Point { x: anchor.x - world.x * self.scale, y: anchor.y - world.y * self.scale };
    }

    /// Multiply the scale by a pinch ratio. The offset is left alone, so the
    /// view zooms about the surface origin rather than the fingers.
    pub fn zoom_pinch(&mut self, ratio: f64) {
        if !ratio.is_finite() || ratio <= 0.0 {
            return;
        }
        self.scale = clamp_scale(self.scale * ratio);
    }

    /// Set an explicit scale, clamped.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = clamp_scale(scale);
    }

    /// Step the scale up by [`BUTTON_ZOOM_STEP`].
    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale * BUTTON_ZOOM_STEP);
    }

    /// Step the scale down by [`BUTTON_ZOOM_STEP`].
    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale / BUTTON_ZOOM_STEP);
    }

    /// Reset the scale to 1 and recenter.
    ///
    /// With a focus point, the offset puts that world point at the middle of
    /// the surface. Without one, the world origin lands a quarter of the way
    /// into the surface. A surface that has not been laid out keeps its
    /// offset.
    pub fn reset_and_center(&mut self, focus: Option<Point>) {
        self.scale = 1.0;
        if self.surface_width <= 0.0 || self.surface_height <= 0.0 {
            return;
        }
        self.offset = match focus {
            Some(world) => Point { x: self.surface_width / 2.0 - world.x, y: self.surface_height / 2.0 - world.y },
            None => Point { x: self.surface_width / 4.0, y: self.surface_height / 4.0 },
        };
    }

    /// Scale as a rounded percentage, e.g. `120` for 1.2.
    #[must_use]
    pub fn zoom_percent(&self) -> u32 {
        // Scale is clamped to [0.1, 5.0], so the product always fits.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (self.scale * 100.0).round() as u32;
        pct
    }
}
