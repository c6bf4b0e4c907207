#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM};

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
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in screen pixels. `zoom` is a scale factor
/// (1.0 = no zoom) and is kept within `[MIN_ZOOM, MAX_ZOOM]` by every
/// mutation path.
///
/// Conversions are exact inverses of one another for a fixed camera; no
/// easing or interpolation happens at this layer. Smoothing is a rendering
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (pixels, relative to the viewport
    /// origin) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Zoom toward a screen point, keeping the world point under it
    /// visually fixed.
    ///
    /// The requested zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]` first; the
    /// world point under `target` is captured with the old transform, and
    /// the new pan is solved so that the same world point maps back to
    /// `target` under the new zoom. Every zoom trigger (wheel, pinch,
    /// keyboard) goes through this one primitive.
    pub fn zoom_to_point(&mut self, target: Point, requested_zoom: f64) {
        let new_zoom = requested_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let world = self.screen_to_world(target);
        self.zoom = new_zoom;
        self.pan_x = target.x - world.x * new_zoom;
        self.pan_y = target.y - world.y * new_zoom;
    }
}
