//! The gesture controller: raw input in, camera mutations out.
//!
//! DESIGN
//! ======
//! Every zoom trigger — modifier+wheel, pinch, keyboard — funnels through
//! the camera's single zoom-toward-point primitive so the content under the
//! cursor/pinch-center/viewport-center stays visually fixed. Pointer
//! dispatch first consults the [`HitRegistry`]; an event that originated on
//! a registered draggable entity is yielded entirely to that entity's own
//! handler and never pans the canvas.
//!
//! All methods run on the UI thread and mutate `&mut self` directly; there
//! is no locking at this layer.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::camera::{Camera, Point};
use crate::consts::{
    KEY_PAN_STEP_PX, KEY_ZOOM_FACTOR, MOMENTUM_MIN_VELOCITY, MOMENTUM_PROJECTION_MS,
    WHEEL_ZOOM_SENSITIVITY,
};
use crate::hit::HitRegistry;
use crate::input::{Button, GestureState, Modifiers, WheelDelta};

/// Translates wheel, touch, middle-button drag, and keyboard input into
/// camera mutations.
#[derive(Debug, Default)]
pub struct GestureController {
    pub camera: Camera,
    state: GestureState,
    viewport_width: f64,
    viewport_height: f64,
}

impl GestureController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the viewport dimensions. Must be called on every resize so
    /// keyboard zoom-to-center and the degenerate-cursor path stay accurate.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// The screen-space point at the center of the current viewport.
    #[must_use]
    pub fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width * 0.5, self.viewport_height * 0.5)
    }

    /// The active gesture, for diagnostics.
    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Convert a screen point to world space.
    ///
    /// Degenerate case: before the viewport has been mounted (zero-sized),
    /// returns the world origin instead of a garbage conversion.
    #[must_use]
    pub fn cursor_world(&self, screen: Point) -> Point {
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return Point::default();
        }
        self.camera.screen_to_world(screen)
    }

    // --- Wheel ---

    /// Wheel scroll: pan without a modifier, zoom toward the wheel point
    /// with ctrl/meta held.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers) {
        if modifiers.zoom_held() {
            let factor = (-delta.dy * WHEEL_ZOOM_SENSITIVITY).exp();
            self.camera.zoom_to_point(screen, self.camera.zoom * factor);
        } else {
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
    }

    // --- Middle-button drag ---

    /// Pointer press. Returns `false` when the event is not consumed: a
    /// press on a registered draggable entity yields to that entity's own
    /// drag handler, and non-middle buttons are not canvas gestures.
    pub fn on_pointer_down(
        &mut self,
        screen: Point,
        button: Button,
        target: Option<&str>,
        hits: &HitRegistry,
    ) -> bool {
        if let Some(id) = target {
            if hits.is_draggable(id) {
                return false;
            }
        }
        if button != Button::Middle {
            return false;
        }
        self.state = GestureState::Panning {
            start_screen: screen,
            start_pan: Point::new(self.camera.pan_x, self.camera.pan_y),
        };
        true
    }

    /// Pointer move. Pans by the cumulative delta while a middle-button
    /// drag is active; returns whether the camera changed.
    pub fn on_pointer_move(&mut self, screen: Point) -> bool {
        let GestureState::Panning { start_screen, start_pan } = self.state else {
            return false;
        };
        self.camera.pan_x = start_pan.x + (screen.x - start_screen.x);
        self.camera.pan_y = start_pan.y + (screen.y - start_screen.y);
        true
    }

    /// Pointer release ends a middle-button pan.
    pub fn on_pointer_up(&mut self, button: Button) {
        if button == Button::Middle && matches!(self.state, GestureState::Panning { .. }) {
            self.state = GestureState::Idle;
        }
    }

    /// Pointer leaving the canvas ends a middle-button pan.
    pub fn on_pointer_leave(&mut self) {
        if matches!(self.state, GestureState::Panning { .. }) {
            self.state = GestureState::Idle;
        }
    }

    // --- Touch ---

    /// A finger went down; `touches` is the full active set afterwards.
    /// One finger starts a pan, a second aborts the pan and starts a pinch.
    /// A touch that starts on a registered draggable entity is yielded.
    pub fn on_touch_start(
        &mut self,
        touches: &[Point],
        now_ms: f64,
        target: Option<&str>,
        hits: &HitRegistry,
    ) -> bool {
        if let Some(id) = target {
            if hits.is_draggable(id) {
                return false;
            }
        }
        match touches {
            [touch] => {
                self.state = GestureState::TouchPanning {
                    start_touch: *touch,
                    start_pan: Point::new(self.camera.pan_x, self.camera.pan_y),
                    last_touch: *touch,
                    last_ms: now_ms,
                    velocity: Point::default(),
                };
                true
            }
            [a, b, ..] => {
                self.state = GestureState::Pinching {
                    start_dist: dist(*a, *b),
                    start_zoom: self.camera.zoom,
                    start_mid: midpoint(*a, *b),
                    start_pan: Point::new(self.camera.pan_x, self.camera.pan_y),
                };
                true
            }
            [] => false,
        }
    }

    /// Fingers moved. Single-finger pans and samples velocity for momentum;
    /// two fingers pan by midpoint travel and zoom toward the live midpoint.
    pub fn on_touch_move(&mut self, touches: &[Point], now_ms: f64) -> bool {
        match (&mut self.state, touches) {
            (
                GestureState::TouchPanning { start_touch, start_pan, last_touch, last_ms, velocity },
                [touch],
            ) => {
                let dt = now_ms - *last_ms;
                if dt > 0.0 {
                    *velocity = Point::new(
                        (touch.x - last_touch.x) / dt,
                        (touch.y - last_touch.y) / dt,
                    );
                }
                *last_touch = *touch;
                *last_ms = now_ms;
                self.camera.pan_x = start_pan.x + (touch.x - start_touch.x);
                self.camera.pan_y = start_pan.y + (touch.y - start_touch.y);
                true
            }
            (GestureState::Pinching { start_dist, start_zoom, start_mid, start_pan }, [a, b, ..]) => {
                let mid = midpoint(*a, *b);
                self.camera.pan_x = start_pan.x + (mid.x - start_mid.x);
                self.camera.pan_y = start_pan.y + (mid.y - start_mid.y);
                if *start_dist > 0.0 {
                    let requested = *start_zoom * dist(*a, *b) / *start_dist;
                    self.camera.zoom_to_point(mid, requested);
                }
                true
            }
            _ => false,
        }
    }

    /// A finger lifted; `touches` is the set still down. Releasing the last
    /// finger from a pan applies momentum when the final velocity exceeds
    /// the threshold; dropping from a pinch to one finger re-anchors a pan.
    pub fn on_touch_end(&mut self, touches: &[Point], now_ms: f64) {
        match touches {
            [] => {
                if let GestureState::TouchPanning { velocity, .. } = &self.state {
                    let velocity = *velocity;
                    let speed = (velocity.x * velocity.x + velocity.y * velocity.y).sqrt();
                    if speed > MOMENTUM_MIN_VELOCITY {
                        self.camera.pan_by(
                            velocity.x * MOMENTUM_PROJECTION_MS,
                            velocity.y * MOMENTUM_PROJECTION_MS,
                        );
                    }
                }
                self.state = GestureState::Idle;
            }
            [touch] => {
                self.state = GestureState::TouchPanning {
                    start_touch: *touch,
                    start_pan: Point::new(self.camera.pan_x, self.camera.pan_y),
                    last_touch: *touch,
                    last_ms: now_ms,
                    velocity: Point::default(),
                };
            }
            _ => {}
        }
    }

    // --- Keyboard ---

    /// Key press. Arrows pan, modifier+plus/minus zoom to center,
    /// modifier+0 resets the camera. Ignored entirely while focus is inside
    /// a text input. Returns whether the key was consumed.
    pub fn on_key_down(&mut self, key: &str, modifiers: Modifiers, in_text_input: bool) -> bool {
        if in_text_input {
            return false;
        }
        match key {
            "ArrowLeft" => {
                self.camera.pan_by(KEY_PAN_STEP_PX, 0.0);
                true
            }
            "ArrowRight" => {
                self.camera.pan_by(-KEY_PAN_STEP_PX, 0.0);
                true
            }
            "ArrowUp" => {
                self.camera.pan_by(0.0, KEY_PAN_STEP_PX);
                true
            }
            "ArrowDown" => {
                self.camera.pan_by(0.0, -KEY_PAN_STEP_PX);
                true
            }
            "+" | "=" if modifiers.zoom_held() => {
                self.zoom_to_center(self.camera.zoom * KEY_ZOOM_FACTOR);
                true
            }
            "-" if modifiers.zoom_held() => {
                self.zoom_to_center(self.camera.zoom / KEY_ZOOM_FACTOR);
                true
            }
            "0" if modifiers.zoom_held() => {
                self.camera = Camera::default();
                true
            }
            _ => false,
        }
    }

    /// Zoom toward the viewport center.
    pub fn zoom_to_center(&mut self, requested_zoom: f64) {
        self.camera.zoom_to_point(self.viewport_center(), requested_zoom);
    }
}

fn dist(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}
