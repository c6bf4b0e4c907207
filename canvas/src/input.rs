//! Input model: modifier keys, mouse buttons, wheel deltas, and the
//! per-channel gesture states.
//!
//! Each input channel (wheel, touch, middle-button drag, keyboard) drives
//! its own independent state machine; [`GestureState`] is the active gesture
//! tracked between press and release, carrying all context needed to compute
//! incremental deltas and apply momentum on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform zoom modifier (ctrl or meta) is held.
    #[must_use]
    pub fn zoom_held(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click). Pans the canvas.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// The active gesture being tracked between press and release.
#[derive(Debug, Clone, Copy)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next press.
    Idle,
    /// Middle-button drag pan.
    Panning {
        /// Screen position of the button-down, for cumulative deltas.
        start_screen: Point,
        /// Camera pan at button-down.
        start_pan: Point,
    },
    /// Single-finger touch pan.
    TouchPanning {
        /// Touch position at gesture start.
        start_touch: Point,
        /// Camera pan at gesture start.
        start_pan: Point,
        /// Previous touch sample, for velocity tracking.
        last_touch: Point,
        /// Timestamp of the previous sample in milliseconds.
        last_ms: f64,
        /// Latest sampled velocity in screen px per ms, for momentum.
        velocity: Point,
    },
    /// Two-finger pinch zoom.
    Pinching {
        /// Inter-finger distance at pinch start.
        start_dist: f64,
        /// Camera zoom at pinch start.
        start_zoom: f64,
        /// Finger midpoint at pinch start.
        start_mid: Point,
        /// Camera pan at pinch start.
        start_pan: Point,
    },
}

impl Default for GestureState {
    fn default() -> Self {
        Self::Idle
    }
}
