//! Shared numeric constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Lower zoom bound. Every zoom path clamps into `[MIN_ZOOM, MAX_ZOOM]`.
pub const MIN_ZOOM: f64 = 0.1;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 8.0;

/// Exponential zoom factor applied per wheel pixel when the zoom modifier
/// is held: `zoom *= exp(-dy * WHEEL_ZOOM_SENSITIVITY)`.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.0015;

/// Multiplicative step for keyboard zoom in/out.
pub const KEY_ZOOM_FACTOR: f64 = 1.25;

// ── Pan ─────────────────────────────────────────────────────────

/// Screen pixels panned per arrow-key press (or key repeat).
pub const KEY_PAN_STEP_PX: f64 = 48.0;

/// Minimum release velocity (screen px per ms) before pan momentum kicks in.
pub const MOMENTUM_MIN_VELOCITY: f64 = 0.05;

/// Milliseconds of travel the release velocity is projected forward by.
pub const MOMENTUM_PROJECTION_MS: f64 = 160.0;

// ── Presence ────────────────────────────────────────────────────

/// Minimum interval between outgoing cursor-position events.
pub const CURSOR_EMIT_INTERVAL_MS: f64 = 50.0;
