//! Viewport and input engine for the collaborative sticky-note canvas.
//!
//! This crate is the pure, I/O-free half of the client: it turns raw pointer,
//! wheel, touch, and keyboard input into camera mutations over an infinite
//! world coordinate space, and rate-limits outgoing presence. The host layer
//! is responsible only for feeding events in and shipping the resulting
//! world-space coordinates out over the wire.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`camera`] | Pan/zoom camera and screen↔world conversions |
//! | [`gesture`] | The gesture controller: wheel, touch, drag, keyboard |
//! | [`input`] | Input event types and the per-channel gesture states |
//! | [`hit`] | Registry of draggable entities that pre-empt canvas gestures |
//! | [`throttle`] | Presence throttler for outgoing cursor positions |
//! | [`consts`] | Shared numeric constants (zoom limits, step sizes, etc.) |

pub mod camera;
pub mod consts;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod throttle;
