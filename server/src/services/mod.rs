//! Domain services used by the websocket relay.
//!
//! ARCHITECTURE
//! ============
//! Service modules own registry state transitions so the route handlers can
//! stay focused on protocol translation and fan-out plumbing.

pub mod room;
