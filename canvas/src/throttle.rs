//! Presence throttler for outgoing cursor positions.
//!
//! At most one emission per interval regardless of input rate; the most
//! recent position always wins. This is throttling, not buffering — stale
//! positions are overwritten, never queued. The caller supplies the clock,
//! so the type stays pure and deterministic under test.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

use crate::camera::Point;
use crate::consts::CURSOR_EMIT_INTERVAL_MS;

/// Rate-limiter for a stream of pointer positions.
#[derive(Debug)]
pub struct PresenceThrottler {
    interval_ms: f64,
    last_emit_ms: Option<f64>,
    pending: Option<Point>,
}

impl PresenceThrottler {
    /// Throttler with a custom interval, for tests and tuning.
    #[must_use]
    pub fn with_interval(interval_ms: f64) -> Self {
        Self { interval_ms, last_emit_ms: None, pending: None }
    }

    /// Offer the latest pointer position. Returns the position to emit now,
    /// or `None` when inside the quiet interval (the position is retained
    /// as pending and a later [`flush`](Self::flush) will release the most
    /// recent one).
    pub fn offer(&mut self, pos: Point, now_ms: f64) -> Option<Point> {
        if self.ready(now_ms) {
            self.last_emit_ms = Some(now_ms);
            self.pending = None;
            Some(pos)
        } else {
            self.pending = Some(pos);
            None
        }
    }

    /// Release the pending position if the interval has elapsed. Call on a
    /// timer tick so the final position of a burst is never lost.
    pub fn flush(&mut self, now_ms: f64) -> Option<Point> {
        if self.pending.is_some() && self.ready(now_ms) {
            self.last_emit_ms = Some(now_ms);
            self.pending.take()
        } else {
            None
        }
    }

    /// Whether a position is waiting for the next interval.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn ready(&self, now_ms: f64) -> bool {
        self.last_emit_ms.map_or(true, |last| now_ms - last >= self.interval_ms)
    }
}

impl Default for PresenceThrottler {
    fn default() -> Self {
        Self::with_interval(CURSOR_EMIT_INTERVAL_MS)
    }
}
