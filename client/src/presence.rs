//! Throttled world-space cursor publishing.
//!
//! Every pointer move passes through the gesture controller's coordinate
//! conversion so the wire only ever carries world-space positions, then
//! through the presence throttler so the relay sees at most one event per
//! interval with the most recent position winning.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use canvas::camera::Point;
use canvas::gesture::GestureController;
use canvas::throttle::PresenceThrottler;

use wire::{CursorMove, Envelope, Event};

use crate::transport::RelaySink;

/// Publishes the local pointer to the room.
#[derive(Debug, Default)]
pub struct PresencePublisher {
    throttler: PresenceThrottler,
}

impl PresencePublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom interval, for tests and tuning.
    #[must_use]
    pub fn with_interval(interval_ms: f64) -> Self {
        Self { throttler: PresenceThrottler::with_interval(interval_ms) }
    }

    /// Feed a raw pointer position in screen space. Converts through the
    /// controller's camera and emits when the throttle allows. Returns
    /// whether an event went out.
    pub fn pointer_moved(
        &mut self,
        controller: &GestureController,
        screen: Point,
        now_ms: f64,
        room_id: &str,
        sink: &dyn RelaySink,
    ) -> bool {
        let world = controller.cursor_world(screen);
        match self.throttler.offer(world, now_ms) {
            Some(pos) => send_cursor(sink, room_id, pos),
            None => false,
        }
    }

    /// Timer tick: release a pending position once the interval elapses so
    /// the final position of a burst is never lost.
    pub fn tick(&mut self, now_ms: f64, room_id: &str, sink: &dyn RelaySink) -> bool {
        match self.throttler.flush(now_ms) {
            Some(pos) => send_cursor(sink, room_id, pos),
            None => false,
        }
    }
}

fn send_cursor(sink: &dyn RelaySink, room_id: &str, pos: Point) -> bool {
    sink.send(Envelope::new(Event::CursorMove(CursorMove { x: pos.x, y: pos.y })).with_room(room_id))
}
