//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the live room registry: for each room id, the set of currently
//! connected participants keyed by connection id, each with its outbound
//! queue. The relay is a volatile fan-out layer — nothing here survives the
//! last disconnect, and durability is entirely the external store's job.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use wire::Envelope;

/// Capacity of each connection's outbound queue. Fan-out uses non-blocking
/// sends; a peer that falls this far behind misses events.
pub const OUTBOUND_QUEUE: usize = 256;

// =============================================================================
// PARTICIPANT
// =============================================================================

/// One live connection's identity within a room, plus its outbound queue.
///
/// `participant_id` is the application-level durable identity supplied at
/// join; the connection id (the map key in [`RoomState`]) is transport-level
/// and never leaves the server.
#[derive(Debug, Clone)]
pub struct Participant {
    pub participant_id: String,
    pub display_name: String,
    pub cursor_color: String,
    pub tx: mpsc::Sender<Envelope>,
}

// =============================================================================
// ROOM STATE
// =============================================================================

/// Per-room live membership, keyed by connection id.
///
/// A room exists exactly while at least one connection is joined to it; the
/// registry evicts empty rooms.
#[derive(Debug, Default)]
pub struct RoomState {
    pub participants: HashMap<Uuid, Participant>,
}

impl RoomState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via the State
/// extractor. Clone is required by Axum — the room map is Arc-wrapped.
#[derive(Clone, Default)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<String, RoomState>>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    /// Build a participant with a fresh outbound queue, returning the
    /// receiving end so tests can observe fan-out.
    #[must_use]
    pub fn participant(name: &str) -> (Participant, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE);
        let p = Participant {
            participant_id: format!("user-{name}"),
            display_name: name.to_owned(),
            cursor_color: "#E53935".to_owned(),
            tx,
        };
        (p, rx)
    }
}
