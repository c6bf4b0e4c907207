//! Room service — membership transitions and fan-out.
//!
//! DESIGN
//! ======
//! The room map is the whole of the relay's state. Joining inserts a
//! participant under its connection id (replacing any previous entry for
//! that connection — duplicate joins never duplicate membership); parting
//! removes it and evicts the room when it empties. Broadcast resolves
//! "which connections are my room-mates right now" and performs
//! non-blocking sends to their outbound queues. Nothing here blocks on
//! anything slower than a channel.

use rand::Rng;
use tracing::info;
use uuid::Uuid;

use wire::Envelope;

use crate::state::{AppState, Participant, RoomState};

/// Fallback palette for joiners that supply no cursor color.
const CURSOR_COLORS: &[&str] = &[
    "#E53935", "#8E24AA", "#3949AB", "#039BE5", "#00897B", "#7CB342", "#FDD835", "#FB8C00",
];

/// Pick a fallback cursor color for a joiner that supplied none.
#[must_use]
pub fn fallback_cursor_color() -> String {
    let idx = rand::rng().random_range(0..CURSOR_COLORS.len());
    CURSOR_COLORS[idx].to_owned()
}

// =============================================================================
// JOIN / PART
// =============================================================================

/// Add a connection to a room, replacing any previous entry for the same
/// connection id. Returns the number of members after the join.
pub async fn join_room(state: &AppState, room_id: &str, conn_id: Uuid, participant: Participant) -> usize {
    let mut rooms = state.rooms.write().await;
    let room = rooms.entry(room_id.to_owned()).or_insert_with(RoomState::new);
    room.participants.insert(conn_id, participant);
    let members = room.participants.len();
    info!(%conn_id, room_id, members, "participant joined room");
    members
}

/// Remove a connection from a room, evicting the room when it empties.
/// Returns the removed participant so the caller can announce the leave;
/// `None` when the connection was not a member.
pub async fn part_room(state: &AppState, room_id: &str, conn_id: Uuid) -> Option<Participant> {
    let mut rooms = state.rooms.write().await;
    let room = rooms.get_mut(room_id)?;
    let removed = room.participants.remove(&conn_id);
    if removed.is_some() {
        info!(%conn_id, room_id, remaining = room.participants.len(), "participant left room");
    }
    if room.participants.is_empty() {
        rooms.remove(room_id);
        info!(room_id, "evicted empty room");
    }
    removed
}

/// Number of connections currently joined to a room.
pub async fn room_size(state: &AppState, room_id: &str) -> usize {
    let rooms = state.rooms.read().await;
    rooms.get(room_id).map_or(0, |room| room.participants.len())
}

// =============================================================================
// BROADCAST
// =============================================================================

/// Fan an envelope out to every connection in a room, optionally excluding
/// one (normally the sender).
pub async fn broadcast(state: &AppState, room_id: &str, envelope: &Envelope, exclude: Option<Uuid>) {
    let rooms = state.rooms.read().await;
    let Some(room) = rooms.get(room_id) else {
        return;
    };

    for (conn_id, participant) in &room.participants {
        if exclude == Some(*conn_id) {
            continue;
        }
        // Best-effort: a peer with a full queue misses this event.
        let _ = participant.tx.try_send(envelope.clone());
    }
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
