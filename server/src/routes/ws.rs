//! WebSocket handler — the room-scoped event relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a connection id and enters a `select!` loop:
//! - Incoming client frames → parse + dispatch by event variant
//! - Envelopes fanned out by room peers → forward to this client
//!
//! Handler functions are pure business logic — they update the registry and
//! return an `Outcome`. The dispatch layer owns all outbound sends. The
//! relay is stateless with respect to event content: `join_room` is the
//! only event it interprets; everything else is stamped with the sender's
//! identity and room, then forwarded verbatim to room-mates. Events from
//! one connection are forwarded in arrival order; there is no ordering
//! guarantee across connections.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → connection is Unjoined; every non-join event is dropped
//! 2. `join_room` → registry update, `participant_joined` fan-out to the
//!    room (not to the joiner); re-join replaces membership, switching
//!    rooms vacates (and notifies) the previous one
//! 3. Close or network drop → `participant_left` fan-out + cleanup, but
//!    only if the connection had actually joined

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use wire::{Envelope, Event, JoinRoom, ParticipantJoined, ParticipantLeft};

use crate::services::room;
use crate::state::{AppState, OUTBOUND_QUEUE, Participant};

// =============================================================================
// OUTCOME
// =============================================================================

/// Result returned by handler functions. The dispatch layer uses this to
/// decide who receives what — handlers never send frames directly.
enum Outcome {
    /// Relay-originated announcements to fan out, each to its own room,
    /// excluding the acting connection.
    Announce(Vec<(String, Envelope)>),
    /// Forward the stamped inbound envelope to the sender's room-mates.
    Forward(Envelope),
    /// Drop silently (pre-join traffic, invalid join).
    Ignore,
}

/// The room a connection has joined, with the identity declared at join.
struct JoinedRoom {
    room_id: String,
    participant_id: String,
    display_name: String,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();

    // Per-connection queue for envelopes fanned out by room peers.
    let (client_tx, mut client_rx) = mpsc::channel::<Envelope>(OUTBOUND_QUEUE);

    let mut joined: Option<JoinedRoom> = None;

    info!(%conn_id, "ws: connection open");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        process_inbound_text(&state, conn_id, &client_tx, &mut joined, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(envelope) = client_rx.recv() => {
                let json = match serde_json::to_string(&envelope) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(%conn_id, error = %e, "ws: failed to serialize envelope");
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    // Abrupt network drop and explicit close share this one cleanup path.
    // A connection that never joined announces nothing.
    if let Some(session) = joined {
        vacate(&state, conn_id, &session).await;
    }
    info!(%conn_id, "ws: connection closed");
}

/// Remove a connection from its room and announce the leave to room-mates.
async fn vacate(state: &AppState, conn_id: Uuid, session: &JoinedRoom) {
    if room::part_room(state, &session.room_id, conn_id).await.is_some() {
        let left = Envelope::new(Event::ParticipantLeft(ParticipantLeft {
            participant_id: session.participant_id.clone(),
            display_name: session.display_name.clone(),
            room_id: session.room_id.clone(),
        }))
        .with_room(session.room_id.clone());
        room::broadcast(state, &session.room_id, &left, Some(conn_id)).await;
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Parse one inbound text frame, dispatch, and apply the outcome. Split
/// from the socket loop so dispatch can be exercised without a live
/// websocket.
async fn process_inbound_text(
    state: &AppState,
    conn_id: Uuid,
    client_tx: &mpsc::Sender<Envelope>,
    joined: &mut Option<JoinedRoom>,
    text: &str,
) {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(env) => env,
        Err(e) => {
            warn!(%conn_id, error = %e, "ws: dropping malformed frame");
            return;
        }
    };

    let outcome = match envelope.event {
        Event::JoinRoom(join) => handle_join(state, conn_id, client_tx, joined, join).await,
        _ => route_event(envelope, joined.as_ref()),
    };

    match outcome {
        Outcome::Announce(announcements) => {
            for (room_id, env) in announcements {
                room::broadcast(state, &room_id, &env, Some(conn_id)).await;
            }
        }
        Outcome::Forward(env) => {
            if let Some(session) = joined.as_ref() {
                room::broadcast(state, &session.room_id, &env, Some(conn_id)).await;
            }
        }
        Outcome::Ignore => {}
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Join a room: record identity, update membership, announce to the new
/// room-mates. Switching rooms vacates (and notifies) the previous room;
/// re-joining the same room only replaces the registry entry.
async fn handle_join(
    state: &AppState,
    conn_id: Uuid,
    client_tx: &mpsc::Sender<Envelope>,
    joined: &mut Option<JoinedRoom>,
    join: JoinRoom,
) -> Outcome {
    if join.room_id.is_empty() {
        // Not an error: the connection simply remains Unjoined.
        warn!(%conn_id, "ws: join without room id ignored");
        return Outcome::Ignore;
    }

    let mut announcements = Vec::new();

    if let Some(prev) = joined.take() {
        if prev.room_id != join.room_id {
            if room::part_room(state, &prev.room_id, conn_id).await.is_some() {
                let left = Envelope::new(Event::ParticipantLeft(ParticipantLeft {
                    participant_id: prev.participant_id.clone(),
                    display_name: prev.display_name.clone(),
                    room_id: prev.room_id.clone(),
                }))
                .with_room(prev.room_id.clone());
                announcements.push((prev.room_id, left));
            }
        }
    }

    let cursor_color = join
        .cursor_color
        .clone()
        .unwrap_or_else(room::fallback_cursor_color);

    let participant = Participant {
        participant_id: join.participant_id.clone(),
        display_name: join.display_name.clone(),
        cursor_color: cursor_color.clone(),
        tx: client_tx.clone(),
    };
    room::join_room(state, &join.room_id, conn_id, participant).await;

    *joined = Some(JoinedRoom {
        room_id: join.room_id.clone(),
        participant_id: join.participant_id.clone(),
        display_name: join.display_name.clone(),
    });

    let announce = Envelope::new(Event::ParticipantJoined(ParticipantJoined {
        participant_id: join.participant_id.clone(),
        display_name: join.display_name,
        cursor_color,
        x: 0.0,
        y: 0.0,
    }))
    .with_room(join.room_id.clone())
    .with_from(join.participant_id);
    announcements.push((join.room_id, announce));

    Outcome::Announce(announcements)
}

/// Stamp the sender's identity and room onto a non-join event. The relay
/// never inspects payload semantics — a peer-supplied `from` is always
/// overwritten with the identity declared at join.
fn route_event(mut envelope: Envelope, joined: Option<&JoinedRoom>) -> Outcome {
    let Some(session) = joined else {
        // Traffic before a successful join has no fan-out scope.
        return Outcome::Ignore;
    };
    envelope.from = Some(session.participant_id.clone());
    envelope.room_id = Some(session.room_id.clone());
    Outcome::Forward(envelope)
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
