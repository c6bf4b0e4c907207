//! Wire protocol — the canonical event schema for Corkboard.
//!
//! ARCHITECTURE
//! ============
//! Every message between a client and the relay is an [`Envelope`]: a flat
//! header (id, timestamp, room, sender identity) wrapping exactly one
//! [`Event`]. Clients send request events over WebSocket, the relay stamps
//! the sender and room onto the envelope and fans it out to room-mates
//! verbatim. The relay routes on the event variant and never inspects
//! payload semantics.
//!
//! DESIGN
//! ======
//! - One schema: there is exactly one catalogue of events and every crate
//!   (client, server, cli) speaks it. No per-surface variants.
//! - `from` always carries the application-level participant identity
//!   supplied at join, never a transport-level connection id.
//! - Temporary note ids carry the reserved [`TEMP_ID_PREFIX`] so they can
//!   never collide with durable ids issued by the external store.


use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// NOTE IDS
// =============================================================================

/// Reserved prefix for client-generated temporary note ids.
///
/// A note created optimistically carries `tmp-<uuid>` until the durable store
/// acknowledges it with a real id. Durable ids never start with this prefix.
pub const TEMP_ID_PREFIX: &str = "tmp-";

/// Generate a fresh temporary note id.
#[must_use]
pub fn temp_note_id() -> String {
    format!("{TEMP_ID_PREFIX}{}", Uuid::new_v4())
}

/// Whether `id` is a client-generated temporary id.
#[must_use]
pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Current time as milliseconds since Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// The universal message: header plus one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub id: Uuid,
    /// Milliseconds since Unix epoch. Set automatically at construction.
    pub ts: i64,
    /// Fan-out scope. Stamped by the relay on forwarded events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    /// Application-level participant identity of the sender.
    /// Stamped by the relay; clients must not trust a peer-supplied value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(flatten)]
    pub event: Event,
}

impl Envelope {
    /// Wrap an event with a fresh id and the current timestamp.
    pub fn new(event: Event) -> Self {
        Self { id: Uuid::new_v4(), ts: now_ms(), room_id: None, from: None, event }
    }

    #[must_use]
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

// =============================================================================
// EVENT CATALOGUE
// =============================================================================

/// Everything that can cross the wire, in both directions.
///
/// Adjacently tagged: the discriminator lands in the envelope's `event`
/// field and the payload under `data`, so payload field names can never
/// collide with the envelope header.
///
/// `join_room` is the only event the relay interprets; all others are fanned
/// out verbatim to the sender's room-mates. `participant_joined` and
/// `participant_left` originate at the relay, never at a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Event {
    JoinRoom(JoinRoom),
    ParticipantJoined(ParticipantJoined),
    ParticipantLeft(ParticipantLeft),
    CursorMove(CursorMove),
    NoteCreate(NoteRecord),
    NoteUpdate(NoteUpdate),
    NoteMove(NoteMove),
    NoteDelete(NoteDelete),
    NoteCreateAck(NoteCreateAck),
    NoteCreateRollback(NoteCreateRollback),
}

impl Event {
    /// Stable event name, matching the wire discriminator. For logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Event::JoinRoom(_) => "join_room",
            Event::ParticipantJoined(_) => "participant_joined",
            Event::ParticipantLeft(_) => "participant_left",
            Event::CursorMove(_) => "cursor_move",
            Event::NoteCreate(_) => "note_create",
            Event::NoteUpdate(_) => "note_update",
            Event::NoteMove(_) => "note_move",
            Event::NoteDelete(_) => "note_delete",
            Event::NoteCreateAck(_) => "note_create_ack",
            Event::NoteCreateRollback(_) => "note_create_rollback",
        }
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Room + identity declaration. First event a client sends on a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoom {
    /// Application-level durable identity, opaque to the relay.
    pub participant_id: String,
    pub room_id: String,
    pub display_name: String,
    /// CSS color for the participant's cursor. The relay picks a fallback
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_color: Option<String>,
}

/// Relay-originated announcement to the joiner's new room-mates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantJoined {
    pub participant_id: String,
    pub display_name: String,
    pub cursor_color: String,
    /// Initial cursor position in world space.
    pub x: f64,
    pub y: f64,
}

/// Relay-originated announcement that a participant vacated a room, whether
/// by explicit re-join elsewhere or by connection loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantLeft {
    pub participant_id: String,
    pub display_name: String,
    pub room_id: String,
}

/// World-space pointer position. High-frequency; throttled at the source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CursorMove {
    pub x: f64,
    pub y: f64,
}

/// A sticky note as carried on the wire. `id` may be temporary or durable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: String,
    pub title: String,
    pub body: String,
    /// World-space position.
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Display identity of the creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Sparse field update for a note. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NotePatch {
    /// True when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.z_index.is_none()
            && self.color.is_none()
    }
}

/// Field-level edit of an existing note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub note_id: String,
    pub fields: NotePatch,
}

/// Continuous position update during a drag. Peers render these live; the
/// durable write happens once, on release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteMove {
    pub note_id: String,
    pub x: f64,
    pub y: f64,
    /// Sender-side timestamp in milliseconds, for staleness filtering.
    pub ts: i64,
}

/// Note removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDelete {
    pub note_id: String,
    pub room_id: String,
}

/// The durable store confirmed a `note_create`: peers swap the temporary id
/// for the durable one in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteCreateAck {
    pub temporary_id: String,
    pub durable_id: String,
}

/// The durable store rejected a `note_create`: peers discard their
/// speculative copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteCreateRollback {
    pub temporary_id: String,
}
