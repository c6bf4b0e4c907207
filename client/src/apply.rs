//! Application of relay events from peers onto the canvas store.
//!
//! DESIGN
//! ======
//! Remote state is last-writer-wins per note: whatever arrives overwrites
//! the local copy unconditionally, and there is no merging of concurrent
//! edits. Events referencing unknown note ids are benign races (the note
//! was deleted locally first, or ordering between two senders flipped) and
//! are ignored, never treated as fatal.

#[cfg(test)]
#[path = "apply_test.rs"]
mod apply_test;

use tracing::debug;

use wire::{Envelope, Event};

use crate::store::{CanvasStore, RemoteCursor, StickyNote};

/// Apply one relay event from a peer to the store.
pub fn apply_remote(store: &mut CanvasStore, envelope: &Envelope) {
    match &envelope.event {
        Event::NoteCreate(record) => {
            store.insert_note(StickyNote::from_record(record.clone()));
        }
        Event::NoteUpdate(update) => {
            if !store.apply_patch(&update.note_id, &update.fields) {
                debug!(note_id = %update.note_id, "update for unknown note ignored");
            }
        }
        Event::NoteMove(mv) => {
            if !store.set_note_position(&mv.note_id, mv.x, mv.y) {
                debug!(note_id = %mv.note_id, "move for unknown note ignored");
            }
        }
        Event::NoteDelete(del) => {
            // Unconditional: whatever state the local copy is in, it is gone.
            store.remove_note(&del.note_id);
        }
        Event::NoteCreateAck(ack) => {
            if !store.promote_note(&ack.temporary_id, &ack.durable_id) {
                debug!(temporary_id = %ack.temporary_id, "ack for unknown note ignored");
            }
        }
        Event::NoteCreateRollback(rollback) => {
            store.remove_note(&rollback.temporary_id);
        }
        Event::ParticipantJoined(joined) => {
            store.upsert_cursor(RemoteCursor {
                participant_id: joined.participant_id.clone(),
                display_name: joined.display_name.clone(),
                color: joined.cursor_color.clone(),
                x: joined.x,
                y: joined.y,
            });
        }
        Event::ParticipantLeft(left) => {
            store.remove_cursor(&left.participant_id);
        }
        Event::CursorMove(pos) => {
            // Identity comes from the relay-stamped envelope, never the payload.
            if let Some(from) = envelope.from.as_deref() {
                store.cursor_moved(from, pos.x, pos.y);
            }
        }
        Event::JoinRoom(_) => {
            // Client-originated; a relay never forwards it.
        }
    }
}
