//! The canvas store: notes, remote cursors, and the published camera
//! snapshot.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the single source of truth for one client's view of the room.
//! It is an explicit state container with a narrow mutation API — nothing
//! reaches in and edits fields ambiently. The session layer drives it for
//! local actions, [`crate::apply`] drives it for relay events, and the UI
//! reads from it.
//!
//! Each visible note is registered in the embedded [`HitRegistry`] so the
//! gesture layer's "did this event land on a draggable entity" lookup can
//! never drift from the note set.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use canvas::camera::Camera;
use canvas::hit::HitRegistry;

use wire::{NotePatch, NoteRecord, is_temp_id};

// =============================================================================
// NOTES
// =============================================================================

/// Lifecycle of a note relative to the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    /// Created optimistically under a temporary id; not yet durable.
    Pending,
    /// The durable store has issued this note's id.
    Confirmed,
    /// Locally removed; the durable delete has not resolved yet. Hidden
    /// from the visible set, restored if the delete fails.
    Deleted,
}

/// A sticky note as held locally.
#[derive(Debug, Clone)]
pub struct StickyNote {
    pub id: String,
    pub title: String,
    pub body: String,
    pub x: f64,
    pub y: f64,
    pub z_index: Option<i64>,
    pub color: Option<String>,
    pub created_by: Option<String>,
    pub state: NoteState,
}

impl StickyNote {
    /// Build from a wire record; the lifecycle state follows the id shape.
    #[must_use]
    pub fn from_record(record: NoteRecord) -> Self {
        let state = if is_temp_id(&record.id) { NoteState::Pending } else { NoteState::Confirmed };
        Self {
            id: record.id,
            title: record.title,
            body: record.body,
            x: record.x,
            y: record.y,
            z_index: record.z_index,
            color: record.color,
            created_by: record.created_by,
            state,
        }
    }

    /// Project back to a wire record.
    #[must_use]
    pub fn to_record(&self) -> NoteRecord {
        NoteRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            body: self.body.clone(),
            x: self.x,
            y: self.y,
            z_index: self.z_index,
            color: self.color.clone(),
            created_by: self.created_by.clone(),
        }
    }
}

/// A remote participant's cursor.
#[derive(Debug, Clone)]
pub struct RemoteCursor {
    pub participant_id: String,
    pub display_name: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
}

// =============================================================================
// STORE
// =============================================================================

/// Local projection of the joined room.
#[derive(Debug, Default)]
pub struct CanvasStore {
    notes: HashMap<String, StickyNote>,
    cursors: HashMap<String, RemoteCursor>,
    camera: Camera,
    hits: HitRegistry,
}

impl CanvasStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Notes ---

    /// Insert or overwrite a note. Visible notes become drag targets.
    pub fn insert_note(&mut self, note: StickyNote) {
        if note.state == NoteState::Deleted {
            self.hits.unregister(&note.id);
        } else {
            self.hits.register(note.id.clone());
        }
        self.notes.insert(note.id.clone(), note);
    }

    /// Look up a note by id, in any lifecycle state.
    #[must_use]
    pub fn note(&self, id: &str) -> Option<&StickyNote> {
        self.notes.get(id)
    }

    /// Apply a sparse field update. Returns false for unknown ids.
    pub fn apply_patch(&mut self, id: &str, patch: &NotePatch) -> bool {
        let Some(note) = self.notes.get_mut(id) else {
            return false;
        };
        if let Some(ref title) = patch.title {
            note.title = title.clone();
        }
        if let Some(ref body) = patch.body {
            note.body = body.clone();
        }
        if let Some(x) = patch.x {
            note.x = x;
        }
        if let Some(y) = patch.y {
            note.y = y;
        }
        if let Some(z) = patch.z_index {
            note.z_index = Some(z);
        }
        if let Some(ref color) = patch.color {
            note.color = Some(color.clone());
        }
        true
    }

    /// Move a note. Returns false for unknown ids.
    pub fn set_note_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(note) = self.notes.get_mut(id) else {
            return false;
        };
        note.x = x;
        note.y = y;
        true
    }

    /// Hide a note pending durable deletion. Returns false for unknown ids.
    pub fn mark_deleted(&mut self, id: &str) -> bool {
        let Some(note) = self.notes.get_mut(id) else {
            return false;
        };
        note.state = NoteState::Deleted;
        self.hits.unregister(id);
        true
    }

    /// Bring a hidden note back after a failed durable delete.
    pub fn restore_deleted(&mut self, id: &str, prior_state: NoteState) -> bool {
        let Some(note) = self.notes.get_mut(id) else {
            return false;
        };
        note.state = prior_state;
        if prior_state != NoteState::Deleted {
            self.hits.register(id.to_owned());
        }
        true
    }

    /// Remove a note entirely. Unknown ids are ignored.
    pub fn remove_note(&mut self, id: &str) -> Option<StickyNote> {
        self.hits.unregister(id);
        self.notes.remove(id)
    }

    /// Swap a pending note's temporary id for its durable id, in place: the
    /// note keeps its fields and its drag-target registration moves with
    /// it. Returns false when the temporary id is unknown.
    pub fn promote_note(&mut self, temporary_id: &str, durable_id: &str) -> bool {
        let Some(mut note) = self.notes.remove(temporary_id) else {
            return false;
        };
        self.hits.unregister(temporary_id);
        note.id = durable_id.to_owned();
        note.state = NoteState::Confirmed;
        self.hits.register(durable_id.to_owned());
        self.notes.insert(durable_id.to_owned(), note);
        true
    }

    /// All notes except those hidden pending deletion, in stable id order.
    #[must_use]
    pub fn visible_notes(&self) -> Vec<&StickyNote> {
        let mut notes: Vec<&StickyNote> = self
            .notes
            .values()
            .filter(|n| n.state != NoteState::Deleted)
            .collect();
        notes.sort_by(|a, b| {
            a.z_index
                .unwrap_or(0)
                .cmp(&b.z_index.unwrap_or(0))
                .then_with(|| a.id.cmp(&b.id))
        });
        notes
    }

    /// Number of notes in any state, hidden ones included.
    #[must_use]
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    // --- Remote cursors ---

    /// Create or overwrite a cursor entry.
    pub fn upsert_cursor(&mut self, cursor: RemoteCursor) {
        self.cursors.insert(cursor.participant_id.clone(), cursor);
    }

    /// Overwrite a cursor's position, creating a placeholder entry when the
    /// participant is not yet known (tolerates relay ordering races).
    pub fn cursor_moved(&mut self, participant_id: &str, x: f64, y: f64) {
        if let Some(cursor) = self.cursors.get_mut(participant_id) {
            cursor.x = x;
            cursor.y = y;
        } else {
            self.cursors.insert(
                participant_id.to_owned(),
                RemoteCursor {
                    participant_id: participant_id.to_owned(),
                    display_name: String::new(),
                    color: String::new(),
                    x,
                    y,
                },
            );
        }
    }

    /// Drop a cursor entry. Unknown ids are ignored.
    pub fn remove_cursor(&mut self, participant_id: &str) {
        self.cursors.remove(participant_id);
    }

    #[must_use]
    pub fn cursor(&self, participant_id: &str) -> Option<&RemoteCursor> {
        self.cursors.get(participant_id)
    }

    #[must_use]
    pub fn cursor_count(&self) -> usize {
        self.cursors.len()
    }

    // --- Camera snapshot ---

    /// Publish the gesture controller's camera for render-side readers.
    pub fn set_transform(&mut self, camera: Camera) {
        self.camera = camera;
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    // --- Hit registry ---

    /// Drag-target lookup for the gesture layer.
    #[must_use]
    pub fn hits(&self) -> &HitRegistry {
        &self.hits
    }
}
