//! Optimistic mutations and durable reconciliation.
//!
//! DESIGN
//! ======
//! Every local action applies to the store immediately and is emitted to
//! the relay in the same breath, so peers see it without waiting on
//! durability. The durable round-trip runs concurrently as a spawned task
//! under an application-level timeout; its completion reconciles the
//! optimistic state:
//!
//! - create: temporary id → durable id swapped in place (an in-flight drag
//!   or selection referencing the temporary id is re-pointed, never
//!   orphaned), then `note_create_ack` to peers; on any failure — transport
//!   error, timeout, or store rejection — the pending note is removed and
//!   `note_create_rollback` retracts the speculative copies.
//! - update/move/delete: the pre-mutation snapshot is held until the
//!   durable call resolves and restored on failure. Failures are never
//!   surfaced to peers except as the compensating rollback event.
//!
//! The store sits behind a mutex only because durable completions land on
//! spawned tasks; the safety of the optimistic-mutation × durable-response
//! × inbound-peer-event race comes from the reconciliation rules, not from
//! lock discipline.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::warn;

use wire::{
    Envelope, Event, JoinRoom, NoteCreateAck, NoteCreateRollback, NoteDelete, NoteMove, NotePatch,
    NoteRecord, NoteUpdate,
};

use crate::apply;
use crate::durable::{NoteStore, StoreError};
use crate::store::{CanvasStore, NoteState, StickyNote};
use crate::transport::RelaySink;

/// Default application-level timeout for durable calls.
pub const DEFAULT_DURABLE_TIMEOUT: Duration = Duration::from_secs(8);

/// Who this client is and which room it works in.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub room_id: String,
    pub participant_id: String,
    pub display_name: String,
    pub cursor_color: String,
    pub durable_timeout: Duration,
}

impl SessionConfig {
    #[must_use]
    pub fn new(
        room_id: impl Into<String>,
        participant_id: impl Into<String>,
        display_name: impl Into<String>,
        cursor_color: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            participant_id: participant_id.into(),
            display_name: display_name.into(),
            cursor_color: cursor_color.into(),
            durable_timeout: DEFAULT_DURABLE_TIMEOUT,
        }
    }
}

/// An in-progress note drag: the id being dragged and the position to
/// restore if the release-time durable write fails.
#[derive(Debug, Clone)]
struct DragSession {
    note_id: String,
    start_x: f64,
    start_y: f64,
}

/// Recover from lock poisoning: a poisoned mutex only means a previous
/// holder panicked; the state itself is still structurally sound.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// SESSION
// =============================================================================

/// One client's participation in a room.
///
/// Must be created inside a tokio runtime: durable round-trips run as
/// spawned tasks. All public methods are synchronous and safe to call from
/// the UI event loop.
pub struct Session {
    store: Arc<Mutex<CanvasStore>>,
    drag: Arc<Mutex<Option<DragSession>>>,
    sink: Arc<dyn RelaySink>,
    durable: Arc<dyn NoteStore>,
    config: SessionConfig,
}

impl Session {
    #[must_use]
    pub fn new(config: SessionConfig, sink: Arc<dyn RelaySink>, durable: Arc<dyn NoteStore>) -> Self {
        Self {
            store: Arc::new(Mutex::new(CanvasStore::new())),
            drag: Arc::new(Mutex::new(None)),
            sink,
            durable,
            config,
        }
    }

    /// Shared handle to the store, for the render/UI side.
    #[must_use]
    pub fn store_handle(&self) -> Arc<Mutex<CanvasStore>> {
        Arc::clone(&self.store)
    }

    /// Run a closure against the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&CanvasStore) -> R) -> R {
        f(&lock(&self.store))
    }

    /// The note id currently being dragged, if any.
    #[must_use]
    pub fn dragging(&self) -> Option<String> {
        lock(&self.drag).as_ref().map(|d| d.note_id.clone())
    }

    /// Declare room and identity to the relay. Also the reconnect path:
    /// after the transport re-establishes, call this again — durable state
    /// is re-fetched from the external store, so no note replay is needed.
    pub fn join(&self) {
        self.sink.send(Envelope::new(Event::JoinRoom(JoinRoom {
            participant_id: self.config.participant_id.clone(),
            room_id: self.config.room_id.clone(),
            display_name: self.config.display_name.clone(),
            cursor_color: Some(self.config.cursor_color.clone()),
        })));
    }

    fn emit(&self, event: Event) {
        let envelope = Envelope::new(event)
            .with_room(self.config.room_id.clone())
            .with_from(self.config.participant_id.clone());
        self.sink.send(envelope);
    }

    // --- Create ---

    /// Create a note optimistically at world coordinates. Returns the
    /// temporary id; the durable id replaces it once storage confirms.
    pub fn create_note(&self, title: &str, body: &str, x: f64, y: f64, color: Option<String>) -> String {
        let temp_id = wire::temp_note_id();
        let record = NoteRecord {
            id: temp_id.clone(),
            title: title.to_owned(),
            body: body.to_owned(),
            x,
            y,
            z_index: None,
            color,
            created_by: Some(self.config.display_name.clone()),
        };

        lock(&self.store).insert_note(StickyNote::from_record(record.clone()));
        self.emit(Event::NoteCreate(record.clone()));
        self.spawn_create(record);
        temp_id
    }

    fn spawn_create(&self, record: NoteRecord) {
        let store = Arc::clone(&self.store);
        let drag = Arc::clone(&self.drag);
        let sink = Arc::clone(&self.sink);
        let durable = Arc::clone(&self.durable);
        let room_id = self.config.room_id.clone();
        let participant_id = self.config.participant_id.clone();
        let timeout = self.config.durable_timeout;

        tokio::spawn(async move {
            let temp_id = record.id.clone();
            let result = match tokio::time::timeout(timeout, durable.create_note(&room_id, &record)).await
            {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout),
            };

            match result {
                Ok(durable_id) => {
                    {
                        let mut store = lock(&store);
                        store.promote_note(&temp_id, &durable_id);
                        let mut drag = lock(&drag);
                        if let Some(d) = drag.as_mut() {
                            if d.note_id == temp_id {
                                d.note_id = durable_id.clone();
                            }
                        }
                    }
                    let ack = Envelope::new(Event::NoteCreateAck(NoteCreateAck {
                        temporary_id: temp_id,
                        durable_id,
                    }))
                    .with_room(room_id)
                    .with_from(participant_id);
                    sink.send(ack);
                }
                Err(e) => {
                    warn!(error = %e, temporary_id = %temp_id, "note create failed; rolling back");
                    {
                        let mut store = lock(&store);
                        store.remove_note(&temp_id);
                        let mut drag = lock(&drag);
                        if drag.as_ref().is_some_and(|d| d.note_id == temp_id) {
                            *drag = None;
                        }
                    }
                    let rollback = Envelope::new(Event::NoteCreateRollback(NoteCreateRollback {
                        temporary_id: temp_id,
                    }))
                    .with_room(room_id)
                    .with_from(participant_id);
                    sink.send(rollback);
                }
            }
        });
    }

    // --- Update ---

    /// Edit note fields optimistically; restores the prior values if the
    /// durable write fails.
    pub fn update_note(&self, note_id: &str, patch: NotePatch) {
        let prior = {
            let mut store = lock(&self.store);
            let Some(prior) = store.note(note_id).cloned() else {
                warn!(note_id, "update for unknown note ignored");
                return;
            };
            store.apply_patch(note_id, &patch);
            prior
        };

        self.emit(Event::NoteUpdate(NoteUpdate {
            note_id: note_id.to_owned(),
            fields: patch.clone(),
        }));

        let restore = reverse_patch(&prior, &patch);
        self.spawn_restore_on_failure(note_id.to_owned(), patch, restore);
    }

    fn spawn_restore_on_failure(&self, note_id: String, patch: NotePatch, restore: NotePatch) {
        let store = Arc::clone(&self.store);
        let durable = Arc::clone(&self.durable);
        let timeout = self.config.durable_timeout;

        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, durable.update_note(&note_id, &patch)).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout),
            };
            if let Err(e) = result {
                warn!(error = %e, %note_id, "note update failed; restoring prior fields");
                lock(&store).apply_patch(&note_id, &restore);
            }
        });
    }

    // --- Delete ---

    /// Delete a note optimistically. The note is hidden (not dropped) until
    /// the durable delete confirms, so a failure can restore it.
    pub fn delete_note(&self, note_id: &str) {
        let prior_state = {
            let mut store = lock(&self.store);
            let Some(note) = store.note(note_id) else {
                warn!(note_id, "delete for unknown note ignored");
                return;
            };
            let prior = note.state;
            store.mark_deleted(note_id);
            prior
        };

        {
            let mut drag = lock(&self.drag);
            if drag.as_ref().is_some_and(|d| d.note_id == note_id) {
                *drag = None;
            }
        }

        self.emit(Event::NoteDelete(NoteDelete {
            note_id: note_id.to_owned(),
            room_id: self.config.room_id.clone(),
        }));

        let store = Arc::clone(&self.store);
        let durable = Arc::clone(&self.durable);
        let timeout = self.config.durable_timeout;
        let note_id = note_id.to_owned();

        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, durable.delete_note(&note_id)).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout),
            };
            let mut store = lock(&store);
            match result {
                Ok(()) => {
                    store.remove_note(&note_id);
                }
                Err(e) => {
                    warn!(error = %e, %note_id, "note delete failed; restoring");
                    store.restore_deleted(&note_id, prior_state);
                }
            }
        });
    }

    // --- Drag ---

    /// Start dragging a note. Returns false for unknown or hidden notes.
    pub fn begin_drag(&self, note_id: &str) -> bool {
        let store = lock(&self.store);
        let Some(note) = store.note(note_id) else {
            return false;
        };
        if note.state == NoteState::Deleted {
            return false;
        }
        *lock(&self.drag) = Some(DragSession {
            note_id: note_id.to_owned(),
            start_x: note.x,
            start_y: note.y,
        });
        true
    }

    /// Move the dragged note. Applies locally and streams a `note_move` to
    /// peers for live feedback; no durable write happens per frame.
    pub fn drag_move(&self, x: f64, y: f64) {
        let Some(drag) = lock(&self.drag).clone() else {
            return;
        };
        lock(&self.store).set_note_position(&drag.note_id, x, y);
        self.emit(Event::NoteMove(NoteMove { note_id: drag.note_id, x, y, ts: wire::now_ms() }));
    }

    /// Release the drag. Exactly one durable write happens here, with the
    /// final coordinates; on failure the drag-start position is restored.
    pub fn end_drag(&self) {
        let Some(drag) = lock(&self.drag).take() else {
            return;
        };
        let Some((x, y)) = lock(&self.store).note(&drag.note_id).map(|n| (n.x, n.y)) else {
            return;
        };

        let patch = NotePatch { x: Some(x), y: Some(y), ..NotePatch::default() };
        let store = Arc::clone(&self.store);
        let durable = Arc::clone(&self.durable);
        let timeout = self.config.durable_timeout;

        tokio::spawn(async move {
            let result =
                match tokio::time::timeout(timeout, durable.update_note(&drag.note_id, &patch)).await {
                    Ok(result) => result,
                    Err(_) => Err(StoreError::Timeout),
                };
            if let Err(e) = result {
                warn!(error = %e, note_id = %drag.note_id, "drag commit failed; restoring position");
                lock(&store).set_note_position(&drag.note_id, drag.start_x, drag.start_y);
            }
        });
    }

    // --- Inbound ---

    /// Apply a relay event from a peer, keeping any in-flight drag coherent
    /// with remote lifecycle changes (id promotion, deletion, rollback).
    pub fn apply_remote(&self, envelope: &Envelope) {
        {
            let mut store = lock(&self.store);
            apply::apply_remote(&mut store, envelope);
        }

        let mut drag = lock(&self.drag);
        match &envelope.event {
            Event::NoteCreateAck(ack) => {
                if let Some(d) = drag.as_mut() {
                    if d.note_id == ack.temporary_id {
                        d.note_id = ack.durable_id.clone();
                    }
                }
            }
            Event::NoteDelete(del) => {
                if drag.as_ref().is_some_and(|d| d.note_id == del.note_id) {
                    *drag = None;
                }
            }
            Event::NoteCreateRollback(rollback) => {
                if drag.as_ref().is_some_and(|d| d.note_id == rollback.temporary_id) {
                    *drag = None;
                }
            }
            _ => {}
        }
    }
}

/// A patch carrying the pre-mutation values of exactly the fields the
/// forward patch touches, for restore-on-failure.
fn reverse_patch(prior: &StickyNote, patch: &NotePatch) -> NotePatch {
    NotePatch {
        title: patch.title.as_ref().map(|_| prior.title.clone()),
        body: patch.body.as_ref().map(|_| prior.body.clone()),
        x: patch.x.map(|_| prior.x),
        y: patch.y.map(|_| prior.y),
        z_index: patch.z_index.map(|_| prior.z_index.unwrap_or(0)),
        color: patch
            .color
            .as_ref()
            .map(|_| prior.color.clone().unwrap_or_default()),
    }
}
