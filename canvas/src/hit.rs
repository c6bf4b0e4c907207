//! Registry of draggable entities that pre-empt canvas-level gestures.
//!
//! The input layer asks "did this event originate on a registered draggable
//! entity?" through an explicit lookup rather than through incidental DOM
//! attributes. The client store registers each visible note here and
//! unregisters it on removal, so gesture dispatch and the note set can
//! never drift apart.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::collections::HashSet;

/// Set of entity ids whose pointer events bypass canvas pan/zoom.
#[derive(Debug, Default)]
pub struct HitRegistry {
    targets: HashSet<String>,
}

impl HitRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity as draggable. Re-registering is a no-op.
    pub fn register(&mut self, id: impl Into<String>) {
        self.targets.insert(id.into());
    }

    /// Remove an entity. Unknown ids are ignored.
    pub fn unregister(&mut self, id: &str) {
        self.targets.remove(id);
    }

    /// Whether pointer events on `id` should be yielded to the entity.
    #[must_use]
    pub fn is_draggable(&self, id: &str) -> bool {
        self.targets.contains(id)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Drop every registration, e.g. when leaving a room.
    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
