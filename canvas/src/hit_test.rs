use super::*;

#[test]
fn new_registry_is_empty() {
    let reg = HitRegistry::new();
    assert!(reg.is_empty());
    assert_eq!(reg.len(), 0);
    assert!(!reg.is_draggable("note_1"));
}

#[test]
fn register_makes_entity_draggable() {
    let mut reg = HitRegistry::new();
    reg.register("note_1");
    assert!(reg.is_draggable("note_1"));
    assert!(!reg.is_draggable("note_2"));
}

#[test]
fn register_is_idempotent() {
    let mut reg = HitRegistry::new();
    reg.register("note_1");
    reg.register("note_1");
    assert_eq!(reg.len(), 1);
}

#[test]
fn unregister_removes_entity() {
    let mut reg = HitRegistry::new();
    reg.register("note_1");
    reg.unregister("note_1");
    assert!(!reg.is_draggable("note_1"));
}

#[test]
fn unregister_unknown_is_noop() {
    let mut reg = HitRegistry::new();
    reg.unregister("nope");
    assert!(reg.is_empty());
}

#[test]
fn clear_drops_everything() {
    let mut reg = HitRegistry::new();
    reg.register("a");
    reg.register("b");
    reg.clear();
    assert!(reg.is_empty());
}
