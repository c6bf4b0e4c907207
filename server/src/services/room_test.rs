use super::*;
use crate::state::test_helpers::participant;
use wire::{CursorMove, Event};

fn cursor_env() -> Envelope {
    Envelope::new(Event::CursorMove(CursorMove { x: 5.0, y: 6.0 }))
}

#[tokio::test]
async fn join_inserts_member() {
    let state = AppState::new();
    let conn = Uuid::new_v4();
    let (p, _rx) = participant("ada");

    let members = join_room(&state, "r1", conn, p).await;

    assert_eq!(members, 1);
    assert_eq!(room_size(&state, "r1").await, 1);
}

#[tokio::test]
async fn duplicate_join_replaces_membership() {
    let state = AppState::new();
    let conn = Uuid::new_v4();
    let (first, _rx1) = participant("ada");
    let (second, _rx2) = participant("ada-renamed");

    join_room(&state, "r1", conn, first).await;
    let members = join_room(&state, "r1", conn, second).await;

    assert_eq!(members, 1);
    let rooms = state.rooms.read().await;
    let room = rooms.get("r1").expect("room exists");
    assert_eq!(room.participants[&conn].display_name, "ada-renamed");
}

#[tokio::test]
async fn part_returns_removed_participant() {
    let state = AppState::new();
    let conn = Uuid::new_v4();
    let (p, _rx) = participant("ada");
    join_room(&state, "r1", conn, p).await;

    let removed = part_room(&state, "r1", conn).await;

    assert_eq!(removed.expect("was a member").display_name, "ada");
}

#[tokio::test]
async fn part_unknown_connection_is_none() {
    let state = AppState::new();
    let conn = Uuid::new_v4();
    let (p, _rx) = participant("ada");
    join_room(&state, "r1", conn, p).await;

    assert!(part_room(&state, "r1", Uuid::new_v4()).await.is_none());
    assert!(part_room(&state, "other", conn).await.is_none());
}

#[tokio::test]
async fn last_part_evicts_room() {
    let state = AppState::new();
    let conn = Uuid::new_v4();
    let (p, _rx) = participant("ada");
    join_room(&state, "r1", conn, p).await;

    part_room(&state, "r1", conn).await;

    let rooms = state.rooms.read().await;
    assert!(!rooms.contains_key("r1"));
}

#[tokio::test]
async fn broadcast_reaches_room_mates_only() {
    let state = AppState::new();
    let (a, mut rx_a) = participant("a");
    let (b, mut rx_b) = participant("b");
    let (c, mut rx_c) = participant("c");
    let conn_a = Uuid::new_v4();
    join_room(&state, "r1", conn_a, a).await;
    join_room(&state, "r1", Uuid::new_v4(), b).await;
    join_room(&state, "r2", Uuid::new_v4(), c).await;

    broadcast(&state, "r1", &cursor_env(), Some(conn_a)).await;

    assert!(rx_a.try_recv().is_err(), "sender excluded");
    assert!(rx_b.try_recv().is_ok(), "room-mate receives");
    assert!(rx_c.try_recv().is_err(), "other room isolated");
}

#[tokio::test]
async fn broadcast_without_exclusion_reaches_everyone() {
    let state = AppState::new();
    let (a, mut rx_a) = participant("a");
    let (b, mut rx_b) = participant("b");
    join_room(&state, "r1", Uuid::new_v4(), a).await;
    join_room(&state, "r1", Uuid::new_v4(), b).await;

    broadcast(&state, "r1", &cursor_env(), None).await;

    assert!(rx_a.try_recv().is_ok());
    assert!(rx_b.try_recv().is_ok());
}

#[tokio::test]
async fn broadcast_to_unknown_room_is_noop() {
    let state = AppState::new();
    broadcast(&state, "ghost", &cursor_env(), None).await;
}

#[tokio::test]
async fn full_queue_drops_instead_of_blocking() {
    let state = AppState::new();
    let (p, mut rx) = participant("slow");
    join_room(&state, "r1", Uuid::new_v4(), p).await;

    for _ in 0..=crate::state::OUTBOUND_QUEUE {
        broadcast(&state, "r1", &cursor_env(), None).await;
    }

    // The queue holds exactly its capacity; the overflow was dropped.
    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, crate::state::OUTBOUND_QUEUE);
}

#[test]
fn fallback_color_comes_from_palette() {
    for _ in 0..32 {
        let color = fallback_cursor_color();
        assert!(CURSOR_COLORS.contains(&color.as_str()));
    }
}
