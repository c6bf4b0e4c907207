use super::*;

use std::sync::Mutex;

struct RecordingSink {
    sent: Mutex<Vec<Envelope>>,
}

impl RecordingSink {
    fn new() -> Self {
        Self { sent: Mutex::new(Vec::new()) }
    }

    fn positions(&self) -> Vec<(f64, f64)> {
        self.sent
            .lock()
            .expect("test sink lock")
            .iter()
            .filter_map(|env| match env.event {
                Event::CursorMove(pos) => Some((pos.x, pos.y)),
                _ => None,
            })
            .collect()
    }
}

impl RelaySink for RecordingSink {
    fn send(&self, envelope: Envelope) -> bool {
        self.sent.lock().expect("test sink lock").push(envelope);
        true
    }
}

fn controller() -> GestureController {
    let mut ctl = GestureController::new();
    ctl.set_viewport(800.0, 600.0);
    ctl
}

#[test]
fn pointer_move_emits_world_space_position() {
    let ctl = {
        let mut ctl = controller();
        ctl.camera.pan_by(100.0, 50.0);
        ctl.camera.zoom_to_point(Point::new(0.0, 0.0), 2.0);
        ctl
    };
    let sink = RecordingSink::new();
    let mut publisher = PresencePublisher::with_interval(50.0);

    assert!(publisher.pointer_moved(&ctl, Point::new(300.0, 250.0), 0.0, "r1", &sink));

    let world = ctl.cursor_world(Point::new(300.0, 250.0));
    assert_eq!(sink.positions(), vec![(world.x, world.y)]);
}

#[test]
fn burst_is_throttled_to_one_event() {
    let ctl = controller();
    let sink = RecordingSink::new();
    let mut publisher = PresencePublisher::with_interval(50.0);

    let mut emitted = 0;
    for i in 0..30 {
        if publisher.pointer_moved(&ctl, Point::new(f64::from(i), 0.0), f64::from(i), "r1", &sink) {
            emitted += 1;
        }
    }

    assert_eq!(emitted, 1);
    assert_eq!(sink.positions().len(), 1);
}

#[test]
fn tick_releases_final_position_of_burst() {
    let ctl = controller();
    let sink = RecordingSink::new();
    let mut publisher = PresencePublisher::with_interval(50.0);

    publisher.pointer_moved(&ctl, Point::new(0.0, 0.0), 0.0, "r1", &sink);
    publisher.pointer_moved(&ctl, Point::new(10.0, 0.0), 10.0, "r1", &sink);
    publisher.pointer_moved(&ctl, Point::new(25.0, 5.0), 20.0, "r1", &sink);

    assert!(!publisher.tick(30.0, "r1", &sink), "still inside the interval");
    assert!(publisher.tick(60.0, "r1", &sink));

    assert_eq!(sink.positions(), vec![(0.0, 0.0), (25.0, 5.0)]);
}

#[test]
fn events_carry_the_room() {
    let ctl = controller();
    let sink = RecordingSink::new();
    let mut publisher = PresencePublisher::with_interval(50.0);

    publisher.pointer_moved(&ctl, Point::new(1.0, 1.0), 0.0, "r1", &sink);

    let sent = sink.sent.lock().expect("test sink lock");
    assert_eq!(sent[0].room_id.as_deref(), Some("r1"));
}

#[test]
fn unmounted_viewport_reports_world_origin() {
    let ctl = GestureController::new();
    let sink = RecordingSink::new();
    let mut publisher = PresencePublisher::with_interval(50.0);

    publisher.pointer_moved(&ctl, Point::new(300.0, 250.0), 0.0, "r1", &sink);

    assert_eq!(sink.positions(), vec![(0.0, 0.0)]);
}
