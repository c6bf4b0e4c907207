#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::{MAX_ZOOM, MIN_ZOOM};

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn controller() -> GestureController {
    let mut ctl = GestureController::new();
    ctl.set_viewport(800.0, 600.0);
    ctl
}

fn no_hits() -> HitRegistry {
    HitRegistry::new()
}

// --- Wheel ---

#[test]
fn wheel_without_modifier_pans() {
    let mut ctl = controller();
    ctl.on_wheel(Point::new(0.0, 0.0), WheelDelta { dx: 30.0, dy: -10.0 }, Modifiers::default());
    assert!(approx_eq(ctl.camera.pan_x, -30.0));
    assert!(approx_eq(ctl.camera.pan_y, 10.0));
    assert_eq!(ctl.camera.zoom, 1.0);
}

#[test]
fn wheel_with_modifier_zooms_toward_point() {
    let mut ctl = controller();
    let target = Point::new(400.0, 300.0);
    let world_before = ctl.camera.screen_to_world(target);

    let mods = Modifiers { ctrl: true, ..Modifiers::default() };
    ctl.on_wheel(target, WheelDelta { dx: 0.0, dy: -100.0 }, mods);

    assert!(ctl.camera.zoom > 1.0);
    assert!(ctl.camera.zoom <= MAX_ZOOM);
    let world_after = ctl.camera.screen_to_world(target);
    assert!(approx_eq(world_before.x, world_after.x));
    assert!(approx_eq(world_before.y, world_after.y));
}

#[test]
fn wheel_zoom_out_shrinks_and_clamps() {
    let mut ctl = controller();
    let target = Point::new(100.0, 100.0);
    let mods = Modifiers { meta: true, ..Modifiers::default() };
    for _ in 0..200 {
        ctl.on_wheel(target, WheelDelta { dx: 0.0, dy: 500.0 }, mods);
    }
    assert_eq!(ctl.camera.zoom, MIN_ZOOM);
}

// --- Middle-button drag ---

#[test]
fn middle_drag_pans_by_cumulative_delta() {
    let mut ctl = controller();
    assert!(ctl.on_pointer_down(Point::new(100.0, 100.0), Button::Middle, None, &no_hits()));
    assert!(ctl.on_pointer_move(Point::new(130.0, 90.0)));
    assert!(approx_eq(ctl.camera.pan_x, 30.0));
    assert!(approx_eq(ctl.camera.pan_y, -10.0));

    // Cumulative from the drag origin, not from the previous sample.
    assert!(ctl.on_pointer_move(Point::new(150.0, 120.0)));
    assert!(approx_eq(ctl.camera.pan_x, 50.0));
    assert!(approx_eq(ctl.camera.pan_y, 20.0));

    ctl.on_pointer_up(Button::Middle);
    assert!(!ctl.on_pointer_move(Point::new(500.0, 500.0)));
}

#[test]
fn primary_button_is_not_a_canvas_gesture() {
    let mut ctl = controller();
    assert!(!ctl.on_pointer_down(Point::new(10.0, 10.0), Button::Primary, None, &no_hits()));
    assert!(!ctl.on_pointer_move(Point::new(50.0, 50.0)));
}

#[test]
fn pointer_leave_aborts_pan() {
    let mut ctl = controller();
    ctl.on_pointer_down(Point::new(0.0, 0.0), Button::Middle, None, &no_hits());
    ctl.on_pointer_leave();
    assert!(!ctl.on_pointer_move(Point::new(99.0, 99.0)));
}

#[test]
fn press_on_draggable_target_yields() {
    let mut ctl = controller();
    let mut hits = HitRegistry::new();
    hits.register("note_1");

    assert!(!ctl.on_pointer_down(Point::new(10.0, 10.0), Button::Middle, Some("note_1"), &hits));
    // Not consumed: no gesture started, camera untouched.
    assert!(!ctl.on_pointer_move(Point::new(60.0, 60.0)));
    assert_eq!(ctl.camera.pan_x, 0.0);

    // An unregistered target does not suppress.
    assert!(ctl.on_pointer_down(Point::new(10.0, 10.0), Button::Middle, Some("other"), &hits));
}

// --- Touch ---

#[test]
fn single_finger_pans() {
    let mut ctl = controller();
    assert!(ctl.on_touch_start(&[Point::new(200.0, 200.0)], 0.0, None, &no_hits()));
    assert!(ctl.on_touch_move(&[Point::new(240.0, 190.0)], 16.0));
    assert!(approx_eq(ctl.camera.pan_x, 40.0));
    assert!(approx_eq(ctl.camera.pan_y, -10.0));
}

#[test]
fn touch_on_draggable_target_yields() {
    let mut ctl = controller();
    let mut hits = HitRegistry::new();
    hits.register("note_1");
    assert!(!ctl.on_touch_start(&[Point::new(5.0, 5.0)], 0.0, Some("note_1"), &hits));
    assert!(!ctl.on_touch_move(&[Point::new(50.0, 50.0)], 16.0));
}

#[test]
fn fast_release_applies_momentum() {
    let mut ctl = controller();
    ctl.on_touch_start(&[Point::new(0.0, 0.0)], 0.0, None, &no_hits());
    // 10 px per 16 ms ≈ 0.625 px/ms, well above the threshold.
    ctl.on_touch_move(&[Point::new(10.0, 0.0)], 16.0);
    ctl.on_touch_move(&[Point::new(20.0, 0.0)], 32.0);
    let pan_before = ctl.camera.pan_x;

    ctl.on_touch_end(&[], 40.0);

    assert!(ctl.camera.pan_x > pan_before);
    assert!(matches!(ctl.state(), GestureState::Idle));
}

#[test]
fn slow_release_applies_no_momentum() {
    let mut ctl = controller();
    ctl.on_touch_start(&[Point::new(0.0, 0.0)], 0.0, None, &no_hits());
    // 1 px per 100 ms = 0.01 px/ms, below the threshold.
    ctl.on_touch_move(&[Point::new(1.0, 0.0)], 100.0);
    let pan_before = ctl.camera.pan_x;

    ctl.on_touch_end(&[], 110.0);

    assert!(approx_eq(ctl.camera.pan_x, pan_before));
}

#[test]
fn second_finger_starts_pinch() {
    let mut ctl = controller();
    ctl.on_touch_start(&[Point::new(100.0, 100.0)], 0.0, None, &no_hits());
    ctl.on_touch_start(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)], 10.0, None, &no_hits());
    assert!(matches!(ctl.state(), GestureState::Pinching { .. }));
}

#[test]
fn pinch_spread_zooms_in_around_midpoint() {
    let mut ctl = controller();
    let a = Point::new(300.0, 300.0);
    let b = Point::new(500.0, 300.0);
    ctl.on_touch_start(&[a, b], 0.0, None, &no_hits());

    let mid = Point::new(400.0, 300.0);
    let world_mid_before = ctl.camera.screen_to_world(mid);

    // Double the finger spread, keeping the midpoint fixed.
    assert!(ctl.on_touch_move(&[Point::new(200.0, 300.0), Point::new(600.0, 300.0)], 16.0));

    assert!(approx_eq(ctl.camera.zoom, 2.0));
    let world_mid_after = ctl.camera.screen_to_world(mid);
    assert!(approx_eq(world_mid_before.x, world_mid_after.x));
    assert!(approx_eq(world_mid_before.y, world_mid_after.y));
}

#[test]
fn pinch_zoom_respects_bounds() {
    let mut ctl = controller();
    ctl.on_touch_start(&[Point::new(390.0, 300.0), Point::new(410.0, 300.0)], 0.0, None, &no_hits());
    // 20 px spread stretched to 2000 px would be 100×; clamps instead.
    ctl.on_touch_move(&[Point::new(0.0, 300.0), Point::new(2000.0, 300.0)], 16.0);
    assert_eq!(ctl.camera.zoom, MAX_ZOOM);
}

#[test]
fn pinch_release_to_one_finger_resumes_pan() {
    let mut ctl = controller();
    ctl.on_touch_start(&[Point::new(100.0, 100.0), Point::new(200.0, 100.0)], 0.0, None, &no_hits());
    ctl.on_touch_end(&[Point::new(150.0, 100.0)], 10.0);
    assert!(matches!(ctl.state(), GestureState::TouchPanning { .. }));

    let pan_before = ctl.camera.pan_x;
    ctl.on_touch_move(&[Point::new(170.0, 100.0)], 26.0);
    assert!(approx_eq(ctl.camera.pan_x, pan_before + 20.0));
}

// --- Keyboard ---

#[test]
fn arrow_keys_pan_by_fixed_step() {
    let mut ctl = controller();
    assert!(ctl.on_key_down("ArrowLeft", Modifiers::default(), false));
    assert!(approx_eq(ctl.camera.pan_x, KEY_PAN_STEP_PX));
    assert!(ctl.on_key_down("ArrowDown", Modifiers::default(), false));
    assert!(approx_eq(ctl.camera.pan_y, -KEY_PAN_STEP_PX));
}

#[test]
fn keys_ignored_inside_text_input() {
    let mut ctl = controller();
    assert!(!ctl.on_key_down("ArrowLeft", Modifiers::default(), true));
    assert_eq!(ctl.camera.pan_x, 0.0);
}

#[test]
fn modifier_plus_zooms_to_center() {
    let mut ctl = controller();
    let mods = Modifiers { ctrl: true, ..Modifiers::default() };
    let center = ctl.viewport_center();
    let world_before = ctl.camera.screen_to_world(center);

    assert!(ctl.on_key_down("+", mods, false));

    assert!(approx_eq(ctl.camera.zoom, KEY_ZOOM_FACTOR));
    let world_after = ctl.camera.screen_to_world(center);
    assert!(approx_eq(world_before.x, world_after.x));
    assert!(approx_eq(world_before.y, world_after.y));
}

#[test]
fn plus_without_modifier_is_ignored() {
    let mut ctl = controller();
    assert!(!ctl.on_key_down("+", Modifiers::default(), false));
    assert_eq!(ctl.camera.zoom, 1.0);
}

#[test]
fn modifier_zero_resets_camera() {
    let mut ctl = controller();
    ctl.camera.pan_by(123.0, -77.0);
    ctl.zoom_to_center(3.0);
    let mods = Modifiers { meta: true, ..Modifiers::default() };

    assert!(ctl.on_key_down("0", mods, false));

    assert_eq!(ctl.camera.pan_x, 0.0);
    assert_eq!(ctl.camera.pan_y, 0.0);
    assert_eq!(ctl.camera.zoom, 1.0);
}

// --- cursor_world ---

#[test]
fn cursor_world_converts_through_camera() {
    let mut ctl = controller();
    ctl.camera = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    let world = ctl.cursor_world(Point::new(300.0, 250.0));
    assert!(approx_eq(world.x, 100.0));
    assert!(approx_eq(world.y, 100.0));
}

#[test]
fn cursor_world_before_mount_returns_origin() {
    let ctl = GestureController::new();
    let world = ctl.cursor_world(Point::new(300.0, 250.0));
    assert_eq!(world.x, 0.0);
    assert_eq!(world.y, 0.0);
}
