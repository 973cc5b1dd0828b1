use diagramkit_designer::model::{DiagramCircle, DiagramRectangle};
use diagramkit_designer::{
    EventRouter, InteractionState, Modifiers, ObjectId, Point, Shape, ShapeGeometry, Style,
};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn drag(router: &mut EventRouter, from: Point, to: Point, modifiers: Modifiers) {
    router.pointer_down(from, modifiers);
    router.pointer_move(to, modifiers);
    router.pointer_up(to, modifiers);
}

fn rect(router: &mut EventRouter, x: f64, y: f64, w: f64, h: f64) -> ObjectId {
    router.add_object(
        Shape::Rectangle(DiagramRectangle::new(x, y, w, h)),
        Style::default(),
    )
}

fn circle(router: &mut EventRouter, x: f64, y: f64, r: f64) -> ObjectId {
    router.add_object(
        Shape::Circle(DiagramCircle::new(p(x, y), r)),
        Style::default(),
    )
}

#[test]
fn test_marquee_delete_undo_restores_order() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 10.0, 10.0, 20.0, 20.0);
    let b = circle(&mut router, 100.0, 100.0, 10.0);
    let c = rect(&mut router, 300.0, 300.0, 20.0, 20.0);

    drag(&mut router, p(0.0, 0.0), p(150.0, 150.0), Modifiers::NONE);
    assert_eq!(router.selection().ids(), &[a, b]);

    assert!(router.delete_selection());
    assert_eq!(router.store().ids(), vec![c]);
    assert!(router.selection().is_empty());

    assert!(router.undo());
    assert_eq!(router.store().ids(), vec![a, b, c]);
}

#[test]
fn test_click_selects_and_shift_extends() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0, 0.0, 20.0, 20.0);
    let b = rect(&mut router, 100.0, 0.0, 20.0, 20.0);

    drag(&mut router, p(10.0, 10.0), p(10.0, 10.0), Modifiers::NONE);
    assert_eq!(router.selection().ids(), &[a]);
    drag(&mut router, p(110.0, 10.0), p(110.0, 10.0), Modifiers::shift());
    assert_eq!(router.selection().ids(), &[a, b]);
}

#[test]
fn test_drag_move_is_one_undo_step() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0, 0.0, 20.0, 20.0);
    let depth = router.history().undo_depth();

    router.pointer_down(p(10.0, 10.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::DraggingObject);
    for step in 1..=10 {
        router.pointer_move(p(10.0 + step as f64 * 3.0, 10.0), Modifiers::NONE);
    }
    router.pointer_up(p(40.0, 10.0), Modifiers::NONE);

    let bounds = router.store().get(a).unwrap().shape.local_bounds();
    assert_eq!(bounds.min_x, 30.0);
    assert_eq!(router.history().undo_depth(), depth + 1);
    assert_eq!(router.history().undo_name(), Some("Move"));

    router.undo();
    assert_eq!(router.store().get(a).unwrap().shape.local_bounds().min_x, 0.0);
}

#[test]
fn test_corner_handle_resizes_rectangle() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0, 0.0, 100.0, 100.0);
    router.select(a);

    router.pointer_down(p(100.0, 100.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::DraggingHandle);
    router.pointer_move(p(150.0, 120.0), Modifiers::NONE);
    router.pointer_up(p(150.0, 120.0), Modifiers::NONE);

    let Shape::Rectangle(r) = &router.store().get(a).unwrap().shape else {
        panic!("expected rectangle");
    };
    assert!((r.x - 0.0).abs() < 1e-9);
    assert!((r.y - 0.0).abs() < 1e-9);
    assert!((r.width - 150.0).abs() < 1e-9);
    assert!((r.height - 120.0).abs() < 1e-9);
    assert!(router.state().is_idle());
}

#[test]
fn test_circle_edge_handle_scales_radius() {
    let mut router = EventRouter::default();
    let a = circle(&mut router, 0.0, 0.0, 50.0);
    router.select(a);

    drag(&mut router, p(50.0, 0.0), p(80.0, 0.0), Modifiers::NONE);
    let Shape::Circle(c) = &router.store().get(a).unwrap().shape else {
        panic!("expected circle");
    };
    assert_eq!(c.center, p(0.0, 0.0));
    assert!((c.radius - 80.0).abs() < 1e-9);
}

#[test]
fn test_rotate_handle_quarter_turn() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0, 0.0, 100.0, 100.0);
    router.select(a);

    let offset = router.config().interaction.rotate_handle_offset_px;
    router.pointer_down(p(50.0, -offset), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::Rotating);
    router.pointer_move(p(150.0, 50.0), Modifiers::NONE);
    router.pointer_up(p(150.0, 50.0), Modifiers::NONE);

    let rotation = router.store().get(a).unwrap().rotation();
    assert!((rotation - 90.0).abs() < 1e-9, "rotation {}", rotation);
    assert_eq!(router.history().undo_name(), Some("Rotate"));
}

#[test]
fn test_rotation_snaps_with_shift() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0, 0.0, 100.0, 100.0);
    router.select(a);

    let offset = router.config().interaction.rotate_handle_offset_px;
    router.pointer_down(p(50.0, -offset), Modifiers::NONE);
    // about 33 degrees clockwise
    let target = p(50.0 + 100.0 * 33f64.to_radians().sin(), 50.0 - 100.0 * 33f64.to_radians().cos());
    router.pointer_move(target, Modifiers::shift());
    router.pointer_up(target, Modifiers::shift());

    let rotation = router.store().get(a).unwrap().rotation();
    assert!((rotation - 30.0).abs() < 1e-9, "rotation {}", rotation);
}

#[test]
fn test_rotating_past_full_turn_normalizes() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0, 0.0, 100.0, 100.0);
    router.select(a);

    let offset = router.config().interaction.rotate_handle_offset_px;
    // clockwise angle from straight up, measured around the rectangle center
    let around = |degrees: f64| {
        let t = degrees.to_radians();
        p(50.0 + 100.0 * t.sin(), 50.0 - 100.0 * t.cos())
    };

    router.pointer_down(p(50.0, -offset), Modifiers::NONE);
    for step in (30..=360).step_by(30) {
        router.pointer_move(around(step as f64), Modifiers::NONE);
        let live = router.store().get(a).unwrap().rotation();
        assert!((0.0..360.0).contains(&live), "live rotation {}", live);
    }
    router.pointer_move(around(370.0), Modifiers::NONE);
    router.pointer_up(around(370.0), Modifiers::NONE);

    let rotation = |router: &EventRouter| router.store().get(a).unwrap().rotation();
    assert!((rotation(&router) - 10.0).abs() < 1e-9, "rotation {}", rotation(&router));
    assert_eq!(router.history().undo_depth(), 2);

    assert!(router.undo());
    assert_eq!(rotation(&router), 0.0);
    assert!(router.redo());
    assert!((rotation(&router) - 10.0).abs() < 1e-9, "rotation {}", rotation(&router));
}

#[test]
fn test_cancel_restores_drag_snapshot() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0, 0.0, 20.0, 20.0);
    let before = router.store().get(a).unwrap().clone();

    router.pointer_down(p(10.0, 10.0), Modifiers::NONE);
    router.pointer_move(p(60.0, 60.0), Modifiers::NONE);
    router.cancel();

    assert!(router.state().is_idle());
    assert_eq!(router.store().get(a).unwrap(), &before);
    router.pointer_up(p(60.0, 60.0), Modifiers::NONE);
    assert_eq!(router.store().get(a).unwrap(), &before);
}

#[test]
fn test_overlap_cycling_walks_stack() {
    let mut router = EventRouter::default();
    let bottom = rect(&mut router, 0.0, 0.0, 100.0, 100.0);
    let middle = rect(&mut router, 10.0, 10.0, 100.0, 100.0);
    let top = rect(&mut router, 20.0, 20.0, 100.0, 100.0);

    let click = p(50.0, 50.0);
    drag(&mut router, click, click, Modifiers::alt());
    assert_eq!(router.selection().ids(), &[top]);
    drag(&mut router, click, click, Modifiers::alt());
    assert_eq!(router.selection().ids(), &[middle]);
    assert_eq!(router.cycle_selection(), Some(bottom));
    assert_eq!(router.cycle_selection(), Some(top));
}

#[test]
fn test_precise_mode_clicks_through_unfilled_interior() {
    let mut router = EventRouter::default();
    let ring = circle(&mut router, 0.0, 0.0, 50.0);

    drag(&mut router, p(0.0, 0.0), p(0.0, 0.0), Modifiers::NONE);
    assert_eq!(router.selection().ids(), &[ring]);

    router.clear_selection();
    drag(&mut router, p(0.0, 0.0), p(0.0, 0.0), Modifiers::ctrl());
    assert!(router.selection().is_empty());

    router.set_precise_hit_mode(true);
    drag(&mut router, p(50.0, 0.0), p(50.0, 0.0), Modifiers::NONE);
    assert_eq!(router.selection().ids(), &[ring]);
}
