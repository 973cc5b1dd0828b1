use diagramkit_designer::model::DiagramRectangle;
use diagramkit_designer::{
    EventRouter, InteractionState, Modifiers, Point, RecordingSurface, Shape, Style,
};
use diagramkit_settings::EditorConfig;

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn drag(router: &mut EventRouter, from: Point, to: Point) {
    router.pointer_down(from, Modifiers::NONE);
    router.pointer_move(to, Modifiers::NONE);
    router.pointer_up(to, Modifiers::NONE);
}

#[test]
fn test_circle_tool_center_and_radius() {
    let mut router = EventRouter::default();
    router.switch_tool("circle").unwrap();
    drag(&mut router, p(50.0, 50.0), p(80.0, 50.0));

    assert_eq!(router.store().len(), 1);
    let Shape::Circle(circle) = &router.store().objects()[0].shape else {
        panic!("expected a circle");
    };
    assert_eq!(circle.center, p(50.0, 50.0));
    assert!((circle.radius - 30.0).abs() < 1e-9);
    assert!(router.state().is_idle());
}

#[test]
fn test_every_creation_tool_commits_one_object() {
    let tools = [
        "rectangle",
        "ellipse",
        "circle",
        "line",
        "arrow",
        "curve",
        "tapered_line",
        "triangle",
        "pentagon",
        "hexagon",
        "text",
    ];
    for (i, tool) in tools.iter().enumerate() {
        let mut router = EventRouter::default();
        router.switch_tool(tool).unwrap();
        drag(&mut router, p(10.0, 10.0), p(90.0, 70.0));
        assert_eq!(router.store().len(), 1, "tool {} ({})", tool, i);
        assert!(router.state().is_idle(), "tool {}", tool);
    }
}

#[test]
fn test_switch_mid_gesture_clears_scratch() {
    let mut router = EventRouter::default();
    router.switch_tool("rectangle").unwrap();
    router.pointer_down(p(0.0, 0.0), Modifiers::NONE);
    router.pointer_move(p(60.0, 40.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::Drawing);

    let mut surface = RecordingSurface::new();
    router.render(&mut surface);
    assert!(!surface.is_empty());

    router.switch_tool("ellipse").unwrap();
    assert!(router.state().is_idle());
    surface.clear();
    router.render(&mut surface);
    assert!(surface.is_empty());

    router.pointer_up(p(60.0, 40.0), Modifiers::NONE);
    assert!(router.store().is_empty());

    // the rectangle tool does not resume its abandoned gesture
    router.switch_tool("rectangle").unwrap();
    router.pointer_move(p(80.0, 80.0), Modifiers::NONE);
    router.pointer_up(p(80.0, 80.0), Modifiers::NONE);
    assert!(router.store().is_empty());
    assert!(router
        .dispatcher()
        .active_tool()
        .and_then(|t| t.active_gesture())
        .is_none());
}

#[test]
fn test_too_small_shape_is_discarded() {
    let mut router = EventRouter::default();
    router.switch_tool("circle").unwrap();
    drag(&mut router, p(50.0, 50.0), p(51.0, 50.0));
    assert!(router.store().is_empty());
    assert!(!router.history().can_undo());
}

#[test]
fn test_polyline_closes_near_first_point() {
    let mut router = EventRouter::default();
    router.switch_tool("polyline").unwrap();
    for pt in [p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0)] {
        router.pointer_down(pt, Modifiers::NONE);
        router.pointer_up(pt, Modifiers::NONE);
        assert_eq!(router.state(), InteractionState::Drawing);
    }
    router.pointer_down(p(1.0, 1.0), Modifiers::NONE);
    router.pointer_up(p(1.0, 1.0), Modifiers::NONE);

    assert!(router.state().is_idle());
    let Shape::Polyline(path) = &router.store().objects()[0].shape else {
        panic!("expected a polyline");
    };
    assert!(path.closed);
    assert_eq!(path.points.len(), 3);
}

#[test]
fn test_freehand_records_path() {
    let mut router = EventRouter::default();
    router.switch_tool("freehand").unwrap();
    router.pointer_down(p(0.0, 0.0), Modifiers::NONE);
    for i in 1..=20 {
        router.pointer_move(p(i as f64 * 5.0, (i % 3) as f64), Modifiers::NONE);
    }
    router.pointer_up(p(100.0, 0.0), Modifiers::NONE);

    let Shape::Freehand(path) = &router.store().objects()[0].shape else {
        panic!("expected a freehand path");
    };
    assert!(path.points.len() > 10);
}

#[test]
fn test_freehand_samples_at_unusable_zoom() {
    for zoom in [f64::NAN, f64::INFINITY, 0.0, -2.0] {
        let mut router = EventRouter::default();
        router.set_zoom(zoom);
        router.switch_tool("freehand").unwrap();
        router.pointer_down(p(0.0, 0.0), Modifiers::NONE);
        for i in 1..=20 {
            router.pointer_move(p(i as f64 * 5.0, 0.0), Modifiers::NONE);
        }
        router.pointer_up(p(100.0, 0.0), Modifiers::NONE);

        let Shape::Freehand(path) = &router.store().objects()[0].shape else {
            panic!("expected a freehand path at zoom {}", zoom);
        };
        assert_eq!(path.points.len(), 21, "zoom {}", zoom);
    }
}

#[test]
fn test_pan_tool_moves_viewport_not_objects() {
    let mut router = EventRouter::default();
    router.switch_tool("pan").unwrap();
    router.pointer_down(p(0.0, 0.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::Panning);
    router.pointer_move(p(10.0, 0.0), Modifiers::NONE);
    router.pointer_up(p(10.0, 0.0), Modifiers::NONE);

    assert!(router.viewport().pan_x > 0.0);
    assert!(router.state().is_idle());
    assert!(!router.history().can_undo());
}

#[test]
fn test_undo_removes_created_object() {
    let mut router = EventRouter::default();
    router.switch_tool("rectangle").unwrap();
    drag(&mut router, p(0.0, 0.0), p(50.0, 50.0));
    assert!(router.undo());
    assert!(router.store().is_empty());
    assert!(router.redo());
    assert_eq!(router.store().len(), 1);
}

#[test]
fn test_box_drag_along_one_axis_is_discarded() {
    for tool in ["rectangle", "ellipse", "text"] {
        let mut router = EventRouter::default();
        router.switch_tool(tool).unwrap();
        drag(&mut router, p(0.0, 0.0), p(50.0, 0.0));
        drag(&mut router, p(0.0, 0.0), p(0.0, 50.0));
        assert!(router.store().is_empty(), "tool {}", tool);
        assert!(!router.history().can_undo(), "tool {}", tool);
        assert!(router.state().is_idle());
    }
}

#[test]
fn test_extent_equal_to_minimum_is_discarded() {
    let minimum = EditorConfig::default().interaction.min_shape_extent;
    assert_eq!(minimum, 2.0);

    for (tool, end) in [
        ("rectangle", p(2.0, 2.0)),
        ("circle", p(2.0, 0.0)),
        ("line", p(0.0, 2.0)),
    ] {
        let mut router = EventRouter::default();
        router.switch_tool(tool).unwrap();
        drag(&mut router, p(0.0, 0.0), end);
        assert!(router.store().is_empty(), "tool {} at the minimum", tool);

        drag(&mut router, p(0.0, 0.0), p(end.x * 1.25, end.y * 1.25));
        assert_eq!(router.store().len(), 1, "tool {} past the minimum", tool);
    }
}

fn assert_repaints_leave_document_alone(router: &mut EventRouter) {
    let store = router.store().clone();
    let selection = router.selection().clone();
    let depth = router.history().undo_depth();
    let state = router.state();

    let mut counts = Vec::new();
    for _ in 0..3 {
        let mut surface = RecordingSurface::new();
        router.render(&mut surface);
        counts.push(surface.len());
    }

    assert!(counts[0] > 0);
    assert!(counts.iter().all(|&n| n == counts[0]));
    assert_eq!(router.store(), &store);
    assert_eq!(router.selection(), &selection);
    assert_eq!(router.history().undo_depth(), depth);
    assert_eq!(router.state(), state);
}

#[test]
fn test_rectangle_preview_repaints_are_transient() {
    let mut router = EventRouter::default();
    router.switch_tool("rectangle").unwrap();
    router.pointer_down(p(0.0, 0.0), Modifiers::NONE);
    router.pointer_move(p(60.0, 40.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::Drawing);

    assert_repaints_leave_document_alone(&mut router);
    assert!(router.store().is_empty());
}

#[test]
fn test_polyline_preview_repaints_are_transient() {
    let mut router = EventRouter::default();
    router.switch_tool("polyline").unwrap();
    for pt in [p(0.0, 0.0), p(100.0, 0.0)] {
        router.pointer_down(pt, Modifiers::NONE);
        router.pointer_up(pt, Modifiers::NONE);
    }
    router.pointer_move(p(100.0, 80.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::Drawing);

    assert_repaints_leave_document_alone(&mut router);
    assert!(router.store().is_empty());
}

#[test]
fn test_connector_preview_repaints_are_transient() {
    let mut router = EventRouter::default();
    router.add_object(
        Shape::Rectangle(DiagramRectangle::new(0.0, 0.0, 40.0, 40.0)),
        Style::default(),
    );
    router.switch_tool("connector").unwrap();
    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.pointer_move(p(150.0, 80.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::PlacingConnectionSource);

    assert_repaints_leave_document_alone(&mut router);
    assert_eq!(router.store().len(), 1);
}
