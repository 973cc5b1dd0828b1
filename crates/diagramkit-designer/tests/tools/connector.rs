use std::sync::Arc;

use diagramkit_core::{EditorEvent, EventBus, EventFilter};
use diagramkit_designer::model::{DiagramConnector, DiagramRectangle};
use diagramkit_designer::{
    geometry, EventRouter, HitMode, InteractionState, Modifiers, ObjectId, Point, Shape, Style,
};
use diagramkit_settings::EditorConfig;
use parking_lot::Mutex;

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rect(router: &mut EventRouter, x: f64) -> ObjectId {
    router.add_object(
        Shape::Rectangle(DiagramRectangle::new(x, 0.0, 40.0, 40.0)),
        Style::default(),
    )
}

fn connector(router: &EventRouter, id: ObjectId) -> DiagramConnector {
    match &router.store().get(id).unwrap().shape {
        Shape::Connector(c) => c.clone(),
        other => panic!("expected connector, got {:?}", other),
    }
}

fn last_id(router: &EventRouter) -> ObjectId {
    *router.store().ids().last().unwrap()
}

#[test]
fn test_press_release_connects_two_objects() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0);
    let b = rect(&mut router, 200.0);
    router.switch_tool("connector").unwrap();

    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::PlacingConnectionSource);
    router.pointer_move(p(220.0, 20.0), Modifiers::NONE);
    let outcome = router.pointer_up(p(220.0, 20.0), Modifiers::NONE);

    assert!(outcome.committed);
    assert!(router.state().is_idle());
    let c = connector(&router, last_id(&router));
    assert_eq!((c.source, c.target), (Some(a), Some(b)));
    assert!((c.start.x - 40.0).abs() < 1e-9);
    assert!((c.end.x - 200.0).abs() < 1e-9);
}

#[test]
fn test_release_over_connector_targets_shape_below() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0);
    let b = rect(&mut router, 200.0);
    let c = rect(&mut router, 400.0);
    router.switch_tool("connector").unwrap();

    // the first link runs straight across b
    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.pointer_up(p(420.0, 20.0), Modifiers::NONE);
    let over = last_id(&router);
    assert_eq!(connector(&router, over).target, Some(c));
    assert_eq!(
        router.store().hit_test(p(220.0, 20.0), 1.0, HitMode::Bounds),
        Some(over)
    );

    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    let outcome = router.pointer_up(p(220.0, 20.0), Modifiers::NONE);

    assert!(outcome.committed);
    assert!(router.state().is_idle());
    let link = connector(&router, last_id(&router));
    assert_eq!((link.source, link.target), (Some(a), Some(b)));
}

#[test]
fn test_second_press_picks_target() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0);
    let b = rect(&mut router, 200.0);
    router.switch_tool("connector").unwrap();

    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.pointer_up(p(100.0, 100.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::PlacingConnectionTarget);
    assert_eq!(router.store().len(), 2);

    router.pointer_down(p(220.0, 20.0), Modifiers::NONE);
    router.pointer_up(p(220.0, 20.0), Modifiers::NONE);
    assert!(router.state().is_idle());
    let c = connector(&router, last_id(&router));
    assert_eq!((c.source, c.target), (Some(a), Some(b)));
}

#[test]
fn test_empty_press_abandons_connection() {
    let mut router = EventRouter::default();
    rect(&mut router, 0.0);
    rect(&mut router, 200.0);
    router.switch_tool("connector").unwrap();

    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.pointer_up(p(100.0, 100.0), Modifiers::NONE);
    router.pointer_down(p(100.0, 300.0), Modifiers::NONE);
    router.pointer_up(p(100.0, 300.0), Modifiers::NONE);

    assert!(router.state().is_idle());
    assert_eq!(router.store().len(), 2);
}

#[test]
fn test_cancel_while_placing() {
    let mut router = EventRouter::default();
    rect(&mut router, 0.0);
    router.switch_tool("connector").unwrap();
    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.cancel();
    assert!(router.state().is_idle());
    router.pointer_up(p(220.0, 20.0), Modifiers::NONE);
    assert_eq!(router.store().len(), 1);
}

#[test]
fn test_connector_follows_moved_object() {
    let bus = Arc::new(EventBus::new());
    let moved = Arc::new(Mutex::new(Vec::new()));
    let sink = moved.clone();
    bus.subscribe(EventFilter::All, move |event| {
        if let EditorEvent::ObjectsMoved { ids } = event {
            sink.lock().extend(ids.iter().copied());
        }
    });

    let mut router = EventRouter::with_event_bus(EditorConfig::default(), bus);
    let a = rect(&mut router, 0.0);
    rect(&mut router, 200.0);
    router.switch_tool("connector").unwrap();
    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.pointer_up(p(220.0, 20.0), Modifiers::NONE);
    let link = last_id(&router);

    router.switch_tool("select").unwrap();
    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.pointer_move(p(20.0, 120.0), Modifiers::NONE);
    // live drag already re-attached the connector
    let during = connector(&router, link);
    let moved_bounds = geometry::bounds(router.store().get(a).unwrap()).inflate(1e-6);
    assert!(moved_bounds.contains(during.start));
    router.pointer_up(p(20.0, 120.0), Modifiers::NONE);

    let ids = moved.lock().clone();
    assert!(ids.contains(&a));
    assert!(ids.contains(&link));

    // one undo restores both the object and the connector
    router.undo();
    let c = connector(&router, link);
    assert!((c.start.x - 40.0).abs() < 1e-9);
    assert!((c.start.y - 20.0).abs() < 1e-9);
}

#[test]
fn test_dropping_endpoint_retargets() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0);
    let b = rect(&mut router, 200.0);
    let c = rect(&mut router, 400.0);
    router.switch_tool("connector").unwrap();
    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.pointer_up(p(220.0, 20.0), Modifiers::NONE);
    let link = last_id(&router);

    router.switch_tool("select").unwrap();
    assert!(router.select(link));
    router.pointer_down(p(200.0, 20.0), Modifiers::NONE);
    assert_eq!(router.state(), InteractionState::DraggingHandle);
    router.pointer_move(p(420.0, 20.0), Modifiers::NONE);
    router.pointer_up(p(420.0, 20.0), Modifiers::NONE);

    let moved = connector(&router, link);
    assert_eq!(moved.source, Some(a));
    assert_eq!(moved.target, Some(c));
    assert!((moved.end.x - 400.0).abs() < 1e-9);

    router.undo();
    assert_eq!(connector(&router, link).target, Some(b));
}

#[test]
fn test_delete_target_keeps_connector_detached() {
    let mut router = EventRouter::default();
    let a = rect(&mut router, 0.0);
    let b = rect(&mut router, 200.0);
    router.switch_tool("connector").unwrap();
    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.pointer_up(p(220.0, 20.0), Modifiers::NONE);
    let link = last_id(&router);
    router.switch_tool("select").unwrap();

    router.select(b);
    assert!(router.delete_selection());
    let c = connector(&router, link);
    assert_eq!((c.source, c.target), (Some(a), None));
    assert!((c.end.x - 200.0).abs() < 1e-9);

    router.undo();
    assert_eq!(connector(&router, link).target, Some(b));
}
