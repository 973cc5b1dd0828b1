use diagramkit_designer::commands::{AddObject, CompositeCommand, ReorderObject};
use diagramkit_designer::model::{DiagramCircle, DiagramConnector, DiagramRectangle};
use diagramkit_designer::{
    CommandHistory, DiagramCommand, DiagramObject, ObjectId, ObjectStore, Point, Shape,
};

fn circle(store: &mut ObjectStore, x: f64) -> ObjectId {
    let id = store.generate_id();
    store.insert(DiagramObject::new(
        id,
        Shape::Circle(DiagramCircle::new(Point::new(x, 0.0), 5.0)),
    ));
    id
}

fn add(store: &mut ObjectStore, x: f64) -> DiagramCommand {
    let id = store.generate_id();
    DiagramCommand::AddObject(AddObject::new(DiagramObject::new(
        id,
        Shape::Rectangle(DiagramRectangle::new(x, 0.0, 10.0, 10.0)),
    )))
}

#[test]
fn test_execute_undo_redo_roundtrip() {
    let mut store = ObjectStore::new();
    circle(&mut store, 0.0);
    let mut history = CommandHistory::new(10);

    let cmd = add(&mut store, 50.0);
    history.execute(cmd, &mut store);
    let after_execute = store.clone();

    assert!(history.undo(&mut store));
    assert_eq!(store.len(), 1);
    assert!(history.redo(&mut store));
    assert_eq!(store, after_execute);
}

#[test]
fn test_empty_stacks_are_noops() {
    let mut store = ObjectStore::new();
    let mut history: CommandHistory<DiagramCommand> = CommandHistory::new(10);
    assert!(!history.undo(&mut store));
    assert!(!history.redo(&mut store));
    assert!(store.is_empty());
}

#[test]
fn test_oldest_entry_evicted_past_limit() {
    let mut store = ObjectStore::new();
    let mut history = CommandHistory::new(2);
    for x in [0.0, 20.0, 40.0] {
        let cmd = add(&mut store, x);
        history.execute(cmd, &mut store);
    }
    assert_eq!(history.undo_depth(), 2);
    assert!(history.undo(&mut store));
    assert!(history.undo(&mut store));
    assert!(!history.undo(&mut store));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_new_command_clears_redo() {
    let mut store = ObjectStore::new();
    let mut history = CommandHistory::new(10);
    let first = add(&mut store, 0.0);
    history.execute(first, &mut store);
    history.undo(&mut store);
    assert!(history.can_redo());

    let second = add(&mut store, 10.0);
    history.execute(second, &mut store);
    assert!(!history.can_redo());
}

#[test]
fn test_composite_undoes_in_reverse() {
    let mut store = ObjectStore::new();
    let a = circle(&mut store, 0.0);
    let b = circle(&mut store, 20.0);
    let before = store.clone();

    // the second reorder depends on the first having happened
    let composite = DiagramCommand::Composite(CompositeCommand {
        name: "Shuffle".to_string(),
        commands: vec![
            DiagramCommand::Reorder(ReorderObject { id: a, from: 0, to: 1 }),
            DiagramCommand::Reorder(ReorderObject { id: b, from: 0, to: 1 }),
        ],
    });
    let mut history = CommandHistory::new(10);
    history.execute(composite, &mut store);
    assert_eq!(store.ids(), vec![a, b]);
    assert_eq!(history.undo_name(), Some("Shuffle"));

    history.undo(&mut store);
    assert_eq!(store, before);
}

#[test]
fn test_delete_detaches_and_undo_reattaches() {
    let mut store = ObjectStore::new();
    let a = circle(&mut store, 0.0);
    let b = circle(&mut store, 100.0);
    let link = store.generate_id();
    store.insert(DiagramObject::new(
        link,
        Shape::Connector(DiagramConnector::attached(
            Point::new(5.0, 0.0),
            Point::new(95.0, 0.0),
            a,
            b,
        )),
    ));

    let cmd = DiagramCommand::delete(&store, &[a]).unwrap();
    let mut history = CommandHistory::new(10);
    history.execute(cmd, &mut store);
    let Shape::Connector(c) = &store.get(link).unwrap().shape else {
        panic!("expected connector");
    };
    assert_eq!(c.source, None);
    assert_eq!(c.target, Some(b));

    history.undo(&mut store);
    assert_eq!(store.ids(), vec![a, b, link]);
    let Shape::Connector(c) = &store.get(link).unwrap().shape else {
        panic!("expected connector");
    };
    assert_eq!(c.source, Some(a));
}
