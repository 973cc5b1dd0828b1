use diagramkit_designer::model::{DiagramCircle, DiagramPath, DiagramRectangle};
use diagramkit_designer::{
    DesignFile, EventRouter, Modifiers, ObjectId, Point, Shape, Style, Viewport,
};
use tempfile::TempDir;

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn sample_router() -> EventRouter {
    let mut router = EventRouter::default();
    router.add_object(
        Shape::Rectangle(DiagramRectangle::new(0.0, 0.0, 40.0, 40.0)),
        Style::filled("#ffcc00"),
    );
    router.add_object(
        Shape::Circle(DiagramCircle::new(p(200.0, 20.0), 20.0)),
        Style::default(),
    );
    router.add_object(
        Shape::Polyline(DiagramPath::new(vec![p(0.0, 100.0), p(50.0, 150.0), p(100.0, 100.0)], false)),
        Style::default(),
    );
    router.switch_tool("connector").unwrap();
    router.pointer_down(p(20.0, 20.0), Modifiers::NONE);
    router.pointer_up(p(200.0, 20.0), Modifiers::NONE);
    router.switch_tool("select").unwrap();
    router
}

#[test]
fn test_save_and_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("design.json");

    let router = sample_router();
    let design = DesignFile::from_document("roundtrip", router.store(), router.viewport());
    design.save_to_file(&path).unwrap();

    let loaded = DesignFile::load_from_file(&path).unwrap();
    assert_eq!(loaded.metadata.name, "roundtrip");
    let (store, viewport) = loaded.to_document();
    assert_eq!(store.objects(), router.store().objects());
    assert_eq!(viewport, *router.viewport());

    // ids handed out after load never collide with loaded ones
    let mut reloaded = EventRouter::default();
    reloaded.load_document(store, viewport);
    let fresh = reloaded.add_object(
        Shape::Circle(DiagramCircle::new(p(0.0, 0.0), 5.0)),
        Style::default(),
    );
    assert!(router.store().get(fresh).is_none());
    assert_eq!(reloaded.history().undo_depth(), 1);
}

#[test]
fn test_rotation_normalized_on_load() {
    let json = r##"{
        "version": "1.0",
        "metadata": {
            "name": "rotated",
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-01T00:00:00Z"
        },
        "viewport": { "zoom": 1.0, "pan_x": 0.0, "pan_y": 0.0 },
        "next_id": 2,
        "objects": [
            {
                "id": 1,
                "name": "Rectangle",
                "shape": { "type": "rectangle", "x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0 },
                "rotation": -450.0
            }
        ]
    }"##;
    let design = DesignFile::from_json(json).unwrap();
    let (store, _) = design.to_document();
    assert_eq!(store.get(ObjectId(1)).unwrap().rotation(), 270.0);
}

#[test]
fn test_missing_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.json");
    let err = DesignFile::load_from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.json"));
}

#[test]
fn test_load_document_resets_session() {
    let mut router = sample_router();
    router.select_all();
    router.load_document(Default::default(), Viewport::default());
    assert!(router.store().is_empty());
    assert!(router.selection().is_empty());
    assert!(!router.history().can_undo());
}
