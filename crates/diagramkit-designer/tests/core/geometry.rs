use diagramkit_designer::geometry::{self, Handle, HandleMetrics, HitMode};
use diagramkit_designer::model::{
    DiagramCircle, DiagramConnector, DiagramCurve, DiagramEllipse, DiagramLine, DiagramPath,
    DiagramPolygon, DiagramRectangle, DiagramTaperedLine, DiagramText,
};
use diagramkit_designer::{Bounds, DiagramObject, ObjectId, Point, Shape};
use diagramkit_settings::InteractionSettings;
use proptest::prelude::*;

fn rect(x: f64, y: f64, w: f64, h: f64) -> DiagramObject {
    DiagramObject::new(ObjectId(1), Shape::Rectangle(DiagramRectangle::new(x, y, w, h)))
}

#[test]
fn test_handle_tolerance_is_zoom_invariant() {
    let settings = InteractionSettings::default();
    let obj = rect(0.0, 0.0, 100.0, 100.0);

    for zoom in [1.0, 4.0] {
        let metrics = HandleMetrics::new(zoom, &settings);
        // six screen pixels right of the corner
        let near = Point::new(100.0 + 6.0 / zoom, 100.0);
        assert_eq!(
            geometry::handle_at(near, &obj, &metrics),
            Some(Handle::BottomRight),
            "zoom {}",
            zoom
        );
        // twelve screen pixels away
        let far = Point::new(100.0 + 12.0 / zoom, 100.0);
        assert_eq!(geometry::handle_at(far, &obj, &metrics), None, "zoom {}", zoom);
    }
}

#[test]
fn test_rotate_handle_sits_above_top_edge() {
    let settings = InteractionSettings::default();
    let obj = rect(0.0, 0.0, 100.0, 100.0);
    let metrics = HandleMetrics::new(2.0, &settings);
    let at = Point::new(50.0, -settings.rotate_handle_offset_px / 2.0);
    assert_eq!(geometry::handle_at(at, &obj, &metrics), Some(Handle::Rotate));
}

#[test]
fn test_rotated_hit_uses_local_frame() {
    let obj = rect(0.0, 0.0, 100.0, 10.0).with_rotation(90.0);
    // rotated about (50, 5), the bar now runs vertically through x = 50
    assert!(geometry::contains(&obj, Point::new(50.0, 40.0), 0.0, HitMode::Bounds));
    assert!(!geometry::contains(&obj, Point::new(90.0, 5.0), 0.0, HitMode::Bounds));
}

#[test]
fn test_precise_mode_unfilled_uses_edges() {
    let obj = DiagramObject::new(
        ObjectId(1),
        Shape::Circle(DiagramCircle::new(Point::new(0.0, 0.0), 50.0)),
    );
    assert!(geometry::contains(&obj, Point::new(0.0, 0.0), 1.0, HitMode::Bounds));
    assert!(!geometry::contains(&obj, Point::new(0.0, 0.0), 1.0, HitMode::Precise));
    assert!(geometry::contains(&obj, Point::new(50.5, 0.0), 1.0, HitMode::Precise));
}

#[test]
fn test_line_hit_follows_stroke() {
    let obj = DiagramObject::new(
        ObjectId(1),
        Shape::Line(DiagramLine::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0))),
    );
    assert!(geometry::contains(&obj, Point::new(50.0, 51.0), 2.0, HitMode::Bounds));
    assert!(!geometry::contains(&obj, Point::new(90.0, 10.0), 2.0, HitMode::Bounds));
}

#[test]
fn test_polygon_first_vertex_points_up() {
    let vertices = geometry::regular_polygon_vertices(Point::new(0.0, 0.0), 10.0, 4, 0.0);
    assert!((vertices[0].x - 0.0).abs() < 1e-9);
    assert!((vertices[0].y + 10.0).abs() < 1e-9);
}

fn coord() -> impl Strategy<Value = Point> {
    (-500.0..500.0f64, -500.0..500.0f64).prop_map(|(x, y)| Point::new(x, y))
}

fn extent() -> std::ops::Range<f64> {
    1.0..200.0
}

fn area_shape() -> BoxedStrategy<Shape> {
    prop_oneof![
        (coord(), extent()).prop_map(|(c, r)| Shape::Circle(DiagramCircle::new(c, r))),
        (coord(), extent(), extent())
            .prop_map(|(c, rx, ry)| Shape::Ellipse(DiagramEllipse::new(c, rx, ry))),
        (coord(), extent(), extent())
            .prop_map(|(c, w, h)| Shape::Rectangle(DiagramRectangle::new(c.x, c.y, w, h))),
        (coord(), extent(), 3u32..9)
            .prop_map(|(c, r, n)| Shape::RegularPolygon(DiagramPolygon::new(c, r, n))),
        (coord(), extent(), extent()).prop_map(|(c, w, h)| Shape::Text(DiagramText::new(
            "label",
            Bounds::new(c.x, c.y, c.x + w, c.y + h)
        ))),
    ]
    .boxed()
}

fn linear_shape() -> BoxedStrategy<Shape> {
    prop_oneof![
        (coord(), coord()).prop_map(|(a, b)| Shape::Line(DiagramLine::new(a, b))),
        (coord(), coord(), coord())
            .prop_map(|(a, ctrl, b)| Shape::Curve(DiagramCurve::new(a, ctrl, b))),
        (coord(), coord()).prop_map(|(a, b)| Shape::TaperedLine(DiagramTaperedLine::new(a, b))),
        prop::collection::vec(coord(), 2..12)
            .prop_map(|points| Shape::Freehand(DiagramPath::new(points, false))),
        (prop::collection::vec(coord(), 2..8), any::<bool>())
            .prop_map(|(points, closed)| Shape::Polyline(DiagramPath::new(points, closed))),
        (coord(), coord()).prop_map(|(a, b)| Shape::Connector(DiagramConnector::new(a, b))),
    ]
    .boxed()
}

fn any_object() -> impl Strategy<Value = DiagramObject> {
    (prop_oneof![area_shape(), linear_shape()], -720.0..720.0f64)
        .prop_map(|(shape, rot)| DiagramObject::new(ObjectId(1), shape).with_rotation(rot))
}

proptest! {
    #[test]
    fn prop_center_lies_within_bounds(obj in any_object()) {
        let bounds = geometry::bounds(&obj).inflate(1e-6);
        prop_assert!(bounds.contains(geometry::center(&obj)));
    }

    #[test]
    fn prop_handle_detection_matches_across_zoom(
        dx in -20.0..20.0f64,
        dy in -20.0..20.0f64,
        zoom in 0.25..8.0f64,
    ) {
        let settings = InteractionSettings::default();
        let obj = rect(0.0, 0.0, 400.0, 300.0);
        let base = HandleMetrics::new(1.0, &settings);
        let zoomed = HandleMetrics::new(zoom, &settings);
        // the same screen offset from the corner, expressed in world units
        let at_base = Point::new(400.0 + dx, 300.0 + dy);
        let at_zoom = Point::new(400.0 + dx / zoom, 300.0 + dy / zoom);
        prop_assert_eq!(
            geometry::handle_at(at_base, &obj, &base),
            geometry::handle_at(at_zoom, &obj, &zoomed)
        );
    }
}
