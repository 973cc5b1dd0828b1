use diagramkit_designer::model::{DiagramCircle, DiagramPolygon, DiagramRectangle};
use diagramkit_designer::{DiagramObject, ObjectId, Point, PropertyValue, Shape};
use proptest::prelude::*;

fn rect() -> DiagramObject {
    DiagramObject::new(
        ObjectId(1),
        Shape::Rectangle(DiagramRectangle::new(0.0, 0.0, 10.0, 10.0)),
    )
}

#[test]
fn test_rotation_deltas_summing_to_370() {
    let mut obj = rect();
    obj.rotate_by(200.0);
    obj.rotate_by(170.0);
    assert!((obj.rotation() - 10.0).abs() < 1e-9);
}

#[test]
fn test_circle_ignores_rotation() {
    let mut obj = DiagramObject::new(
        ObjectId(1),
        Shape::Circle(DiagramCircle::new(Point::new(0.0, 0.0), 5.0)),
    );
    obj.set_rotation(45.0);
    assert_eq!(obj.rotation(), 0.0);
}

#[test]
fn test_polygon_sides_setter() {
    let mut obj = DiagramObject::new(
        ObjectId(1),
        Shape::RegularPolygon(DiagramPolygon::new(Point::new(0.0, 0.0), 5.0, 6)),
    );
    assert!(obj.set_property("Sides", &PropertyValue::Number(2.0)).is_err());
    obj.set_property("Sides", &PropertyValue::Number(4.4)).unwrap();
    let Shape::RegularPolygon(p) = &obj.shape else {
        panic!("expected polygon");
    };
    assert_eq!(p.sides, 4);
}

#[test]
fn test_unknown_property_rejected() {
    let mut obj = rect();
    let before = obj.clone();
    assert!(obj
        .set_property("Depth", &PropertyValue::Number(1.0))
        .is_err());
    assert_eq!(obj, before);
}

#[test]
fn test_properties_list_rotation() {
    let obj = rect().with_rotation(-90.0);
    let rotation = obj
        .properties()
        .into_iter()
        .find(|p| p.name == "Rotation")
        .unwrap();
    assert_eq!(rotation.value, PropertyValue::Number(270.0));
}

proptest! {
    #[test]
    fn prop_rotation_always_normalized(degrees in -1.0e7..1.0e7f64) {
        let mut obj = rect();
        obj.set_rotation(degrees);
        prop_assert!((0.0..360.0).contains(&obj.rotation()));
    }

    #[test]
    fn prop_rotation_setter_normalized(degrees in -1.0e7..1.0e7f64) {
        let mut obj = rect();
        obj.set_property("Rotation", &PropertyValue::Number(degrees)).unwrap();
        prop_assert!((0.0..360.0).contains(&obj.rotation()));
    }
}
