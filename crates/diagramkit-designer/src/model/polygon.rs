use serde::{Deserialize, Serialize};

use diagramkit_core::Result;

use super::{Bounds, Point, Property, PropertyValue, ShapeGeometry};
use crate::geometry::{point_in_polygon, polyline_distance, regular_polygon_vertices};

/// Regular polygon described by its circumscribed circle.
///
/// The local bounds are the circumscribed square, so rotation about the
/// bounds center turns the polygon about its own center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramPolygon {
    pub center: Point,
    pub radius: f64,
    pub sides: u32,
}

impl DiagramPolygon {
    pub const MIN_SIDES: u32 = 3;

    pub fn new(center: Point, radius: f64, sides: u32) -> Self {
        Self {
            center,
            radius,
            sides: sides.max(Self::MIN_SIDES),
        }
    }

    pub fn vertices(&self) -> Vec<Point> {
        regular_polygon_vertices(self.center, self.radius, self.sides, 0.0)
    }
}

impl ShapeGeometry for DiagramPolygon {
    fn local_bounds(&self) -> Bounds {
        Bounds::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }

    fn contains_local(&self, p: Point) -> bool {
        point_in_polygon(p, &self.vertices())
    }

    fn edge_distance(&self, p: Point) -> f64 {
        polyline_distance(p, &self.vertices(), true)
    }

    fn outline(&self) -> Vec<Point> {
        self.vertices()
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::number("Center X", self.center.x),
            Property::number("Center Y", self.center.y),
            Property::number("Radius", self.radius),
            Property::number("Sides", self.sides as f64),
        ]
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        match name {
            "Center X" => self.center.x = value.as_number(name)?,
            "Center Y" => self.center.y = value.as_number(name)?,
            "Radius" => self.radius = value.as_extent(name, 0.0)?,
            "Sides" => {
                let sides = value.as_extent(name, Self::MIN_SIDES as f64)?;
                self.sides = sides.round() as u32;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
