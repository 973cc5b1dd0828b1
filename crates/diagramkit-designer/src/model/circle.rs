use serde::{Deserialize, Serialize};

use diagramkit_core::Result;

use super::{Bounds, Point, Property, PropertyValue, ShapeGeometry};

const OUTLINE_SEGMENTS: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramCircle {
    pub center: Point,
    pub radius: f64,
}

impl DiagramCircle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl ShapeGeometry for DiagramCircle {
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
        p.distance_to(&self.center) <= self.radius
    }

    fn edge_distance(&self, p: Point) -> f64 {
        (p.distance_to(&self.center) - self.radius).abs()
    }

    fn outline(&self) -> Vec<Point> {
        (0..OUTLINE_SEGMENTS)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / OUTLINE_SEGMENTS as f64;
                Point::new(
                    self.center.x + self.radius * a.cos(),
                    self.center.y + self.radius * a.sin(),
                )
            })
            .collect()
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::number("Radius", self.radius),
            Property::number("Center X", self.center.x),
            Property::number("Center Y", self.center.y),
        ]
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        match name {
            "Radius" => self.radius = value.as_extent(name, 0.0)?,
            "Center X" => self.center.x = value.as_number(name)?,
            "Center Y" => self.center.y = value.as_number(name)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
