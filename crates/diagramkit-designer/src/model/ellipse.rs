use serde::{Deserialize, Serialize};

use diagramkit_core::Result;

use super::{Bounds, Point, Property, PropertyValue, ShapeGeometry};
use crate::geometry::polyline_distance;

const OUTLINE_SEGMENTS: usize = 72;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramEllipse {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
}

impl DiagramEllipse {
    pub fn new(center: Point, rx: f64, ry: f64) -> Self {
        Self { center, rx, ry }
    }

    /// Ellipse inscribed in `bounds`.
    pub fn from_bounds(bounds: Bounds) -> Self {
        Self {
            center: bounds.center(),
            rx: bounds.width() / 2.0,
            ry: bounds.height() / 2.0,
        }
    }
}

impl ShapeGeometry for DiagramEllipse {
    fn local_bounds(&self) -> Bounds {
        Bounds::new(
            self.center.x - self.rx,
            self.center.y - self.ry,
            self.center.x + self.rx,
            self.center.y + self.ry,
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }

    fn contains_local(&self, p: Point) -> bool {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return false;
        }
        let nx = (p.x - self.center.x) / self.rx;
        let ny = (p.y - self.center.y) / self.ry;
        nx * nx + ny * ny <= 1.0
    }

    fn edge_distance(&self, p: Point) -> f64 {
        polyline_distance(p, &self.outline(), true)
    }

    fn outline(&self) -> Vec<Point> {
        (0..OUTLINE_SEGMENTS)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / OUTLINE_SEGMENTS as f64;
                Point::new(
                    self.center.x + self.rx * a.cos(),
                    self.center.y + self.ry * a.sin(),
                )
            })
            .collect()
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::number("Center X", self.center.x),
            Property::number("Center Y", self.center.y),
            Property::number("Radius X", self.rx),
            Property::number("Radius Y", self.ry),
        ]
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        match name {
            "Center X" => self.center.x = value.as_number(name)?,
            "Center Y" => self.center.y = value.as_number(name)?,
            "Radius X" => self.rx = value.as_extent(name, 0.0)?,
            "Radius Y" => self.ry = value.as_extent(name, 0.0)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
