use serde::{Deserialize, Serialize};

use diagramkit_core::Result;

use super::{Bounds, Point, Property, PropertyValue, ShapeGeometry};
use crate::geometry::{point_in_polygon, polyline_distance};

/// Point sequence backing freehand strokes and polylines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramPath {
    pub points: Vec<Point>,
    #[serde(default)]
    pub closed: bool,
}

impl DiagramPath {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Total stroke length along the points.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    /// Scales every point about `anchor` by independent factors.
    pub fn scale_about(&mut self, anchor: Point, sx: f64, sy: f64) {
        for p in &mut self.points {
            p.x = anchor.x + (p.x - anchor.x) * sx;
            p.y = anchor.y + (p.y - anchor.y) * sy;
        }
    }
}

impl ShapeGeometry for DiagramPath {
    fn local_bounds(&self) -> Bounds {
        Bounds::from_points(self.points.iter().copied())
            .unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0))
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }

    fn contains_local(&self, p: Point) -> bool {
        self.closed && point_in_polygon(p, &self.points)
    }

    fn edge_distance(&self, p: Point) -> f64 {
        polyline_distance(p, &self.points, self.closed)
    }

    fn outline(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn properties(&self) -> Vec<Property> {
        let b = self.local_bounds();
        vec![
            Property::number("Points", self.points.len() as f64),
            Property {
                name: "Closed".to_string(),
                value: PropertyValue::Bool(self.closed),
            },
            Property::number("Width", b.width()),
            Property::number("Height", b.height()),
        ]
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        match (name, value) {
            ("Closed", PropertyValue::Bool(closed)) => self.closed = *closed,
            ("Closed", _) => {
                return Err(super::invalid_property(name, "expected a boolean"));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
