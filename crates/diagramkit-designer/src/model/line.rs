use serde::{Deserialize, Serialize};

use diagramkit_core::Result;

use super::{Bounds, Endpoint, Point, Property, PropertyValue, ShapeGeometry};
use crate::geometry::distance_to_segment;

/// Straight stroke. Also backs arrows, which differ only in rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramLine {
    pub start: Point,
    pub end: Point,
}

impl DiagramLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub(crate) fn endpoint_mut(&mut self, which: Endpoint) -> &mut Point {
        match which {
            Endpoint::Start => &mut self.start,
            Endpoint::End => &mut self.end,
        }
    }
}

impl ShapeGeometry for DiagramLine {
    fn local_bounds(&self) -> Bounds {
        Bounds::from_corners(self.start, self.end)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.start.x += dx;
        self.start.y += dy;
        self.end.x += dx;
        self.end.y += dy;
    }

    fn contains_local(&self, _p: Point) -> bool {
        false
    }

    fn edge_distance(&self, p: Point) -> f64 {
        distance_to_segment(p, self.start, self.end)
    }

    fn outline(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::number("Start X", self.start.x),
            Property::number("Start Y", self.start.y),
            Property::number("End X", self.end.x),
            Property::number("End Y", self.end.y),
        ]
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        match name {
            "Start X" => self.start.x = value.as_number(name)?,
            "Start Y" => self.start.y = value.as_number(name)?,
            "End X" => self.end.x = value.as_number(name)?,
            "End Y" => self.end.y = value.as_number(name)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
