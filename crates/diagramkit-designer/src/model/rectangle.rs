use serde::{Deserialize, Serialize};

use diagramkit_core::Result;

use super::{Bounds, Point, Property, PropertyValue, ShapeGeometry};
use crate::geometry::polyline_distance;

/// Axis-aligned rectangle stored by its top-left corner and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub corner_radius: f64,
}

impl DiagramRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            corner_radius: 0.0,
        }
    }

    pub fn from_bounds(bounds: Bounds) -> Self {
        Self::new(bounds.min_x, bounds.min_y, bounds.width(), bounds.height())
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.x = bounds.min_x;
        self.y = bounds.min_y;
        self.width = bounds.width();
        self.height = bounds.height();
        self.corner_radius = self
            .corner_radius
            .min(self.width / 2.0)
            .min(self.height / 2.0);
    }
}

impl ShapeGeometry for DiagramRectangle {
    fn local_bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    fn contains_local(&self, p: Point) -> bool {
        self.local_bounds().contains(p)
    }

    fn edge_distance(&self, p: Point) -> f64 {
        polyline_distance(p, &self.outline(), true)
    }

    fn outline(&self) -> Vec<Point> {
        self.local_bounds().corners().to_vec()
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::number("X", self.x),
            Property::number("Y", self.y),
            Property::number("Width", self.width),
            Property::number("Height", self.height),
            Property::number("Corner Radius", self.corner_radius),
        ]
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        match name {
            "X" => self.x = value.as_number(name)?,
            "Y" => self.y = value.as_number(name)?,
            "Width" => self.width = value.as_extent(name, 0.0)?,
            "Height" => self.height = value.as_extent(name, 0.0)?,
            "Corner Radius" => self.corner_radius = value.as_extent(name, 0.0)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
