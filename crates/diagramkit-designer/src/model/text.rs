use serde::{Deserialize, Serialize};

use diagramkit_core::Result;

use super::{Bounds, Point, Property, PropertyValue, ShapeGeometry};
use crate::geometry::polyline_distance;

/// A text label laid out inside a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramText {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
}

impl DiagramText {
    pub const DEFAULT_CONTENT: &'static str = "Text";

    pub fn new(text: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            text: text.into(),
            x: bounds.min_x,
            y: bounds.min_y,
            width: bounds.width(),
            height: bounds.height(),
            font_size: 14.0,
        }
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.x = bounds.min_x;
        self.y = bounds.min_y;
        self.width = bounds.width();
        self.height = bounds.height();
    }
}

impl ShapeGeometry for DiagramText {
    fn local_bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    // the whole text box is clickable
    fn contains_local(&self, p: Point) -> bool {
        self.local_bounds().contains(p)
    }

    fn edge_distance(&self, p: Point) -> f64 {
        if self.contains_local(p) {
            return 0.0;
        }
        polyline_distance(p, &self.outline(), true)
    }

    fn outline(&self) -> Vec<Point> {
        self.local_bounds().corners().to_vec()
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::string("Text", self.text.clone()),
            Property::number("X", self.x),
            Property::number("Y", self.y),
            Property::number("Width", self.width),
            Property::number("Height", self.height),
            Property::number("Font Size", self.font_size),
        ]
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        match name {
            "Text" => self.text = value.as_text(name)?.to_string(),
            "X" => self.x = value.as_number(name)?,
            "Y" => self.y = value.as_number(name)?,
            "Width" => self.width = value.as_extent(name, 0.0)?,
            "Height" => self.height = value.as_extent(name, 0.0)?,
            "Font Size" => self.font_size = value.as_extent(name, 1.0)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
