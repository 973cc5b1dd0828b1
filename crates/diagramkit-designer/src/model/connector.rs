use serde::{Deserialize, Serialize};

use diagramkit_core::{ObjectId, Result};

use super::{Bounds, Endpoint, Point, Property, PropertyValue, ShapeGeometry};
use crate::geometry::distance_to_segment;

/// A line between two objects. Each end may be attached to an object, in
/// which case the endpoint follows that object's outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramConnector {
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub source: Option<ObjectId>,
    #[serde(default)]
    pub target: Option<ObjectId>,
}

impl DiagramConnector {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            source: None,
            target: None,
        }
    }

    pub fn attached(start: Point, end: Point, source: ObjectId, target: ObjectId) -> Self {
        Self {
            start,
            end,
            source: Some(source),
            target: Some(target),
        }
    }

    pub fn is_attached_to(&self, id: ObjectId) -> bool {
        self.source == Some(id) || self.target == Some(id)
    }

    pub fn attachment(&self, which: Endpoint) -> Option<ObjectId> {
        match which {
            Endpoint::Start => self.source,
            Endpoint::End => self.target,
        }
    }

    pub fn set_attachment(&mut self, which: Endpoint, id: Option<ObjectId>) {
        match which {
            Endpoint::Start => self.source = id,
            Endpoint::End => self.target = id,
        }
    }

    /// Clears every reference to `id`. Returns true when something changed.
    pub fn detach(&mut self, id: ObjectId) -> bool {
        let mut changed = false;
        if self.source == Some(id) {
            self.source = None;
            changed = true;
        }
        if self.target == Some(id) {
            self.target = None;
            changed = true;
        }
        changed
    }

    pub(crate) fn endpoint_mut(&mut self, which: Endpoint) -> &mut Point {
        match which {
            Endpoint::Start => &mut self.start,
            Endpoint::End => &mut self.end,
        }
    }
}

impl ShapeGeometry for DiagramConnector {
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
        let describe = |id: Option<ObjectId>| id.map(|id| id.to_string()).unwrap_or_default();
        vec![
            Property::string("Source", describe(self.source)),
            Property::string("Target", describe(self.target)),
        ]
    }

    // attachments change only through the connector tool or handle drags
    fn set_property(&mut self, _name: &str, _value: &PropertyValue) -> Result<bool> {
        Ok(false)
    }
}
