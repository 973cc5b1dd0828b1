//! Preview drawing boundary.
//!
//! Tools paint transient feedback (rubber-band shapes, selection boxes,
//! handles) through [`PreviewSurface`]. The host renderer implements it;
//! [`RecordingSurface`] captures primitives for tests and headless replay.

use crate::geometry::{self, Handle};
use crate::model::{Bounds, DiagramObject, Point, Shape, ShapeGeometry};

pub trait PreviewSurface {
    fn stroke_polyline(&mut self, points: &[Point], closed: bool);

    /// Ellipse with radii `rx`/`ry`, rotated by `rotation` degrees.
    fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, rotation: f64);

    fn selection_box(&mut self, bounds: Bounds);

    fn handle(&mut self, handle: Handle, at: Point);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewPrimitive {
    Polyline {
        points: Vec<Point>,
        closed: bool,
    },
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
        rotation: f64,
    },
    SelectionBox(Bounds),
    Handle {
        handle: Handle,
        at: Point,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    primitives: Vec<PreviewPrimitive>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[PreviewPrimitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    pub fn handles(&self) -> impl Iterator<Item = (Handle, Point)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            PreviewPrimitive::Handle { handle, at } => Some((*handle, *at)),
            _ => None,
        })
    }
}

impl PreviewSurface for RecordingSurface {
    fn stroke_polyline(&mut self, points: &[Point], closed: bool) {
        self.primitives.push(PreviewPrimitive::Polyline {
            points: points.to_vec(),
            closed,
        });
    }

    fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, rotation: f64) {
        self.primitives.push(PreviewPrimitive::Ellipse {
            center,
            rx,
            ry,
            rotation,
        });
    }

    fn selection_box(&mut self, bounds: Bounds) {
        self.primitives.push(PreviewPrimitive::SelectionBox(bounds));
    }

    fn handle(&mut self, handle: Handle, at: Point) {
        self.primitives.push(PreviewPrimitive::Handle { handle, at });
    }
}

const ARROW_HEAD_LENGTH: f64 = 10.0;
const ARROW_HEAD_ANGLE: f64 = 25.0;

/// The two barbs of an arrow head ending at `end`.
pub fn arrow_head(start: Point, end: Point) -> Option<[Point; 3]> {
    let dir = end - start;
    let len = dir.length();
    if len < f64::EPSILON {
        return None;
    }
    let back = dir * (-ARROW_HEAD_LENGTH / len);
    let left = rotate_vector(back, ARROW_HEAD_ANGLE);
    let right = rotate_vector(back, -ARROW_HEAD_ANGLE);
    Some([end + left, end, end + right])
}

fn rotate_vector(v: Point, degrees: f64) -> Point {
    crate::model::rotate_point(v, Point::default(), degrees)
}

/// Draws an object's outline in world space.
pub fn draw_object(surface: &mut dyn PreviewSurface, obj: &DiagramObject) {
    match &obj.shape {
        Shape::Circle(c) => surface.stroke_ellipse(c.center, c.radius, c.radius, 0.0),
        Shape::Ellipse(e) => surface.stroke_ellipse(e.center, e.rx, e.ry, obj.rotation()),
        _ => {
            let closed = obj.shape.has_area();
            surface.stroke_polyline(&geometry::world_outline(obj), closed);
            if let Shape::Arrow(line) = &obj.shape {
                let end = geometry::to_world(obj, line.end);
                let start = geometry::to_world(obj, line.start);
                if let Some(head) = arrow_head(start, end) {
                    surface.stroke_polyline(&head, false);
                }
            }
        }
    }
}

/// Draws the selection chrome of an object: its bounds and handles.
pub fn draw_selection(
    surface: &mut dyn PreviewSurface,
    obj: &DiagramObject,
    metrics: &geometry::HandleMetrics,
) {
    surface.stroke_polyline(
        &obj
            .shape
            .local_bounds()
            .corners()
            .map(|p| geometry::to_world(obj, p)),
        true,
    );
    for (handle, at) in geometry::handle_positions(obj, metrics) {
        surface.handle(handle, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiagramLine;
    use diagramkit_core::ObjectId;

    #[test]
    fn test_arrow_draws_head() {
        let obj = DiagramObject::new(
            ObjectId(1),
            Shape::Arrow(DiagramLine::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0))),
        );
        let mut surface = RecordingSurface::new();
        draw_object(&mut surface, &obj);
        assert_eq!(surface.len(), 2);
        let PreviewPrimitive::Polyline { points, .. } = &surface.primitives()[1] else {
            panic!("expected arrow head");
        };
        assert_eq!(points[1], Point::new(100.0, 0.0));
        assert!(points[0].x < 100.0 && points[2].x < 100.0);
    }
}
