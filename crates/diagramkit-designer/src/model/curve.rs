use serde::{Deserialize, Serialize};

use diagramkit_core::Result;

use super::{Bounds, Endpoint, Point, Property, PropertyValue, ShapeGeometry};
use crate::geometry::{distance_to_segment, polyline_distance, quad_bezier_point};

const CURVE_SAMPLES: usize = 32;

/// Quadratic Bézier curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramCurve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl DiagramCurve {
    pub fn new(start: Point, control: Point, end: Point) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Curve whose control point sits on the chord midpoint.
    pub fn straight(start: Point, end: Point) -> Self {
        Self::new(start, start.midpoint(&end), end)
    }

    pub(crate) fn endpoint_mut(&mut self, which: Endpoint) -> &mut Point {
        match which {
            Endpoint::Start => &mut self.start,
            Endpoint::End => &mut self.end,
        }
    }
}

fn sample(start: Point, control: Point, end: Point) -> Vec<Point> {
    (0..=CURVE_SAMPLES)
        .map(|i| quad_bezier_point(start, control, end, i as f64 / CURVE_SAMPLES as f64))
        .collect()
}

/// Exact bounds of a quadratic Bézier using its axis extrema.
fn curve_bounds(start: Point, control: Point, end: Point) -> Bounds {
    let mut bounds = Bounds::from_corners(start, end);
    let axis_extremum = |p0: f64, p1: f64, p2: f64| {
        let denom = p0 - 2.0 * p1 + p2;
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let t = (p0 - p1) / denom;
        (t > 0.0 && t < 1.0).then_some(t)
    };
    for t in [
        axis_extremum(start.x, control.x, end.x),
        axis_extremum(start.y, control.y, end.y),
    ]
    .into_iter()
    .flatten()
    {
        bounds.expand_to(quad_bezier_point(start, control, end, t));
    }
    bounds
}

impl ShapeGeometry for DiagramCurve {
    fn local_bounds(&self) -> Bounds {
        curve_bounds(self.start, self.control, self.end)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for p in [&mut self.start, &mut self.control, &mut self.end] {
            p.x += dx;
            p.y += dy;
        }
    }

    fn contains_local(&self, _p: Point) -> bool {
        false
    }

    fn edge_distance(&self, p: Point) -> f64 {
        polyline_distance(p, &self.outline(), false)
    }

    fn outline(&self) -> Vec<Point> {
        sample(self.start, self.control, self.end)
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::number("Start X", self.start.x),
            Property::number("Start Y", self.start.y),
            Property::number("Control X", self.control.x),
            Property::number("Control Y", self.control.y),
            Property::number("End X", self.end.x),
            Property::number("End Y", self.end.y),
        ]
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        match name {
            "Start X" => self.start.x = value.as_number(name)?,
            "Start Y" => self.start.y = value.as_number(name)?,
            "Control X" => self.control.x = value.as_number(name)?,
            "Control Y" => self.control.y = value.as_number(name)?,
            "End X" => self.end.x = value.as_number(name)?,
            "End Y" => self.end.y = value.as_number(name)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Quadratic curve whose stroke width varies linearly from start to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramTaperedLine {
    pub start: Point,
    pub control: Point,
    pub end: Point,
    pub start_width: f64,
    pub end_width: f64,
}

impl DiagramTaperedLine {
    pub const DEFAULT_START_WIDTH: f64 = 6.0;
    pub const DEFAULT_END_WIDTH: f64 = 1.0;

    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            control: start.midpoint(&end),
            end,
            start_width: Self::DEFAULT_START_WIDTH,
            end_width: Self::DEFAULT_END_WIDTH,
        }
    }

    fn half_width_at(&self, t: f64) -> f64 {
        (self.start_width + (self.end_width - self.start_width) * t) / 2.0
    }

    pub(crate) fn endpoint_mut(&mut self, which: Endpoint) -> &mut Point {
        match which {
            Endpoint::Start => &mut self.start,
            Endpoint::End => &mut self.end,
        }
    }
}

impl ShapeGeometry for DiagramTaperedLine {
    fn local_bounds(&self) -> Bounds {
        let widest = self.start_width.max(self.end_width) / 2.0;
        curve_bounds(self.start, self.control, self.end).inflate(widest)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for p in [&mut self.start, &mut self.control, &mut self.end] {
            p.x += dx;
            p.y += dy;
        }
    }

    fn contains_local(&self, p: Point) -> bool {
        self.edge_distance(p) <= 0.0
    }

    // distance to the tapered body, zero inside it
    fn edge_distance(&self, p: Point) -> f64 {
        let samples = sample(self.start, self.control, self.end);
        let n = samples.len() - 1;
        samples
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let t = (i as f64 + 0.5) / n as f64;
                (distance_to_segment(p, w[0], w[1]) - self.half_width_at(t)).max(0.0)
            })
            .fold(f64::INFINITY, f64::min)
    }

    fn outline(&self) -> Vec<Point> {
        sample(self.start, self.control, self.end)
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::number("Start X", self.start.x),
            Property::number("Start Y", self.start.y),
            Property::number("Control X", self.control.x),
            Property::number("Control Y", self.control.y),
            Property::number("End X", self.end.x),
            Property::number("End Y", self.end.y),
            Property::number("Start Width", self.start_width),
            Property::number("End Width", self.end_width),
        ]
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        match name {
            "Start X" => self.start.x = value.as_number(name)?,
            "Start Y" => self.start.y = value.as_number(name)?,
            "Control X" => self.control.x = value.as_number(name)?,
            "Control Y" => self.control.y = value.as_number(name)?,
            "End X" => self.end.x = value.as_number(name)?,
            "End Y" => self.end.y = value.as_number(name)?,
            "Start Width" => self.start_width = value.as_extent(name, 0.0)?,
            "End Width" => self.end_width = value.as_extent(name, 0.0)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
