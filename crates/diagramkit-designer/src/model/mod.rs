//! Diagram object model.
//!
//! A [`DiagramObject`] pairs a stable [`ObjectId`] with a [`Shape`] (the
//! type-tagged geometry record), a [`Style`] and a rotation in degrees. Shape
//! geometry is stored unrotated; the rotation is applied about the center of
//! the unrotated bounds by the geometry engine.

use serde::{Deserialize, Deserializer, Serialize};
use std::ops::{Add, Mul, Sub};

use diagramkit_core::constants::normalize_degrees;
use diagramkit_core::{EditorError, ObjectId, Result};

mod circle;
mod connector;
mod curve;
mod ellipse;
mod line;
mod path;
mod polygon;
mod rectangle;
mod text;

pub use circle::DiagramCircle;
pub use connector::DiagramConnector;
pub use curve::{DiagramCurve, DiagramTaperedLine};
pub use ellipse::DiagramEllipse;
pub use line::DiagramLine;
pub use path::DiagramPath;
pub use polygon::DiagramPolygon;
pub use rectangle::DiagramRectangle;
pub use text::DiagramText;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Rotates `p` about `center` by `angle_deg` degrees.
pub fn rotate_point(p: Point, center: Point, angle_deg: f64) -> Point {
    if angle_deg == 0.0 {
        return p;
    }
    let angle_rad = angle_deg.to_radians();
    let s = angle_rad.sin();
    let c = angle_rad.cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point {
        x: center.x + dx * c - dy * s,
        y: center.y + dx * s + dy * c,
    }
}

/// Axis-aligned bounding box. `min_y` is the top edge (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Creates bounds from two opposite corners in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Smallest bounds containing every point, or `None` for an empty input.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bounds.expand_to(p);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Corners clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn expand_to(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn inflate(&self, amount: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }
}

/// Stroke and fill attributes of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke: String,
    #[serde(default)]
    pub fill: Option<String>,
    pub stroke_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: "#000000".to_string(),
            fill: None,
            stroke_width: 1.0,
        }
    }
}

impl Style {
    pub fn filled(fill: impl Into<String>) -> Self {
        Self {
            fill: Some(fill.into()),
            ..Self::default()
        }
    }

    pub fn is_filled(&self) -> bool {
        self.fill.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

impl Property {
    pub fn number(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value: PropertyValue::Number(value),
        }
    }

    pub fn string(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: PropertyValue::String(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Number(f64),
    String(String),
    Bool(bool),
}

impl PropertyValue {
    /// Reads a finite number, rejecting other variants.
    pub fn as_number(&self, name: &str) -> Result<f64> {
        match self {
            PropertyValue::Number(v) if v.is_finite() => Ok(*v),
            PropertyValue::Number(v) => Err(invalid_property(name, format!("{} is not finite", v))),
            _ => Err(invalid_property(name, "expected a number")),
        }
    }

    pub fn as_text(&self, name: &str) -> Result<&str> {
        match self {
            PropertyValue::String(s) => Ok(s),
            _ => Err(invalid_property(name, "expected a string")),
        }
    }

    /// Reads a number and requires it to be at least `min`.
    pub fn as_extent(&self, name: &str, min: f64) -> Result<f64> {
        let v = self.as_number(name)?;
        if v < min {
            return Err(invalid_property(name, format!("{} is below {}", v, min)));
        }
        Ok(v)
    }
}

pub(crate) fn invalid_property(name: &str, reason: impl Into<String>) -> EditorError {
    EditorError::InvalidProperty {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Geometry every shape record provides in its own unrotated frame.
pub trait ShapeGeometry {
    /// Bounds of the unrotated geometry.
    fn local_bounds(&self) -> Bounds;

    fn translate(&mut self, dx: f64, dy: f64);

    /// True point-in-shape test. Shapes without area return `false`.
    fn contains_local(&self, p: Point) -> bool;

    /// Distance from `p` to the nearest point of the outline.
    fn edge_distance(&self, p: Point) -> f64;

    /// Polyline approximation of the outline, unrotated.
    fn outline(&self) -> Vec<Point>;

    fn properties(&self) -> Vec<Property>;

    /// Applies a shape-specific property. Returns `Ok(false)` when the name
    /// does not belong to this shape.
    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Ellipse,
    Rectangle,
    Text,
    Line,
    Arrow,
    Curve,
    TaperedLine,
    Freehand,
    Polyline,
    RegularPolygon,
    Connector,
}

/// How a handle drag changes a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Uniform radius scale about the center.
    Uniform,
    /// Independent width and height.
    Box,
    /// Endpoint (and control point) relocation.
    Endpoints,
    /// Uniform scale of a point array about the opposite handle.
    PointScale,
}

impl ShapeKind {
    pub fn resize_mode(self) -> ResizeMode {
        match self {
            ShapeKind::Circle | ShapeKind::RegularPolygon => ResizeMode::Uniform,
            ShapeKind::Ellipse | ShapeKind::Rectangle | ShapeKind::Text => ResizeMode::Box,
            ShapeKind::Line
            | ShapeKind::Arrow
            | ShapeKind::Curve
            | ShapeKind::TaperedLine
            | ShapeKind::Connector => ResizeMode::Endpoints,
            ShapeKind::Freehand | ShapeKind::Polyline => ResizeMode::PointScale,
        }
    }

    /// Shapes whose geometry is a stroke between two endpoints.
    pub fn is_linear(self) -> bool {
        self.resize_mode() == ResizeMode::Endpoints
    }

    /// Shapes that carry an editable control point.
    pub fn has_control_point(self) -> bool {
        matches!(self, ShapeKind::Curve | ShapeKind::TaperedLine)
    }

    pub fn supports_rotation(self) -> bool {
        !matches!(self, ShapeKind::Circle | ShapeKind::Connector)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Text => "Text",
            ShapeKind::Line => "Line",
            ShapeKind::Arrow => "Arrow",
            ShapeKind::Curve => "Curve",
            ShapeKind::TaperedLine => "Tapered Line",
            ShapeKind::Freehand => "Freehand",
            ShapeKind::Polyline => "Polyline",
            ShapeKind::RegularPolygon => "Polygon",
            ShapeKind::Connector => "Connector",
        }
    }
}

/// Type-tagged geometry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Circle(DiagramCircle),
    Ellipse(DiagramEllipse),
    Rectangle(DiagramRectangle),
    Text(DiagramText),
    Line(DiagramLine),
    Arrow(DiagramLine),
    Curve(DiagramCurve),
    TaperedLine(DiagramTaperedLine),
    Freehand(DiagramPath),
    Polyline(DiagramPath),
    RegularPolygon(DiagramPolygon),
    Connector(DiagramConnector),
}

macro_rules! each_shape {
    ($shape:expr, $s:ident => $body:expr) => {
        match $shape {
            Shape::Circle($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Text($s) => $body,
            Shape::Line($s) => $body,
            Shape::Arrow($s) => $body,
            Shape::Curve($s) => $body,
            Shape::TaperedLine($s) => $body,
            Shape::Freehand($s) => $body,
            Shape::Polyline($s) => $body,
            Shape::RegularPolygon($s) => $body,
            Shape::Connector($s) => $body,
        }
    };
}

impl ShapeGeometry for Shape {
    fn local_bounds(&self) -> Bounds {
        each_shape!(self, s => s.local_bounds())
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        each_shape!(self, s => s.translate(dx, dy))
    }

    fn contains_local(&self, p: Point) -> bool {
        match self {
            // open strokes have no interior
            Shape::Freehand(_) => false,
            Shape::Polyline(s) if !s.closed => false,
            _ => each_shape!(self, s => s.contains_local(p)),
        }
    }

    fn edge_distance(&self, p: Point) -> f64 {
        each_shape!(self, s => s.edge_distance(p))
    }

    fn outline(&self) -> Vec<Point> {
        each_shape!(self, s => s.outline())
    }

    fn properties(&self) -> Vec<Property> {
        each_shape!(self, s => s.properties())
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<bool> {
        each_shape!(self, s => s.set_property(name, value))
    }
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Text(_) => ShapeKind::Text,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Curve(_) => ShapeKind::Curve,
            Shape::TaperedLine(_) => ShapeKind::TaperedLine,
            Shape::Freehand(_) => ShapeKind::Freehand,
            Shape::Polyline(_) => ShapeKind::Polyline,
            Shape::RegularPolygon(_) => ShapeKind::RegularPolygon,
            Shape::Connector(_) => ShapeKind::Connector,
        }
    }

    /// True when the outline encloses an area that fill can cover.
    pub fn has_area(&self) -> bool {
        match self {
            Shape::Circle(_)
            | Shape::Ellipse(_)
            | Shape::Rectangle(_)
            | Shape::Text(_)
            | Shape::RegularPolygon(_) => true,
            Shape::Polyline(p) => p.closed,
            _ => false,
        }
    }

    /// Endpoints of linear shapes.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match self {
            Shape::Line(s) | Shape::Arrow(s) => Some((s.start, s.end)),
            Shape::Curve(s) => Some((s.start, s.end)),
            Shape::TaperedLine(s) => Some((s.start, s.end)),
            Shape::Connector(s) => Some((s.start, s.end)),
            _ => None,
        }
    }

    pub fn set_endpoint(&mut self, which: Endpoint, p: Point) {
        let slot = match self {
            Shape::Line(s) | Shape::Arrow(s) => s.endpoint_mut(which),
            Shape::Curve(s) => s.endpoint_mut(which),
            Shape::TaperedLine(s) => s.endpoint_mut(which),
            Shape::Connector(s) => s.endpoint_mut(which),
            _ => return,
        };
        *slot = p;
    }

    pub fn control_point(&self) -> Option<Point> {
        match self {
            Shape::Curve(s) => Some(s.control),
            Shape::TaperedLine(s) => Some(s.control),
            _ => None,
        }
    }

    pub fn set_control_point(&mut self, p: Point) {
        match self {
            Shape::Curve(s) => s.control = p,
            Shape::TaperedLine(s) => s.control = p,
            _ => {}
        }
    }
}

/// One end of a linear shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

fn deserialize_rotation<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(normalize_degrees(raw))
}

/// An object on the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramObject {
    pub id: ObjectId,
    pub name: String,
    pub shape: Shape,
    #[serde(default)]
    pub style: Style,
    #[serde(default, deserialize_with = "deserialize_rotation")]
    rotation: f64,
}

impl DiagramObject {
    pub fn new(id: ObjectId, shape: Shape) -> Self {
        let name = shape.kind().display_name().to_string();
        Self {
            id,
            name,
            shape,
            style: Style::default(),
            rotation: 0.0,
        }
    }

    /// An object not yet placed in a store. The store assigns the real id
    /// when the object is committed.
    pub fn draft(shape: Shape, style: Style) -> Self {
        Self {
            style,
            ..Self::new(ObjectId(0), shape)
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.set_rotation(degrees);
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Rotation in degrees, always in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Stores `degrees` normalized into `[0, 360)`. Shapes without a
    /// meaningful orientation keep `0`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = if self.kind().supports_rotation() {
            normalize_degrees(degrees)
        } else {
            0.0
        };
    }

    pub fn rotate_by(&mut self, delta_degrees: f64) {
        self.set_rotation(self.rotation + delta_degrees);
    }

    pub fn is_filled(&self) -> bool {
        self.style.is_filled() && self.shape.has_area()
    }

    /// Properties-panel view: object fields followed by shape fields.
    pub fn properties(&self) -> Vec<Property> {
        let mut props = vec![
            Property::string("Name", self.name.clone()),
            Property::number("Rotation", self.rotation),
            Property::string("Stroke", self.style.stroke.clone()),
            Property::string("Fill", self.style.fill.clone().unwrap_or_default()),
            Property::number("Stroke Width", self.style.stroke_width),
        ];
        props.extend(self.shape.properties());
        props
    }

    /// Properties-panel write through normalized setters.
    pub fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<()> {
        match name {
            "Name" => self.name = value.as_text(name)?.to_string(),
            "Rotation" => self.set_rotation(value.as_number(name)?),
            "Stroke" => self.style.stroke = value.as_text(name)?.to_string(),
            "Fill" => {
                let fill = value.as_text(name)?;
                self.style.fill = if fill.is_empty() {
                    None
                } else {
                    Some(fill.to_string())
                };
            }
            "Stroke Width" => self.style.stroke_width = value.as_extent(name, 0.0)?,
            _ => {
                if !self.shape.set_property(name, value)? {
                    return Err(invalid_property(
                        name,
                        format!("not a property of {}", self.kind().display_name()),
                    ));
                }
            }
        }
        Ok(())
    }
}
