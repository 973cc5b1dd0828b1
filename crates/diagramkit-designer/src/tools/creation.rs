//! Drag-to-create tools.
//!
//! Every creation tool follows the same protocol: the press anchors the
//! gesture and enters Drawing, moves update a rubber-band preview, and the
//! release commits one object if the gesture reached the minimum extent.
//! Shape-specific construction lives in a [`ShapeFactory`].

use std::any::Any;

use diagramkit_core::{EditorError, InteractionState};

use super::preview::draw_object;
use super::{exceeds_minimum, Commit, PointerEvent, Preview, PreviewSurface, Tool, ToolContext, ToolResult};
use crate::geometry::snap_angle;
use crate::model::{
    Bounds, DiagramCircle, DiagramCurve, DiagramEllipse, DiagramLine, DiagramObject,
    DiagramPolygon, DiagramRectangle, DiagramTaperedLine, DiagramText, Point, Shape, Style,
};

/// Builds a shape from a drag gesture.
pub trait ShapeFactory: Send + 'static {
    fn tool_name(&self) -> &'static str;

    /// Size of the gesture in world units, compared to the minimum extent.
    ///
    /// Box shapes measure their shorter side so a drag along one axis
    /// never yields a zero-area object.
    fn extent(&self, anchor: Point, current: Point, constrain: bool) -> f64 {
        let b = drag_box(anchor, current, constrain);
        b.width().min(b.height())
    }

    /// `constrain` requests equal proportions or snapped angles.
    fn build(&self, anchor: Point, current: Point, constrain: bool) -> Shape;
}

/// Corner that makes the drag box square.
fn square_corner(anchor: Point, current: Point) -> Point {
    let dx = current.x - anchor.x;
    let dy = current.y - anchor.y;
    let side = dx.abs().max(dy.abs());
    Point::new(anchor.x + side * dx.signum(), anchor.y + side * dy.signum())
}

fn drag_box(anchor: Point, current: Point, constrain: bool) -> Bounds {
    let corner = if constrain {
        square_corner(anchor, current)
    } else {
        current
    };
    Bounds::from_corners(anchor, corner)
}

/// End point snapped to 45° steps around `anchor`.
fn snapped_end(anchor: Point, current: Point) -> Point {
    let dx = current.x - anchor.x;
    let dy = current.y - anchor.y;
    let length = (dx * dx + dy * dy).sqrt();
    let angle = snap_angle(dy.atan2(dx).to_degrees(), 45.0).to_radians();
    Point::new(
        anchor.x + length * angle.cos(),
        anchor.y + length * angle.sin(),
    )
}

pub struct RectangleFactory;

impl ShapeFactory for RectangleFactory {
    fn tool_name(&self) -> &'static str {
        "rectangle"
    }

    fn build(&self, anchor: Point, current: Point, constrain: bool) -> Shape {
        Shape::Rectangle(DiagramRectangle::from_bounds(drag_box(
            anchor, current, constrain,
        )))
    }
}

pub struct EllipseFactory;

impl ShapeFactory for EllipseFactory {
    fn tool_name(&self) -> &'static str {
        "ellipse"
    }

    fn build(&self, anchor: Point, current: Point, constrain: bool) -> Shape {
        Shape::Ellipse(DiagramEllipse::from_bounds(drag_box(
            anchor, current, constrain,
        )))
    }
}

/// Circle centered on the press point; the drag sets the radius.
pub struct CircleFactory;

impl ShapeFactory for CircleFactory {
    fn tool_name(&self) -> &'static str {
        "circle"
    }

    fn extent(&self, anchor: Point, current: Point, _constrain: bool) -> f64 {
        anchor.distance_to(&current)
    }

    fn build(&self, anchor: Point, current: Point, _constrain: bool) -> Shape {
        Shape::Circle(DiagramCircle::new(anchor, anchor.distance_to(&current)))
    }
}

pub struct LineFactory {
    arrow: bool,
}

impl LineFactory {
    pub fn line() -> Self {
        Self { arrow: false }
    }

    pub fn arrow() -> Self {
        Self { arrow: true }
    }
}

impl ShapeFactory for LineFactory {
    fn tool_name(&self) -> &'static str {
        if self.arrow {
            "arrow"
        } else {
            "line"
        }
    }

    fn extent(&self, anchor: Point, current: Point, _constrain: bool) -> f64 {
        anchor.distance_to(&current)
    }

    fn build(&self, anchor: Point, current: Point, constrain: bool) -> Shape {
        let end = if constrain {
            snapped_end(anchor, current)
        } else {
            current
        };
        let line = DiagramLine::new(anchor, end);
        if self.arrow {
            Shape::Arrow(line)
        } else {
            Shape::Line(line)
        }
    }
}

/// Quadratic curve; the control point starts on the chord and is shaped
/// afterwards with the select tool.
pub struct CurveFactory;

impl ShapeFactory for CurveFactory {
    fn tool_name(&self) -> &'static str {
        "curve"
    }

    fn extent(&self, anchor: Point, current: Point, _constrain: bool) -> f64 {
        anchor.distance_to(&current)
    }

    fn build(&self, anchor: Point, current: Point, constrain: bool) -> Shape {
        let end = if constrain {
            snapped_end(anchor, current)
        } else {
            current
        };
        Shape::Curve(DiagramCurve::straight(anchor, end))
    }
}

pub struct TaperedLineFactory;

impl ShapeFactory for TaperedLineFactory {
    fn tool_name(&self) -> &'static str {
        "tapered_line"
    }

    fn extent(&self, anchor: Point, current: Point, _constrain: bool) -> f64 {
        anchor.distance_to(&current)
    }

    fn build(&self, anchor: Point, current: Point, constrain: bool) -> Shape {
        let end = if constrain {
            snapped_end(anchor, current)
        } else {
            current
        };
        Shape::TaperedLine(DiagramTaperedLine::new(anchor, end))
    }
}

/// Regular polygon centered on the press point.
pub struct PolygonFactory {
    name: &'static str,
    sides: u32,
}

impl PolygonFactory {
    pub fn new(name: &'static str, sides: u32) -> Self {
        Self { name, sides }
    }

    pub fn triangle() -> Self {
        Self::new("triangle", 3)
    }

    pub fn pentagon() -> Self {
        Self::new("pentagon", 5)
    }

    pub fn hexagon() -> Self {
        Self::new("hexagon", 6)
    }
}

impl ShapeFactory for PolygonFactory {
    fn tool_name(&self) -> &'static str {
        self.name
    }

    fn extent(&self, anchor: Point, current: Point, _constrain: bool) -> f64 {
        anchor.distance_to(&current)
    }

    fn build(&self, anchor: Point, current: Point, _constrain: bool) -> Shape {
        Shape::RegularPolygon(DiagramPolygon::new(
            anchor,
            anchor.distance_to(&current),
            self.sides,
        ))
    }
}

pub struct TextFactory;

impl ShapeFactory for TextFactory {
    fn tool_name(&self) -> &'static str {
        "text"
    }

    fn build(&self, anchor: Point, current: Point, constrain: bool) -> Shape {
        Shape::Text(DiagramText::new(
            DiagramText::DEFAULT_CONTENT,
            drag_box(anchor, current, constrain),
        ))
    }
}

struct DragScratch {
    anchor: Point,
    current: Point,
    constrain: bool,
}

/// Drag-to-create tool for any [`ShapeFactory`].
pub struct CreationTool<F: ShapeFactory> {
    factory: F,
    style: Style,
    scratch: Option<DragScratch>,
}

impl<F: ShapeFactory> CreationTool<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            style: Style::default(),
            scratch: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    fn draft(&self, scratch: &DragScratch) -> DiagramObject {
        let shape = self
            .factory
            .build(scratch.anchor, scratch.current, scratch.constrain);
        DiagramObject::draft(shape, self.style.clone())
    }

    fn preview(&self) -> Option<Preview> {
        self.scratch
            .as_ref()
            .map(|s| Preview::Shape(Box::new(self.draft(s))))
    }
}

impl<F: ShapeFactory> Tool for CreationTool<F> {
    fn name(&self) -> &str {
        self.factory.tool_name()
    }

    fn on_deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.scratch = None;
    }

    fn on_mouse_down(&mut self, _ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        self.scratch = Some(DragScratch {
            anchor: event.point,
            current: event.point,
            constrain: event.modifiers.shift,
        });
        let mut result = ToolResult::transition(InteractionState::Drawing);
        result.preview = self.preview();
        result
    }

    fn on_mouse_move(&mut self, _ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let Some(scratch) = self.scratch.as_mut() else {
            return ToolResult::none();
        };
        scratch.current = event.point;
        scratch.constrain = event.modifiers.shift;
        let mut result = ToolResult::none();
        result.preview = self.preview();
        result
    }

    fn on_mouse_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let Some(mut scratch) = self.scratch.take() else {
            return ToolResult::none();
        };
        scratch.current = event.point;
        scratch.constrain = event.modifiers.shift;

        let extent = self
            .factory
            .extent(scratch.anchor, scratch.current, scratch.constrain);
        let minimum = ctx.settings.min_shape_extent;
        let done = ToolResult::transition(InteractionState::Idle).with_preview(Preview::Clear);
        if !exceeds_minimum(extent, minimum) {
            let err = EditorError::DegenerateGeometry {
                tool: self.factory.tool_name().to_string(),
                extent,
                minimum,
            };
            tracing::debug!("{}", err);
            return done;
        }
        done.with_commit(Commit::Create(self.draft(&scratch)))
    }

    fn render_preview(&self, surface: &mut dyn PreviewSurface) {
        if let Some(scratch) = &self.scratch {
            draw_object(surface, &self.draft(scratch));
        }
    }

    fn active_gesture(&self) -> Option<InteractionState> {
        self.scratch.as_ref().map(|_| InteractionState::Drawing)
    }

    fn handles_state(&self, state: InteractionState) -> bool {
        state == InteractionState::Drawing
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
