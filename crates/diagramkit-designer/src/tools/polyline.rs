use std::any::Any;

use diagramkit_core::{EditorError, InteractionState};

use super::preview::draw_object;
use super::{
    exceeds_minimum, Commit, PointerEvent, Preview, PreviewSurface, Tool, ToolContext, ToolResult,
};
use crate::model::{Bounds, DiagramObject, DiagramPath, Point, Shape, Style};

/// Click-to-place polyline.
///
/// The first press enters Drawing and each later press adds a vertex.
/// Pressing on the first vertex closes the shape; pressing on the last
/// vertex again finishes it open. The gesture spans several presses, so the
/// tool accepts presses while Drawing.
#[derive(Debug, Default)]
pub struct PolylineTool {
    style: Style,
    points: Vec<Point>,
    hover: Option<Point>,
}

impl PolylineTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    fn draft(&self, closed: bool) -> DiagramObject {
        DiagramObject::draft(
            Shape::Polyline(DiagramPath::new(self.points.clone(), closed)),
            self.style.clone(),
        )
    }

    fn finish(&mut self, ctx: &ToolContext<'_>, closed: bool) -> ToolResult {
        let draft = self.draft(closed);
        self.points.clear();
        self.hover = None;
        let done = ToolResult::transition(InteractionState::Idle).with_preview(Preview::Clear);

        let extent = match &draft.shape {
            Shape::Polyline(path) => path_extent(path),
            _ => 0.0,
        };
        let minimum = ctx.settings.min_shape_extent;
        if !exceeds_minimum(extent, minimum) {
            tracing::debug!(
                "{}",
                EditorError::DegenerateGeometry {
                    tool: "polyline".to_string(),
                    extent,
                    minimum,
                }
            );
            return done;
        }
        done.with_commit(Commit::Create(draft))
    }
}

fn path_extent(path: &DiagramPath) -> f64 {
    Bounds::from_points(path.points.iter().copied())
        .map(|b| b.width().max(b.height()))
        .unwrap_or(0.0)
}

impl Tool for PolylineTool {
    fn name(&self) -> &str {
        "polyline"
    }

    fn on_deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.points.clear();
        self.hover = None;
    }

    fn on_mouse_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let p = event.point;
        if self.points.is_empty() {
            self.points.push(p);
            return ToolResult::transition(InteractionState::Drawing);
        }
        let snap = ctx.snap_tolerance();
        let near_first = self.points[0].distance_to(&p) <= snap;
        let near_last = self
            .points
            .last()
            .is_some_and(|last| last.distance_to(&p) <= snap);
        if near_first && self.points.len() >= 3 {
            return self.finish(ctx, true);
        }
        if near_last {
            return self.finish(ctx, false);
        }
        self.points.push(p);
        ToolResult::none().with_preview(Preview::Shape(Box::new(self.draft(false))))
    }

    fn on_mouse_move(&mut self, _ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let Some(last) = self.points.last().copied() else {
            return ToolResult::none();
        };
        self.hover = Some(event.point);
        ToolResult::none().with_preview(Preview::Segment(last, event.point))
    }

    fn on_mouse_up(&mut self, _ctx: &mut ToolContext<'_>, _event: &PointerEvent) -> ToolResult {
        ToolResult::none()
    }

    fn render_preview(&self, surface: &mut dyn PreviewSurface) {
        if self.points.len() > 1 {
            draw_object(surface, &self.draft(false));
        }
        if let (Some(last), Some(hover)) = (self.points.last(), self.hover) {
            surface.stroke_polyline(&[*last, hover], false);
        }
    }

    fn active_gesture(&self) -> Option<InteractionState> {
        (!self.points.is_empty()).then_some(InteractionState::Drawing)
    }

    fn handles_state(&self, state: InteractionState) -> bool {
        state == InteractionState::Drawing
    }

    fn accepts_press(&self, state: InteractionState) -> bool {
        matches!(state, InteractionState::Idle | InteractionState::Drawing)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
