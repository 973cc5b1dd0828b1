use std::any::Any;

use diagramkit_core::{EditorError, InteractionState};

use super::preview::draw_object;
use super::{
    exceeds_minimum, Commit, PointerEvent, Preview, PreviewSurface, Tool, ToolContext, ToolResult,
};
use crate::geometry::world_per_px;
use crate::model::{DiagramObject, DiagramPath, Point, Shape, Style};

/// Minimum spacing between recorded samples, in screen pixels.
const SAMPLE_SPACING_PX: f64 = 2.0;

/// Records the pointer path while the button is held.
#[derive(Debug, Default)]
pub struct FreehandTool {
    style: Style,
    points: Vec<Point>,
}

impl FreehandTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    fn draft(&self) -> DiagramObject {
        DiagramObject::draft(
            Shape::Freehand(DiagramPath::new(self.points.clone(), false)),
            self.style.clone(),
        )
    }

    fn push_sample(&mut self, p: Point, spacing: f64) {
        match self.points.last() {
            Some(last) if last.distance_to(&p) < spacing => {}
            _ => self.points.push(p),
        }
    }
}

impl Tool for FreehandTool {
    fn name(&self) -> &str {
        "freehand"
    }

    fn on_deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.points.clear();
    }

    fn on_mouse_down(&mut self, _ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        self.points.clear();
        self.points.push(event.point);
        ToolResult::transition(InteractionState::Drawing)
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        if self.points.is_empty() {
            return ToolResult::none();
        }
        let spacing = SAMPLE_SPACING_PX * world_per_px(ctx.zoom);
        self.push_sample(event.point, spacing);
        ToolResult::none().with_preview(Preview::Shape(Box::new(self.draft())))
    }

    fn on_mouse_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        if self.points.is_empty() {
            return ToolResult::none();
        }
        if self.points.last() != Some(&event.point) {
            self.points.push(event.point);
        }
        let draft = self.draft();
        self.points.clear();

        let done = ToolResult::transition(InteractionState::Idle).with_preview(Preview::Clear);
        let extent = match &draft.shape {
            Shape::Freehand(path) => path.length(),
            _ => 0.0,
        };
        let minimum = ctx.settings.min_shape_extent;
        if !exceeds_minimum(extent, minimum) {
            tracing::debug!(
                "{}",
                EditorError::DegenerateGeometry {
                    tool: "freehand".to_string(),
                    extent,
                    minimum,
                }
            );
            return done;
        }
        done.with_commit(Commit::Create(draft))
    }

    fn render_preview(&self, surface: &mut dyn PreviewSurface) {
        if self.points.len() > 1 {
            draw_object(surface, &self.draft());
        }
    }

    fn active_gesture(&self) -> Option<InteractionState> {
        (!self.points.is_empty()).then_some(InteractionState::Drawing)
    }

    fn handles_state(&self, state: InteractionState) -> bool {
        state == InteractionState::Drawing
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
