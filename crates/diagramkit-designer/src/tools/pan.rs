use std::any::Any;

use diagramkit_core::InteractionState;

use super::{PointerEvent, Tool, ToolContext, ToolResult, ViewportRequest};
use crate::model::Point;

/// Drags the view. The anchor stays under the pointer: each move requests
/// the offset between the pointer and the anchor.
#[derive(Debug, Default)]
pub struct PanTool {
    anchor: Option<Point>,
}

impl PanTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for PanTool {
    fn name(&self) -> &str {
        "pan"
    }

    fn on_deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.anchor = None;
    }

    fn on_mouse_down(&mut self, _ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        self.anchor = Some(event.point);
        ToolResult::transition(InteractionState::Panning)
    }

    fn on_mouse_move(&mut self, _ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let Some(anchor) = self.anchor else {
            return ToolResult::none();
        };
        let dx = event.point.x - anchor.x;
        let dy = event.point.y - anchor.y;
        if dx == 0.0 && dy == 0.0 {
            return ToolResult::none();
        }
        ToolResult::none().with_viewport(ViewportRequest::PanBy { dx, dy })
    }

    fn on_mouse_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        if self.anchor.is_none() {
            return ToolResult::none();
        }
        let mut result = self.on_mouse_move(ctx, event);
        self.anchor = None;
        result.transition = Some(InteractionState::Idle);
        result
    }

    fn active_gesture(&self) -> Option<InteractionState> {
        self.anchor.map(|_| InteractionState::Panning)
    }

    fn handles_state(&self, state: InteractionState) -> bool {
        state == InteractionState::Panning
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
