use std::any::Any;

use diagramkit_core::InteractionState;

use super::{Commit, PointerEvent, Tool, ToolContext, ToolResult};
use crate::commands::DiagramCommand;

/// Deletes the clicked object. Connectors attached to it are detached.
#[derive(Debug, Default)]
pub struct EraserTool;

impl EraserTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for EraserTool {
    fn name(&self) -> &str {
        "eraser"
    }

    fn on_deactivate(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn on_mouse_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let Some(id) = event.hit else {
            return ToolResult::none();
        };
        match DiagramCommand::delete(ctx.store, &[id]) {
            Some(cmd) => ToolResult::none().with_commit(Commit::Command(cmd)),
            None => ToolResult::none(),
        }
    }

    fn on_mouse_move(&mut self, _ctx: &mut ToolContext<'_>, _event: &PointerEvent) -> ToolResult {
        ToolResult::none()
    }

    fn on_mouse_up(&mut self, _ctx: &mut ToolContext<'_>, _event: &PointerEvent) -> ToolResult {
        ToolResult::none()
    }

    fn active_gesture(&self) -> Option<InteractionState> {
        None
    }

    fn handles_state(&self, _state: InteractionState) -> bool {
        false
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
