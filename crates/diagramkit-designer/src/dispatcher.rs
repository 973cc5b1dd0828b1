//! Tool registry and active-tool switching.

use std::collections::HashMap;

use diagramkit_core::{EditorError, InteractionState, Result};

use crate::tools::{PointerEvent, PreviewSurface, Tool, ToolContext, ToolResult};

/// Owns every registered tool and routes gestures to the active one.
///
/// Switching always deactivates the current tool first, exactly once, even
/// when the next tool then fails to activate. A failed activation leaves no
/// tool active.
#[derive(Default)]
pub struct ToolDispatcher {
    tools: HashMap<String, Box<dyn Tool>>,
    order: Vec<String>,
    active: Option<String>,
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("tools", &self.order)
            .field("active", &self.active)
            .finish()
    }
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher holding `tools`, with none active.
    pub fn with_tools(tools: Vec<Box<dyn Tool>>) -> Self {
        let mut dispatcher = Self::new();
        for tool in tools {
            dispatcher.register(tool);
        }
        dispatcher
    }

    /// Registers a tool under its name, replacing any tool with that name.
    /// Replacing the active tool is refused.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> bool {
        let name = tool.name().to_string();
        if self.active.as_deref() == Some(name.as_str()) {
            tracing::warn!("Refusing to replace active tool '{}'", name);
            return false;
        }
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn tool_names(&self) -> &[String] {
        &self.order
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_tool(&self) -> Option<&dyn Tool> {
        let name = self.active.as_ref()?;
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn active_tool_mut(&mut self) -> Option<&mut (dyn Tool + 'static)> {
        let name = self.active.as_ref()?;
        self.tools.get_mut(name).map(|t| t.as_mut())
    }

    /// Mutable access to a registered tool, active or not.
    pub fn tool_mut(&mut self, name: &str) -> Option<&mut (dyn Tool + 'static)> {
        self.tools.get_mut(name).map(|t| t.as_mut())
    }

    /// Downcasts a registered tool to its concrete type.
    pub fn tool_as<T: Tool + 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.tool_mut(name)?.as_any_mut().downcast_mut::<T>()
    }

    /// Deactivates the current tool and activates `name`.
    ///
    /// Unknown names are rejected before anything changes.
    pub fn switch_tool(&mut self, name: &str, ctx: &mut ToolContext<'_>) -> Result<()> {
        if !self.tools.contains_key(name) {
            tracing::warn!("Ignoring switch to unknown tool '{}'", name);
            return Err(EditorError::UnknownTool {
                name: name.to_string(),
            });
        }

        if let Some(current) = self.active.take() {
            if let Some(tool) = self.tools.get_mut(&current) {
                tool.on_deactivate(ctx);
                tracing::debug!("Deactivated tool '{}'", current);
            }
        }

        let Some(next) = self.tools.get_mut(name) else {
            return Err(EditorError::UnknownTool {
                name: name.to_string(),
            });
        };
        match next.on_activate(ctx) {
            Ok(()) => {
                tracing::debug!("Activated tool '{}'", name);
                self.active = Some(name.to_string());
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Tool '{}' failed to activate: {}", name, e);
                Err(EditorError::ToolActivation {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Deactivates the active tool, leaving none active.
    pub fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(tool) = self.active_tool_mut() {
            tool.on_deactivate(ctx);
        }
        self.active = None;
    }

    pub fn accepts_press(&self, state: InteractionState) -> bool {
        self.active_tool()
            .is_some_and(|tool| tool.accepts_press(state))
    }

    pub fn handle_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        match self.active_tool_mut() {
            Some(tool) => tool.on_mouse_down(ctx, event),
            None => ToolResult::none(),
        }
    }

    pub fn handle_move(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        match self.active_tool_mut() {
            Some(tool) => tool.on_mouse_move(ctx, event),
            None => ToolResult::none(),
        }
    }

    pub fn handle_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        match self.active_tool_mut() {
            Some(tool) => tool.on_mouse_up(ctx, event),
            None => ToolResult::none(),
        }
    }

    pub fn cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResult {
        match self.active_tool_mut() {
            Some(tool) => tool.on_cancel(ctx),
            None => ToolResult::transition(InteractionState::Idle),
        }
    }

    pub fn render_preview(&self, surface: &mut dyn PreviewSurface) {
        if let Some(tool) = self.active_tool() {
            tool.render_preview(surface);
        }
    }
}
