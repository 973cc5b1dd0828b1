use std::any::Any;
use std::sync::Arc;

use diagramkit_core::{EditorEvent, EventBus, EventFilter};
use diagramkit_designer::{
    EditorError, EventRouter, InteractionState, PointerEvent, Tool, ToolContext, ToolResult,
};
use diagramkit_settings::EditorConfig;
use parking_lot::Mutex;

/// A tool that can never be activated.
struct BrokenTool;

impl Tool for BrokenTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn on_activate(&mut self, _ctx: &mut ToolContext<'_>) -> diagramkit_core::Result<()> {
        Err(EditorError::ToolActivation {
            name: "broken".to_string(),
            reason: "no backing resource".to_string(),
        })
    }

    fn on_deactivate(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn on_mouse_down(&mut self, _ctx: &mut ToolContext<'_>, _event: &PointerEvent) -> ToolResult {
        ToolResult::none()
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

fn recording_router() -> (EventRouter, Arc<Mutex<Vec<Option<String>>>>) {
    let bus = Arc::new(EventBus::new());
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    bus.subscribe(EventFilter::All, move |event| {
        if let EditorEvent::ToolChanged { name } = event {
            sink.lock().push(name.clone());
        }
    });
    (
        EventRouter::with_event_bus(EditorConfig::default(), bus),
        changes,
    )
}

#[test]
fn test_tool_change_is_published() {
    let (mut router, changes) = recording_router();
    changes.lock().clear();

    router.switch_tool("rectangle").unwrap();
    assert_eq!(*changes.lock(), vec![Some("rectangle".to_string())]);
}

#[test]
fn test_failed_activation_publishes_no_tool() {
    let (mut router, changes) = recording_router();
    assert!(router.register_tool(Box::new(BrokenTool)));
    changes.lock().clear();

    let err = router.switch_tool("broken").unwrap_err();
    assert_eq!(err.kind(), "tool_activation");
    assert_eq!(router.active_tool(), None);
    assert!(router.state().is_idle());
    assert_eq!(*changes.lock(), vec![None]);

    router.switch_tool("select").unwrap();
    assert_eq!(changes.lock().last(), Some(&Some("select".to_string())));
}

#[test]
fn test_unknown_tool_publishes_nothing() {
    let (mut router, changes) = recording_router();
    changes.lock().clear();

    assert!(router.switch_tool("lasso").is_err());
    assert!(changes.lock().is_empty());
    assert_eq!(router.active_tool(), Some("select"));
}
