use std::sync::Arc;

use diagramkit_core::{EditorEvent, EventBus, EventFilter};
use diagramkit_designer::validator::ValidationTarget;
use diagramkit_designer::{
    default_tools, EventRouter, InteractionState, InteractionStateMachine, ObjectId, ObjectStore,
    RecordingSurface, SelectionSet, StateValidator, ToolContext, ToolDispatcher, Viewport,
    Violation,
};
use diagramkit_settings::EditorConfig;
use parking_lot::Mutex;

struct Session {
    config: EditorConfig,
    machine: InteractionStateMachine,
    dispatcher: ToolDispatcher,
    store: ObjectStore,
    selection: SelectionSet,
    viewport: Viewport,
}

impl Session {
    fn new(tool: &str) -> Self {
        let config = EditorConfig::default();
        let mut store = ObjectStore::new();
        let mut selection = SelectionSet::new();
        let mut dispatcher = ToolDispatcher::with_tools(default_tools());
        let mut ctx = ToolContext {
            store: &mut store,
            selection: &mut selection,
            state: InteractionState::Idle,
            zoom: 1.0,
            settings: &config.interaction,
        };
        dispatcher.switch_tool(tool, &mut ctx).unwrap();
        Self {
            machine: InteractionStateMachine::default(),
            dispatcher,
            store,
            selection,
            viewport: Viewport::default(),
            config,
        }
    }

    fn target(&mut self) -> ValidationTarget<'_> {
        ValidationTarget {
            machine: &mut self.machine,
            dispatcher: &mut self.dispatcher,
            store: &mut self.store,
            selection: &mut self.selection,
            viewport: &mut self.viewport,
            interaction: &self.config.interaction,
            viewport_limits: &self.config.viewport,
        }
    }
}

#[test]
fn test_consistent_session_is_clean() {
    let mut session = Session::new("select");
    let mut validator = StateValidator::new(1);
    let report = validator.run(session.target());
    assert!(report.is_clean());
    assert_eq!(validator.corrections(), 0);
}

#[test]
fn test_state_without_owning_tool_is_reset() {
    let mut session = Session::new("select");
    session.machine.transition(InteractionState::Drawing).unwrap();

    let mut validator = StateValidator::new(1);
    let report = validator.run(session.target());

    assert!(matches!(
        report.violations.as_slice(),
        [Violation::UnownedState {
            state: InteractionState::Drawing,
            ..
        }]
    ));
    assert!(session.machine.is_idle());
}

#[test]
fn test_gesture_flag_outside_matching_state() {
    let mut session = Session::new("select");
    session.machine.transition(InteractionState::Rotating).unwrap();

    let mut validator = StateValidator::new(1);
    let report = validator.run(session.target());

    assert!(matches!(
        report.violations.as_slice(),
        [Violation::StaleGesture { gesture: None, .. }]
    ));
    assert!(session.machine.is_idle());
}

#[test]
fn test_orphaned_selection_pruned() {
    let mut session = Session::new("select");
    session.selection.set([ObjectId(7), ObjectId(8)]);

    let mut validator = StateValidator::new(1);
    let report = validator.run(session.target());

    assert_eq!(
        report.violations,
        vec![Violation::OrphanedSelection {
            ids: vec![ObjectId(7), ObjectId(8)]
        }]
    );
    assert!(session.selection.is_empty());
}

#[test]
fn test_viewport_clamped_and_published() {
    let bus = Arc::new(EventBus::new());
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let sink = kinds.clone();
    bus.subscribe(EventFilter::All, move |event| {
        if let EditorEvent::ValidatorCorrection { kind } = event {
            sink.lock().push(kind.clone());
        }
    });

    let mut session = Session::new("select");
    session.viewport.zoom = 1000.0;
    session.viewport.pan_y = f64::INFINITY;

    let mut validator = StateValidator::new(1).with_event_bus(bus);
    validator.run(session.target());

    assert_eq!(session.viewport.zoom, session.config.viewport.max_zoom);
    assert!(session.viewport.pan_y.is_finite());
    assert_eq!(kinds.lock().as_slice(), &["viewport_out_of_range".to_string()]);
}

#[test]
fn test_runs_on_cadence() {
    let mut session = Session::new("select");
    let mut validator = StateValidator::new(3);
    assert!(validator.tick(session.target()).is_none());
    assert!(validator.tick(session.target()).is_none());
    assert!(validator.tick(session.target()).is_some());
    assert!(validator.tick(session.target()).is_none());
    assert_eq!(validator.runs(), 1);
}

#[test]
fn test_router_render_drives_validator() {
    let mut router = EventRouter::default();
    router.set_zoom(0.0001);
    let interval = router.config().diagnostics.validator_interval_ticks;

    let mut surface = RecordingSurface::new();
    for _ in 0..interval {
        router.render(&mut surface);
    }
    assert_eq!(router.viewport().zoom, router.config().viewport.min_zoom);
    assert_eq!(router.validator().corrections(), 1);
}
