//! Event router.
//!
//! The router owns the whole editing session: object store, selection,
//! viewport, state machine, tool dispatcher, history and validator. Pointer
//! events arrive in world coordinates, are guarded against the current
//! state and forwarded to the active tool. The returned [`ToolResult`] is
//! applied here: commits are journaled, transitions validated, viewport
//! requests applied and a repaint requested.

use std::sync::Arc;

use diagramkit_core::{EditorError, EditorEvent, EventBus, InteractionState, ObjectId, Result};
use diagramkit_settings::EditorConfig;

use crate::commands::{AddObject, DiagramCommand, ReorderObject};
use crate::dispatcher::ToolDispatcher;
use crate::geometry::{world_per_px, HandleMetrics, HitMode};
use crate::history::CommandHistory;
use crate::model::{DiagramObject, Point, PropertyValue, Shape, ShapeGeometry, Style};
use crate::selection::SelectionSet;
use crate::state_machine::InteractionStateMachine;
use crate::store::ObjectStore;
use crate::tools::{
    default_tools, preview, Commit, Modifiers, PointerEvent, PreviewSurface, SelectTool, Tool,
    ToolContext, ToolResult, ViewportRequest,
};
use crate::validator::{StateValidator, ValidationReport, ValidationTarget};
use crate::viewport::Viewport;

/// The tool activated when a router is created.
pub const DEFAULT_TOOL: &str = "select";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Down,
    Move,
    Up,
}

/// What one routed event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOutcome {
    pub state: InteractionState,
    /// A mutation was journaled.
    pub committed: bool,
    pub repaint: bool,
}

pub struct EventRouter {
    config: EditorConfig,
    machine: InteractionStateMachine,
    dispatcher: ToolDispatcher,
    history: CommandHistory,
    validator: StateValidator,
    store: ObjectStore,
    selection: SelectionSet,
    viewport: Viewport,
    event_bus: Arc<EventBus>,
    repaint_requested: bool,
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("state", &self.machine.state())
            .field("tool", &self.dispatcher.active_name())
            .field("objects", &self.store.len())
            .field("selection", &self.selection.ids())
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EventRouter {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_event_bus(config, Arc::new(EventBus::new()))
    }

    /// Creates a router publishing notifications on `bus`, with the default
    /// tool set registered and the select tool active.
    pub fn with_event_bus(config: EditorConfig, bus: Arc<EventBus>) -> Self {
        let machine = InteractionStateMachine::new(config.diagnostics.state_history_capacity)
            .with_event_bus(bus.clone());
        let validator = StateValidator::new(config.diagnostics.validator_interval_ticks)
            .with_event_bus(bus.clone());
        let history = CommandHistory::new(config.history.limit);

        let mut router = Self {
            config,
            machine,
            dispatcher: ToolDispatcher::with_tools(default_tools()),
            history,
            validator,
            store: ObjectStore::new(),
            selection: SelectionSet::new(),
            viewport: Viewport::default(),
            event_bus: bus,
            repaint_requested: true,
        };
        if let Err(e) = router.switch_tool(DEFAULT_TOOL) {
            tracing::warn!("Could not activate default tool: {}", e);
        }
        router
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> InteractionState {
        self.machine.state()
    }

    pub fn state_machine(&self) -> &InteractionStateMachine {
        &self.machine
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn validator(&self) -> &StateValidator {
        &self.validator
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn active_tool(&self) -> Option<&str> {
        self.dispatcher.active_name()
    }

    /// Replaces the viewport; out-of-range values are clamped on the next
    /// validator run.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.repaint_requested = true;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.zoom = zoom;
        self.repaint_requested = true;
    }

    /// Returns and clears the pending repaint flag.
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }

    // ---- pointer path -------------------------------------------------

    pub fn pointer_down(&mut self, point: Point, modifiers: Modifiers) -> RouteOutcome {
        let state = self.machine.state();
        if !self.dispatcher.accepts_press(state) {
            tracing::debug!("Ignoring press while {}", state);
            return self.outcome(false, false);
        }
        let event = self.pointer_event(point, modifiers);
        let result = self.dispatch(Phase::Down, &event);
        self.apply_result(result)
    }

    pub fn pointer_move(&mut self, point: Point, modifiers: Modifiers) -> RouteOutcome {
        let event = self.pointer_event(point, modifiers);
        let result = self.dispatch(Phase::Move, &event);
        self.apply_result(result)
    }

    pub fn pointer_up(&mut self, point: Point, modifiers: Modifiers) -> RouteOutcome {
        let event = self.pointer_event(point, modifiers);
        let result = self.dispatch(Phase::Up, &event);
        self.apply_result(result)
    }

    /// Aborts any in-flight gesture without committing it.
    pub fn cancel(&mut self) -> RouteOutcome {
        let result = {
            let Self {
                dispatcher,
                store,
                selection,
                machine,
                viewport,
                config,
                ..
            } = self;
            let mut ctx = ToolContext {
                store,
                selection,
                state: machine.state(),
                zoom: viewport.zoom,
                settings: &config.interaction,
            };
            dispatcher.cancel(&mut ctx)
        };
        let outcome = self.apply_result(result);
        if !self.machine.is_idle() {
            self.machine.reset();
        }
        self.repaint_requested = true;
        RouteOutcome {
            state: self.machine.state(),
            repaint: true,
            ..outcome
        }
    }

    fn pointer_event(&self, point: Point, modifiers: Modifiers) -> PointerEvent {
        let tolerance = self.config.interaction.hit_tolerance_px * world_per_px(self.viewport.zoom);
        let hit = self.store.hit_test(point, tolerance, HitMode::Bounds);
        PointerEvent::new(point, hit).with_modifiers(modifiers)
    }

    fn dispatch(&mut self, phase: Phase, event: &PointerEvent) -> ToolResult {
        let Self {
            dispatcher,
            store,
            selection,
            machine,
            viewport,
            config,
            ..
        } = self;
        let mut ctx = ToolContext {
            store,
            selection,
            state: machine.state(),
            zoom: viewport.zoom,
            settings: &config.interaction,
        };
        match phase {
            Phase::Down => dispatcher.handle_down(&mut ctx, event),
            Phase::Move => dispatcher.handle_move(&mut ctx, event),
            Phase::Up => dispatcher.handle_up(&mut ctx, event),
        }
    }

    fn apply_result(&mut self, result: ToolResult) -> RouteOutcome {
        let mut repaint = result.preview.is_some();
        let mut committed = false;

        if let Some(commit) = result.commit {
            let cmd = match commit {
                Commit::Create(mut object) => {
                    object.id = self.store.generate_id();
                    tracing::debug!("Creating {} {}", object.kind().display_name(), object.id);
                    DiagramCommand::AddObject(AddObject::new(object))
                }
                Commit::Command(cmd) => cmd,
            };
            self.execute(cmd);
            committed = true;
            repaint = true;
        }

        if let Some(ViewportRequest::PanBy { dx, dy }) = result.viewport {
            self.viewport.pan_by_world(dx, dy);
            repaint = true;
        }

        if let Some(next) = result.transition {
            if next != self.machine.state() {
                // A refused transition is logged by the machine and leaves the state as is.
                let _ = self.machine.transition(next);
                repaint = true;
            }
        }

        self.outcome(committed, repaint)
    }

    fn outcome(&mut self, committed: bool, repaint: bool) -> RouteOutcome {
        self.repaint_requested |= repaint;
        RouteOutcome {
            state: self.machine.state(),
            committed,
            repaint,
        }
    }

    // ---- journaled mutations ------------------------------------------

    /// Runs a command through the history and publishes the change.
    pub fn execute(&mut self, cmd: DiagramCommand) {
        let moved = Self::moved_ids(&cmd);
        self.history.execute(cmd, &mut self.store);
        self.after_history_change(moved);
    }

    pub fn undo(&mut self) -> bool {
        self.abort_gesture();
        let moved = self.history.peek_undo().map(Self::moved_ids).unwrap_or_default();
        if !self.history.undo(&mut self.store) {
            return false;
        }
        self.after_history_change(moved);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.abort_gesture();
        let moved = self.history.peek_redo().map(Self::moved_ids).unwrap_or_default();
        if !self.history.redo(&mut self.store) {
            return false;
        }
        self.after_history_change(moved);
        true
    }

    fn abort_gesture(&mut self) {
        if !self.machine.is_idle() {
            self.cancel();
        }
    }

    fn moved_ids(cmd: &DiagramCommand) -> Vec<ObjectId> {
        match cmd {
            DiagramCommand::ModifyObjects(modify) => modify.ids(),
            _ => Vec::new(),
        }
    }

    fn after_history_change(&mut self, moved: Vec<ObjectId>) {
        self.selection.retain_live(&self.store);
        if !moved.is_empty() {
            self.event_bus
                .publish(EditorEvent::ObjectsMoved { ids: moved });
        }
        self.event_bus.publish(EditorEvent::HistoryChanged {
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
        });
        self.repaint_requested = true;
    }

    /// Applies `edit` to the live store and journals the difference for
    /// `targets` and the connectors attached to them.
    fn edit_objects<F>(&mut self, label: &str, targets: &[ObjectId], edit: F) -> bool
    where
        F: FnOnce(&mut ObjectStore),
    {
        let mut ids = targets.to_vec();
        for id in self.store.connectors_attached_to(targets) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        let before: Vec<DiagramObject> = ids
            .iter()
            .filter_map(|id| self.store.get(*id).cloned())
            .collect();

        edit(&mut self.store);
        self.store.reattach_connectors(targets);

        let pairs = before
            .into_iter()
            .filter_map(|b| self.store.get(b.id).cloned().map(|a| (b, a)))
            .collect();
        match DiagramCommand::modify(label, pairs) {
            Some(cmd) => {
                let moved = Self::moved_ids(&cmd);
                self.history.record(cmd);
                self.after_history_change(moved);
                true
            }
            None => false,
        }
    }

    /// Adds an object outside any gesture, journaled like a tool commit.
    pub fn add_object(&mut self, shape: Shape, style: Style) -> ObjectId {
        let id = self.store.generate_id();
        let object = DiagramObject::new(id, shape).with_style(style);
        self.execute(DiagramCommand::AddObject(AddObject::new(object)));
        id
    }

    /// Deletes the selection; connectors pointing at deleted objects are
    /// detached in the same undoable step.
    pub fn delete_selection(&mut self) -> bool {
        if !self.machine.is_idle() {
            return false;
        }
        let ids = self.selection.ids().to_vec();
        match DiagramCommand::delete(&self.store, &ids) {
            Some(cmd) => {
                self.execute(cmd);
                true
            }
            None => false,
        }
    }

    /// Moves the selection by a world-space vector.
    pub fn nudge_selection(&mut self, dx: f64, dy: f64) -> bool {
        if !self.machine.is_idle() || self.selection.is_empty() {
            return false;
        }
        let targets = self.selection.ids().to_vec();
        self.edit_objects("Nudge", &targets, |store| {
            for id in &targets {
                if let Some(obj) = store.get_mut(*id) {
                    obj.shape.translate(dx, dy);
                }
            }
        })
    }

    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        let top = self.store.len().saturating_sub(1);
        self.reorder(id, top)
    }

    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        self.reorder(id, 0)
    }

    fn reorder(&mut self, id: ObjectId, to: usize) -> bool {
        let Some(from) = self.store.index_of(id) else {
            return false;
        };
        if from == to {
            return false;
        }
        self.execute(DiagramCommand::Reorder(ReorderObject { id, from, to }));
        true
    }

    /// Properties-panel setter. The value is normalized by the object; a
    /// rejected value leaves the object unchanged.
    pub fn set_property(&mut self, id: ObjectId, name: &str, value: PropertyValue) -> Result<()> {
        let mut updated = self
            .store
            .get(id)
            .cloned()
            .ok_or(EditorError::ObjectNotFound { id })?;
        updated.set_property(name, &value)?;
        self.edit_objects(&format!("Set {}", name), &[id], move |store| {
            store.replace(updated);
        });
        Ok(())
    }

    pub fn set_rotation(&mut self, id: ObjectId, degrees: f64) -> Result<()> {
        self.set_property(id, "Rotation", PropertyValue::Number(degrees))
    }

    // ---- selection ----------------------------------------------------

    pub fn select_all(&mut self) {
        self.selection.set(self.store.ids());
        self.repaint_requested = true;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.repaint_requested = true;
    }

    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        self.selection.select_only(id);
        self.repaint_requested = true;
        true
    }

    /// Advances the select tool's overlap cycle, if one is in progress.
    pub fn cycle_selection(&mut self) -> Option<ObjectId> {
        if self.dispatcher.active_name() != Some(DEFAULT_TOOL) || !self.machine.is_idle() {
            return None;
        }
        let Self {
            dispatcher,
            store,
            selection,
            machine,
            viewport,
            config,
            ..
        } = self;
        let tool = dispatcher.tool_as::<SelectTool>(DEFAULT_TOOL)?;
        let mut ctx = ToolContext {
            store,
            selection,
            state: machine.state(),
            zoom: viewport.zoom,
            settings: &config.interaction,
        };
        let id = tool.cycle_next(&mut ctx);
        self.repaint_requested = true;
        id
    }

    /// Toggles outline hit-testing in the select tool.
    pub fn set_precise_hit_mode(&mut self, precise: bool) {
        if let Some(tool) = self.dispatcher.tool_as::<SelectTool>(DEFAULT_TOOL) {
            tool.set_precise(precise);
        }
    }

    // ---- tools ----------------------------------------------------------

    /// Switches the active tool. Any gesture in progress is discarded and
    /// the machine returns to Idle. Unknown names change nothing.
    pub fn switch_tool(&mut self, name: &str) -> Result<()> {
        let result = {
            let Self {
                dispatcher,
                store,
                selection,
                machine,
                viewport,
                config,
                ..
            } = self;
            let mut ctx = ToolContext {
                store,
                selection,
                state: machine.state(),
                zoom: viewport.zoom,
                settings: &config.interaction,
            };
            dispatcher.switch_tool(name, &mut ctx)
        };
        if matches!(result, Err(EditorError::UnknownTool { .. })) {
            return result;
        }

        self.machine.reset();
        self.repaint_requested = true;
        let active = self.dispatcher.active_name().map(str::to_string);
        match &active {
            Some(name) => tracing::info!("Active tool: {}", name),
            None => tracing::warn!("No active tool"),
        }
        self.event_bus.publish(EditorEvent::ToolChanged { name: active });
        result
    }

    /// Registers an additional tool; the active tool cannot be replaced.
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) -> bool {
        self.dispatcher.register(tool)
    }

    // ---- repaint --------------------------------------------------------

    /// The repaint pass: advances the validator cadence, then paints the
    /// selection chrome and the active tool's preview. Painting never
    /// touches committed objects.
    pub fn render(&mut self, surface: &mut dyn PreviewSurface) {
        if let Some(report) = self.validator.tick(Self::target(
            &mut self.machine,
            &mut self.dispatcher,
            &mut self.store,
            &mut self.selection,
            &mut self.viewport,
            &self.config,
        )) {
            if !report.is_clean() {
                self.repaint_requested = true;
            }
        }

        let metrics = HandleMetrics::new(self.viewport.zoom, &self.config.interaction);
        for id in self.selection.ids() {
            if let Some(obj) = self.store.get(*id) {
                preview::draw_selection(surface, obj, &metrics);
            }
        }
        self.dispatcher.render_preview(surface);
    }

    /// Runs the validator now, regardless of cadence.
    pub fn validate_now(&mut self) -> ValidationReport {
        let report = self.validator.run(Self::target(
            &mut self.machine,
            &mut self.dispatcher,
            &mut self.store,
            &mut self.selection,
            &mut self.viewport,
            &self.config,
        ));
        if !report.is_clean() {
            self.repaint_requested = true;
        }
        report
    }

    fn target<'a>(
        machine: &'a mut InteractionStateMachine,
        dispatcher: &'a mut ToolDispatcher,
        store: &'a mut ObjectStore,
        selection: &'a mut SelectionSet,
        viewport: &'a mut Viewport,
        config: &'a EditorConfig,
    ) -> ValidationTarget<'a> {
        ValidationTarget {
            machine,
            dispatcher,
            store,
            selection,
            viewport,
            interaction: &config.interaction,
            viewport_limits: &config.viewport,
        }
    }

    // ---- documents --------------------------------------------------------

    /// Replaces the document. History and selection are cleared and any
    /// gesture is discarded.
    pub fn load_document(&mut self, store: ObjectStore, viewport: Viewport) {
        self.abort_gesture();
        self.store = store;
        self.viewport = viewport;
        self.selection.clear();
        self.history.clear();
        self.event_bus.publish(EditorEvent::HistoryChanged {
            undo_depth: 0,
            redo_depth: 0,
        });
        self.repaint_requested = true;
        tracing::info!("Loaded document with {} objects", self.store.len());
    }

    /// Test and scripting hook: mutable access to the active tool.
    pub fn active_tool_mut(&mut self) -> Option<&mut (dyn Tool + 'static)> {
        self.dispatcher.active_tool_mut()
    }
}
