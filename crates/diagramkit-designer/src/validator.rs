//! Periodic consistency checks.
//!
//! The validator runs once every N repaint ticks and force-corrects drift
//! between the state machine, the active tool's scratch data, the selection
//! and the viewport. Each correction is logged and published; none of them
//! is fatal.

use std::sync::Arc;

use diagramkit_core::constants::DEFAULT_VALIDATOR_INTERVAL;
use diagramkit_core::{EditorError, EditorEvent, EventBus, InteractionState, ObjectId};
use diagramkit_settings::{InteractionSettings, ViewportSettings};

use crate::dispatcher::ToolDispatcher;
use crate::selection::SelectionSet;
use crate::state_machine::InteractionStateMachine;
use crate::store::ObjectStore;
use crate::tools::ToolContext;
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A non-idle state that no active tool drives.
    UnownedState {
        state: InteractionState,
        tool: Option<String>,
    },
    /// The active tool's gesture disagrees with the machine state.
    StaleGesture {
        state: InteractionState,
        gesture: Option<InteractionState>,
        tool: String,
    },
    OrphanedSelection { ids: Vec<ObjectId> },
    ViewportOutOfRange { fields: Vec<&'static str> },
}

impl Violation {
    pub fn kind(&self) -> &'static str {
        match self {
            Violation::UnownedState { .. } => "unowned_state",
            Violation::StaleGesture { .. } => "stale_gesture",
            Violation::OrphanedSelection { .. } => "orphaned_selection",
            Violation::ViewportOutOfRange { .. } => "viewport_out_of_range",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub run: u64,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Everything the validator may inspect and correct.
pub struct ValidationTarget<'a> {
    pub machine: &'a mut InteractionStateMachine,
    pub dispatcher: &'a mut ToolDispatcher,
    pub store: &'a mut ObjectStore,
    pub selection: &'a mut SelectionSet,
    pub viewport: &'a mut Viewport,
    pub interaction: &'a InteractionSettings,
    pub viewport_limits: &'a ViewportSettings,
}

pub struct StateValidator {
    interval: u32,
    ticks: u32,
    runs: u64,
    corrections: u64,
    event_bus: Option<Arc<EventBus>>,
}

impl Default for StateValidator {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATOR_INTERVAL)
    }
}

impl StateValidator {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            ticks: 0,
            runs: 0,
            corrections: 0,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Total violations corrected since creation.
    pub fn corrections(&self) -> u64 {
        self.corrections
    }

    /// Advances the tick counter and validates on every `interval`th tick.
    pub fn tick(&mut self, target: ValidationTarget<'_>) -> Option<ValidationReport> {
        self.ticks += 1;
        if self.ticks < self.interval {
            return None;
        }
        self.ticks = 0;
        Some(self.run(target))
    }

    /// Validates immediately.
    pub fn run(&mut self, target: ValidationTarget<'_>) -> ValidationReport {
        self.runs += 1;
        let mut violations = Vec::new();

        let state = target.machine.state();
        let tool = target.dispatcher.active_tool();
        let tool_name = tool.map(|t| t.name().to_string());
        let gesture = tool.and_then(|t| t.active_gesture());
        let owned = tool.is_some_and(|t| t.handles_state(state));
        let expected = (!state.is_idle()).then_some(state);

        if !state.is_idle() && !owned {
            violations.push(Violation::UnownedState {
                state,
                tool: tool_name,
            });
        } else if gesture != expected {
            violations.push(Violation::StaleGesture {
                state,
                gesture,
                tool: tool_name.unwrap_or_default(),
            });
        }
        if !violations.is_empty() {
            let mut ctx = ToolContext {
                store: &mut *target.store,
                selection: &mut *target.selection,
                state,
                zoom: target.viewport.zoom,
                settings: target.interaction,
            };
            target.dispatcher.cancel(&mut ctx);
            target.machine.reset();
        }

        let orphaned = target.selection.retain_live(target.store);
        if !orphaned.is_empty() {
            for id in &orphaned {
                tracing::debug!("{}", EditorError::OrphanedSelection { id: *id });
            }
            violations.push(Violation::OrphanedSelection { ids: orphaned });
        }

        let limits = target.viewport_limits;
        let fields = target.viewport.clamp(limits.min_zoom, limits.max_zoom);
        if !fields.is_empty() {
            violations.push(Violation::ViewportOutOfRange { fields });
        }

        for violation in &violations {
            tracing::warn!("State validator corrected {:?}", violation);
            if let Some(bus) = &self.event_bus {
                bus.publish(EditorEvent::ValidatorCorrection {
                    kind: violation.kind().to_string(),
                });
            }
        }
        self.corrections += violations.len() as u64;

        ValidationReport {
            run: self.runs,
            violations,
        }
    }
}
