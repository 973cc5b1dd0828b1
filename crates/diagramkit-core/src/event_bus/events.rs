//! Event types published by the editor.

use serde::{Deserialize, Serialize};

use crate::types::{InteractionState, ObjectId};

/// Every notification the editor publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    /// The interaction state machine accepted a transition.
    StateChanged {
        from: InteractionState,
        to: InteractionState,
    },
    /// The active tool changed; `None` when no tool is bound.
    ToolChanged { name: Option<String> },
    /// Objects were moved, resized or rotated by a committed mutation.
    ObjectsMoved { ids: Vec<ObjectId> },
    /// The undo journal changed.
    HistoryChanged {
        undo_depth: usize,
        redo_depth: usize,
    },
    /// The state validator force-corrected drift.
    ValidatorCorrection { kind: String },
}

/// Coarse grouping used for subscription filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// State machine and tool switching.
    Interaction,
    /// Object collection mutations.
    Document,
    /// Undo/redo journal.
    History,
    /// Validator corrections.
    Diagnostics,
}

impl EditorEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::StateChanged { .. } | EditorEvent::ToolChanged { .. } => {
                EventCategory::Interaction
            }
            EditorEvent::ObjectsMoved { .. } => EventCategory::Document,
            EditorEvent::HistoryChanged { .. } => EventCategory::History,
            EditorEvent::ValidatorCorrection { .. } => EventCategory::Diagnostics,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::StateChanged { from, to } => format!("state {} -> {}", from, to),
            EditorEvent::ToolChanged { name } => match name {
                Some(name) => format!("tool -> {}", name),
                None => "tool -> <none>".to_string(),
            },
            EditorEvent::ObjectsMoved { ids } => format!("{} object(s) moved", ids.len()),
            EditorEvent::HistoryChanged {
                undo_depth,
                redo_depth,
            } => format!("history undo={} redo={}", undo_depth, redo_depth),
            EditorEvent::ValidatorCorrection { kind } => format!("validator corrected {}", kind),
        }
    }
}
