//! Shared vocabulary types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a diagram object.
///
/// Connectors and selections refer to objects through this id and resolve it
/// against the live object store; nothing holds a direct reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The single active interaction mode of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    Drawing,
    Panning,
    Rotating,
    DraggingObject,
    DraggingHandle,
    DraggingGraphControlPoint,
    PlacingConnectionSource,
    PlacingConnectionTarget,
    DrawingSelectionBox,
}

impl InteractionState {
    /// Every state, in declaration order.
    pub const ALL: [InteractionState; 10] = [
        InteractionState::Idle,
        InteractionState::Drawing,
        InteractionState::Panning,
        InteractionState::Rotating,
        InteractionState::DraggingObject,
        InteractionState::DraggingHandle,
        InteractionState::DraggingGraphControlPoint,
        InteractionState::PlacingConnectionSource,
        InteractionState::PlacingConnectionTarget,
        InteractionState::DrawingSelectionBox,
    ];

    pub fn is_idle(self) -> bool {
        self == InteractionState::Idle
    }

    /// True for the connector placement states that may chain into each other.
    pub fn is_placing(self) -> bool {
        matches!(
            self,
            InteractionState::PlacingConnectionSource | InteractionState::PlacingConnectionTarget
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Drawing => "drawing",
            InteractionState::Panning => "panning",
            InteractionState::Rotating => "rotating",
            InteractionState::DraggingObject => "dragging_object",
            InteractionState::DraggingHandle => "dragging_handle",
            InteractionState::DraggingGraphControlPoint => "dragging_graph_control_point",
            InteractionState::PlacingConnectionSource => "placing_connection_source",
            InteractionState::PlacingConnectionTarget => "placing_connection_target",
            InteractionState::DrawingSelectionBox => "drawing_selection_box",
        }
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
