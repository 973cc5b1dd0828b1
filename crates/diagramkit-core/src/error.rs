//! Error handling for DiagramKit
//!
//! Every error on the interaction path is recoverable. Callers log it and
//! leave the editor in its previous consistent state; none of these variants
//! is allowed to abort a gesture handler.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::types::{InteractionState, ObjectId};

/// Editor error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// An illegal state change was requested; the state is left unchanged.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        /// The state the machine was in.
        from: InteractionState,
        /// The rejected target state.
        to: InteractionState,
    },

    /// A selected object is no longer present in the object store.
    #[error("Selected object {id} is no longer live")]
    OrphanedSelection {
        /// The dangling id.
        id: ObjectId,
    },

    /// A creation gesture ended below the minimum size; nothing is committed.
    #[error("Degenerate {tool} geometry: extent {extent:.3} below minimum {minimum:.3}")]
    DegenerateGeometry {
        /// The tool that produced the gesture.
        tool: String,
        /// The measured extent of the gesture.
        extent: f64,
        /// The configured minimum extent.
        minimum: f64,
    },

    /// Dispatch to a tool name that is not registered.
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// The requested tool name.
        name: String,
    },

    /// A tool refused to activate; the dispatcher is left with no active tool.
    #[error("Tool '{name}' failed to activate: {reason}")]
    ToolActivation {
        /// The tool name.
        name: String,
        /// Why activation failed.
        reason: String,
    },

    /// A properties-panel write was rejected.
    #[error("Invalid property '{name}': {reason}")]
    InvalidProperty {
        /// The property name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An object id did not resolve.
    #[error("Object {id} not found")]
    ObjectNotFound {
        /// The unresolved id.
        id: ObjectId,
    },
}

impl EditorError {
    /// Short machine-readable name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            EditorError::InvalidTransition { .. } => "invalid_transition",
            EditorError::OrphanedSelection { .. } => "orphaned_selection",
            EditorError::DegenerateGeometry { .. } => "degenerate_geometry",
            EditorError::UnknownTool { .. } => "unknown_tool",
            EditorError::ToolActivation { .. } => "tool_activation",
            EditorError::InvalidProperty { .. } => "invalid_property",
            EditorError::ObjectNotFound { .. } => "object_not_found",
        }
    }
}

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
