//! # DiagramKit Designer
//!
//! The interaction engine of a 2D diagram editor. Pointer events in world
//! coordinates flow through a single state machine into pluggable tools;
//! committed edits go through an undo/redo journal.
//!
//! ## Core Components
//!
//! - **Model**: diagram objects (shapes, text, paths, connectors) with
//!   normalized property setters
//! - **Geometry**: bounds, rotated hit-testing, handles, resize and rotate math
//! - **State machine**: one interaction state with a validated transition table
//! - **Tools**: select, pan, eraser, shape creation, freehand, polyline, connector
//! - **History**: reversible commands with bounded undo
//! - **Validator**: periodic drift correction
//! - **Router**: the entry point tying the above together
//!
//! ## Architecture
//!
//! ```text
//! EventRouter
//!   ├── InteractionStateMachine (guard + transitions)
//!   ├── ToolDispatcher
//!   │     └── Tool (SelectTool, CreationTool<F>, ...)
//!   ├── CommandHistory (undo/redo)
//!   ├── StateValidator (periodic checks)
//!   └── ObjectStore + SelectionSet + Viewport
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use diagramkit_designer::{EventRouter, Modifiers, Point};
//!
//! let mut router = EventRouter::default();
//! router.switch_tool("circle").unwrap();
//! router.pointer_down(Point::new(50.0, 50.0), Modifiers::NONE);
//! router.pointer_move(Point::new(80.0, 50.0), Modifiers::NONE);
//! router.pointer_up(Point::new(80.0, 50.0), Modifiers::NONE);
//! assert_eq!(router.store().len(), 1);
//! ```

pub mod commands;
pub mod dispatcher;
pub mod geometry;
pub mod history;
pub mod model;
pub mod router;
pub mod selection;
pub mod serialization;
pub mod state_machine;
pub mod store;
pub mod tools;
pub mod validator;
pub mod viewport;

pub use commands::{Command, CompositeCommand, DiagramCommand, ModifyObjects};
pub use dispatcher::ToolDispatcher;
pub use geometry::{Handle, HandleMetrics, HitMode};
pub use history::CommandHistory;
pub use model::{
    Bounds, DiagramObject, Point, Property, PropertyValue, Shape, ShapeGeometry, ShapeKind, Style,
};
pub use router::{EventRouter, RouteOutcome};
pub use selection::SelectionSet;
pub use serialization::DesignFile;
pub use state_machine::{InteractionStateMachine, TransitionRecord};
pub use store::ObjectStore;
pub use tools::{
    default_tools, Commit, Modifiers, PointerEvent, Preview, PreviewSurface, RecordingSurface,
    SelectTool, Tool, ToolContext, ToolResult,
};
pub use validator::{StateValidator, ValidationReport, Violation};
pub use viewport::Viewport;

pub use diagramkit_core::{EditorError, InteractionState, ObjectId};
