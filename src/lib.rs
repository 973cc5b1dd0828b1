//! # DiagramKit
//!
//! The interaction engine of a 2D diagram editor: pointer gestures routed
//! through a single interaction state machine into pluggable tools, with
//! undo/redo, rotated hit-testing and periodic state validation.
//!
//! ## Architecture
//!
//! DiagramKit is organized as a workspace with multiple crates:
//!
//! 1. **diagramkit-core** - Shared ids, interaction states, errors, event bus
//! 2. **diagramkit-settings** - Editor configuration and persistence
//! 3. **diagramkit-designer** - Model, geometry, tools, history, router
//! 4. **diagramkit** - Facade and the `diagramkit` replay binary

pub mod script;

pub use diagramkit_core as core;
pub use diagramkit_designer as designer;
pub use diagramkit_settings as settings;

pub use diagramkit_core::{
    EditorError, EditorEvent, EventBus, EventFilter, InteractionState, ObjectId, Result,
};

pub use diagramkit_designer::{
    CommandHistory, DesignFile, DiagramCommand, DiagramObject, EventRouter, InteractionStateMachine,
    Modifiers, ObjectStore, Point, PreviewSurface, RecordingSurface, SelectionSet, Shape,
    StateValidator, Style, Tool, ToolDispatcher, Viewport,
};

pub use diagramkit_settings::EditorConfig;

pub use script::{GestureScript, ScriptReport, Step};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support (INFO when unset)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
