//! Tool contract and registry.
//!
//! A tool interprets pointer gestures while it is active. It reads and
//! mutates the object store only through [`ToolContext`] and reports its
//! outcome as a [`ToolResult`]: at most one committed mutation per gesture,
//! an optional state transition, a preview to repaint and an optional
//! viewport request. The event router applies the result.

use std::any::Any;

use diagramkit_core::{InteractionState, ObjectId, Result};
use diagramkit_settings::InteractionSettings;

use crate::commands::DiagramCommand;
use crate::geometry::{world_per_px, HandleMetrics};
use crate::model::{Bounds, DiagramObject, Point};
use crate::selection::SelectionSet;
use crate::store::ObjectStore;

mod connector;
mod creation;
mod eraser;
mod freehand;
mod pan;
mod polyline;
pub mod preview;
mod select;

pub use connector::ConnectorTool;
pub use creation::{
    CircleFactory, CreationTool, CurveFactory, EllipseFactory, LineFactory, PolygonFactory,
    RectangleFactory, ShapeFactory, TaperedLineFactory, TextFactory,
};
pub use eraser::EraserTool;
pub use freehand::FreehandTool;
pub use pan::PanTool;
pub use polyline::PolylineTool;
pub use preview::{PreviewPrimitive, PreviewSurface, RecordingSurface};
pub use select::SelectTool;

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Extends the selection; constrains proportions and snaps angles.
    pub shift: bool,
    /// Cycles through overlapping objects under the pointer.
    pub alt: bool,
    /// Switches hit-testing to outline precision.
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

/// A pointer event in world coordinates, with the topmost object under it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub point: Point,
    pub hit: Option<ObjectId>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(point: Point, hit: Option<ObjectId>) -> Self {
        Self {
            point,
            hit,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What a tool may touch while handling an event.
pub struct ToolContext<'a> {
    pub store: &'a mut ObjectStore,
    pub selection: &'a mut SelectionSet,
    pub state: InteractionState,
    pub zoom: f64,
    pub settings: &'a InteractionSettings,
}

impl ToolContext<'_> {
    fn world_scale(&self) -> f64 {
        world_per_px(self.zoom)
    }

    pub fn handle_metrics(&self) -> HandleMetrics {
        HandleMetrics::new(self.zoom, self.settings)
    }

    /// Edge hit tolerance in world units.
    pub fn hit_tolerance(&self) -> f64 {
        self.settings.hit_tolerance_px * self.world_scale()
    }

    /// Overlap-cycle click radius in world units.
    pub fn cycle_tolerance(&self) -> f64 {
        self.settings.cycle_click_tolerance_px * self.world_scale()
    }

    /// Close/finish radius for click-built paths in world units.
    pub fn snap_tolerance(&self) -> f64 {
        self.settings.handle_tolerance_px * self.world_scale()
    }
}

/// A mutation a tool hands to the router for journaling.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// A new object; the router assigns its id.
    Create(DiagramObject),
    /// Any other reversible mutation.
    Command(DiagramCommand),
}

/// Transient feedback to repaint.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// A shape that is not committed yet.
    Shape(Box<DiagramObject>),
    SelectionBox(Bounds),
    /// A rubber-band segment, e.g. a connector being placed.
    Segment(Point, Point),
    /// Committed objects were edited live and need repainting.
    Live,
    /// Preview feedback was removed.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportRequest {
    /// Shift the view so content moves by this world-space delta.
    PanBy { dx: f64, dy: f64 },
}

/// Outcome of one tool callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolResult {
    pub commit: Option<Commit>,
    pub transition: Option<InteractionState>,
    pub preview: Option<Preview>,
    pub viewport: Option<ViewportRequest>,
}

impl ToolResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn transition(state: InteractionState) -> Self {
        Self {
            transition: Some(state),
            ..Self::default()
        }
    }

    pub fn with_transition(mut self, state: InteractionState) -> Self {
        self.transition = Some(state);
        self
    }

    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.commit = Some(commit);
        self
    }

    pub fn with_preview(mut self, preview: Preview) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn with_viewport(mut self, request: ViewportRequest) -> Self {
        self.viewport = Some(request);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// An interaction tool.
///
/// Gesture scratch data lives in the tool. `on_deactivate` and `on_cancel`
/// must discard it so a switched-away tool never resumes a half-finished
/// gesture.
pub trait Tool: Send {
    fn name(&self) -> &str;

    /// Called when the tool becomes active. An error leaves the dispatcher
    /// with no active tool.
    fn on_activate(&mut self, _ctx: &mut ToolContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called when the tool stops being active. Must clear scratch state.
    fn on_deactivate(&mut self, ctx: &mut ToolContext<'_>);

    fn on_mouse_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult;

    fn on_mouse_move(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult;

    fn on_mouse_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult;

    /// Abandons the current gesture and returns to Idle.
    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResult {
        self.on_deactivate(ctx);
        ToolResult::transition(InteractionState::Idle).with_preview(Preview::Clear)
    }

    /// Paints transient feedback. Never mutates committed state.
    fn render_preview(&self, _surface: &mut dyn PreviewSurface) {}

    /// The interaction state implied by the tool's scratch data, or `None`
    /// when no gesture is in progress.
    fn active_gesture(&self) -> Option<InteractionState>;

    /// Whether this tool drives `state`.
    fn handles_state(&self, state: InteractionState) -> bool;

    /// Whether a press may start or continue a gesture in `state`.
    fn accepts_press(&self, state: InteractionState) -> bool {
        state.is_idle()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A drawing gesture commits only when it is strictly larger than the minimum.
pub(crate) fn exceeds_minimum(extent: f64, minimum: f64) -> bool {
    extent > minimum
}

/// The standard tool set, select first.
pub fn default_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(SelectTool::new()),
        Box::new(PanTool::new()),
        Box::new(EraserTool::new()),
        Box::new(CreationTool::new(RectangleFactory)),
        Box::new(CreationTool::new(EllipseFactory)),
        Box::new(CreationTool::new(CircleFactory)),
        Box::new(CreationTool::new(LineFactory::line())),
        Box::new(CreationTool::new(LineFactory::arrow())),
        Box::new(CreationTool::new(CurveFactory)),
        Box::new(CreationTool::new(TaperedLineFactory)),
        Box::new(CreationTool::new(PolygonFactory::triangle())),
        Box::new(CreationTool::new(PolygonFactory::pentagon())),
        Box::new(CreationTool::new(PolygonFactory::hexagon())),
        Box::new(CreationTool::new(TextFactory)),
        Box::new(FreehandTool::new()),
        Box::new(PolylineTool::new()),
        Box::new(ConnectorTool::new()),
    ]
}
