use std::any::Any;

use diagramkit_core::{InteractionState, ObjectId};

use super::preview::draw_object;
use super::{Commit, PointerEvent, Preview, PreviewSurface, Tool, ToolContext, ToolResult};
use crate::geometry;
use crate::model::{DiagramConnector, DiagramObject, Point, Shape, Style};
use crate::store::ObjectStore;

struct Placement {
    source: ObjectId,
    /// Source attachment aimed at the pointer.
    start: Point,
    pointer: Point,
}

/// Connects two objects.
///
/// Pressing on an object picks the source (PlacingConnectionSource).
/// Releasing over a different object connects immediately. Otherwise the
/// tool waits in PlacingConnectionTarget for a press on the target; a press
/// on empty canvas or on the source abandons the connection.
#[derive(Default)]
pub struct ConnectorTool {
    style: Style,
    placement: Option<Placement>,
    awaiting_target: bool,
}

impl ConnectorTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    fn reset(&mut self) {
        self.placement = None;
        self.awaiting_target = false;
    }

    /// The object under the pointer a connector may attach to.
    fn attachable(ctx: &ToolContext<'_>, event: &PointerEvent) -> Option<ObjectId> {
        ctx.store.attachable_at(event.point, ctx.hit_tolerance())
    }

    fn connect(
        &self,
        store: &ObjectStore,
        source: ObjectId,
        target: ObjectId,
    ) -> Option<DiagramObject> {
        let src = store.get(source)?;
        let tgt = store.get(target)?;
        let start = geometry::attachment_point(src, geometry::center(tgt));
        let end = geometry::attachment_point(tgt, geometry::center(src));
        Some(DiagramObject::draft(
            Shape::Connector(DiagramConnector::attached(start, end, source, target)),
            self.style.clone(),
        ))
    }

    fn commit_to(&mut self, ctx: &ToolContext<'_>, target: ObjectId) -> ToolResult {
        let done = ToolResult::transition(InteractionState::Idle).with_preview(Preview::Clear);
        let Some(placement) = self.placement.take() else {
            self.reset();
            return done;
        };
        self.reset();
        match self.connect(ctx.store, placement.source, target) {
            Some(obj) => done.with_commit(Commit::Create(obj)),
            None => done,
        }
    }

    fn track(&mut self, ctx: &ToolContext<'_>, pointer: Point) -> Option<Preview> {
        let placement = self.placement.as_mut()?;
        let src = ctx.store.get(placement.source)?;
        placement.pointer = pointer;
        placement.start = geometry::attachment_point(src, pointer);
        Some(Preview::Segment(placement.start, pointer))
    }
}

impl Tool for ConnectorTool {
    fn name(&self) -> &str {
        "connector"
    }

    fn on_deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn on_mouse_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let hit = Self::attachable(ctx, event);
        if self.awaiting_target {
            let source = self.placement.as_ref().map(|p| p.source);
            return match hit {
                Some(target) if Some(target) != source => self.commit_to(ctx, target),
                _ => {
                    self.reset();
                    ToolResult::transition(InteractionState::Idle).with_preview(Preview::Clear)
                }
            };
        }
        let Some(source) = hit else {
            return ToolResult::none();
        };
        self.placement = Some(Placement {
            source,
            start: event.point,
            pointer: event.point,
        });
        let mut result = ToolResult::transition(InteractionState::PlacingConnectionSource);
        result.preview = self.track(ctx, event.point);
        result
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        match self.track(ctx, event.point) {
            Some(preview) => ToolResult::none().with_preview(preview),
            None => ToolResult::none(),
        }
    }

    fn on_mouse_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        if self.awaiting_target {
            return ToolResult::none();
        }
        let Some(source) = self.placement.as_ref().map(|p| p.source) else {
            return ToolResult::none();
        };
        match Self::attachable(ctx, event) {
            Some(target) if target != source => self.commit_to(ctx, target),
            _ => {
                self.awaiting_target = true;
                let mut result = ToolResult::transition(InteractionState::PlacingConnectionTarget);
                result.preview = self.track(ctx, event.point);
                result
            }
        }
    }

    fn render_preview(&self, surface: &mut dyn PreviewSurface) {
        if let Some(p) = &self.placement {
            let rubber_band = DiagramObject::draft(
                Shape::Connector(DiagramConnector::new(p.start, p.pointer)),
                self.style.clone(),
            );
            draw_object(surface, &rubber_band);
        }
    }

    fn active_gesture(&self) -> Option<InteractionState> {
        self.placement.as_ref().map(|_| {
            if self.awaiting_target {
                InteractionState::PlacingConnectionTarget
            } else {
                InteractionState::PlacingConnectionSource
            }
        })
    }

    fn handles_state(&self, state: InteractionState) -> bool {
        state.is_placing()
    }

    fn accepts_press(&self, state: InteractionState) -> bool {
        matches!(
            state,
            InteractionState::Idle | InteractionState::PlacingConnectionTarget
        )
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
