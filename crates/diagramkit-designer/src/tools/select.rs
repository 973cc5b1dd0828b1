//! Selection and direct manipulation.
//!
//! Edits run live against the store during the drag. Every edit is
//! recomputed from snapshots taken at the press, so the object under the
//! pointer never drifts. The release journals one `ModifyObjects` command
//! covering the edited objects and the connectors that followed them.
//! Cancelling restores the snapshots.

use std::any::Any;

use diagramkit_core::{InteractionState, ObjectId};

use super::{
    Commit, Modifiers, PointerEvent, Preview, PreviewSurface, Tool, ToolContext, ToolResult,
};
use crate::commands::DiagramCommand;
use crate::geometry::{self, Handle, HitMode};
use crate::model::{Bounds, DiagramObject, Endpoint, Point, Shape, ShapeGeometry};
use crate::store::ObjectStore;

#[derive(Debug, Clone, Copy, PartialEq)]
enum EditKind {
    Move,
    Resize(Handle),
    Rotate { pivot: Point, start: Point },
    Control,
}

impl EditKind {
    fn state(self) -> InteractionState {
        match self {
            EditKind::Move => InteractionState::DraggingObject,
            EditKind::Resize(_) => InteractionState::DraggingHandle,
            EditKind::Rotate { .. } => InteractionState::Rotating,
            EditKind::Control => InteractionState::DraggingGraphControlPoint,
        }
    }

    fn label(self) -> &'static str {
        match self {
            EditKind::Move => "Move",
            EditKind::Resize(_) => "Resize",
            EditKind::Rotate { .. } => "Rotate",
            EditKind::Control => "Edit Control Point",
        }
    }
}

#[derive(Debug, Clone)]
struct EditGesture {
    kind: EditKind,
    origin: Point,
    /// Objects under direct manipulation.
    targets: Vec<ObjectId>,
    /// Press-time copies of the targets and the connectors attached to them.
    originals: Vec<DiagramObject>,
}

impl EditGesture {
    fn original(&self, id: ObjectId) -> Option<&DiagramObject> {
        self.originals.iter().find(|o| o.id == id)
    }
}

#[derive(Debug, Clone)]
enum Gesture {
    Edit(EditGesture),
    Marquee {
        origin: Point,
        current: Point,
        extend: bool,
    },
}

/// Overlap cycle over a z-order snapshot taken at the originating click.
#[derive(Debug, Clone)]
struct CycleState {
    origin: Point,
    candidates: Vec<ObjectId>,
    index: usize,
}

#[derive(Debug, Default)]
pub struct SelectTool {
    gesture: Option<Gesture>,
    cycle: Option<CycleState>,
    precise: bool,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sticky outline-precision hit-testing. Holding ctrl has the same
    /// effect for a single press.
    pub fn set_precise(&mut self, precise: bool) {
        self.precise = precise;
    }

    pub fn is_precise(&self) -> bool {
        self.precise
    }

    fn hit_mode(&self, modifiers: &Modifiers) -> HitMode {
        if self.precise || modifiers.ctrl {
            HitMode::Precise
        } else {
            HitMode::Bounds
        }
    }

    fn hit(&self, ctx: &ToolContext<'_>, event: &PointerEvent) -> Option<ObjectId> {
        match self.hit_mode(&event.modifiers) {
            HitMode::Precise => {
                ctx.store
                    .hit_test(event.point, ctx.hit_tolerance(), HitMode::Precise)
            }
            HitMode::Bounds => event.hit,
        }
    }

    /// Selects the next object in the overlap stack under `point`.
    ///
    /// A click near the previous cycle origin advances through the snapshot
    /// taken at that origin, wrapping around. A click elsewhere starts a new
    /// snapshot, beginning below the current selection.
    pub fn cycle_at(
        &mut self,
        ctx: &mut ToolContext<'_>,
        point: Point,
        mode: HitMode,
    ) -> Option<ObjectId> {
        let tolerance = ctx.cycle_tolerance();
        let store: &ObjectStore = ctx.store;
        let continuing = self.cycle.as_ref().is_some_and(|c| {
            c.origin.distance_to(&point) <= tolerance
                && c.candidates.iter().all(|id| store.contains(*id))
        });

        if continuing {
            if let Some(cycle) = self.cycle.as_mut() {
                cycle.index = (cycle.index + 1) % cycle.candidates.len();
            }
        } else {
            let candidates = store.hits_at(point, ctx.hit_tolerance(), mode);
            if candidates.is_empty() {
                self.cycle = None;
                return None;
            }
            let index = ctx
                .selection
                .primary()
                .and_then(|sel| candidates.iter().position(|id| *id == sel))
                .map(|pos| (pos + 1) % candidates.len())
                .unwrap_or(0);
            self.cycle = Some(CycleState {
                origin: point,
                candidates,
                index,
            });
        }

        let id = self
            .cycle
            .as_ref()
            .and_then(|c| c.candidates.get(c.index).copied())?;
        ctx.selection.select_only(id);
        Some(id)
    }

    /// Advances the current overlap cycle without a click.
    pub fn cycle_next(&mut self, ctx: &mut ToolContext<'_>) -> Option<ObjectId> {
        let origin = self.cycle.as_ref()?.origin;
        self.cycle_at(ctx, origin, HitMode::Bounds)
    }

    /// Snapshots `targets` plus every connector attached to them.
    fn snapshot(store: &ObjectStore, targets: &[ObjectId]) -> Vec<DiagramObject> {
        let mut ids: Vec<ObjectId> = targets.to_vec();
        for id in store.connectors_attached_to(targets) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids.iter()
            .filter_map(|id| store.get(*id).cloned())
            .collect()
    }

    fn begin_edit(
        &mut self,
        ctx: &mut ToolContext<'_>,
        kind: EditKind,
        origin: Point,
        targets: Vec<ObjectId>,
    ) -> ToolResult {
        let originals = Self::snapshot(ctx.store, &targets);
        self.gesture = Some(Gesture::Edit(EditGesture {
            kind,
            origin,
            targets,
            originals,
        }));
        ToolResult::transition(kind.state())
    }

    fn begin_handle(
        &mut self,
        ctx: &mut ToolContext<'_>,
        id: ObjectId,
        handle: Handle,
        p: Point,
    ) -> ToolResult {
        let Some(obj) = ctx.store.get(id) else {
            return ToolResult::none();
        };
        let kind = match handle {
            Handle::Rotate => EditKind::Rotate {
                pivot: geometry::center(obj),
                start: p,
            },
            Handle::Control => EditKind::Control,
            h => EditKind::Resize(h),
        };
        self.begin_edit(ctx, kind, p, vec![id])
    }

    fn apply_edit(
        store: &mut ObjectStore,
        gesture: &EditGesture,
        p: Point,
        modifiers: &Modifiers,
        snap_step: f64,
    ) {
        match gesture.kind {
            EditKind::Move => {
                let dx = p.x - gesture.origin.x;
                let dy = p.y - gesture.origin.y;
                for original in &gesture.originals {
                    if !gesture.targets.contains(&original.id) {
                        continue;
                    }
                    let mut obj = original.clone();
                    obj.shape.translate(dx, dy);
                    // a dragged connector lets go of objects left behind
                    if let Shape::Connector(c) = &mut obj.shape {
                        for which in [Endpoint::Start, Endpoint::End] {
                            if c
                                .attachment(which)
                                .is_some_and(|id| !gesture.targets.contains(&id))
                            {
                                c.set_attachment(which, None);
                            }
                        }
                    }
                    store.replace(obj);
                }
            }
            EditKind::Resize(handle) => {
                for id in &gesture.targets {
                    if let Some(original) = gesture.original(*id) {
                        store.replace(geometry::resize_object(
                            original,
                            handle,
                            p,
                            modifiers.shift,
                        ));
                    }
                }
            }
            EditKind::Rotate { pivot, start } => {
                let snap = modifiers.shift.then_some(snap_step);
                for id in &gesture.targets {
                    if let Some(original) = gesture.original(*id) {
                        let mut obj = original.clone();
                        obj.set_rotation(geometry::rotation_for_drag(
                            pivot,
                            start,
                            p,
                            original.rotation(),
                            snap,
                        ));
                        store.replace(obj);
                    }
                }
            }
            EditKind::Control => {
                for id in &gesture.targets {
                    if let Some(original) = gesture.original(*id) {
                        store.replace(geometry::resize_object(
                            original,
                            Handle::Control,
                            p,
                            false,
                        ));
                    }
                }
            }
        }
        store.reattach_connectors(&gesture.targets);
    }

    /// Re-targets a dropped connector end at the object under the pointer,
    /// or detaches it over empty canvas.
    fn reconnect(ctx: &mut ToolContext<'_>, connector: ObjectId, which: Endpoint, p: Point) {
        let tolerance = ctx.hit_tolerance();
        let store = &mut *ctx.store;
        let target = store.attachable_at(p, tolerance);
        let Some(mut obj) = store.get(connector).cloned() else {
            return;
        };
        if let Shape::Connector(c) = &mut obj.shape {
            c.set_attachment(which, target);
        }
        store.replace(obj);
        if let Some(resolved) = store.resolve_connector(connector) {
            store.replace(resolved);
        }
    }

    fn restore(store: &mut ObjectStore, gesture: &EditGesture) {
        for original in &gesture.originals {
            store.replace(original.clone());
        }
    }

    fn marquee_bounds(origin: Point, current: Point) -> Bounds {
        Bounds::from_corners(origin, current)
    }
}

impl Tool for SelectTool {
    fn name(&self) -> &str {
        "select"
    }

    fn on_deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(Gesture::Edit(gesture)) = self.gesture.take() {
            Self::restore(ctx.store, &gesture);
        }
        self.cycle = None;
    }

    fn on_mouse_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let p = event.point;
        let m = event.modifiers;

        if !m.shift && !m.alt {
            let metrics = ctx.handle_metrics();
            let grabbed = ctx.selection.ids().iter().rev().find_map(|id| {
                ctx.store
                    .get(*id)
                    .and_then(|obj| geometry::handle_at(p, obj, &metrics))
                    .map(|h| (*id, h))
            });
            if let Some((id, handle)) = grabbed {
                self.cycle = None;
                return self.begin_handle(ctx, id, handle, p);
            }
        }

        if m.alt {
            let mode = self.hit_mode(&m);
            self.cycle_at(ctx, p, mode);
            return ToolResult::none().with_preview(Preview::Live);
        }
        self.cycle = None;

        match self.hit(ctx, event) {
            Some(id) => {
                if m.shift {
                    if !ctx.selection.toggle(id) {
                        return ToolResult::none().with_preview(Preview::Live);
                    }
                } else if !ctx.selection.contains(id) {
                    ctx.selection.select_only(id);
                }
                let targets: Vec<ObjectId> = ctx
                    .selection
                    .ids()
                    .iter()
                    .copied()
                    .filter(|id| ctx.store.contains(*id))
                    .collect();
                self.begin_edit(ctx, EditKind::Move, p, targets)
            }
            None => {
                if !m.shift {
                    ctx.selection.clear();
                }
                self.gesture = Some(Gesture::Marquee {
                    origin: p,
                    current: p,
                    extend: m.shift,
                });
                ToolResult::transition(InteractionState::DrawingSelectionBox)
                    .with_preview(Preview::SelectionBox(Self::marquee_bounds(p, p)))
            }
        }
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let snap_step = ctx.settings.rotation_snap_degrees;
        match self.gesture.as_mut() {
            None => ToolResult::none(),
            Some(Gesture::Marquee {
                origin, current, ..
            }) => {
                *current = event.point;
                ToolResult::none()
                    .with_preview(Preview::SelectionBox(Self::marquee_bounds(*origin, *current)))
            }
            Some(Gesture::Edit(gesture)) => {
                Self::apply_edit(ctx.store, gesture, event.point, &event.modifiers, snap_step);
                ToolResult::none().with_preview(Preview::Live)
            }
        }
    }

    fn on_mouse_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) -> ToolResult {
        let Some(gesture) = self.gesture.take() else {
            return ToolResult::none();
        };
        let done = ToolResult::transition(InteractionState::Idle);
        match gesture {
            Gesture::Marquee { origin, extend, .. } => {
                let area = Self::marquee_bounds(origin, event.point);
                if area.width() > 0.0 || area.height() > 0.0 {
                    let ids = ctx.store.intersecting(&area);
                    if extend {
                        for id in ids {
                            ctx.selection.add(id);
                        }
                    } else {
                        ctx.selection.set(ids);
                    }
                }
                done.with_preview(Preview::Clear)
            }
            Gesture::Edit(gesture) => {
                let snap_step = ctx.settings.rotation_snap_degrees;
                Self::apply_edit(
                    ctx.store,
                    &gesture,
                    event.point,
                    &event.modifiers,
                    snap_step,
                );
                if let EditKind::Resize(handle) = gesture.kind {
                    if let (Some(which), [id]) = (handle.endpoint(), gesture.targets.as_slice()) {
                        let is_connector = ctx
                            .store
                            .get(*id)
                            .is_some_and(|o| matches!(o.shape, Shape::Connector(_)));
                        if is_connector {
                            Self::reconnect(ctx, *id, which, event.point);
                        }
                    }
                }
                let pairs: Vec<(DiagramObject, DiagramObject)> = gesture
                    .originals
                    .iter()
                    .filter_map(|before| {
                        ctx.store
                            .get(before.id)
                            .map(|after| (before.clone(), after.clone()))
                    })
                    .collect();
                let done = done.with_preview(Preview::Live);
                match DiagramCommand::modify(gesture.kind.label(), pairs) {
                    Some(cmd) => done.with_commit(Commit::Command(cmd)),
                    None => done,
                }
            }
        }
    }

    fn render_preview(&self, surface: &mut dyn PreviewSurface) {
        if let Some(Gesture::Marquee {
            origin, current, ..
        }) = &self.gesture
        {
            surface.selection_box(Self::marquee_bounds(*origin, *current));
        }
    }

    fn active_gesture(&self) -> Option<InteractionState> {
        self.gesture.as_ref().map(|g| match g {
            Gesture::Edit(edit) => edit.kind.state(),
            Gesture::Marquee { .. } => InteractionState::DrawingSelectionBox,
        })
    }

    fn handles_state(&self, state: InteractionState) -> bool {
        matches!(
            state,
            InteractionState::Rotating
                | InteractionState::DraggingObject
                | InteractionState::DraggingHandle
                | InteractionState::DraggingGraphControlPoint
                | InteractionState::DrawingSelectionBox
        )
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
