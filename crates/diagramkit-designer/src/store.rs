//! Z-ordered object storage.

use diagramkit_core::ObjectId;

use crate::geometry::{self, HitMode};
use crate::model::{Bounds, DiagramObject, Endpoint, Point, Shape};

/// Objects in paint order: index 0 is the bottom of the stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectStore {
    objects: Vec<DiagramObject>,
    next_id: u64,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    pub fn generate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    pub fn next_id(&self) -> u64 {
        self.next_id.max(1)
    }

    /// Raises the id counter; it never moves backwards.
    pub fn reserve_ids_through(&mut self, next_id: u64) {
        self.next_id = self.next_id.max(next_id);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[DiagramObject] {
        &self.objects
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagramObject> {
        self.objects.iter()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    pub fn get(&self, id: ObjectId) -> Option<&DiagramObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut DiagramObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Adds an object on top of the stack.
    pub fn insert(&mut self, obj: DiagramObject) {
        let index = self.objects.len();
        self.insert_at(index, obj);
    }

    /// Adds an object at a z-index, clamped to the stack height.
    pub fn insert_at(&mut self, index: usize, obj: DiagramObject) {
        self.reserve_ids_through(obj.id.0 + 1);
        let index = index.min(self.objects.len());
        self.objects.insert(index, obj);
    }

    /// Removes an object, returning its former z-index with it.
    pub fn remove(&mut self, id: ObjectId) -> Option<(usize, DiagramObject)> {
        let index = self.index_of(id)?;
        Some((index, self.objects.remove(index)))
    }

    /// Replaces the stored object with the same id in place. Returns the
    /// previous value, or `None` when the id is unknown.
    pub fn replace(&mut self, obj: DiagramObject) -> Option<DiagramObject> {
        let slot = self.get_mut(obj.id)?;
        Some(std::mem::replace(slot, obj))
    }

    /// Moves an object to a z-index. Returns false for unknown ids.
    pub fn move_to(&mut self, id: ObjectId, index: usize) -> bool {
        let Some((_, obj)) = self.remove(id) else {
            return false;
        };
        let index = index.min(self.objects.len());
        self.objects.insert(index, obj);
        true
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Every object under `p`, topmost first.
    pub fn hits_at(&self, p: Point, tolerance: f64, mode: HitMode) -> Vec<ObjectId> {
        self.objects
            .iter()
            .rev()
            .filter(|o| geometry::contains(o, p, tolerance, mode))
            .map(|o| o.id)
            .collect()
    }

    /// Topmost object under `p`.
    pub fn hit_test(&self, p: Point, tolerance: f64, mode: HitMode) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|o| geometry::contains(o, p, tolerance, mode))
            .map(|o| o.id)
    }

    /// Topmost object under `p` that a connector end may attach to.
    /// Connectors are looked through.
    pub fn attachable_at(&self, p: Point, tolerance: f64) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .filter(|o| !matches!(o.shape, Shape::Connector(_)))
            .find(|o| geometry::contains(o, p, tolerance, HitMode::Bounds))
            .map(|o| o.id)
    }

    /// Objects whose world bounds intersect `area`, in z-order.
    pub fn intersecting(&self, area: &Bounds) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| geometry::bounds(o).intersects(area))
            .map(|o| o.id)
            .collect()
    }

    /// Connectors with an end attached to any of `ids`.
    pub fn connectors_attached_to(&self, ids: &[ObjectId]) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| match &o.shape {
                Shape::Connector(c) => ids.iter().any(|id| c.is_attached_to(*id)),
                _ => false,
            })
            .map(|o| o.id)
            .collect()
    }

    /// Recomputes the endpoints of connectors attached to `moved`.
    /// Returns the ids of connectors that changed.
    pub fn reattach_connectors(&mut self, moved: &[ObjectId]) -> Vec<ObjectId> {
        let mut changed = Vec::new();
        for id in self.connectors_attached_to(moved) {
            if let Some(updated) = self.resolve_connector(id) {
                if self.get(id) != Some(&updated) {
                    self.replace(updated);
                    changed.push(id);
                }
            }
        }
        changed
    }

    /// Copy of a connector with each attached end snapped to its object's
    /// outline, aimed at the opposite end.
    pub fn resolve_connector(&self, id: ObjectId) -> Option<DiagramObject> {
        let mut obj = self.get(id)?.clone();
        let Shape::Connector(conn) = &mut obj.shape else {
            return None;
        };
        let source = conn.source.and_then(|sid| self.get(sid));
        let target = conn.target.and_then(|tid| self.get(tid));
        let source_center = source.map(geometry::center);
        let target_center = target.map(geometry::center);
        let aim_start = target_center.unwrap_or(conn.end);
        let aim_end = source_center.unwrap_or(conn.start);
        if let Some(src) = source {
            conn.start = geometry::attachment_point(src, aim_start);
        }
        if let Some(tgt) = target {
            conn.end = geometry::attachment_point(tgt, aim_end);
        }
        Some(obj)
    }

    /// Clears connector references to `id`. Returns the `(before, after)`
    /// pairs of every connector that changed.
    pub fn detach_references(&self, id: ObjectId) -> Vec<(DiagramObject, DiagramObject)> {
        self.objects
            .iter()
            .filter_map(|o| {
                let Shape::Connector(c) = &o.shape else {
                    return None;
                };
                if !c.is_attached_to(id) {
                    return None;
                }
                let mut after = o.clone();
                if let Shape::Connector(c) = &mut after.shape {
                    c.detach(id);
                }
                Some((o.clone(), after))
            })
            .collect()
    }

    /// Drops references to objects that no longer exist. Used after loading.
    pub fn detach_dangling(&mut self) -> usize {
        let live = self.ids();
        let mut count = 0;
        for obj in &mut self.objects {
            if let Shape::Connector(c) = &mut obj.shape {
                for which in [Endpoint::Start, Endpoint::End] {
                    if let Some(id) = c.attachment(which) {
                        if !live.contains(&id) {
                            c.set_attachment(which, None);
                            count += 1;
                        }
                    }
                }
            }
        }
        count
    }
}
