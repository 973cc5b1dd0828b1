//! Ordered selection set.

use diagramkit_core::ObjectId;

use crate::geometry;
use crate::model::Bounds;
use crate::store::ObjectStore;

/// Selected ids in the order they were selected. The last one is primary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    ids: Vec<ObjectId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn primary(&self) -> Option<ObjectId> {
        self.ids.last().copied()
    }

    /// Replaces the selection. Duplicates are dropped.
    pub fn set<I: IntoIterator<Item = ObjectId>>(&mut self, ids: I) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    pub fn select_only(&mut self, id: ObjectId) {
        self.ids.clear();
        self.ids.push(id);
    }

    pub fn add(&mut self, id: ObjectId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|x| *x != id);
        self.ids.len() != before
    }

    /// Adds `id` if absent, removes it otherwise. Returns the new membership.
    pub fn toggle(&mut self, id: ObjectId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops ids missing from `store`. Returns the ids removed.
    pub fn retain_live(&mut self, store: &ObjectStore) -> Vec<ObjectId> {
        let (live, dead): (Vec<_>, Vec<_>) =
            self.ids.iter().copied().partition(|id| store.contains(*id));
        self.ids = live;
        dead
    }

    /// Union of the world bounds of every selected object.
    pub fn bounds(&self, store: &ObjectStore) -> Option<Bounds> {
        self.ids
            .iter()
            .filter_map(|id| store.get(*id))
            .map(geometry::bounds)
            .reduce(|a, b| a.union(&b))
    }
}
