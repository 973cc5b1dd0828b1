//! Reversible mutations of the object store.

use diagramkit_core::ObjectId;

use crate::model::{DiagramObject, Shape};
use crate::store::ObjectStore;

/// A mutation that can be executed and undone on the object store.
///
/// [`CommandHistory`](crate::history::CommandHistory) journals any
/// implementor; the editor uses [`DiagramCommand`].
pub trait Command {
    /// Executes the command.
    fn execute(&mut self, store: &mut ObjectStore);

    /// Undoes the command. Must exactly invert `execute`.
    fn undo(&mut self, store: &mut ObjectStore);

    /// Returns the name of the command for display.
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagramCommand {
    AddObject(AddObject),
    RemoveObjects(RemoveObjects),
    ModifyObjects(ModifyObjects),
    Reorder(ReorderObject),
    Composite(CompositeCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddObject {
    pub id: ObjectId,
    pub index: Option<usize>,
    /// Some while the object is off the store (before execute, after undo).
    pub object: Option<DiagramObject>,
}

impl AddObject {
    pub fn new(object: DiagramObject) -> Self {
        Self {
            id: object.id,
            index: None,
            object: Some(object),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveObjects {
    pub ids: Vec<ObjectId>,
    /// Removed objects with their former z-index, filled by execute.
    pub removed: Vec<(usize, DiagramObject)>,
}

impl RemoveObjects {
    pub fn new(ids: Vec<ObjectId>) -> Self {
        Self {
            ids,
            removed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectChange {
    pub before: DiagramObject,
    pub after: DiagramObject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifyObjects {
    pub name: String,
    pub changes: Vec<ObjectChange>,
}

impl ModifyObjects {
    pub fn new(name: impl Into<String>, changes: Vec<ObjectChange>) -> Self {
        Self {
            name: name.into(),
            changes,
        }
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.changes.iter().map(|c| c.after.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReorderObject {
    pub id: ObjectId,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeCommand {
    pub commands: Vec<DiagramCommand>,
    pub name: String,
}

impl DiagramCommand {
    /// Builds a modification from `(before, after)` pairs, dropping pairs
    /// that are identical. Returns `None` when nothing changed.
    pub fn modify(name: &str, pairs: Vec<(DiagramObject, DiagramObject)>) -> Option<Self> {
        let changes: Vec<ObjectChange> = pairs
            .into_iter()
            .filter(|(before, after)| before != after)
            .map(|(before, after)| ObjectChange { before, after })
            .collect();
        if changes.is_empty() {
            None
        } else {
            Some(DiagramCommand::ModifyObjects(ModifyObjects::new(
                name, changes,
            )))
        }
    }

    /// Removes `ids` and detaches connectors that reference them, as one
    /// undoable step. Returns `None` when none of the ids is live.
    pub fn delete(store: &ObjectStore, ids: &[ObjectId]) -> Option<Self> {
        let live: Vec<ObjectId> = ids
            .iter()
            .copied()
            .filter(|id| store.contains(*id))
            .collect();
        if live.is_empty() {
            return None;
        }
        let mut pairs: Vec<(DiagramObject, DiagramObject)> = Vec::new();
        for id in &live {
            for (before, after) in store.detach_references(*id) {
                if live.contains(&before.id) {
                    continue;
                }
                match pairs.iter_mut().find(|(b, _)| b.id == before.id) {
                    Some((_, merged)) => {
                        if let Shape::Connector(c) = &mut merged.shape {
                            c.detach(*id);
                        }
                    }
                    None => pairs.push((before, after)),
                }
            }
        }
        let remove = DiagramCommand::RemoveObjects(RemoveObjects::new(live));
        match Self::modify("Detach Connectors", pairs) {
            Some(detach) => Some(DiagramCommand::Composite(CompositeCommand {
                name: "Delete".to_string(),
                commands: vec![detach, remove],
            })),
            None => Some(remove),
        }
    }

    pub fn apply(&mut self, store: &mut ObjectStore) {
        match self {
            DiagramCommand::AddObject(cmd) => {
                if let Some(obj) = cmd.object.take() {
                    let index = cmd.index.unwrap_or(store.len());
                    store.insert_at(index, obj);
                    cmd.index = Some(index);
                }
            }
            DiagramCommand::RemoveObjects(cmd) => {
                let mut targets: Vec<(usize, ObjectId)> = cmd
                    .ids
                    .iter()
                    .filter_map(|id| store.index_of(*id).map(|i| (i, *id)))
                    .collect();
                targets.sort_by(|a, b| b.0.cmp(&a.0));
                cmd.removed.clear();
                for (_, id) in targets {
                    if let Some(entry) = store.remove(id) {
                        cmd.removed.push(entry);
                    }
                }
            }
            DiagramCommand::ModifyObjects(cmd) => {
                for change in &cmd.changes {
                    store.replace(change.after.clone());
                }
            }
            DiagramCommand::Reorder(cmd) => {
                store.move_to(cmd.id, cmd.to);
            }
            DiagramCommand::Composite(cmd) => {
                for sub_cmd in &mut cmd.commands {
                    sub_cmd.apply(store);
                }
            }
        }
    }

    pub fn undo(&mut self, store: &mut ObjectStore) {
        match self {
            DiagramCommand::AddObject(cmd) => {
                if let Some((index, obj)) = store.remove(cmd.id) {
                    cmd.index = Some(index);
                    cmd.object = Some(obj);
                }
            }
            DiagramCommand::RemoveObjects(cmd) => {
                // removed in descending index order; reinsert ascending
                for (index, obj) in cmd.removed.drain(..).rev() {
                    store.insert_at(index, obj);
                }
            }
            DiagramCommand::ModifyObjects(cmd) => {
                for change in cmd.changes.iter().rev() {
                    store.replace(change.before.clone());
                }
            }
            DiagramCommand::Reorder(cmd) => {
                store.move_to(cmd.id, cmd.from);
            }
            DiagramCommand::Composite(cmd) => {
                for sub_cmd in cmd.commands.iter_mut().rev() {
                    sub_cmd.undo(store);
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DiagramCommand::AddObject(_) => "Add Object",
            DiagramCommand::RemoveObjects(_) => "Delete",
            DiagramCommand::ModifyObjects(cmd) => &cmd.name,
            DiagramCommand::Reorder(_) => "Reorder",
            DiagramCommand::Composite(cmd) => &cmd.name,
        }
    }
}

impl Command for DiagramCommand {
    fn execute(&mut self, store: &mut ObjectStore) {
        self.apply(store);
    }

    fn undo(&mut self, store: &mut ObjectStore) {
        DiagramCommand::undo(self, store);
    }

    fn name(&self) -> &str {
        DiagramCommand::name(self)
    }
}
