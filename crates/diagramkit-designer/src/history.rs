//! Bounded undo/redo journal.

use std::collections::VecDeque;

use diagramkit_core::constants::DEFAULT_HISTORY_LIMIT;

use crate::commands::{Command, DiagramCommand};
use crate::store::ObjectStore;

/// Linear undo/redo history.
///
/// Executing a command clears the redo branch. When the undo stack exceeds
/// `limit` the oldest entry is evicted.
#[derive(Debug, Clone)]
pub struct CommandHistory<C: Command = DiagramCommand> {
    undo_stack: VecDeque<C>,
    redo_stack: Vec<C>,
    limit: usize,
}

impl<C: Command> Default for CommandHistory<C> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<C: Command> CommandHistory<C> {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Applies `cmd` and records it.
    pub fn execute(&mut self, mut cmd: C, store: &mut ObjectStore) {
        cmd.execute(store);
        self.record(cmd);
    }

    /// Records an already-applied command.
    pub fn record(&mut self, cmd: C) {
        tracing::debug!("history: recorded '{}'", cmd.name());
        self.undo_stack.push_back(cmd);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Undoes the latest command. Returns false when there is nothing to undo.
    pub fn undo(&mut self, store: &mut ObjectStore) -> bool {
        let Some(mut cmd) = self.undo_stack.pop_back() else {
            return false;
        };
        cmd.undo(store);
        self.redo_stack.push(cmd);
        true
    }

    /// Re-applies the latest undone command. Returns false when there is
    /// nothing to redo.
    pub fn redo(&mut self, store: &mut ObjectStore) -> bool {
        let Some(mut cmd) = self.redo_stack.pop() else {
            return false;
        };
        cmd.execute(store);
        self.undo_stack.push_back(cmd);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.name())
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.name())
    }

    /// The command the next undo would revert.
    pub fn peek_undo(&self) -> Option<&C> {
        self.undo_stack.back()
    }

    /// The command the next redo would re-apply.
    pub fn peek_redo(&self) -> Option<&C> {
        self.redo_stack.last()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
