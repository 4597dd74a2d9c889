//! Undo/redo log of reversible actions.
//!
//! [`History`] knows nothing about Othello: it keeps the actions that were
//! executed on some target in order, and can step backwards and forwards
//! through them. Executing a new action discards everything that was undone.

use tracing::trace;

/// Something that can be done to a `T` and taken back again.
pub trait Action<T> {
    fn apply(&mut self, target: &mut T);
    fn revert(&mut self, target: &mut T);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<A> {
    undo_stack: Vec<A>,
    redo_stack: Vec<A>,
}

impl<A> History<A> {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Applies `action` to `target` and logs it.
    pub fn execute<T>(&mut self, mut action: A, target: &mut T)
    where
        A: Action<T>,
    {
        action.apply(target);
        self.record(action);
    }

    /// Logs an action that has already been applied.
    pub fn record(&mut self, action: A) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
        trace!(undo = self.undo_stack.len(), "recorded action");
    }

    /// Reverts the latest action. Returns false if there is nothing to undo.
    pub fn undo<T>(&mut self, target: &mut T) -> bool
    where
        A: Action<T>,
    {
        let Some(mut action) = self.undo_stack.pop() else {
            return false;
        };

        action.revert(target);
        self.redo_stack.push(action);
        trace!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "undid action");

        true
    }

    /// Re-applies the latest undone action. Returns false if there is none.
    pub fn redo<T>(&mut self, target: &mut T) -> bool
    where
        A: Action<T>,
    {
        let Some(mut action) = self.redo_stack.pop() else {
            return false;
        };

        action.apply(target);
        self.undo_stack.push(action);
        trace!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "redid action");

        true
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The action `undo` would revert next.
    pub fn last(&self) -> Option<&A> {
        self.undo_stack.last()
    }
}

impl<A> Default for History<A> {
    fn default() -> Self {
        Self::new()
    }
}
