//! Undo/redo history over whole-text snapshots.
//!
//! Every undoable edit stores the complete `(text, selection)` pair that
//! preceded it. This trades memory for simplicity: restoring a snapshot can
//! never desynchronize from the buffer the way replaying deltas could, and
//! the fixed capacity bounds the cost.
//!
//! Invariants:
//! - any new edit clears the redo stack;
//! - undo moves the current state to the redo stack and vice versa;
//! - the undo stack never exceeds [`MAX_SNAPSHOTS`] entries (oldest dropped).

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::selection::Selection;

/// Maximum number of snapshots retained on the undo stack.
pub const MAX_SNAPSHOTS: usize = 50;

/// A complete buffer state: text plus selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The full buffer text at the time of the snapshot
    pub text: String,
    /// The selection at the time of the snapshot
    pub selection: Selection,
}

impl Snapshot {
    /// Creates a snapshot from a text/selection pair.
    pub fn new(text: impl Into<String>, selection: Selection) -> Self {
        Self {
            text: text.into(),
            selection,
        }
    }
}

/// Bounded undo/redo stacks of buffer snapshots.
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots that undo steps restore, newest at the back
    undo_stack: VecDeque<Snapshot>,
    /// Snapshots that redo steps restore, newest last
    redo_stack: Vec<Snapshot>,
    /// Maximum number of undo snapshots to keep
    max_size: usize,
}

impl History {
    /// Creates a new history with the given capacity.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_size),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Records the state that an edit is about to replace.
    ///
    /// Clears the redo stack (branching history is not supported) and evicts
    /// the oldest snapshot once the capacity is exceeded.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.redo_stack.clear();
        self.undo_stack.push_back(snapshot);

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Pops the most recent undo snapshot, parking `current` on the redo
    /// stack. Returns `None` (leaving `current` unrecorded) when there is
    /// nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(restored)
    }

    /// Pops the most recent redo snapshot, parking `current` on the undo
    /// stack. The undo push here does not evict: redo can only return states
    /// that undo produced, so the stack cannot grow past its prior size.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        Some(restored)
    }

    /// Returns true if there are snapshots to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are snapshots to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drops all history (file switch, new file).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_SNAPSHOTS)
    }
}
