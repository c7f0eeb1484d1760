//! Undo stack for a single actor

use tile_engine::Batch;

/// Undo and redo batches owned by one actor
#[derive(Debug, Default)]
pub struct ActorUndoStack {
    undo_stack: Vec<Batch>,
    redo_stack: Vec<Batch>,
}

impl ActorUndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a freshly committed batch. Any redo history is gone after this.
    pub fn push(&mut self, batch: Batch) {
        self.undo_stack.push(batch);
        self.redo_stack.clear();
    }

    pub fn pop_undo(&mut self) -> Option<Batch> {
        self.undo_stack.pop()
    }

    pub fn push_undo(&mut self, batch: Batch) {
        self.undo_stack.push(batch);
    }

    pub fn push_redo(&mut self, batch: Batch) {
        self.redo_stack.push(batch);
    }

    pub fn pop_redo(&mut self) -> Option<Batch> {
        self.redo_stack.pop()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}
