use crate::model::document::{BlockKind, Document, TextRange, Wrapper};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Structural edits a transaction is composed of
///
/// Everything except `DeleteRange` targets the block holding the cursor at the
/// moment the event is applied, so the order of events inside a transaction matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditEvent {
    /// Delete a span of text; the cursor collapses to its start
    DeleteRange { range: TextRange },

    /// Change the type of the text block at the cursor
    SetBlockType { kind: BlockKind },

    /// Wrap the block at the cursor, or unwrap it if already wrapped the same way
    ToggleWrapper { wrapper: Wrapper },

    /// Insert an atom block (image, divider) at the cursor
    InsertBlock { kind: BlockKind },
}

impl EditEvent {
    /// Short label used for logging and history descriptions
    pub fn label(&self) -> &'static str {
        match self {
            Self::DeleteRange { .. } => "delete range",
            Self::SetBlockType { .. } => "set block type",
            Self::ToggleWrapper { .. } => "toggle wrapper",
            Self::InsertBlock { .. } => "insert block",
        }
    }
}

/// One undoable step
///
/// Stores whole-document snapshots before and after, so undo/redo is an Arc swap
/// rather than an inversion of every event.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub events: Vec<EditEvent>,
    pub description: String,
    pub before: Arc<Document>,
    pub after: Arc<Document>,
}

/// Linear undo/redo history of dispatched transactions
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,

    /// Number of entries currently applied
    current_index: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step; anything that was undone is discarded
    pub fn record(&mut self, entry: HistoryEntry) -> usize {
        if self.current_index < self.entries.len() {
            self.entries.truncate(self.current_index);
        }
        tracing::debug!(
            "history: recording '{}' ({} events)",
            entry.description,
            entry.events.len()
        );
        self.entries.push(entry);
        self.current_index = self.entries.len();
        self.current_index - 1
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.entries.len()
    }

    /// Step back; returns the document as it was before the undone step
    pub fn undo(&mut self) -> Option<Arc<Document>> {
        if !self.can_undo() {
            return None;
        }
        self.current_index -= 1;
        Some(Arc::clone(&self.entries[self.current_index].before))
    }

    /// Step forward; returns the document as it was after the redone step
    pub fn redo(&mut self) -> Option<Arc<Document>> {
        if !self.can_redo() {
            return None;
        }
        let entry = &self.entries[self.current_index];
        self.current_index += 1;
        Some(Arc::clone(&entry.after))
    }

    /// Number of undoable steps currently applied
    pub fn undo_depth(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recently applied step
    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.current_index
            .checked_sub(1)
            .map(|index| &self.entries[index])
    }
}
