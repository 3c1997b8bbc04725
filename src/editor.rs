//! Editing context handed to command actions
//!
//! Actions never touch a document directly. They build a [`Chain`] of edit events
//! and dispatch it as one [`Transaction`], which the host applies atomically and
//! records as a single undo step.

use crate::model::document::{BlockKind, Document, TextRange, Wrapper};
use crate::model::event::{EditEvent, History, HistoryEntry};
use crate::model::nodes::EmbedNode;
use anyhow::{Context, Result};
use std::sync::Arc;

/// A composed edit, applied all-or-nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub events: Vec<EditEvent>,
    /// Whether the editor should take focus when applying it
    pub focus: bool,
}

impl Transaction {
    /// Human-readable summary, e.g. "delete range, set block type"
    pub fn description(&self) -> String {
        self.events
            .iter()
            .map(EditEvent::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Host editor boundary
pub trait Editor {
    /// Apply a transaction as one undoable step
    fn dispatch(&mut self, transaction: Transaction) -> Result<()>;
}

impl<'a> dyn Editor + 'a {
    /// Start a chain of edits that is dispatched by [`Chain::run`]
    pub fn chain(&'a mut self) -> Chain<'a> {
        Chain::new(self)
    }
}

/// Builder collecting edit events in order
#[must_use = "a chain does nothing until `run` is called"]
pub struct Chain<'a> {
    editor: &'a mut (dyn Editor + 'a),
    transaction: Transaction,
}

impl<'a> Chain<'a> {
    pub fn new(editor: &'a mut (dyn Editor + 'a)) -> Self {
        Self {
            editor,
            transaction: Transaction::default(),
        }
    }

    fn push(mut self, event: EditEvent) -> Self {
        self.transaction.events.push(event);
        self
    }

    pub fn focus(mut self) -> Self {
        self.transaction.focus = true;
        self
    }

    pub fn delete_range(self, range: TextRange) -> Self {
        self.push(EditEvent::DeleteRange { range })
    }

    pub fn set_paragraph(self) -> Self {
        self.push(EditEvent::SetBlockType {
            kind: BlockKind::Paragraph,
        })
    }

    pub fn set_heading(self, level: u8) -> Self {
        self.push(EditEvent::SetBlockType {
            kind: BlockKind::Heading { level },
        })
    }

    pub fn set_code_block(self) -> Self {
        self.push(EditEvent::SetBlockType {
            kind: BlockKind::CodeBlock,
        })
    }

    pub fn toggle_bullet_list(self) -> Self {
        self.push(EditEvent::ToggleWrapper {
            wrapper: Wrapper::BulletList,
        })
    }

    pub fn toggle_ordered_list(self) -> Self {
        self.push(EditEvent::ToggleWrapper {
            wrapper: Wrapper::OrderedList,
        })
    }

    pub fn toggle_blockquote(self) -> Self {
        self.push(EditEvent::ToggleWrapper {
            wrapper: Wrapper::Blockquote,
        })
    }

    pub fn insert_node(self, node: EmbedNode) -> Self {
        self.push(EditEvent::InsertBlock {
            kind: BlockKind::Embed(node),
        })
    }

    pub fn set_horizontal_rule(self) -> Self {
        self.push(EditEvent::InsertBlock {
            kind: BlockKind::HorizontalRule,
        })
    }

    /// Dispatch everything collected so far as one transaction
    pub fn run(self) -> Result<()> {
        self.editor.dispatch(self.transaction)
    }
}

/// In-memory editor over a [`Document`] with snapshot undo/redo
#[derive(Debug, Default)]
pub struct DocumentEditor {
    document: Document,
    history: History,
    focused: bool,
}

impl DocumentEditor {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            history: History::new(),
            focused: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_cursor(&mut self, position: usize) -> Result<()> {
        self.document.set_cursor(position)
    }

    /// Type text at the cursor, outside of the undo history
    ///
    /// Stands in for the host's own input handling so that sessions can be driven.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        self.document.insert_text(text)
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(document) => {
                self.document = Document::clone(&document);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(document) => {
                self.document = Document::clone(&document);
                true
            }
            None => false,
        }
    }
}

impl Editor for DocumentEditor {
    fn dispatch(&mut self, transaction: Transaction) -> Result<()> {
        let description = transaction.description();
        let mut next = self.document.clone();
        for (index, event) in transaction.events.iter().enumerate() {
            next.apply(event)
                .with_context(|| format!("event {} ({}) of '{}'", index, event.label(), description))?;
        }

        if transaction.focus {
            self.focused = true;
        }
        let before = std::mem::replace(&mut self.document, next);
        self.history.record(HistoryEntry {
            events: transaction.events,
            description,
            before: Arc::new(before),
            after: Arc::new(self.document.clone()),
        });
        Ok(())
    }
}
