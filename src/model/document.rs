//! Block document model
//!
//! A deliberately small stand-in for a rich-text document: a flat list of blocks,
//! each optionally wrapped in a list or blockquote, plus a single cursor.
//!
//! Positions are char offsets. A text block of `n` chars occupies `n + 1`
//! positions (its content plus the closing boundary), an atom block occupies one.

use crate::model::event::EditEvent;
use crate::model::nodes::EmbedNode;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Span of document positions, `from <= to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub from: usize,
    pub to: usize,
}

impl TextRange {
    pub fn new(from: usize, to: usize) -> Self {
        debug_assert!(from <= to, "inverted range {from}..{to}");
        Self { from, to }
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// What a block is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    CodeBlock,
    HorizontalRule,
    Embed(EmbedNode),
}

impl BlockKind {
    /// Atoms have no editable text content
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::HorizontalRule | Self::Embed(_))
    }

    pub fn is_textblock(&self) -> bool {
        !self.is_atom()
    }
}

/// Container a block sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wrapper {
    BulletList,
    OrderedList,
    Blockquote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub wrapper: Option<Wrapper>,
    pub text: String,
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            wrapper: None,
            text: text.into(),
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Heading { level },
            wrapper: None,
            text: text.into(),
        }
    }

    pub fn atom(kind: BlockKind) -> Self {
        debug_assert!(kind.is_atom());
        Self {
            kind,
            wrapper: None,
            text: String::new(),
        }
    }

    pub fn wrapped(mut self, wrapper: Wrapper) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    /// Number of chars of text content
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of positions this block occupies
    pub fn size(&self) -> usize {
        if self.kind.is_atom() {
            1
        } else {
            self.text_len() + 1
        }
    }
}

/// The document: blocks plus a cursor position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DocumentParts")]
pub struct Document {
    blocks: Vec<Block>,
    cursor: usize,
}

/// Serialized form, validated through [`Document::new`] on the way in
#[derive(Deserialize)]
struct DocumentParts {
    blocks: Vec<Block>,
    #[serde(default)]
    cursor: usize,
}

impl TryFrom<DocumentParts> for Document {
    type Error = anyhow::Error;

    fn try_from(parts: DocumentParts) -> Result<Self> {
        let mut document = Document::new(parts.blocks);
        document.set_cursor(parts.cursor)?;
        Ok(document)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    /// Create a document; an empty block list gets a single empty paragraph
    pub fn new(mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::paragraph(""));
        }
        Self { blocks, cursor: 0 }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of positions
    pub fn size(&self) -> usize {
        self.blocks.iter().map(Block::size).sum()
    }

    pub fn set_cursor(&mut self, position: usize) -> Result<()> {
        if self.locate(position).is_none() {
            bail!(
                "cursor position {} out of bounds (size {})",
                position,
                self.size()
            );
        }
        self.cursor = position;
        Ok(())
    }

    /// Position of the first char of block `index`
    pub fn block_start(&self, index: usize) -> usize {
        self.blocks[..index].iter().map(Block::size).sum()
    }

    /// Resolve a position to (block index, offset within block)
    pub fn locate(&self, position: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (index, block) in self.blocks.iter().enumerate() {
            let size = block.size();
            if position < start + size {
                return Some((index, position - start));
            }
            start += size;
        }
        None
    }

    /// Index of the block holding the cursor
    pub fn cursor_block(&self) -> usize {
        self.locate(self.cursor)
            .map(|(index, _)| index)
            .unwrap_or(self.blocks.len() - 1)
    }

    /// Text of the cursor's block from its start up to the cursor
    pub fn text_before_cursor(&self) -> &str {
        let Some((index, offset)) = self.locate(self.cursor) else {
            return "";
        };
        let text = &self.blocks[index].text;
        &text[..char_to_byte(text, offset)]
    }

    /// Apply one edit event - the only way blocks change
    pub fn apply(&mut self, event: &EditEvent) -> Result<()> {
        match event {
            EditEvent::DeleteRange { range } => self.delete_range(*range),
            EditEvent::SetBlockType { kind } => {
                if kind.is_atom() {
                    bail!("cannot convert a text block into atom {:?}", kind);
                }
                let block = self.textblock_at_cursor()?;
                block.kind = kind.clone();
                Ok(())
            }
            EditEvent::ToggleWrapper { wrapper } => {
                let block = self.textblock_at_cursor()?;
                block.wrapper = if block.wrapper == Some(*wrapper) {
                    None
                } else {
                    Some(*wrapper)
                };
                Ok(())
            }
            EditEvent::InsertBlock { kind } => self.insert_atom(kind.clone()),
        }
    }

    /// Insert plain text at the cursor and move the cursor past it
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        let Some((index, offset)) = self.locate(self.cursor) else {
            bail!("cursor {} out of bounds", self.cursor);
        };
        let block = &mut self.blocks[index];
        if block.kind.is_atom() {
            bail!("cannot type into atom {:?}", block.kind);
        }
        let at = char_to_byte(&block.text, offset);
        block.text.insert_str(at, text);
        self.cursor += text.chars().count();
        Ok(())
    }

    fn textblock_at_cursor(&mut self) -> Result<&mut Block> {
        let index = self.cursor_block();
        let block = &mut self.blocks[index];
        if block.kind.is_atom() {
            bail!("block at cursor is an atom ({:?})", block.kind);
        }
        Ok(block)
    }

    fn delete_range(&mut self, range: TextRange) -> Result<()> {
        if range.from > range.to {
            bail!("inverted delete range {}..{}", range.from, range.to);
        }
        if range.is_empty() {
            return Ok(());
        }
        let (Some((first, from)), Some((last, to))) =
            (self.locate(range.from), self.locate(range.to))
        else {
            bail!(
                "delete range {}..{} out of bounds (size {})",
                range.from,
                range.to,
                self.size()
            );
        };
        if self.blocks[first].kind.is_atom() || self.blocks[last].kind.is_atom() {
            bail!(
                "delete range {}..{} starts or ends on an atom",
                range.from,
                range.to
            );
        }

        if first == last {
            let text = &mut self.blocks[first].text;
            let start = char_to_byte(text, from);
            let end = char_to_byte(text, to);
            text.replace_range(start..end, "");
        } else {
            let tail = {
                let last_text = &self.blocks[last].text;
                last_text[char_to_byte(last_text, to)..].to_string()
            };
            let head = &mut self.blocks[first].text;
            head.truncate(char_to_byte(head, from));
            head.push_str(&tail);
            self.blocks.drain(first + 1..=last);
        }

        self.cursor = range.from;
        Ok(())
    }

    /// Insert an atom block at the cursor
    ///
    /// An empty text block is replaced, otherwise the atom goes after
    /// the cursor's block. A trailing empty paragraph keeps the cursor in text.
    fn insert_atom(&mut self, kind: BlockKind) -> Result<()> {
        if !kind.is_atom() {
            bail!("only atom blocks can be inserted, got {:?}", kind);
        }
        let index = self.cursor_block();
        let current = &self.blocks[index];
        let replace = current.kind.is_textblock() && current.text.is_empty();

        let at = if replace {
            self.blocks[index] = Block::atom(kind);
            index
        } else {
            self.blocks.insert(index + 1, Block::atom(kind));
            index + 1
        };

        if at + 1 == self.blocks.len() {
            self.blocks.push(Block::paragraph(""));
        }
        self.cursor = self.block_start(at + 1);
        Ok(())
    }
}

/// Byte index of the `chars`-th char (or the end of `text`)
pub(crate) fn char_to_byte(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
