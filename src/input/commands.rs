//! Slash-command descriptors and the built-in command set

use crate::editor::Editor;
use crate::model::document::TextRange;
use crate::model::nodes::{EmbedNode, ImageEditorAttrs};
use anyhow::Result;

/// Mutates the document through the editor, replacing `range`
pub type CommandAction = fn(&mut dyn Editor, TextRange) -> Result<()>;

/// A command that can be picked from the suggestion menu
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    /// Display and match key (e.g., "Heading 1")
    pub name: String,
    /// Command description
    pub description: String,
    /// Opaque icon identifier (e.g., "mdi:format-header-1")
    pub icon: String,
    /// Edit applied when the command is picked
    pub action: CommandAction,
}

impl CommandDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        action: CommandAction,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
            action,
        }
    }

    /// Case-insensitive prefix match on the name
    pub fn matches(&self, query: &str) -> bool {
        self.name
            .to_lowercase()
            .starts_with(&query.to_lowercase())
    }

    /// Run the action against `range`
    pub fn run(&self, editor: &mut dyn Editor, range: TextRange) -> Result<()> {
        tracing::debug!(
            "Running slash command '{}' over {}..{}",
            self.name,
            range.from,
            range.to
        );
        (self.action)(editor, range)
    }
}

fn set_text(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor.chain().focus().delete_range(range).set_paragraph().run()
}

fn set_heading_1(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor.chain().focus().delete_range(range).set_heading(1).run()
}

fn set_heading_2(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor.chain().focus().delete_range(range).set_heading(2).run()
}

fn set_heading_3(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor.chain().focus().delete_range(range).set_heading(3).run()
}

fn toggle_bullet_list(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor
        .chain()
        .focus()
        .delete_range(range)
        .toggle_bullet_list()
        .run()
}

fn toggle_ordered_list(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor
        .chain()
        .focus()
        .delete_range(range)
        .toggle_ordered_list()
        .run()
}

fn toggle_blockquote(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor
        .chain()
        .focus()
        .delete_range(range)
        .toggle_blockquote()
        .run()
}

fn set_code_block(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor
        .chain()
        .focus()
        .delete_range(range)
        .set_code_block()
        .run()
}

fn insert_image_editor(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor
        .chain()
        .focus()
        .delete_range(range)
        .insert_node(EmbedNode::ImageEditor(ImageEditorAttrs::default()))
        .run()
}

fn set_horizontal_rule(editor: &mut dyn Editor, range: TextRange) -> Result<()> {
    editor
        .chain()
        .focus()
        .delete_range(range)
        .set_horizontal_rule()
        .run()
}

/// Built-in slash commands, in menu order
pub fn slash_commands() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new(
            "Text",
            "Just start writing with plain text.",
            "mdi:text",
            set_text,
        ),
        CommandDescriptor::new(
            "Heading 1",
            "Big section heading.",
            "mdi:format-header-1",
            set_heading_1,
        ),
        CommandDescriptor::new(
            "Heading 2",
            "Medium section heading.",
            "mdi:format-header-2",
            set_heading_2,
        ),
        CommandDescriptor::new(
            "Heading 3",
            "Small section heading.",
            "mdi:format-header-3",
            set_heading_3,
        ),
        CommandDescriptor::new(
            "Bullet List",
            "Create a simple bullet list.",
            "mdi:format-list-bulleted",
            toggle_bullet_list,
        ),
        CommandDescriptor::new(
            "Numbered List",
            "Create a list with numbering.",
            "mdi:format-list-numbered",
            toggle_ordered_list,
        ),
        CommandDescriptor::new(
            "Quote",
            "Capture a quote.",
            "mdi:format-quote-close",
            toggle_blockquote,
        ),
        CommandDescriptor::new(
            "Code Block",
            "Add a code block with syntax highlighting",
            "mdi:code-tags",
            set_code_block,
        ),
        CommandDescriptor::new("Image", "Edit an image", "mdi:image", insert_image_editor),
        CommandDescriptor::new(
            "Divider",
            "Insert a horizontal divider.",
            "mdi:minus",
            set_horizontal_rule,
        ),
    ]
}
