//! Renderer boundary: the UI component that shows the filtered items

use crate::input::commands::CommandDescriptor;
use crate::model::document::TextRange;
use crate::view::popup::{AnchorFn, ContentHandle};
use crossterm::event::KeyEvent;
use std::fmt;
use std::rc::Rc;

/// Invoked by a renderer when the user picks an item
///
/// The host supplies it; it usually runs the item's action against its editor.
pub type SelectFn = Rc<dyn Fn(&CommandDescriptor, TextRange)>;

/// What the host passes for each session event
#[derive(Clone)]
pub struct SuggestionProps {
    pub query: String,
    pub range: TextRange,
    /// Current anchor rectangle; `None` means positioning is unavailable
    pub anchor: Option<AnchorFn>,
    pub command: SelectFn,
}

impl fmt::Debug for SuggestionProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionProps")
            .field("query", &self.query)
            .field("range", &self.range)
            .field("anchor", &self.anchor.is_some())
            .finish_non_exhaustive()
    }
}

/// What a renderer is given: the host props with the filtered items
#[derive(Clone)]
pub struct ListProps {
    pub query: String,
    pub range: TextRange,
    pub items: Vec<CommandDescriptor>,
    pub command: SelectFn,
}

impl ListProps {
    /// Pick `item`, replacing this session's range
    pub fn select(&self, item: &CommandDescriptor) {
        (self.command)(item, self.range);
    }
}

impl fmt::Debug for ListProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.items.iter().map(|item| item.name.as_str()).collect();
        f.debug_struct("ListProps")
            .field("query", &self.query)
            .field("range", &self.range)
            .field("items", &names)
            .finish_non_exhaustive()
    }
}

/// A live menu component owned by one session
pub trait Renderer {
    /// Replace all props at once
    fn update_props(&mut self, props: ListProps);

    /// Forward a raw key event for in-list navigation
    ///
    /// `None` means the component has no key handler; the event is then
    /// treated as not consumed.
    fn handle_key(&mut self, _event: &KeyEvent) -> Option<bool> {
        None
    }

    /// Handle the floating surface displays
    fn content(&self) -> ContentHandle;

    /// Release the component
    fn destroy(&mut self) -> anyhow::Result<()>;
}

/// Creates one renderer per session
pub trait RendererFactory {
    fn create(&self, props: ListProps) -> Box<dyn Renderer>;
}
