//! Keyboard-navigable command list: the default suggestion renderer

use crate::input::commands::CommandDescriptor;
use crate::suggestion::renderer::{ListProps, Renderer, RendererFactory};
use crate::view::popup::ContentHandle;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Result of a key press inside the list
#[derive(Debug)]
pub enum ListResponse {
    /// Not handled; the host editor gets the key
    Ignored,
    /// Selection moved
    Moved,
    /// An item was picked and must be invoked
    Picked(CommandDescriptor),
}

/// Selection state over the current props
#[derive(Debug)]
pub struct CommandList {
    props: ListProps,
    selected: usize,
}

impl CommandList {
    pub fn new(props: ListProps) -> Self {
        Self { props, selected: 0 }
    }

    pub fn props(&self) -> &ListProps {
        &self.props
    }

    pub fn items(&self) -> &[CommandDescriptor] {
        &self.props.items
    }

    /// New props always restart the selection at the top
    pub fn set_props(&mut self, props: ListProps) {
        self.props = props;
        self.selected = 0;
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.props.items.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected_item(&self) -> Option<&CommandDescriptor> {
        self.props.items.get(self.selected)
    }

    /// Select next item, wrapping to the start
    pub fn select_next(&mut self) {
        let len = self.props.items.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Select previous item, wrapping to the end
    pub fn select_prev(&mut self) {
        let len = self.props.items.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> ListResponse {
        if event.kind == KeyEventKind::Release || self.props.items.is_empty() {
            return ListResponse::Ignored;
        }
        match event.code {
            KeyCode::Up => {
                self.select_prev();
                ListResponse::Moved
            }
            KeyCode::Down => {
                self.select_next();
                ListResponse::Moved
            }
            KeyCode::Enter => match self.selected_item() {
                Some(item) => ListResponse::Picked(item.clone()),
                None => ListResponse::Ignored,
            },
            _ => ListResponse::Ignored,
        }
    }
}

/// [`Renderer`] wrapper sharing its list with the factory
pub struct CommandListRenderer {
    list: Rc<RefCell<CommandList>>,
    content: ContentHandle,
}

impl Renderer for CommandListRenderer {
    fn update_props(&mut self, props: ListProps) {
        self.list.borrow_mut().set_props(props);
    }

    fn handle_key(&mut self, event: &KeyEvent) -> Option<bool> {
        // The borrow must end before the pick runs: the action may re-enter the host
        let response = self.list.borrow_mut().handle_key(event);
        let consumed = match response {
            ListResponse::Ignored => false,
            ListResponse::Moved => true,
            ListResponse::Picked(item) => {
                let props = self.list.borrow().props().clone();
                props.select(&item);
                true
            }
        };
        Some(consumed)
    }

    fn content(&self) -> ContentHandle {
        self.content
    }

    fn destroy(&mut self) -> anyhow::Result<()> {
        tracing::debug!("Destroying command list {:?}", self.content);
        Ok(())
    }
}

/// Hands out [`CommandListRenderer`]s and keeps the latest list readable for drawing
#[derive(Default)]
pub struct CommandListFactory {
    next_id: Cell<u64>,
    current: RefCell<Option<Rc<RefCell<CommandList>>>>,
}

impl CommandListFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// List of the most recently created renderer
    pub fn current(&self) -> Option<Rc<RefCell<CommandList>>> {
        self.current.borrow().clone()
    }
}

impl RendererFactory for CommandListFactory {
    fn create(&self, props: ListProps) -> Box<dyn Renderer> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let list = Rc::new(RefCell::new(CommandList::new(props)));
        *self.current.borrow_mut() = Some(Rc::clone(&list));
        Box::new(CommandListRenderer {
            list,
            content: ContentHandle(id),
        })
    }
}
