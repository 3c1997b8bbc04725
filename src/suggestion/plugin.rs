//! Glue between the host editor's view updates and popup sessions
//!
//! The host reports the text before the cursor after every view change. The
//! plugin decides whether a session starts, changes, moves or stops and drives
//! a [`PopupLifecycle`] accordingly.

use crate::config::{PopupConfig, SuggestionConfig};
use crate::editor::Editor;
use crate::input::commands::CommandDescriptor;
use crate::input::registry::ItemRegistry;
use crate::input::trigger::{find_match, SuggestionMatch};
use crate::model::document::TextRange;
use crate::suggestion::lifecycle::{LifecycleState, PopupLifecycle, TeardownError};
use crate::suggestion::renderer::{RendererFactory, SelectFn, SuggestionProps};
use crate::view::popup::{AnchorFn, SurfaceFactory};
use crossterm::event::KeyEvent;
use std::cell::RefCell;
use std::rc::Rc;

/// Everything needed to open a new session
#[derive(Clone)]
pub struct SessionFactory {
    pub registry: ItemRegistry,
    pub renderers: Rc<dyn RendererFactory>,
    pub surfaces: Rc<dyn SurfaceFactory>,
    pub popup: PopupConfig,
}

impl SessionFactory {
    pub fn open(&self) -> PopupLifecycle {
        PopupLifecycle::new(
            self.registry.clone(),
            Rc::clone(&self.renderers),
            Rc::clone(&self.surfaces),
            self.popup.clone(),
        )
    }
}

struct ActiveSession {
    matched: SuggestionMatch,
    lifecycle: PopupLifecycle,
}

pub struct SuggestionPlugin<E: Editor + 'static> {
    config: SuggestionConfig,
    sessions: SessionFactory,
    editor: Rc<RefCell<E>>,
    active: Option<ActiveSession>,
}

impl<E: Editor + 'static> SuggestionPlugin<E> {
    pub fn new(
        config: SuggestionConfig,
        registry: ItemRegistry,
        renderers: Rc<dyn RendererFactory>,
        surfaces: Rc<dyn SurfaceFactory>,
        editor: Rc<RefCell<E>>,
    ) -> Self {
        let popup = config.popup.clone();
        Self {
            config,
            sessions: SessionFactory {
                registry,
                renderers,
                surfaces,
                popup,
            },
            editor,
            active: None,
        }
    }

    pub fn editor(&self) -> &Rc<RefCell<E>> {
        &self.editor
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Query of the active session
    pub fn query(&self) -> Option<&str> {
        self.active
            .as_ref()
            .map(|session| session.matched.query.as_str())
    }

    /// Range of the active session
    pub fn range(&self) -> Option<TextRange> {
        self.active.as_ref().map(|session| session.matched.range)
    }

    pub fn lifecycle_state(&self) -> Option<LifecycleState> {
        self.active
            .as_ref()
            .map(|session| session.lifecycle.state())
    }

    /// Re-evaluate the trigger after a view change
    pub fn on_view_update(
        &mut self,
        text_before_cursor: &str,
        block_start: usize,
        anchor: Option<AnchorFn>,
    ) -> Result<(), TeardownError> {
        let Some(matched) = find_match(&self.config, text_before_cursor, block_start) else {
            return self.exit();
        };
        let previous = self.active.as_ref().map(|session| session.matched.clone());

        match previous {
            None => {
                self.start(matched, anchor);
                Ok(())
            }
            Some(previous) if previous.range.from != matched.range.from => {
                // Trigger moved: the old session ends and a new one begins
                let result = self.exit();
                self.start(matched, anchor);
                result
            }
            Some(previous) if previous == matched => Ok(()),
            Some(_) => {
                let props = self.props(&matched, anchor);
                if let Some(session) = self.active.as_mut() {
                    session.matched = matched;
                    session.lifecycle.on_update(props);
                }
                Ok(())
            }
        }
    }

    /// Returns whether the key was consumed by the menu
    pub fn on_key_down(&mut self, event: &KeyEvent) -> bool {
        match self.active.as_mut() {
            Some(session) => session.lifecycle.on_key_down(event),
            None => false,
        }
    }

    /// End the active session, if any
    pub fn exit(&mut self) -> Result<(), TeardownError> {
        match self.active.take() {
            Some(mut session) => session.lifecycle.on_exit(),
            None => Ok(()),
        }
    }

    fn start(&mut self, matched: SuggestionMatch, anchor: Option<AnchorFn>) {
        let props = self.props(&matched, anchor);
        let mut lifecycle = self.sessions.open();
        lifecycle.on_start(props);
        self.active = Some(ActiveSession { matched, lifecycle });
    }

    fn props(&self, matched: &SuggestionMatch, anchor: Option<AnchorFn>) -> SuggestionProps {
        SuggestionProps {
            query: matched.query.clone(),
            range: matched.range,
            anchor,
            command: self.select_fn(),
        }
    }

    fn select_fn(&self) -> SelectFn {
        let editor = Rc::clone(&self.editor);
        Rc::new(move |item: &CommandDescriptor, range: TextRange| {
            let Ok(mut editor) = editor.try_borrow_mut() else {
                tracing::warn!("Editor busy, slash command '{}' dropped", item.name);
                return;
            };
            if let Err(e) = item.run(&mut *editor, range) {
                tracing::error!("Slash command '{}' failed: {:#}", item.name, e);
            }
        })
    }
}
