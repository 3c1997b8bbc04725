// Shared test doubles for the suggestion boundaries

#![allow(dead_code)]

pub mod harness;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use slash_menu::config::PopupConfig;
use slash_menu::suggestion::renderer::{ListProps, Renderer, RendererFactory, SuggestionProps};
use slash_menu::view::popup::{AnchorFn, ContentHandle, FloatingSurface, SurfaceFactory};
use slash_menu::{CommandDescriptor, TextRange};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Everything the fakes observed, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RendererCreated { query: String, items: Vec<String> },
    RendererUpdated { query: String, items: Vec<String> },
    RendererKey,
    RendererDestroyed,
    SurfaceCreated { content: ContentHandle, anchor: Option<Rect> },
    SurfaceRepositioned { anchor: Option<Rect> },
    SurfaceHidden,
    SurfaceDestroyed,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

fn names(props: &ListProps) -> Vec<String> {
    props.items.iter().map(|item| item.name.clone()).collect()
}

/// Renderer that records calls; key handling is configurable
pub struct RecordingRenderer {
    log: CallLog,
    content: ContentHandle,
    key_response: Option<bool>,
    fail_destroy: bool,
}

impl Renderer for RecordingRenderer {
    fn update_props(&mut self, props: ListProps) {
        self.log.borrow_mut().push(Call::RendererUpdated {
            query: props.query.clone(),
            items: names(&props),
        });
    }

    fn handle_key(&mut self, _event: &KeyEvent) -> Option<bool> {
        self.log.borrow_mut().push(Call::RendererKey);
        self.key_response
    }

    fn content(&self) -> ContentHandle {
        self.content
    }

    fn destroy(&mut self) -> anyhow::Result<()> {
        self.log.borrow_mut().push(Call::RendererDestroyed);
        if self.fail_destroy {
            anyhow::bail!("renderer teardown failed");
        }
        Ok(())
    }
}

/// Renderer without a key handler
pub struct PassiveRenderer {
    content: ContentHandle,
}

impl Renderer for PassiveRenderer {
    fn update_props(&mut self, _props: ListProps) {}

    fn content(&self) -> ContentHandle {
        self.content
    }

    fn destroy(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRendererFactory {
    pub log: CallLog,
    pub key_response: Option<bool>,
    pub fail_destroy: bool,
    pub passive: bool,
    pub next_id: Cell<u64>,
}

impl RecordingRendererFactory {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            key_response: Some(false),
            ..Self::default()
        }
    }
}

impl RendererFactory for RecordingRendererFactory {
    fn create(&self, props: ListProps) -> Box<dyn Renderer> {
        let content = ContentHandle(self.next_id.get());
        self.next_id.set(content.0 + 1);
        if self.passive {
            return Box::new(PassiveRenderer { content });
        }
        self.log.borrow_mut().push(Call::RendererCreated {
            query: props.query.clone(),
            items: names(&props),
        });
        Box::new(RecordingRenderer {
            log: Rc::clone(&self.log),
            content,
            key_response: self.key_response,
            fail_destroy: self.fail_destroy,
        })
    }
}

pub struct RecordingSurface {
    log: CallLog,
    fail_destroy: bool,
}

impl FloatingSurface for RecordingSurface {
    fn reposition(&mut self, anchor: AnchorFn) {
        self.log
            .borrow_mut()
            .push(Call::SurfaceRepositioned { anchor: anchor() });
    }

    fn hide(&mut self) {
        self.log.borrow_mut().push(Call::SurfaceHidden);
    }

    fn destroy(&mut self) -> anyhow::Result<()> {
        self.log.borrow_mut().push(Call::SurfaceDestroyed);
        if self.fail_destroy {
            anyhow::bail!("surface teardown failed");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSurfaceFactory {
    pub log: CallLog,
    pub fail_destroy: bool,
}

impl RecordingSurfaceFactory {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail_destroy: false,
        }
    }
}

impl SurfaceFactory for RecordingSurfaceFactory {
    fn create(
        &self,
        anchor: AnchorFn,
        content: ContentHandle,
        _options: &PopupConfig,
    ) -> Box<dyn FloatingSurface> {
        self.log.borrow_mut().push(Call::SurfaceCreated {
            content,
            anchor: anchor(),
        });
        Box::new(RecordingSurface {
            log: Rc::clone(&self.log),
            fail_destroy: self.fail_destroy,
        })
    }
}

/// Anchor callback returning a fixed rectangle
pub fn anchor_at(x: u16, y: u16) -> Option<AnchorFn> {
    Some(Rc::new(move || Some(Rect::new(x, y, 1, 1))))
}

/// Props with a select callback that records picked item names
pub fn props(query: &str, anchor: Option<AnchorFn>, picked: &Rc<RefCell<Vec<String>>>) -> SuggestionProps {
    let picked = Rc::clone(picked);
    SuggestionProps {
        query: query.to_string(),
        range: TextRange::new(0, query.chars().count() + 1),
        anchor,
        command: Rc::new(move |item: &CommandDescriptor, _range: TextRange| {
            picked.borrow_mut().push(item.name.clone())
        }),
    }
}
