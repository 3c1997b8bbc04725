// SlashTestHarness - drives a suggestion plugin against an in-memory document

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use slash_menu::model::document::Document;
use slash_menu::view::command_list::CommandListFactory;
use slash_menu::view::popup::{AnchorFn, TerminalSurfaceFactory};
use slash_menu::{DocumentEditor, ItemRegistry, SuggestionConfig, SuggestionPlugin};
use std::cell::RefCell;
use std::rc::Rc;

pub struct SlashTestHarness {
    pub plugin: SuggestionPlugin<DocumentEditor>,
    pub renderers: Rc<CommandListFactory>,
    pub surfaces: Rc<TerminalSurfaceFactory>,
}

impl SlashTestHarness {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_document(width, height, Document::default())
    }

    pub fn with_document(width: u16, height: u16, document: Document) -> Self {
        Self::with_config(width, height, document, SuggestionConfig::default())
    }

    pub fn with_config(
        width: u16,
        height: u16,
        document: Document,
        config: SuggestionConfig,
    ) -> Self {
        let renderers = Rc::new(CommandListFactory::new());
        let surfaces = Rc::new(TerminalSurfaceFactory::new(Rect::new(0, 0, width, height)));
        let editor = Rc::new(RefCell::new(DocumentEditor::new(document)));
        let plugin = SuggestionPlugin::new(
            config,
            ItemRegistry::default(),
            renderers.clone(),
            surfaces.clone(),
            editor,
        );
        Self {
            plugin,
            renderers,
            surfaces,
        }
    }

    pub fn editor(&self) -> std::cell::Ref<'_, DocumentEditor> {
        self.plugin.editor().borrow()
    }

    pub fn set_cursor(&mut self, position: usize) {
        self.plugin
            .editor()
            .borrow_mut()
            .set_cursor(position)
            .unwrap();
        self.sync();
    }

    /// Type text and report the resulting view update
    pub fn type_text(&mut self, text: &str) {
        self.plugin.editor().borrow_mut().type_text(text).unwrap();
        self.sync();
    }

    /// Send a key to the menu; unconsumed keys are not applied to the document
    pub fn send_key(&mut self, code: KeyCode) -> bool {
        let consumed = self
            .plugin
            .on_key_down(&KeyEvent::new(code, KeyModifiers::NONE));
        self.sync();
        consumed
    }

    pub fn undo(&mut self) {
        self.plugin.editor().borrow_mut().undo();
        self.sync();
    }

    /// Report the current cursor context to the plugin
    pub fn sync(&mut self) {
        let (before, block_start, anchor) = {
            let editor = self.editor();
            let document = editor.document();
            let block = document.cursor_block();
            let before = document.text_before_cursor().to_string();
            // One terminal row per block, one column per char
            let column = before.chars().count() as u16;
            let row = block as u16;
            let anchor: AnchorFn = Rc::new(move || Some(Rect::new(column, row, 1, 1)));
            (before, document.block_start(block), anchor)
        };
        self.plugin
            .on_view_update(&before, block_start, Some(anchor))
            .unwrap();
    }

    /// Names of the items the live menu currently shows
    pub fn menu_items(&self) -> Vec<String> {
        if !self.plugin.is_active() {
            return Vec::new();
        }
        self.renderers
            .current()
            .map(|list| {
                let list = list.borrow();
                list.items().iter().map(|item| item.name.clone()).collect()
            })
            .unwrap_or_default()
    }

    /// Area of the popup the host would draw, if any
    pub fn popup_area(&self) -> Option<Rect> {
        self.surfaces.visible().last().map(|(_, area)| *area)
    }

    pub fn assert_menu_contains(&self, name: &str) {
        let items = self.menu_items();
        assert!(
            items.iter().any(|item| item == name),
            "Expected menu to contain '{}'\nMenu: {:?}",
            name,
            items
        );
    }

    pub fn assert_menu_not_contains(&self, name: &str) {
        let items = self.menu_items();
        assert!(
            !items.iter().any(|item| item == name),
            "Expected menu not to contain '{}'\nMenu: {:?}",
            name,
            items
        );
    }
}
