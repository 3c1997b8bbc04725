//! Popup lifecycle of one suggestion session
//!
//! `Idle -> Open -> Closed`, driven entirely by the host:
//!
//! - `on_start` creates the renderer and, when an anchor is available, the surface
//! - `on_update` refilters and repositions
//! - `on_key_down` hides on Escape, otherwise defers to the renderer
//! - `on_exit` destroys both resources
//!
//! Events arriving in the wrong state are host bugs. They panic in debug builds
//! and are logged and ignored in release builds.

use crate::config::PopupConfig;
use crate::input::registry::ItemRegistry;
use crate::suggestion::renderer::{ListProps, Renderer, RendererFactory, SuggestionProps};
use crate::view::popup::{FloatingSurface, SurfaceFactory};
use crossterm::event::{KeyCode, KeyEvent};
use std::fmt;
use std::rc::Rc;

/// Externally visible lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Open,
    Closed,
}

/// Resources owned while open
struct OpenSession {
    renderer: Box<dyn Renderer>,
    /// Absent when the session started without an anchor
    surface: Option<Box<dyn FloatingSurface>>,
}

enum Phase {
    Idle,
    Open(OpenSession),
    Closed,
}

impl Phase {
    fn state(&self) -> LifecycleState {
        match self {
            Phase::Idle => LifecycleState::Idle,
            Phase::Open(_) => LifecycleState::Open,
            Phase::Closed => LifecycleState::Closed,
        }
    }
}

/// Teardown failed for one or both resources; both were attempted
#[derive(Debug)]
pub struct TeardownError {
    pub surface: Option<anyhow::Error>,
    pub renderer: Option<anyhow::Error>,
}

impl fmt::Display for TeardownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "suggestion popup teardown failed")?;
        if let Some(e) = &self.surface {
            write!(f, "; surface: {e}")?;
        }
        if let Some(e) = &self.renderer {
            write!(f, "; renderer: {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for TeardownError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.surface
            .as_ref()
            .or(self.renderer.as_ref())
            .map(|e| &**e as &(dyn std::error::Error + 'static))
    }
}

pub struct PopupLifecycle {
    registry: ItemRegistry,
    renderers: Rc<dyn RendererFactory>,
    surfaces: Rc<dyn SurfaceFactory>,
    options: PopupConfig,
    phase: Phase,
}

impl PopupLifecycle {
    pub fn new(
        registry: ItemRegistry,
        renderers: Rc<dyn RendererFactory>,
        surfaces: Rc<dyn SurfaceFactory>,
        options: PopupConfig,
    ) -> Self {
        Self {
            registry,
            renderers,
            surfaces,
            options,
            phase: Phase::Idle,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.phase.state()
    }

    /// Whether a positioned surface exists for this session
    pub fn has_surface(&self) -> bool {
        matches!(&self.phase, Phase::Open(session) if session.surface.is_some())
    }

    fn list_props(&self, props: &SuggestionProps) -> ListProps {
        ListProps {
            query: props.query.clone(),
            range: props.range,
            items: self.registry.filter(&props.query),
            command: Rc::clone(&props.command),
        }
    }

    pub fn on_start(&mut self, props: SuggestionProps) {
        if !matches!(self.phase, Phase::Idle) {
            self.precondition_failed("on_start");
            return;
        }

        let list = self.list_props(&props);
        tracing::debug!(
            "Suggestion session started: query={:?}, {} items",
            list.query,
            list.items.len()
        );
        let renderer = self.renderers.create(list);

        let surface = match props.anchor {
            Some(anchor) => Some(
                self.surfaces
                    .create(anchor, renderer.content(), &self.options),
            ),
            None => {
                tracing::debug!("No anchor rect, suggestion popup not created");
                None
            }
        };

        self.phase = Phase::Open(OpenSession { renderer, surface });
    }

    pub fn on_update(&mut self, props: SuggestionProps) {
        if !matches!(self.phase, Phase::Open(_)) {
            self.precondition_failed("on_update");
            return;
        }
        let list = self.list_props(&props);
        let Phase::Open(session) = &mut self.phase else {
            return;
        };

        tracing::trace!(
            "Suggestion update: query={:?}, {} items",
            list.query,
            list.items.len()
        );
        session.renderer.update_props(list);

        match (props.anchor, session.surface.as_mut()) {
            (Some(anchor), Some(surface)) => surface.reposition(anchor),
            (Some(_), None) => {
                tracing::trace!("Session has no popup surface, anchor ignored");
            }
            (None, _) => {}
        }
    }

    /// Returns whether the key was consumed
    pub fn on_key_down(&mut self, event: &KeyEvent) -> bool {
        let Phase::Open(session) = &mut self.phase else {
            self.precondition_failed("on_key_down");
            return false;
        };

        if event.code == KeyCode::Esc {
            if let Some(surface) = session.surface.as_mut() {
                surface.hide();
            }
            return true;
        }

        session.renderer.handle_key(event).unwrap_or(false)
    }

    /// Destroy surface and renderer; both are attempted even if one fails
    pub fn on_exit(&mut self) -> Result<(), TeardownError> {
        let session = match std::mem::replace(&mut self.phase, Phase::Closed) {
            Phase::Open(session) => session,
            other => {
                self.phase = other;
                self.precondition_failed("on_exit");
                return Ok(());
            }
        };
        let OpenSession {
            mut renderer,
            surface,
        } = session;

        let surface_error = surface.and_then(|mut surface| surface.destroy().err());
        let renderer_error = renderer.destroy().err();
        tracing::debug!("Suggestion session closed");

        if surface_error.is_none() && renderer_error.is_none() {
            return Ok(());
        }
        let error = TeardownError {
            surface: surface_error,
            renderer: renderer_error,
        };
        tracing::warn!("{}", error);
        Err(error)
    }

    fn precondition_failed(&self, event: &str) {
        tracing::warn!(
            "Suggestion lifecycle: {} called in {:?} state, ignoring",
            event,
            self.state()
        );
        if cfg!(debug_assertions) {
            panic!("{} called in {:?} state", event, self.state());
        }
    }
}

impl fmt::Debug for PopupLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupLifecycle")
            .field("state", &self.state())
            .field("has_surface", &self.has_surface())
            .finish_non_exhaustive()
    }
}

impl Drop for PopupLifecycle {
    fn drop(&mut self) {
        if matches!(self.phase, Phase::Open(_)) && !std::thread::panicking() {
            tracing::warn!("Suggestion session dropped while open, releasing popup");
            let _ = self.on_exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::TextRange;
    use crate::suggestion::renderer::SelectFn;
    use crate::view::command_list::CommandListFactory;
    use crate::view::popup::{AnchorFn, TerminalSurfaceFactory};
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn noop_select() -> SelectFn {
        Rc::new(|_: &crate::input::commands::CommandDescriptor, _: TextRange| {})
    }

    fn props(query: &str, anchor: Option<AnchorFn>) -> SuggestionProps {
        SuggestionProps {
            query: query.to_string(),
            range: TextRange::new(0, query.len() + 1),
            anchor,
            command: noop_select(),
        }
    }

    fn anchor_at(x: u16, y: u16) -> Option<AnchorFn> {
        Some(Rc::new(move || Some(Rect::new(x, y, 1, 1))))
    }

    fn lifecycle() -> (PopupLifecycle, Rc<CommandListFactory>, Rc<TerminalSurfaceFactory>) {
        let renderers = Rc::new(CommandListFactory::new());
        let surfaces = Rc::new(TerminalSurfaceFactory::new(Rect::new(0, 0, 80, 24)));
        let lifecycle = PopupLifecycle::new(
            ItemRegistry::default(),
            renderers.clone(),
            surfaces.clone(),
            PopupConfig::default(),
        );
        (lifecycle, renderers, surfaces)
    }

    #[test]
    fn test_start_update_exit() {
        let (mut lifecycle, renderers, surfaces) = lifecycle();
        assert_eq!(lifecycle.state(), LifecycleState::Idle);

        lifecycle.on_start(props("", anchor_at(1, 1)));
        assert_eq!(lifecycle.state(), LifecycleState::Open);
        assert!(lifecycle.has_surface());
        assert_eq!(renderers.current().unwrap().borrow().items().len(), 10);

        lifecycle.on_update(props("head", anchor_at(3, 1)));
        assert_eq!(renderers.current().unwrap().borrow().items().len(), 3);
        assert_eq!(surfaces.visible()[0].1.x, 3);

        lifecycle.on_exit().unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::Closed);
        assert!(surfaces.live().is_empty());
    }

    #[test]
    fn test_escape_hides_without_closing() {
        let (mut lifecycle, _, surfaces) = lifecycle();
        lifecycle.on_start(props("", anchor_at(1, 1)));

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(lifecycle.on_key_down(&esc));
        assert_eq!(lifecycle.state(), LifecycleState::Open);
        assert!(surfaces.visible().is_empty());
        assert_eq!(surfaces.live().len(), 1);

        lifecycle.on_exit().unwrap();
    }

    #[test]
    fn test_start_then_exit_without_updates() {
        let (mut lifecycle, _, surfaces) = lifecycle();
        lifecycle.on_start(props("", anchor_at(1, 1)));
        assert!(lifecycle.on_exit().is_ok());
        assert!(surfaces.live().is_empty());
    }

    #[test]
    fn test_drop_while_open_releases_surface() {
        let (mut lifecycle, _, surfaces) = lifecycle();
        lifecycle.on_start(props("", anchor_at(1, 1)));
        drop(lifecycle);
        assert!(surfaces.live().is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "on_exit called in Closed state")]
    fn test_double_exit_is_a_precondition_failure() {
        let (mut lifecycle, _, _) = lifecycle();
        lifecycle.on_start(props("", None));
        lifecycle.on_exit().unwrap();
        let _ = lifecycle.on_exit();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "on_update called in Idle state")]
    fn test_update_before_start_is_a_precondition_failure() {
        let (mut lifecycle, _, _) = lifecycle();
        lifecycle.on_update(props("x", None));
    }

    #[test]
    fn test_teardown_error_display() {
        let error = TeardownError {
            surface: Some(anyhow::anyhow!("gone")),
            renderer: None,
        };
        assert_eq!(
            error.to_string(),
            "suggestion popup teardown failed; surface: gone"
        );
        assert!(std::error::Error::source(&error).is_some());
    }
}
