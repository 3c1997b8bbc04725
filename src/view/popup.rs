//! Floating surface boundary and a terminal-cell implementation
//!
//! The suggestion menu never positions anything itself. It asks a
//! [`SurfaceFactory`] for a surface anchored to a rectangle callback and only
//! ever repositions, hides or destroys it afterwards.

use crate::config::{Placement, PopupConfig};
use ratatui::layout::Rect;
use std::cell::RefCell;
use std::rc::Rc;

/// Produces the current screen rectangle of the anchor (usually the trigger text)
///
/// Returns `None` when the anchor is not on screen; callers keep the old position.
pub type AnchorFn = Rc<dyn Fn() -> Option<Rect>>;

/// Opaque handle to the content a renderer displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHandle(pub u64);

/// A positioned popup owned by one session
pub trait FloatingSurface {
    /// Re-anchor the surface
    fn reposition(&mut self, anchor: AnchorFn);

    fn hide(&mut self);

    fn destroy(&mut self) -> anyhow::Result<()>;
}

pub trait SurfaceFactory {
    fn create(
        &self,
        anchor: AnchorFn,
        content: ContentHandle,
        options: &PopupConfig,
    ) -> Box<dyn FloatingSurface>;
}

/// Place a popup of `width` x `height` cells next to `anchor` inside `viewport`
///
/// Uses the preferred side when it has room, otherwise the side with more room.
/// The result is clamped to the viewport.
pub fn place(anchor: Rect, width: u16, height: u16, viewport: Rect, placement: Placement) -> Rect {
    let width = width.min(viewport.width);
    let height = height.min(viewport.height);

    let below_y = anchor.bottom().max(viewport.y);
    let room_below = viewport.bottom().saturating_sub(below_y);
    let room_above = anchor.y.saturating_sub(viewport.y);

    let on_top = if placement.prefers_top() {
        room_above >= height || room_above > room_below
    } else {
        room_below < height && room_above > room_below
    };

    let y = if on_top {
        anchor.y.saturating_sub(height).max(viewport.y)
    } else {
        below_y.min(viewport.bottom().saturating_sub(height))
    };

    let x = if placement.aligns_start() {
        anchor.x
    } else {
        anchor.right().saturating_sub(width)
    };
    let x = x
        .min(viewport.right().saturating_sub(width))
        .max(viewport.x);

    Rect::new(x, y, width, height)
}

/// Observable state of a terminal popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceState {
    pub content: ContentHandle,
    /// Last computed area; `None` until the anchor produced a rectangle
    pub area: Option<Rect>,
    pub visible: bool,
    pub interactive: bool,
    pub destroyed: bool,
}

/// Popup placed in terminal cells within a fixed viewport
pub struct TerminalSurface {
    state: Rc<RefCell<SurfaceState>>,
    viewport: Rect,
    placement: Placement,
    width: u16,
    height: u16,
}

impl TerminalSurface {
    fn place_at(&self, anchor: &AnchorFn) {
        match anchor() {
            Some(rect) => {
                let area = place(rect, self.width, self.height, self.viewport, self.placement);
                self.state.borrow_mut().area = Some(area);
            }
            None => {
                tracing::trace!("popup anchor unavailable, keeping previous position");
            }
        }
    }
}

impl FloatingSurface for TerminalSurface {
    fn reposition(&mut self, anchor: AnchorFn) {
        self.place_at(&anchor);
    }

    fn hide(&mut self) {
        self.state.borrow_mut().visible = false;
    }

    fn destroy(&mut self) -> anyhow::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            anyhow::bail!("popup for content {:?} already destroyed", state.content);
        }
        state.destroyed = true;
        state.visible = false;
        Ok(())
    }
}

/// Creates [`TerminalSurface`]s and lets the host read back what to draw
pub struct TerminalSurfaceFactory {
    viewport: Rect,
    surfaces: RefCell<Vec<Rc<RefCell<SurfaceState>>>>,
}

impl TerminalSurfaceFactory {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            surfaces: RefCell::new(Vec::new()),
        }
    }

    /// Surfaces that are shown and have a position, oldest first
    pub fn visible(&self) -> Vec<(ContentHandle, Rect)> {
        self.prune();
        self.surfaces
            .borrow()
            .iter()
            .filter_map(|state| {
                let state = state.borrow();
                match (state.visible, state.area) {
                    (true, Some(area)) => Some((state.content, area)),
                    _ => None,
                }
            })
            .collect()
    }

    /// State of every live (not destroyed) surface
    pub fn live(&self) -> Vec<SurfaceState> {
        self.prune();
        self.surfaces
            .borrow()
            .iter()
            .map(|state| state.borrow().clone())
            .collect()
    }

    /// Number of tracked surfaces, destroyed ones not yet dropped included
    pub fn tracked(&self) -> usize {
        self.surfaces.borrow().len()
    }

    fn prune(&self) {
        self.surfaces
            .borrow_mut()
            .retain(|state| !state.borrow().destroyed);
    }
}

impl SurfaceFactory for TerminalSurfaceFactory {
    fn create(
        &self,
        anchor: AnchorFn,
        content: ContentHandle,
        options: &PopupConfig,
    ) -> Box<dyn FloatingSurface> {
        let state = Rc::new(RefCell::new(SurfaceState {
            content,
            area: None,
            visible: options.show_on_create,
            interactive: options.interactive,
            destroyed: false,
        }));
        self.prune();
        self.surfaces.borrow_mut().push(Rc::clone(&state));

        let surface = TerminalSurface {
            state,
            viewport: self.viewport,
            placement: options.placement,
            width: options.width,
            height: options.max_height,
        };
        surface.place_at(&anchor);
        tracing::debug!("Created popup surface for content {:?}", content);
        Box::new(surface)
    }
}
