//! Root Controller - owns the viewport-sized root node and drives layout.
//!
//! The root is the only participant that solves layout. It reacts to the
//! coalesced channels:
//!
//! - `optimizedResize`: copy the viewport into the root node, raise dirty
//! - `optimizedDirtyLayout`: solve the whole tree, raise update
//! - `optimizedUpdateLayout`: record its own rectangle
//!
//! Every solve is followed by exactly one update, so boxes never read a
//! stale rectangle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::Signal;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::layout::LayoutNode;
use crate::primitives::{BoxContext, BoxController, BoxProps, Phase};
use crate::signals::{
    ListenerId, SignalBus, DIRTY_LAYOUT, OPTIMIZED_DIRTY_LAYOUT, OPTIMIZED_RESIZE,
    OPTIMIZED_UPDATE_LAYOUT, UPDATE_LAYOUT,
};
use crate::types::{ComputedRect, Dimension, Viewport};

struct RootState {
    node: LayoutNode,
    rect: ComputedRect,
    phase: Phase,
    passes: u64,
}

/// Handlers return the raw signal to raise next, if any. It is published
/// only after the state borrow is released.
type Raise = Option<&'static str>;

impl RootState {
    #[instrument(level = "debug", skip_all, fields(width = viewport.width, height = viewport.height))]
    fn handle_resize(&mut self, viewport: Viewport) -> Result<Raise> {
        if self.phase != Phase::Mounted {
            return Ok(None);
        }
        self.node.set_width(Dimension::Points(viewport.width))?;
        self.node.set_height(Dimension::Points(viewport.height))?;
        Ok(Some(DIRTY_LAYOUT))
    }

    #[instrument(level = "debug", skip_all)]
    fn handle_dirty(&mut self) -> Result<Raise> {
        if self.phase != Phase::Mounted {
            return Ok(None);
        }
        self.node.calculate_layout()?;
        self.passes += 1;
        debug!(pass = self.passes, "layout solved");
        Ok(Some(UPDATE_LAYOUT))
    }

    fn handle_update(&mut self) -> Result<Raise> {
        if self.phase != Phase::Mounted {
            return Ok(None);
        }
        self.rect = self.node.computed_layout()?;
        Ok(None)
    }
}

fn with_state(
    state: &Weak<RefCell<RootState>>,
    bus: &SignalBus,
    f: impl FnOnce(&mut RootState) -> Result<Raise>,
) -> Result<()> {
    let Some(state) = state.upgrade() else {
        return Ok(());
    };
    let raise = f(&mut state.borrow_mut())?;
    if let Some(name) = raise {
        bus.publish(name);
    }
    Ok(())
}

/// Coordinator at the top of the box tree.
pub struct RootController {
    state: Rc<RefCell<RootState>>,
    content: BoxController,
    bus: Rc<SignalBus>,
    viewport: Signal<Viewport>,
    listeners: Vec<ListenerId>,
}

impl RootController {
    /// Build the root node (flex-grow 1) with a single content box below it.
    pub fn new(viewport: Signal<Viewport>, content: BoxProps, ctx: &BoxContext) -> Result<Self> {
        let mut node = ctx.engine.create_node()?;
        node.set_flex_grow(1.0)?;

        let content_node = ctx.engine.create_node()?;
        node.insert_child(&content_node)?;
        let content = BoxController::new(content_node, content, ctx)?;

        Ok(Self {
            state: Rc::new(RefCell::new(RootState {
                node,
                rect: ComputedRect::ZERO,
                phase: Phase::Constructing,
                passes: 0,
            })),
            content,
            bus: ctx.bus.clone(),
            viewport,
            listeners: Vec::new(),
        })
    }

    /// Subscribe to the coalesced channels, mount the content and size the
    /// root to the current viewport.
    pub fn mount(&mut self) -> Result<()> {
        if self.phase() != Phase::Constructing {
            return Ok(());
        }

        let weak = Rc::downgrade(&self.state);
        self.listeners.push(self.bus.subscribe(OPTIMIZED_DIRTY_LAYOUT, move |bus| {
            with_state(&weak, bus, RootState::handle_dirty)
        }));

        let weak = Rc::downgrade(&self.state);
        let viewport = self.viewport.clone();
        self.listeners.push(self.bus.subscribe(OPTIMIZED_RESIZE, move |bus| {
            with_state(&weak, bus, |state| state.handle_resize(viewport.get()))
        }));

        let weak = Rc::downgrade(&self.state);
        self.listeners.push(self.bus.subscribe(OPTIMIZED_UPDATE_LAYOUT, move |bus| {
            with_state(&weak, bus, RootState::handle_update)
        }));

        self.state.borrow_mut().phase = Phase::Mounted;
        self.content.mount()?;

        // synchronous: the first solve must not wait on a resize event
        let viewport = self.viewport.get();
        with_state(&Rc::downgrade(&self.state), &self.bus, |state| {
            state.handle_resize(viewport)
        })
    }

    /// Unsubscribe, unmount the content, then release the root node.
    pub fn unmount(&mut self) -> Result<()> {
        if self.phase() == Phase::Unmounted {
            return Ok(());
        }
        for id in self.listeners.drain(..) {
            self.bus.unsubscribe(id);
        }
        self.content.unmount()?;

        let mut state = self.state.borrow_mut();
        state.phase = Phase::Unmounted;
        state.node.remove()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn content(&self) -> &BoxController {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut BoxController {
        &mut self.content
    }

    /// Root rectangle as of the last update.
    pub fn rect(&self) -> ComputedRect {
        self.state.borrow().rect
    }

    /// Layout passes run by this root.
    pub fn passes(&self) -> u64 {
        self.state.borrow().passes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }
}

impl std::fmt::Debug for RootController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("RootController")
            .field("phase", &state.phase)
            .field("rect", &state.rect)
            .field("passes", &state.passes)
            .field("content", &self.content)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
