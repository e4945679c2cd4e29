//! Box Primitive - layout-driven container that animates to its new position.
//!
//! A box owns one [`LayoutNode`], writes its style constraints into it and
//! listens for the coalesced layout-updated signal. On each update it reads
//! its computed rectangle back, applies size changes at once and hands any
//! position change to the animator as one bundled call.
//!
//! # Lifecycle
//!
//! ```text
//! Constructing ──mount()──► Mounted ──set_style()──► Mounted
//!                              │
//!                              └──unmount()──► Unmounted
//! ```
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use spark_motion::layout::LayoutEngine;
//! use spark_motion::primitives::{BoxContext, BoxController, BoxProps, Style};
//! use spark_motion::signals::SignalBus;
//! use spark_motion::state::Tweener;
//!
//! let bus = Rc::new(SignalBus::with_layout_channels());
//! let ctx = BoxContext::new(bus, LayoutEngine::new(), Rc::new(Tweener::default()));
//!
//! let node = ctx.engine.create_node().unwrap();
//! let props = BoxProps::new(Style::new().width(100.0).height(100.0));
//! let mut controller = BoxController::new(node, props, &ctx).unwrap();
//!
//! controller.mount().unwrap();
//! controller.unmount().unwrap();
//! ```

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::layout::{LayoutNode, NodeId};
use crate::signals::{ListenerId, OPTIMIZED_UPDATE_LAYOUT};
use crate::state::{PositionAnimator, PropertyDeltas, Surface};
use crate::types::ComputedRect;

use super::style::{LayoutStyle, Style, VisualStyle};
use super::types::{BoxContext, BoxProps};

// =============================================================================
// Box State
// =============================================================================

/// Where a box is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructing,
    Mounted,
    Unmounted,
}

struct BoxState {
    id: Option<String>,
    node: LayoutNode,
    layout: LayoutStyle,
    visual: VisualStyle,
    previous: ComputedRect,
    surface: Option<Surface>,
    phase: Phase,
    animator: Rc<dyn PositionAnimator>,
}

impl BoxState {
    fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("box")
    }

    /// Reconcile the computed rectangle against the previous one.
    fn reconcile(&mut self) -> Result<()> {
        if self.phase != Phase::Mounted {
            return Ok(());
        }

        let next = self.node.computed_layout()?;
        let previous = std::mem::replace(&mut self.previous, next);

        let Some(surface) = self.surface.as_ref() else {
            warn!(box_id = self.label(), "no surface attached; animation dropped");
            return Ok(());
        };

        if next.size_differs(&previous) {
            surface.set_size(next.width, next.height);
        }

        let deltas = PropertyDeltas::between(&previous, &next);
        if deltas.is_empty() {
            return Ok(());
        }

        trace!(
            box_id = self.label(),
            from_left = previous.left,
            from_top = previous.top,
            to_left = next.left,
            to_top = next.top,
            "moved"
        );
        self.animator.animate(surface, deltas);
        Ok(())
    }
}

fn reconcile_weak(state: &Weak<RefCell<BoxState>>) -> Result<()> {
    match state.upgrade() {
        Some(state) => state.borrow_mut().reconcile(),
        None => Ok(()),
    }
}

// =============================================================================
// Box Controller
// =============================================================================

/// Per-box controller. Children are owned in declaration order.
pub struct BoxController {
    state: Rc<RefCell<BoxState>>,
    children: Vec<BoxController>,
    ctx: BoxContext,
    listener: Option<ListenerId>,
}

impl BoxController {
    /// Build a box around `node` and recursively build its children.
    ///
    /// One child node is allocated and appended per child prop, in order.
    /// The box's own constraints are written into `node`, then a layout pass
    /// is requested.
    pub fn new(mut node: LayoutNode, props: BoxProps, ctx: &BoxContext) -> Result<Self> {
        let BoxProps {
            id,
            style,
            children: child_props,
        } = props;
        let (layout, visual) = style.split()?;

        let mut child_nodes = Vec::with_capacity(child_props.len());
        for _ in &child_props {
            let child = ctx.engine.create_node()?;
            node.insert_child(&child)?;
            child_nodes.push(child);
        }

        layout.apply_all(&node)?;
        ctx.trigger.fire();

        let children = child_nodes
            .into_iter()
            .zip(child_props)
            .map(|(child, props)| BoxController::new(child, props, ctx))
            .collect::<Result<Vec<_>>>()?;

        debug_assert_eq!(children.len(), node.child_count());
        trace!(box_id = id.as_deref().unwrap_or("box"), children = children.len(), "constructed");

        Ok(Self {
            state: Rc::new(RefCell::new(BoxState {
                id,
                node,
                layout,
                visual,
                previous: ComputedRect::ZERO,
                surface: None,
                phase: Phase::Constructing,
                animator: ctx.animator.clone(),
            })),
            children,
            ctx: ctx.clone(),
            listener: None,
        })
    }

    /// Attach a surface, start listening for layout updates, then mount
    /// children. Seeds an initial reconcile when the layout is already solved.
    pub fn mount(&mut self) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            if state.phase != Phase::Constructing {
                return Ok(());
            }
            state.surface = Some(Surface::new());
            state.phase = Phase::Mounted;
        }

        let weak = Rc::downgrade(&self.state);
        self.listener = Some(
            self.ctx
                .bus
                .subscribe(OPTIMIZED_UPDATE_LAYOUT, move |_| reconcile_weak(&weak)),
        );

        for child in &mut self.children {
            child.mount()?;
        }

        let mut state = self.state.borrow_mut();
        if state.node.is_solved()? {
            state.reconcile()?;
        }
        Ok(())
    }

    /// Replace the style. Changed constraints are written to the node and a
    /// layout pass is always requested.
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        let (layout, visual) = style.split()?;
        {
            let mut state = self.state.borrow_mut();
            if state.phase == Phase::Unmounted {
                return Err(Error::StaleNode(state.node.id()));
            }
            let writes = state.layout.apply_changes(&layout, &state.node)?;
            debug!(box_id = state.label(), writes, "style updated");
            state.layout = layout;
            state.visual = visual;
        }
        self.ctx.trigger.fire();
        Ok(())
    }

    /// Reconcile against the current computed layout now.
    pub fn handle_layout(&self) -> Result<()> {
        self.state.borrow_mut().reconcile()
    }

    /// Stop listening, unmount children, then release the node.
    pub fn unmount(&mut self) -> Result<()> {
        if self.phase() == Phase::Unmounted {
            return Ok(());
        }
        if let Some(id) = self.listener.take() {
            self.ctx.bus.unsubscribe(id);
        }
        for child in &mut self.children {
            child.unmount()?;
        }

        let mut state = self.state.borrow_mut();
        state.phase = Phase::Unmounted;
        state.surface = None;
        state.node.remove()
    }

    /// Drop the surface, e.g. when the paint substrate goes away. Later
    /// position changes are dropped with a warning.
    pub fn detach_surface(&self) -> Option<Surface> {
        self.state.borrow_mut().surface.take()
    }

    pub fn id(&self) -> Option<String> {
        self.state.borrow().id.clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn node_id(&self) -> NodeId {
        self.state.borrow().node.id()
    }

    pub fn children(&self) -> &[BoxController] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [BoxController] {
        &mut self.children
    }

    /// Children attached to this box's layout node.
    pub fn layout_child_count(&self) -> usize {
        self.state.borrow().node.child_count()
    }

    /// Rectangle seen at the last reconcile.
    pub fn previous_rect(&self) -> ComputedRect {
        self.state.borrow().previous
    }

    pub fn computed_layout(&self) -> Result<ComputedRect> {
        self.state.borrow().node.computed_layout()
    }

    pub fn surface(&self) -> Option<Surface> {
        self.state.borrow().surface.clone()
    }

    pub fn visual_style(&self) -> Ref<'_, VisualStyle> {
        Ref::map(self.state.borrow(), |state| &state.visual)
    }

    /// Visit this box and every descendant, depth first.
    pub fn walk(&self, visit: &mut impl FnMut(&BoxController)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

impl std::fmt::Debug for BoxController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("BoxController")
            .field("id", &state.id)
            .field("node", &state.node.id())
            .field("phase", &state.phase)
            .field("previous", &state.previous)
            .field("children", &self.children.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
