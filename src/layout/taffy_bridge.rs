//! Taffy Bridge - the layout engine behind every [`LayoutNode`].
//!
//! Owns one `TaffyTree` shared by all nodes of a stage, converts our
//! constraint types to Taffy styles, and reads solved layouts back as
//! [`ComputedRect`]s. The engine also tracks which node ids are still live so
//! a handle used after removal fails with [`Error::StaleNode`] instead of
//! touching a recycled slot.
//!
//! [`LayoutNode`]: super::LayoutNode

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use taffy::{
    AlignContent as TaffyAlignContent, AlignItems as TaffyAlignItems,
    AlignSelf as TaffyAlignSelf, AvailableSpace, Dimension as TaffyDimension, Display,
    FlexDirection as TaffyFlexDirection, FlexWrap as TaffyFlexWrap,
    JustifyContent as TaffyJustifyContent, NodeId, Rect, Size, Style, TaffyTree,
};

use crate::error::{Error, Result};
use crate::types::{
    AlignContent, AlignItems, AlignSelf, ComputedRect, Dimension, Edges, FlexDirection,
    FlexWrap, JustifyContent,
};

use super::node::LayoutNode;

// =============================================================================
// DIMENSION CONVERSION
// =============================================================================

/// Convert our Dimension to Taffy's Dimension.
pub(crate) fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Points(n) => TaffyDimension::Length(n),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

/// Write `value` into every side of `rect` selected by `edges`.
pub(crate) fn apply_edges<T: Copy>(rect: &mut Rect<T>, edges: Edges, value: T) {
    if edges.contains(Edges::TOP) {
        rect.top = value;
    }
    if edges.contains(Edges::RIGHT) {
        rect.right = value;
    }
    if edges.contains(Edges::BOTTOM) {
        rect.bottom = value;
    }
    if edges.contains(Edges::LEFT) {
        rect.left = value;
    }
}

// =============================================================================
// ENUM CONVERSIONS
// =============================================================================

pub(crate) fn to_taffy_flex_direction(dir: FlexDirection) -> TaffyFlexDirection {
    match dir {
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::Row => TaffyFlexDirection::Row,
        FlexDirection::ColumnReverse => TaffyFlexDirection::ColumnReverse,
        FlexDirection::RowReverse => TaffyFlexDirection::RowReverse,
    }
}

pub(crate) fn to_taffy_flex_wrap(wrap: FlexWrap) -> TaffyFlexWrap {
    match wrap {
        FlexWrap::NoWrap => TaffyFlexWrap::NoWrap,
        FlexWrap::Wrap => TaffyFlexWrap::Wrap,
        FlexWrap::WrapReverse => TaffyFlexWrap::WrapReverse,
    }
}

pub(crate) fn to_taffy_justify_content(justify: JustifyContent) -> Option<TaffyJustifyContent> {
    Some(match justify {
        JustifyContent::FlexStart => TaffyJustifyContent::FlexStart,
        JustifyContent::Center => TaffyJustifyContent::Center,
        JustifyContent::FlexEnd => TaffyJustifyContent::FlexEnd,
        JustifyContent::SpaceBetween => TaffyJustifyContent::SpaceBetween,
        JustifyContent::SpaceAround => TaffyJustifyContent::SpaceAround,
        JustifyContent::SpaceEvenly => TaffyJustifyContent::SpaceEvenly,
    })
}

pub(crate) fn to_taffy_align_items(align: AlignItems) -> Option<TaffyAlignItems> {
    Some(match align {
        AlignItems::Stretch => TaffyAlignItems::Stretch,
        AlignItems::FlexStart => TaffyAlignItems::FlexStart,
        AlignItems::Center => TaffyAlignItems::Center,
        AlignItems::FlexEnd => TaffyAlignItems::FlexEnd,
        AlignItems::Baseline => TaffyAlignItems::Baseline,
    })
}

pub(crate) fn to_taffy_align_content(align: AlignContent) -> Option<TaffyAlignContent> {
    Some(match align {
        AlignContent::Stretch => TaffyAlignContent::Stretch,
        AlignContent::FlexStart => TaffyAlignContent::FlexStart,
        AlignContent::Center => TaffyAlignContent::Center,
        AlignContent::FlexEnd => TaffyAlignContent::FlexEnd,
        AlignContent::SpaceBetween => TaffyAlignContent::SpaceBetween,
        AlignContent::SpaceAround => TaffyAlignContent::SpaceAround,
    })
}

pub(crate) fn to_taffy_align_self(align: AlignSelf) -> Option<TaffyAlignSelf> {
    match align {
        AlignSelf::Auto => None, // inherit from parent
        AlignSelf::Stretch => Some(TaffyAlignSelf::Stretch),
        AlignSelf::FlexStart => Some(TaffyAlignSelf::FlexStart),
        AlignSelf::Center => Some(TaffyAlignSelf::Center),
        AlignSelf::FlexEnd => Some(TaffyAlignSelf::FlexEnd),
        AlignSelf::Baseline => Some(TaffyAlignSelf::Baseline),
    }
}

/// Style every new node starts from: flex container, column direction.
///
/// Minimum sizes are zero rather than CSS `auto`, so a flex item may shrink
/// below its content along the main axis.
fn default_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: TaffyFlexDirection::Column,
        min_size: Size {
            width: TaffyDimension::Length(0.0),
            height: TaffyDimension::Length(0.0),
        },
        ..Default::default()
    }
}

// =============================================================================
// ENGINE
// =============================================================================

struct EngineState {
    tree: TaffyTree<()>,
    live: HashSet<NodeId>,
    passes: u64,
}

/// Shared handle to the layout tree. Cloning shares the same tree.
#[derive(Clone)]
pub struct LayoutEngine {
    state: Rc<RefCell<EngineState>>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(EngineState {
                tree: TaffyTree::new(),
                live: HashSet::new(),
                passes: 0,
            })),
        }
    }

    /// Create a detached node with default constraints.
    pub fn create_node(&self) -> Result<LayoutNode> {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.tree.new_leaf(default_style())?;
            state.live.insert(id);
            id
        };
        Ok(LayoutNode::from_parts(id, self.clone()))
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.state.borrow().live.len()
    }

    /// Number of solves run so far.
    pub fn passes(&self) -> u64 {
        self.state.borrow().passes
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.state.borrow().live.contains(&id)
    }

    fn ensure_live(state: &EngineState, id: NodeId) -> Result<()> {
        if state.live.contains(&id) {
            Ok(())
        } else {
            Err(Error::StaleNode(id))
        }
    }

    /// Read-modify-write the style of `id`.
    pub(crate) fn update_style(&self, id: NodeId, update: impl FnOnce(&mut Style)) -> Result<()> {
        let mut state = self.state.borrow_mut();
        Self::ensure_live(&state, id)?;
        let mut style = state.tree.style(id)?.clone();
        update(&mut style);
        state.tree.set_style(id, style)?;
        Ok(())
    }

    pub(crate) fn style(&self, id: NodeId) -> Result<Style> {
        let state = self.state.borrow();
        Self::ensure_live(&state, id)?;
        Ok(state.tree.style(id)?.clone())
    }

    /// Append `child` to `parent`. A node that already has a parent is
    /// rejected; nodes are never shared.
    pub(crate) fn add_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        Self::ensure_live(&state, parent)?;
        Self::ensure_live(&state, child)?;
        if state.tree.parent(child).is_some() {
            return Err(Error::DuplicateChild(child));
        }
        state.tree.add_child(parent, child)?;
        Ok(())
    }

    /// Live children of `id`, in insertion order. Removed nodes drop out.
    pub(crate) fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let state = self.state.borrow();
        Self::ensure_live(&state, id)?;
        Ok(state.tree.children(id)?)
    }

    pub(crate) fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        let state = self.state.borrow();
        Self::ensure_live(&state, id)?;
        Ok(state.tree.parent(id))
    }

    /// Solve the whole subtree rooted at `id`. Synchronous.
    pub(crate) fn compute(&self, id: NodeId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        Self::ensure_live(&state, id)?;
        let available = Size {
            width: AvailableSpace::MaxContent,
            height: AvailableSpace::MaxContent,
        };
        state.tree.compute_layout(id, available)?;
        state.passes += 1;
        Ok(())
    }

    pub(crate) fn layout(&self, id: NodeId) -> Result<ComputedRect> {
        let state = self.state.borrow();
        Self::ensure_live(&state, id)?;
        let layout = state.tree.layout(id)?;
        Ok(ComputedRect {
            top: layout.location.y,
            left: layout.location.x,
            width: layout.size.width,
            height: layout.size.height,
        })
    }

    pub(crate) fn is_dirty(&self, id: NodeId) -> Result<bool> {
        let state = self.state.borrow();
        Self::ensure_live(&state, id)?;
        Ok(state.tree.dirty(id)?)
    }

    /// Remove `id` from the tree, detaching it from its parent.
    pub(crate) fn remove(&self, id: NodeId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        Self::ensure_live(&state, id)?;
        state.tree.remove(id)?;
        state.live.remove(&id);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
