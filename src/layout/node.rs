//! LayoutNode - one node of the constraint tree.
//!
//! A node carries only sizing and positioning constraints. It is owned by
//! exactly one box controller and never shared. Child order is insertion
//! (= visual) order and is read back from the engine, so a removed child
//! drops out of its parent's list.
//!
//! # Example
//!
//! ```
//! use spark_motion::layout::LayoutEngine;
//! use spark_motion::types::{Dimension, Edges, FlexDirection};
//!
//! let engine = LayoutEngine::new();
//! let mut row = engine.create_node().unwrap();
//! row.set_flex_direction(FlexDirection::Row).unwrap();
//! row.set_width(Dimension::Points(300.0)).unwrap();
//!
//! let item = engine.create_node().unwrap();
//! item.set_width(Dimension::Points(100.0)).unwrap();
//! item.set_margin(Edges::LEFT, 10.0).unwrap();
//! row.insert_child(&item).unwrap();
//!
//! row.calculate_layout().unwrap();
//! assert_eq!(item.computed_layout().unwrap().left, 10.0);
//! ```

use taffy::{Dimension as TaffyDimension, LengthPercentage, LengthPercentageAuto, NodeId};

use crate::error::{Error, Result};
use crate::types::{
    AlignContent, AlignItems, AlignSelf, ComputedRect, Dimension, Edges, FlexDirection,
    FlexWrap, JustifyContent,
};

use super::taffy_bridge::{
    apply_edges, to_taffy_align_content, to_taffy_align_items, to_taffy_align_self,
    to_taffy_dimension, to_taffy_flex_direction, to_taffy_flex_wrap, to_taffy_justify_content,
    LayoutEngine,
};

// =============================================================================
// VALUE CHECKS
// =============================================================================

fn finite(property: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid(property, format!("{value} is not finite")))
    }
}

fn non_negative(property: &'static str, value: f32) -> Result<f32> {
    let value = finite(property, value)?;
    if value < 0.0 {
        return Err(Error::invalid(property, format!("{value} is negative")));
    }
    Ok(value)
}

fn dimension(property: &'static str, dim: Dimension) -> Result<TaffyDimension> {
    match dim {
        Dimension::Auto => {}
        Dimension::Points(n) => {
            non_negative(property, n)?;
        }
        Dimension::Percent(p) => {
            let p = finite(property, p)?;
            if !(0.0..=100.0).contains(&p) {
                return Err(Error::invalid(property, format!("{p}% is outside 0..=100")));
            }
        }
    }
    Ok(to_taffy_dimension(dim))
}

// =============================================================================
// LAYOUT NODE
// =============================================================================

pub struct LayoutNode {
    id: NodeId,
    engine: LayoutEngine,
}

impl std::fmt::Debug for LayoutNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutNode")
            .field("id", &self.id)
            .field("removed", &self.is_removed())
            .finish()
    }
}

impl LayoutNode {
    pub(crate) fn from_parts(id: NodeId, engine: LayoutEngine) -> Self {
        Self { id, engine }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Live child ids in visual order.
    pub fn children(&self) -> Result<Vec<NodeId>> {
        self.engine.children(self.id)
    }

    /// Zero once this node is removed.
    pub fn child_count(&self) -> usize {
        self.children().map_or(0, |children| children.len())
    }

    pub fn parent(&self) -> Result<Option<NodeId>> {
        self.engine.parent(self.id)
    }

    pub fn is_removed(&self) -> bool {
        !self.engine.is_live(self.id)
    }

    /// Append `child` to this node's children. Fails with
    /// [`Error::DuplicateChild`] when `child` already has a parent, this one
    /// included.
    pub fn insert_child(&mut self, child: &LayoutNode) -> Result<()> {
        self.engine.add_child(self.id, child.id)
    }

    // =========================================================================
    // CONTAINER PROPERTIES
    // =========================================================================

    pub fn set_flex_direction(&self, direction: FlexDirection) -> Result<()> {
        self.engine.update_style(self.id, |style| {
            style.flex_direction = to_taffy_flex_direction(direction);
        })
    }

    pub fn set_justify_content(&self, justify: JustifyContent) -> Result<()> {
        self.engine.update_style(self.id, |style| {
            style.justify_content = to_taffy_justify_content(justify);
        })
    }

    pub fn set_align_content(&self, align: AlignContent) -> Result<()> {
        self.engine.update_style(self.id, |style| {
            style.align_content = to_taffy_align_content(align);
        })
    }

    pub fn set_align_items(&self, align: AlignItems) -> Result<()> {
        self.engine.update_style(self.id, |style| {
            style.align_items = to_taffy_align_items(align);
        })
    }

    pub fn set_flex_wrap(&self, wrap: FlexWrap) -> Result<()> {
        self.engine.update_style(self.id, |style| {
            style.flex_wrap = to_taffy_flex_wrap(wrap);
        })
    }

    // =========================================================================
    // ITEM PROPERTIES
    // =========================================================================

    pub fn set_align_self(&self, align: AlignSelf) -> Result<()> {
        self.engine.update_style(self.id, |style| {
            style.align_self = to_taffy_align_self(align);
        })
    }

    /// `flex` shorthand.
    ///
    /// Positive: grow by `flex`, shrink 1, basis 0. Zero: rigid, auto basis.
    /// Negative: no grow, shrink by `-flex`, auto basis.
    pub fn set_flex(&self, flex: f32) -> Result<()> {
        let flex = finite("flex", flex)?;
        self.engine.update_style(self.id, |style| {
            if flex > 0.0 {
                style.flex_grow = flex;
                style.flex_shrink = 1.0;
                style.flex_basis = TaffyDimension::Length(0.0);
            } else if flex == 0.0 {
                style.flex_grow = 0.0;
                style.flex_shrink = 0.0;
                style.flex_basis = TaffyDimension::Auto;
            } else {
                style.flex_grow = 0.0;
                style.flex_shrink = -flex;
                style.flex_basis = TaffyDimension::Auto;
            }
        })
    }

    pub fn set_flex_grow(&self, grow: f32) -> Result<()> {
        let grow = non_negative("flexGrow", grow)?;
        self.engine.update_style(self.id, |style| style.flex_grow = grow)
    }

    pub fn set_flex_shrink(&self, shrink: f32) -> Result<()> {
        let shrink = non_negative("flexShrink", shrink)?;
        self.engine.update_style(self.id, |style| style.flex_shrink = shrink)
    }

    pub fn set_flex_basis(&self, basis: Dimension) -> Result<()> {
        let basis = dimension("flexBasis", basis)?;
        self.engine.update_style(self.id, |style| style.flex_basis = basis)
    }

    // =========================================================================
    // SPACING
    // =========================================================================

    /// Margins may be negative.
    pub fn set_margin(&self, edges: Edges, value: f32) -> Result<()> {
        let value = finite("margin", value)?;
        self.engine.update_style(self.id, |style| {
            apply_edges(&mut style.margin, edges, LengthPercentageAuto::Length(value));
        })
    }

    pub fn set_padding(&self, edges: Edges, value: f32) -> Result<()> {
        let value = non_negative("padding", value)?;
        self.engine.update_style(self.id, |style| {
            apply_edges(&mut style.padding, edges, LengthPercentage::Length(value));
        })
    }

    pub fn set_border(&self, edges: Edges, value: f32) -> Result<()> {
        let value = non_negative("border", value)?;
        self.engine.update_style(self.id, |style| {
            apply_edges(&mut style.border, edges, LengthPercentage::Length(value));
        })
    }

    // =========================================================================
    // DIMENSIONS
    // =========================================================================

    pub fn set_width(&self, width: Dimension) -> Result<()> {
        let width = dimension("width", width)?;
        self.engine.update_style(self.id, |style| style.size.width = width)
    }

    pub fn set_height(&self, height: Dimension) -> Result<()> {
        let height = dimension("height", height)?;
        self.engine.update_style(self.id, |style| style.size.height = height)
    }

    // =========================================================================
    // SOLVING
    // =========================================================================

    /// Solve the subtree rooted here.
    pub fn calculate_layout(&self) -> Result<()> {
        self.engine.compute(self.id)
    }

    /// Last solved rectangle, parent-relative.
    ///
    /// Only meaningful once this node or an ancestor was solved; see
    /// [`is_solved`](Self::is_solved).
    pub fn computed_layout(&self) -> Result<ComputedRect> {
        self.engine.layout(self.id)
    }

    /// False when constraints changed (or the node is new) since the last solve.
    pub fn is_solved(&self) -> Result<bool> {
        Ok(!self.engine.is_dirty(self.id)?)
    }

    pub(crate) fn style(&self) -> Result<taffy::Style> {
        self.engine.style(self.id)
    }

    /// Detach from the engine. Every later operation fails with
    /// [`Error::StaleNode`].
    pub fn remove(&mut self) -> Result<()> {
        self.engine.remove(self.id)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> LayoutEngine {
        LayoutEngine::new()
    }

    #[test]
    fn test_insert_preserves_order() {
        let engine = setup();
        let mut parent = engine.create_node().unwrap();
        let a = engine.create_node().unwrap();
        let b = engine.create_node().unwrap();
        let c = engine.create_node().unwrap();

        parent.insert_child(&a).unwrap();
        parent.insert_child(&b).unwrap();
        parent.insert_child(&c).unwrap();

        assert_eq!(parent.children().unwrap(), vec![a.id(), b.id(), c.id()]);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let engine = setup();
        let mut parent = engine.create_node().unwrap();
        let child = engine.create_node().unwrap();

        parent.insert_child(&child).unwrap();
        let err = parent.insert_child(&child).unwrap_err();

        assert!(matches!(err, Error::DuplicateChild(id) if id == child.id()));
        assert_eq!(parent.child_count(), 1);
    }

    #[test]
    fn test_insert_rejects_child_of_another_parent() {
        let engine = setup();
        let mut first = engine.create_node().unwrap();
        let mut second = engine.create_node().unwrap();
        let child = engine.create_node().unwrap();

        first.insert_child(&child).unwrap();
        let err = second.insert_child(&child).unwrap_err();

        assert!(matches!(err, Error::DuplicateChild(id) if id == child.id()));
        assert_eq!(first.children().unwrap(), vec![child.id()]);
        assert_eq!(second.child_count(), 0);
        assert_eq!(child.parent().unwrap(), Some(first.id()));
    }

    #[test]
    fn test_setter_after_remove_fails_fast() {
        let engine = setup();
        let mut node = engine.create_node().unwrap();
        node.remove().unwrap();

        assert!(node.is_removed());
        assert!(node.set_width(Dimension::Points(10.0)).unwrap_err().is_stale());
        assert!(node.calculate_layout().unwrap_err().is_stale());
        assert!(node.computed_layout().unwrap_err().is_stale());
        assert!(node.remove().unwrap_err().is_stale());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let engine = setup();
        let node = engine.create_node().unwrap();

        assert!(matches!(
            node.set_width(Dimension::Points(f32::NAN)),
            Err(Error::InvalidConstraint { property: "width", .. })
        ));
        assert!(node.set_height(Dimension::Points(-1.0)).is_err());
        assert!(node.set_flex_basis(Dimension::Percent(150.0)).is_err());
        assert!(node.set_padding(Edges::ALL, -2.0).is_err());
        assert!(node.set_flex_grow(f32::INFINITY).is_err());

        // negative margins are legal
        node.set_margin(Edges::TOP, -5.0).unwrap();
    }

    #[test]
    fn test_flex_shorthand() {
        let engine = setup();
        let node = engine.create_node().unwrap();

        node.set_flex(2.0).unwrap();
        let style = node.style().unwrap();
        assert_eq!(style.flex_grow, 2.0);
        assert_eq!(style.flex_shrink, 1.0);

        node.set_flex(-3.0).unwrap();
        let style = node.style().unwrap();
        assert_eq!(style.flex_grow, 0.0);
        assert_eq!(style.flex_shrink, 3.0);
    }

    #[test]
    fn test_is_solved_tracks_changes() {
        let engine = setup();
        let node = engine.create_node().unwrap();
        node.set_width(Dimension::Points(10.0)).unwrap();
        assert!(!node.is_solved().unwrap());

        node.calculate_layout().unwrap();
        assert!(node.is_solved().unwrap());

        node.set_width(Dimension::Points(20.0)).unwrap();
        assert!(!node.is_solved().unwrap());
    }

    #[test]
    fn test_remove_detaches_from_parent_tree() {
        let engine = setup();
        let mut parent = engine.create_node().unwrap();
        parent.set_width(Dimension::Points(50.0)).unwrap();
        let mut child = engine.create_node().unwrap();
        parent.insert_child(&child).unwrap();

        child.remove().unwrap();
        parent.calculate_layout().unwrap();
        assert_eq!(parent.computed_layout().unwrap().width, 50.0);
    }

    #[test]
    fn test_removed_child_leaves_parent_list() {
        let engine = setup();
        let mut parent = engine.create_node().unwrap();
        let mut a = engine.create_node().unwrap();
        let b = engine.create_node().unwrap();
        parent.insert_child(&a).unwrap();
        parent.insert_child(&b).unwrap();

        a.remove().unwrap();

        assert_eq!(parent.children().unwrap(), vec![b.id()]);
        assert_eq!(parent.child_count(), 1);

        parent.remove().unwrap();
        assert_eq!(parent.child_count(), 0);
        assert!(parent.children().unwrap_err().is_stale());
    }
}
