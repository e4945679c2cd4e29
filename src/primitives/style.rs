//! Style schema - routes style keys to layout constraints or visual attributes.
//!
//! The fifteen recognized layout keys form a closed enum, [`LayoutKey`]. Each
//! key has a typed schema; a recognized key carrying the wrong kind of value
//! is an [`Error::InvalidConstraint`]. Every other key is a presentation
//! attribute and lands in [`VisualStyle`] untouched.
//!
//! # Example
//!
//! ```
//! use spark_motion::primitives::{Style, StyleValue};
//! use spark_motion::types::{Edges, FlexWrap};
//!
//! let style = Style::new()
//!     .width(100.0)
//!     .height(100.0)
//!     .margin(Edges::ALL, 25.0)
//!     .flex_wrap(FlexWrap::Wrap)
//!     .visual("backgroundColor", StyleValue::text("#ACDD31"));
//!
//! let (layout, visual) = style.split().unwrap();
//! assert_eq!(layout.len(), 4);
//! assert!(visual.background().is_some());
//! ```

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::layout::LayoutNode;
use crate::types::{
    AlignContent, AlignItems, AlignSelf, Dimension, Edges, FlexDirection, FlexWrap,
    JustifyContent, Rgba,
};

// =============================================================================
// Style Value
// =============================================================================

/// A raw style value before schema validation.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f32),
    Dimension(Dimension),
    /// Keywords (`row`, `auto`, `50%`) and free-form visual values.
    Text(String),
    /// One value applied to a set of edges.
    Edge(Edges, f32),
}

impl StyleValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Dimension(_) => "dimension",
            Self::Text(_) => "text",
            Self::Edge(..) => "edge value",
        }
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<Dimension> for StyleValue {
    fn from(value: Dimension) -> Self {
        Self::Dimension(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

// =============================================================================
// Layout Keys
// =============================================================================

/// The closed set of style keys consumed by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayoutKey {
    FlexDirection,
    JustifyContent,
    AlignContent,
    AlignItems,
    AlignSelf,
    FlexWrap,
    Flex,
    FlexGrow,
    FlexShrink,
    FlexBasis,
    Margin,
    Padding,
    Border,
    Width,
    Height,
}

impl LayoutKey {
    pub const ALL: [Self; 15] = [
        Self::FlexDirection,
        Self::JustifyContent,
        Self::AlignContent,
        Self::AlignItems,
        Self::AlignSelf,
        Self::FlexWrap,
        Self::Flex,
        Self::FlexGrow,
        Self::FlexShrink,
        Self::FlexBasis,
        Self::Margin,
        Self::Padding,
        Self::Border,
        Self::Width,
        Self::Height,
    ];

    /// Style key as written by callers.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FlexDirection => "flexDirection",
            Self::JustifyContent => "justifyContent",
            Self::AlignContent => "alignContent",
            Self::AlignItems => "alignItems",
            Self::AlignSelf => "alignSelf",
            Self::FlexWrap => "flexWrap",
            Self::Flex => "flex",
            Self::FlexGrow => "flexGrow",
            Self::FlexShrink => "flexShrink",
            Self::FlexBasis => "flexBasis",
            Self::Margin => "margin",
            Self::Padding => "padding",
            Self::Border => "border",
            Self::Width => "width",
            Self::Height => "height",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

// =============================================================================
// Layout Property
// =============================================================================

/// A validated layout constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutProperty {
    FlexDirection(FlexDirection),
    JustifyContent(JustifyContent),
    AlignContent(AlignContent),
    AlignItems(AlignItems),
    AlignSelf(AlignSelf),
    FlexWrap(FlexWrap),
    Flex(f32),
    FlexGrow(f32),
    FlexShrink(f32),
    FlexBasis(Dimension),
    Margin(Edges, f32),
    Padding(Edges, f32),
    Border(Edges, f32),
    Width(Dimension),
    Height(Dimension),
}

/// Identifies what a property overwrites: its key, plus the edges for
/// margin/padding/border.
type Slot = (LayoutKey, Edges);

fn keyword<T>(key: LayoutKey, value: &StyleValue, parse: fn(&str) -> Option<T>) -> Result<T> {
    match value {
        StyleValue::Text(text) => {
            parse(text).ok_or_else(|| Error::invalid(key.name(), format!("unknown keyword `{text}`")))
        }
        other => Err(Error::invalid(
            key.name(),
            format!("expected keyword, got {}", other.kind()),
        )),
    }
}

fn number(key: LayoutKey, value: &StyleValue) -> Result<f32> {
    match value {
        StyleValue::Number(n) => Ok(*n),
        other => Err(Error::invalid(
            key.name(),
            format!("expected number, got {}", other.kind()),
        )),
    }
}

fn size(key: LayoutKey, value: &StyleValue) -> Result<Dimension> {
    match value {
        StyleValue::Number(n) => Ok(Dimension::Points(*n)),
        StyleValue::Dimension(dim) => Ok(*dim),
        StyleValue::Text(text) if text == "auto" => Ok(Dimension::Auto),
        StyleValue::Text(text) => text
            .strip_suffix('%')
            .and_then(|p| p.trim().parse::<f32>().ok())
            .map(Dimension::Percent)
            .ok_or_else(|| Error::invalid(key.name(), format!("cannot read `{text}` as a size"))),
        other => Err(Error::invalid(
            key.name(),
            format!("expected size, got {}", other.kind()),
        )),
    }
}

fn edge(key: LayoutKey, value: &StyleValue) -> Result<(Edges, f32)> {
    match value {
        StyleValue::Edge(edges, n) if !edges.is_empty() => Ok((*edges, *n)),
        StyleValue::Edge(..) => Err(Error::invalid(key.name(), "no edges selected")),
        StyleValue::Number(n) => Ok((Edges::ALL, *n)),
        other => Err(Error::invalid(
            key.name(),
            format!("expected edge value, got {}", other.kind()),
        )),
    }
}

impl LayoutProperty {
    /// Validate `value` against the schema of `key`.
    pub fn parse(key: LayoutKey, value: &StyleValue) -> Result<Self> {
        Ok(match key {
            LayoutKey::FlexDirection => {
                Self::FlexDirection(keyword(key, value, FlexDirection::from_keyword)?)
            }
            LayoutKey::JustifyContent => {
                Self::JustifyContent(keyword(key, value, JustifyContent::from_keyword)?)
            }
            LayoutKey::AlignContent => {
                Self::AlignContent(keyword(key, value, AlignContent::from_keyword)?)
            }
            LayoutKey::AlignItems => Self::AlignItems(keyword(key, value, AlignItems::from_keyword)?),
            LayoutKey::AlignSelf => Self::AlignSelf(keyword(key, value, AlignSelf::from_keyword)?),
            LayoutKey::FlexWrap => Self::FlexWrap(keyword(key, value, FlexWrap::from_keyword)?),
            LayoutKey::Flex => Self::Flex(number(key, value)?),
            LayoutKey::FlexGrow => Self::FlexGrow(number(key, value)?),
            LayoutKey::FlexShrink => Self::FlexShrink(number(key, value)?),
            LayoutKey::FlexBasis => Self::FlexBasis(size(key, value)?),
            LayoutKey::Margin => {
                let (edges, n) = edge(key, value)?;
                Self::Margin(edges, n)
            }
            LayoutKey::Padding => {
                let (edges, n) = edge(key, value)?;
                Self::Padding(edges, n)
            }
            LayoutKey::Border => {
                let (edges, n) = edge(key, value)?;
                Self::Border(edges, n)
            }
            LayoutKey::Width => Self::Width(size(key, value)?),
            LayoutKey::Height => Self::Height(size(key, value)?),
        })
    }

    pub fn key(&self) -> LayoutKey {
        match self {
            Self::FlexDirection(_) => LayoutKey::FlexDirection,
            Self::JustifyContent(_) => LayoutKey::JustifyContent,
            Self::AlignContent(_) => LayoutKey::AlignContent,
            Self::AlignItems(_) => LayoutKey::AlignItems,
            Self::AlignSelf(_) => LayoutKey::AlignSelf,
            Self::FlexWrap(_) => LayoutKey::FlexWrap,
            Self::Flex(_) => LayoutKey::Flex,
            Self::FlexGrow(_) => LayoutKey::FlexGrow,
            Self::FlexShrink(_) => LayoutKey::FlexShrink,
            Self::FlexBasis(_) => LayoutKey::FlexBasis,
            Self::Margin(..) => LayoutKey::Margin,
            Self::Padding(..) => LayoutKey::Padding,
            Self::Border(..) => LayoutKey::Border,
            Self::Width(_) => LayoutKey::Width,
            Self::Height(_) => LayoutKey::Height,
        }
    }

    fn slot(&self) -> Slot {
        match *self {
            Self::Margin(edges, _) | Self::Padding(edges, _) | Self::Border(edges, _) => {
                (self.key(), edges)
            }
            _ => (self.key(), Edges::empty()),
        }
    }

    /// Write this constraint into `node`.
    pub fn apply(&self, node: &LayoutNode) -> Result<()> {
        match *self {
            Self::FlexDirection(v) => node.set_flex_direction(v),
            Self::JustifyContent(v) => node.set_justify_content(v),
            Self::AlignContent(v) => node.set_align_content(v),
            Self::AlignItems(v) => node.set_align_items(v),
            Self::AlignSelf(v) => node.set_align_self(v),
            Self::FlexWrap(v) => node.set_flex_wrap(v),
            Self::Flex(v) => node.set_flex(v),
            Self::FlexGrow(v) => node.set_flex_grow(v),
            Self::FlexShrink(v) => node.set_flex_shrink(v),
            Self::FlexBasis(v) => node.set_flex_basis(v),
            Self::Margin(edges, v) => node.set_margin(edges, v),
            Self::Padding(edges, v) => node.set_padding(edges, v),
            Self::Border(edges, v) => node.set_border(edges, v),
            Self::Width(v) => node.set_width(v),
            Self::Height(v) => node.set_height(v),
        }
    }

    /// Constraints that put every engine field of `group` back to its default.
    fn defaults(group: Group) -> Vec<Self> {
        let key = match group {
            Group::Single(key) => key,
            Group::Flex => {
                return vec![
                    Self::FlexGrow(0.0),
                    Self::FlexShrink(1.0),
                    Self::FlexBasis(Dimension::Auto),
                ];
            }
            Group::Margin => return vec![Self::Margin(Edges::ALL, 0.0)],
            Group::Padding => return vec![Self::Padding(Edges::ALL, 0.0)],
            Group::Border => return vec![Self::Border(Edges::ALL, 0.0)],
        };
        match key {
            LayoutKey::FlexDirection => vec![Self::FlexDirection(FlexDirection::default())],
            LayoutKey::JustifyContent => vec![Self::JustifyContent(JustifyContent::default())],
            LayoutKey::AlignContent => vec![Self::AlignContent(AlignContent::default())],
            LayoutKey::AlignItems => vec![Self::AlignItems(AlignItems::default())],
            LayoutKey::AlignSelf => vec![Self::AlignSelf(AlignSelf::default())],
            LayoutKey::FlexWrap => vec![Self::FlexWrap(FlexWrap::default())],
            LayoutKey::Flex => vec![
                Self::FlexGrow(0.0),
                Self::FlexShrink(1.0),
                Self::FlexBasis(Dimension::Auto),
            ],
            LayoutKey::FlexGrow => vec![Self::FlexGrow(0.0)],
            LayoutKey::FlexShrink => vec![Self::FlexShrink(1.0)],
            LayoutKey::FlexBasis => vec![Self::FlexBasis(Dimension::Auto)],
            LayoutKey::Margin => vec![Self::Margin(Edges::ALL, 0.0)],
            LayoutKey::Padding => vec![Self::Padding(Edges::ALL, 0.0)],
            LayoutKey::Border => vec![Self::Border(Edges::ALL, 0.0)],
            LayoutKey::Width => vec![Self::Width(Dimension::Auto)],
            LayoutKey::Height => vec![Self::Height(Dimension::Auto)],
        }
    }
}

/// Slots that write overlapping engine fields: `flex` with its longhands,
/// and an edge property across its edge sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Single(LayoutKey),
    Flex,
    Margin,
    Padding,
    Border,
}

impl Group {
    fn of(key: LayoutKey) -> Self {
        match key {
            LayoutKey::Flex | LayoutKey::FlexGrow | LayoutKey::FlexShrink | LayoutKey::FlexBasis => {
                Self::Flex
            }
            LayoutKey::Margin => Self::Margin,
            LayoutKey::Padding => Self::Padding,
            LayoutKey::Border => Self::Border,
            other => Self::Single(other),
        }
    }
}

// =============================================================================
// Layout Style
// =============================================================================

/// Validated layout constraints, one per slot. Order follows the last
/// occurrence of each slot, so later entries win over overlapping ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutStyle {
    properties: Vec<LayoutProperty>,
}

impl LayoutStyle {
    fn set(&mut self, property: LayoutProperty) {
        let slot = property.slot();
        self.properties.retain(|p| p.slot() != slot);
        self.properties.push(property);
    }

    fn members(&self, group: Group) -> Vec<&LayoutProperty> {
        self.properties
            .iter()
            .filter(|p| Group::of(p.key()) == group)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutProperty> {
        self.properties.iter()
    }

    pub fn get(&self, key: LayoutKey) -> Option<&LayoutProperty> {
        self.properties.iter().find(|p| p.key() == key)
    }

    /// Write every constraint into `node`.
    pub fn apply_all(&self, node: &LayoutNode) -> Result<()> {
        self.properties.iter().try_for_each(|p| p.apply(node))
    }

    /// Write only what differs from `self` to reach `next`, leaving `node`
    /// as `next.apply_all` on a fresh node would.
    ///
    /// Work is done per group of overlapping slots. An unchanged group is
    /// skipped. A changed group is re-applied whole in style order, after a
    /// reset to defaults when one of its slots was dropped. Returns the
    /// number of setter calls issued.
    pub fn apply_changes(&self, next: &LayoutStyle, node: &LayoutNode) -> Result<usize> {
        let mut groups: Vec<Group> = Vec::new();
        for property in self.properties.iter().chain(&next.properties) {
            let group = Group::of(property.key());
            if !groups.contains(&group) {
                groups.push(group);
            }
        }

        let mut writes = 0;
        for group in groups {
            let before = self.members(group);
            let after = next.members(group);
            if before == after {
                continue;
            }

            let dropped = before
                .iter()
                .any(|old| !after.iter().any(|new| new.slot() == old.slot()));
            if dropped {
                for reset in LayoutProperty::defaults(group) {
                    reset.apply(node)?;
                    writes += 1;
                }
            }

            for property in after {
                property.apply(node)?;
                writes += 1;
            }
        }

        Ok(writes)
    }
}

// =============================================================================
// Visual Style
// =============================================================================

/// Presentation-only attributes. Never sent to the layout engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualStyle {
    attributes: BTreeMap<String, StyleValue>,
}

impl VisualStyle {
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.attributes.get(key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// `backgroundColor`, when present and parseable.
    pub fn background(&self) -> Option<Rgba> {
        match self.attributes.get("backgroundColor")? {
            StyleValue::Text(text) => Rgba::parse(text),
            _ => None,
        }
    }
}

// =============================================================================
// Style
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Layout(LayoutProperty),
    Raw(String, StyleValue),
}

/// Ordered style entries as supplied by the caller. Later entries win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    entries: Vec<Entry>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry by key. Layout keys are validated at [`Style::split`].
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.entries.push(Entry::Raw(key.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn flex_direction(self, direction: FlexDirection) -> Self {
        self.push(LayoutProperty::FlexDirection(direction))
    }

    pub fn justify_content(self, justify: JustifyContent) -> Self {
        self.push(LayoutProperty::JustifyContent(justify))
    }

    pub fn align_content(self, align: AlignContent) -> Self {
        self.push(LayoutProperty::AlignContent(align))
    }

    pub fn align_items(self, align: AlignItems) -> Self {
        self.push(LayoutProperty::AlignItems(align))
    }

    pub fn align_self(self, align: AlignSelf) -> Self {
        self.push(LayoutProperty::AlignSelf(align))
    }

    pub fn flex_wrap(self, wrap: FlexWrap) -> Self {
        self.push(LayoutProperty::FlexWrap(wrap))
    }

    pub fn flex(self, flex: f32) -> Self {
        self.push(LayoutProperty::Flex(flex))
    }

    pub fn flex_grow(self, grow: f32) -> Self {
        self.push(LayoutProperty::FlexGrow(grow))
    }

    pub fn flex_shrink(self, shrink: f32) -> Self {
        self.push(LayoutProperty::FlexShrink(shrink))
    }

    pub fn flex_basis(self, basis: impl Into<Dimension>) -> Self {
        self.push(LayoutProperty::FlexBasis(basis.into()))
    }

    pub fn margin(self, edges: Edges, value: f32) -> Self {
        self.push(LayoutProperty::Margin(edges, value))
    }

    pub fn padding(self, edges: Edges, value: f32) -> Self {
        self.push(LayoutProperty::Padding(edges, value))
    }

    pub fn border(self, edges: Edges, value: f32) -> Self {
        self.push(LayoutProperty::Border(edges, value))
    }

    pub fn width(self, width: impl Into<Dimension>) -> Self {
        self.push(LayoutProperty::Width(width.into()))
    }

    pub fn height(self, height: impl Into<Dimension>) -> Self {
        self.push(LayoutProperty::Height(height.into()))
    }

    /// Add a presentation attribute.
    pub fn visual(self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value)
    }

    fn push(mut self, property: LayoutProperty) -> Self {
        self.entries.push(Entry::Layout(property));
        self
    }

    /// Split into validated layout constraints and visual attributes.
    pub fn split(&self) -> Result<(LayoutStyle, VisualStyle)> {
        let mut layout = LayoutStyle::default();
        let mut visual = VisualStyle::default();

        for entry in &self.entries {
            match entry {
                Entry::Layout(property) => layout.set(*property),
                Entry::Raw(key, value) => match LayoutKey::from_name(key) {
                    Some(layout_key) => layout.set(LayoutProperty::parse(layout_key, value)?),
                    None => {
                        visual.attributes.insert(key.clone(), value.clone());
                    }
                },
            }
        }

        Ok((layout, visual))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::layout::LayoutEngine;

    fn setup() -> (LayoutEngine, LayoutNode) {
        let engine = LayoutEngine::new();
        let node = engine.create_node().unwrap();
        (engine, node)
    }

    #[test]
    fn test_key_names_round_trip() {
        for key in LayoutKey::ALL {
            assert_eq!(LayoutKey::from_name(key.name()), Some(key));
        }
        assert_eq!(LayoutKey::from_name("backgroundColor"), None);
    }

    #[test]
    fn test_split_routes_unknown_keys_to_visual() {
        let style = Style::new()
            .insert("width", 100.0)
            .insert("flexDirection", "row")
            .insert("backgroundColor", "#ACDD31")
            .insert("opacity", 0.5);

        let (layout, visual) = style.split().unwrap();

        assert_eq!(layout.len(), 2);
        assert_eq!(
            layout.get(LayoutKey::Width),
            Some(&LayoutProperty::Width(Dimension::Points(100.0)))
        );
        assert_eq!(visual.len(), 2);
        assert_eq!(visual.background(), Some(Rgba::rgb(0xAC, 0xDD, 0x31)));
        assert_eq!(visual.get("opacity"), Some(&StyleValue::Number(0.5)));
    }

    #[test]
    fn test_wrong_value_kind_rejected() {
        let err = Style::new().insert("flexGrow", "lots").split().unwrap_err();
        assert!(matches!(err, Error::InvalidConstraint { property: "flexGrow", .. }));

        let err = Style::new().insert("justifyContent", "sideways").split().unwrap_err();
        assert!(matches!(err, Error::InvalidConstraint { property: "justifyContent", .. }));

        let err = Style::new().insert("width", "wide").split().unwrap_err();
        assert!(matches!(err, Error::InvalidConstraint { property: "width", .. }));
    }

    #[test]
    fn test_size_keywords() {
        let (layout, _) = Style::new()
            .insert("width", "auto")
            .insert("height", "50%")
            .split()
            .unwrap();

        assert_eq!(
            layout.get(LayoutKey::Width),
            Some(&LayoutProperty::Width(Dimension::Auto))
        );
        assert_eq!(
            layout.get(LayoutKey::Height),
            Some(&LayoutProperty::Height(Dimension::Percent(50.0)))
        );
    }

    #[test]
    fn test_edges_keep_separate_slots() {
        let (layout, _) = Style::new()
            .margin(Edges::TOP, 5.0)
            .margin(Edges::LEFT, 10.0)
            .margin(Edges::TOP, 7.0)
            .split()
            .unwrap();

        let margins: Vec<_> = layout.iter().copied().collect();
        assert_eq!(
            margins,
            vec![
                LayoutProperty::Margin(Edges::LEFT, 10.0),
                LayoutProperty::Margin(Edges::TOP, 7.0),
            ]
        );
    }

    #[test]
    fn test_later_entry_wins_over_overlapping_edge() {
        let (_engine, node) = setup();
        let (layout, _) = Style::new()
            .margin(Edges::ALL, 25.0)
            .margin(Edges::TOP, 5.0)
            .margin(Edges::ALL, 10.0)
            .split()
            .unwrap();

        layout.apply_all(&node).unwrap();

        let margin = node.style().unwrap().margin;
        assert_eq!(margin.top, taffy::LengthPercentageAuto::Length(10.0));
        assert_eq!(margin.left, taffy::LengthPercentageAuto::Length(10.0));
    }

    #[test]
    fn test_apply_all_writes_node() {
        let (_engine, node) = setup();
        let (layout, _) = Style::new()
            .width(120.0)
            .flex_direction(FlexDirection::Row)
            .padding(Edges::ALL, 4.0)
            .split()
            .unwrap();

        layout.apply_all(&node).unwrap();
        node.calculate_layout().unwrap();

        let style = node.style().unwrap();
        assert_eq!(style.flex_direction, taffy::FlexDirection::Row);
        assert_eq!(node.computed_layout().unwrap().width, 120.0);
    }

    #[test]
    fn test_apply_changes_writes_only_differences() {
        let (_engine, node) = setup();
        let (before, _) = Style::new().width(100.0).height(50.0).split().unwrap();
        before.apply_all(&node).unwrap();

        let (same, _) = Style::new().width(100.0).height(50.0).split().unwrap();
        assert_eq!(before.apply_changes(&same, &node).unwrap(), 0);

        let (wider, _) = Style::new().width(200.0).height(50.0).split().unwrap();
        assert_eq!(before.apply_changes(&wider, &node).unwrap(), 1);

        node.calculate_layout().unwrap();
        assert_eq!(node.computed_layout().unwrap().width, 200.0);
    }

    #[test]
    fn test_dropped_key_resets_to_default() {
        let (_engine, node) = setup();
        let (before, _) = Style::new().width(100.0).flex(2.0).split().unwrap();
        before.apply_all(&node).unwrap();

        let (after, _) = Style::new().width(100.0).split().unwrap();
        before.apply_changes(&after, &node).unwrap();

        let style = node.style().unwrap();
        assert_eq!(style.flex_grow, 0.0);
        assert_eq!(style.flex_shrink, 1.0);
        assert_eq!(style.flex_basis, taffy::Dimension::Auto);
    }

    #[test]
    fn test_changed_edge_group_matches_fresh_apply() {
        let (_engine, node) = setup();
        let (before, _) = Style::new()
            .margin(Edges::ALL, 25.0)
            .margin(Edges::TOP, 5.0)
            .split()
            .unwrap();
        before.apply_all(&node).unwrap();

        let (after, _) = Style::new()
            .margin(Edges::ALL, 30.0)
            .margin(Edges::TOP, 5.0)
            .split()
            .unwrap();
        before.apply_changes(&after, &node).unwrap();

        let margin = node.style().unwrap().margin;
        assert_eq!(margin.top, taffy::LengthPercentageAuto::Length(5.0));
        assert_eq!(margin.bottom, taffy::LengthPercentageAuto::Length(30.0));
    }

    #[test]
    fn test_changed_flex_group_matches_fresh_apply() {
        let (_engine, node) = setup();
        let (before, _) = Style::new().flex(1.0).flex_grow(3.0).split().unwrap();
        before.apply_all(&node).unwrap();

        let (after, _) = Style::new().flex(2.0).flex_grow(3.0).split().unwrap();
        before.apply_changes(&after, &node).unwrap();

        let style = node.style().unwrap();
        assert_eq!(style.flex_grow, 3.0);
        assert_eq!(style.flex_basis, taffy::Dimension::Length(0.0));
    }

    #[test]
    fn test_dropped_edge_resets_whole_group() {
        let (_engine, node) = setup();
        let (before, _) = Style::new()
            .margin(Edges::ALL, 25.0)
            .margin(Edges::TOP, 5.0)
            .split()
            .unwrap();
        before.apply_all(&node).unwrap();

        let (after, _) = Style::new().margin(Edges::TOP, 5.0).split().unwrap();
        before.apply_changes(&after, &node).unwrap();

        let margin = node.style().unwrap().margin;
        assert_eq!(margin.top, taffy::LengthPercentageAuto::Length(5.0));
        assert_eq!(margin.left, taffy::LengthPercentageAuto::Length(0.0));
    }

    #[test]
    fn test_visual_keys_never_reach_node() {
        let (_engine, node) = setup();
        let (layout, visual) = Style::new()
            .visual("backgroundColor", "#FF0000")
            .split()
            .unwrap();

        assert!(layout.is_empty());
        layout.apply_all(&node).unwrap();
        assert_eq!(visual.background(), Some(Rgba::rgb(255, 0, 0)));
    }
}
