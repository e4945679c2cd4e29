//! Core types for spark-motion.
//!
//! Geometry, constraint values and the flex enums shared by the layout
//! binding, the style schema and the box controllers.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels.
///
/// Only ever used for presentation attributes; colors never reach the
/// layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex color (`#RGB`, `#RRGGBB`, `#RRGGBBAA`, `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn hex_byte(s: &[u8], i: usize) -> Option<u8> {
            Some((hex_digit(s[i])? << 4) | hex_digit(s[i + 1])?)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
            }
            6 => Some(Self::rgb(
                hex_byte(bytes, 0)?,
                hex_byte(bytes, 2)?,
                hex_byte(bytes, 4)?,
            )),
            8 => Some(Self::new(
                hex_byte(bytes, 0)?,
                hex_byte(bytes, 2)?,
                hex_byte(bytes, 4)?,
                hex_byte(bytes, 6)?,
            )),
            _ => None,
        }
    }

    /// Parse a hex color or the `transparent` keyword.
    ///
    /// ```
    /// use spark_motion::types::Rgba;
    ///
    /// assert_eq!(Rgba::parse("#ACDD31"), Some(Rgba::rgb(0xac, 0xdd, 0x31)));
    /// assert_eq!(Rgba::parse("transparent"), Some(Rgba::TRANSPARENT));
    /// assert!(Rgba::parse("chartreuse-ish").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if input.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        if input.starts_with('#') || input.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::from_hex(input);
        }
        None
    }
}

// =============================================================================
// Dimension - Absolute, percentage or auto sizes
// =============================================================================

/// A size constraint: absolute points, a percentage of the parent, or auto.
///
/// ```
/// use spark_motion::types::Dimension;
///
/// let width = Dimension::Points(100.0);
/// let height = Dimension::Percent(50.0);
/// assert_eq!(Dimension::from(100.0), width);
/// assert_ne!(height, Dimension::Auto);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Sized by content and flex rules.
    #[default]
    Auto,
    /// Absolute size in layout points.
    Points(f32),
    /// Percentage of the parent size (0-100).
    Percent(f32),
}

impl From<f32> for Dimension {
    fn from(value: f32) -> Self {
        Self::Points(value)
    }
}

impl From<u16> for Dimension {
    fn from(value: u16) -> Self {
        Self::Points(value as f32)
    }
}

// =============================================================================
// Edges (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Box edges addressed by margin, padding and border setters.
    ///
    /// Combine with bitwise OR: `Edges::TOP | Edges::LEFT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Edges: u8 {
        const TOP = 1 << 0;
        const RIGHT = 1 << 1;
        const BOTTOM = 1 << 2;
        const LEFT = 1 << 3;
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl Edges {
    /// Resolve an edge name (`all`, `top`, `horizontal`, ...).
    pub fn from_keyword(name: &str) -> Option<Self> {
        Some(match name {
            "all" => Self::ALL,
            "top" => Self::TOP,
            "right" => Self::RIGHT,
            "bottom" => Self::BOTTOM,
            "left" => Self::LEFT,
            "horizontal" => Self::HORIZONTAL,
            "vertical" => Self::VERTICAL,
            _ => return None,
        })
    }
}

// =============================================================================
// Flex Enums - For layout
// =============================================================================

/// Flex direction for container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FlexDirection {
    #[default]
    Column = 0,
    Row = 1,
    ColumnReverse = 2,
    RowReverse = 3,
}

impl FlexDirection {
    /// Check if this is a row direction (Row or RowReverse).
    pub const fn is_row(&self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    pub fn from_keyword(name: &str) -> Option<Self> {
        Some(match name {
            "column" => Self::Column,
            "row" => Self::Row,
            "column-reverse" => Self::ColumnReverse,
            "row-reverse" => Self::RowReverse,
            _ => return None,
        })
    }
}

/// Flex wrap behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FlexWrap {
    #[default]
    NoWrap = 0,
    Wrap = 1,
    WrapReverse = 2,
}

impl FlexWrap {
    pub fn from_keyword(name: &str) -> Option<Self> {
        Some(match name {
            "nowrap" => Self::NoWrap,
            "wrap" => Self::Wrap,
            "wrap-reverse" => Self::WrapReverse,
            _ => return None,
        })
    }
}

/// Justify content (main axis alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum JustifyContent {
    #[default]
    FlexStart = 0,
    Center = 1,
    FlexEnd = 2,
    SpaceBetween = 3,
    SpaceAround = 4,
    SpaceEvenly = 5,
}

impl JustifyContent {
    pub fn from_keyword(name: &str) -> Option<Self> {
        Some(match name {
            "flex-start" => Self::FlexStart,
            "center" => Self::Center,
            "flex-end" => Self::FlexEnd,
            "space-between" => Self::SpaceBetween,
            "space-around" => Self::SpaceAround,
            "space-evenly" => Self::SpaceEvenly,
            _ => return None,
        })
    }
}

/// Align items (cross axis alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlignItems {
    #[default]
    Stretch = 0,
    FlexStart = 1,
    Center = 2,
    FlexEnd = 3,
    Baseline = 4,
}

impl AlignItems {
    pub fn from_keyword(name: &str) -> Option<Self> {
        Some(match name {
            "stretch" => Self::Stretch,
            "flex-start" => Self::FlexStart,
            "center" => Self::Center,
            "flex-end" => Self::FlexEnd,
            "baseline" => Self::Baseline,
            _ => return None,
        })
    }
}

/// Align self (item override for align items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlignSelf {
    #[default]
    Auto = 0,
    Stretch = 1,
    FlexStart = 2,
    Center = 3,
    FlexEnd = 4,
    Baseline = 5,
}

impl AlignSelf {
    pub fn from_keyword(name: &str) -> Option<Self> {
        Some(match name {
            "auto" => Self::Auto,
            "stretch" => Self::Stretch,
            "flex-start" => Self::FlexStart,
            "center" => Self::Center,
            "flex-end" => Self::FlexEnd,
            "baseline" => Self::Baseline,
            _ => return None,
        })
    }
}

/// Align content (multi-line cross axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlignContent {
    #[default]
    Stretch = 0,
    FlexStart = 1,
    Center = 2,
    FlexEnd = 3,
    SpaceBetween = 4,
    SpaceAround = 5,
}

impl AlignContent {
    pub fn from_keyword(name: &str) -> Option<Self> {
        Some(match name {
            "stretch" => Self::Stretch,
            "flex-start" => Self::FlexStart,
            "center" => Self::Center,
            "flex-end" => Self::FlexEnd,
            "space-between" => Self::SpaceBetween,
            "space-around" => Self::SpaceAround,
            _ => return None,
        })
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// A solved rectangle in parent-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComputedRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl ComputedRect {
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// True when top or left differ from `other`.
    #[inline]
    pub fn position_differs(&self, other: &Self) -> bool {
        self.left != other.left || self.top != other.top
    }

    /// True when width or height differ from `other`.
    #[inline]
    pub fn size_differs(&self, other: &Self) -> bool {
        self.width != other.width || self.height != other.height
    }
}

/// Viewport dimensions fed to the root node.
///
/// Negative and NaN dimensions saturate at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        fn saturate(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.max(0.0) }
        }

        Self {
            width: saturate(width),
            height: saturate(height),
        }
    }
}

impl From<(u16, u16)> for Viewport {
    fn from((width, height): (u16, u16)) -> Self {
        Self::new(width as f32, height as f32)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_parse_hex_forms() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse("000000"), Some(Rgba::BLACK));
        assert_eq!(Rgba::parse("#ff000080"), Some(Rgba::new(255, 0, 0, 128)));
        assert_eq!(Rgba::parse("#12345"), None);
        assert_eq!(Rgba::parse(""), None);
    }

    #[test]
    fn test_edges_composites() {
        assert_eq!(Edges::ALL, Edges::TOP | Edges::RIGHT | Edges::BOTTOM | Edges::LEFT);
        assert!(Edges::HORIZONTAL.contains(Edges::LEFT));
        assert!(!Edges::HORIZONTAL.contains(Edges::TOP));
        assert_eq!(Edges::from_keyword("vertical"), Some(Edges::VERTICAL));
        assert_eq!(Edges::from_keyword("start"), None);
    }

    #[test]
    fn test_flex_keywords() {
        assert_eq!(FlexDirection::from_keyword("row"), Some(FlexDirection::Row));
        assert!(FlexDirection::Row.is_row());
        assert_eq!(FlexWrap::from_keyword("wrap"), Some(FlexWrap::Wrap));
        assert_eq!(
            JustifyContent::from_keyword("space-around"),
            Some(JustifyContent::SpaceAround)
        );
        assert_eq!(AlignSelf::from_keyword("auto"), Some(AlignSelf::Auto));
        assert_eq!(AlignItems::from_keyword("diagonal"), None);
    }

    #[test]
    fn test_rect_deltas() {
        let a = ComputedRect::new(10.0, 20.0, 50.0, 50.0);
        let b = ComputedRect::new(10.0, 20.0, 80.0, 50.0);
        assert!(!a.position_differs(&b));
        assert!(a.size_differs(&b));

        let c = ComputedRect::new(15.0, 20.0, 50.0, 50.0);
        assert!(a.position_differs(&c));
    }

    #[test]
    fn test_viewport_saturates() {
        let vp = Viewport::new(-5.0, f32::NAN);
        assert_eq!(vp.width, 0.0);
        assert_eq!(vp.height, 0.0);

        let vp = Viewport::from((80u16, 24u16));
        assert_eq!(vp, Viewport::new(80.0, 24.0));
    }
}
