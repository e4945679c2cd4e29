//! Primitives - boxes and their style.
//!
//! - [`style`] - style schema, split into layout constraints and visual attributes
//! - [`box_primitive`] - per-box controller that animates layout changes
//!
//! # Architecture
//!
//! Every box owns one layout node. Boxes never solve layout themselves: they
//! write constraints, raise the dirty signal through their [`LayoutTrigger`]
//! and react to the coalesced layout-updated signal once the root has solved.

mod box_primitive;
pub mod style;
mod types;

pub use box_primitive::{BoxController, Phase};
pub use style::{LayoutKey, LayoutProperty, LayoutStyle, Style, StyleValue, VisualStyle};
pub use types::{BoxContext, BoxProps, LayoutTrigger};
