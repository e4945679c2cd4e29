//! Layout Module - constraint tree backed by Taffy.
//!
//! # Architecture
//!
//! The layout module uses [Taffy](https://github.com/DioxusLabs/taffy) as an
//! opaque flexbox solver:
//!
//! 1. [`LayoutEngine`] owns the Taffy tree and the set of live node ids
//! 2. [`LayoutNode`] wraps one tree node; typed setters write Taffy styles
//! 3. `calculate_layout()` on the root solves the whole subtree in one call
//! 4. `computed_layout()` reads `{top, left, width, height}` back
//!
//! Nodes only ever hold constraints. Colors and other presentation
//! attributes live in the box controller's visual style.

mod node;
mod taffy_bridge;

pub use node::LayoutNode;
pub use taffy::NodeId;
pub use taffy_bridge::LayoutEngine;
