//! # spark-motion
//!
//! Layout-driven box animation for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactive surfaces and [Taffy](https://github.com/DioxusLabs/taffy) for
//! flexbox layout.
//!
//! ## Architecture
//!
//! Boxes describe constraints; a single root solves layout; boxes then
//! animate from where they were to where they are. Three signal channels
//! coordinate this, each coalesced to at most one dispatch per frame:
//!
//! ```text
//! external event → SignalBus (coalesced) → RootController (solve)
//!                → SignalBus → BoxController (diff) → PositionAnimator
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Dimension, Edges, flex enums, ComputedRect, Viewport)
//! - [`signals`] - Signal bus and frame scheduler
//! - [`layout`] - Layout nodes over Taffy
//! - [`primitives`] - Style schema and box controllers
//! - [`state`] - Surfaces, easing and the tweener
//! - [`pipeline`] - Root controller, stage and terminal loop

pub mod config;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod signals;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{AnimationConfig, StageConfig};
pub use error::{Error, Result};

pub use layout::{LayoutEngine, LayoutNode, NodeId};

pub use signals::{ListenerId, SignalBus};

pub use primitives::{
    BoxContext, BoxController, BoxProps, LayoutKey, LayoutTrigger, Phase, Style, StyleValue,
};

pub use state::{
    AnimatedProperty, AnimationHandle, Easing, PositionAnimator, PropertyDeltas, Surface,
    SurfaceFrame, Tweener,
};

pub use pipeline::{RootController, Stage};
