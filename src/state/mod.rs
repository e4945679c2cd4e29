//! State Module - animation runtime for box surfaces
//!
//! - **Easing** - timing curves
//! - **Surface** - the visual target a box draws into
//! - **Animate** - position animator facade and the frame-driven tweener

pub mod animate;
pub mod easing;
pub mod surface;

pub use animate::{AnimatedProperty, AnimationHandle, PositionAnimator, PropertyDeltas, Tweener};
pub use easing::Easing;
pub use surface::{Surface, SurfaceFrame, SurfaceId};
