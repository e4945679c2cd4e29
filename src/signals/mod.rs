//! Signal Bus - event coalescing between layout participants.
//!
//! ```text
//! resize ──┐                    ┌── optimizedResize ──► root: set size, raise dirty
//! dirty  ──┼─► coalesce (frame) ┼── optimizedDirtyLayout ──► root: solve, raise update
//! update ──┘                    └── optimizedUpdateLayout ──► boxes: diff + animate
//! ```

mod bus;
mod frame;
mod names;

pub use bus::{Handler, ListenerId, SignalBus};
pub use frame::{FrameCallback, FrameScheduler};
pub use names::*;
