//! Layout Pipeline
//!
//! Connects the signal bus, the root controller and the terminal.
//!
//! # Pipeline Architecture
//!
//! ```text
//! resize/dirty → coalesce (frame) → RootController solve → update → BoxController diff → animator
//! ```
//!
//! ## Frame Ordering
//!
//! 1. **resize** - the root copies the viewport into its node and raises dirty
//! 2. **dirty** - the root solves the whole tree once and raises update
//! 3. **update** - every box compares its rectangle and animates if it moved
//!
//! Each step is dispatched on its own frame boundary, so any number of raw
//! signals within one frame collapse into one step.

pub mod mount;
pub mod root;
pub mod terminal;

pub use mount::Stage;
pub use root::RootController;
pub use terminal::{detect_viewport, is_quit, run, tick, viewport_from_event};
