//! Mount API - stage lifecycle.
//!
//! A [`Stage`] wires one bus, one layout engine, one animator and a
//! [`RootController`] together. Nothing here is global: two stages never
//! see each other's signals.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_motion::config::StageConfig;
//! use spark_motion::pipeline::Stage;
//! use spark_motion::primitives::{BoxProps, Style};
//! use spark_motion::types::Viewport;
//!
//! let config = StageConfig::default().with_viewport(Viewport::new(800.0, 600.0));
//! let stage = Stage::mount(config, BoxProps::new(Style::new().flex_grow(1.0))).unwrap();
//!
//! stage.settle(Duration::from_millis(16), 8);
//! assert_eq!(stage.root().rect().width, 800.0);
//!
//! stage.resize(Viewport::new(400.0, 300.0));
//! stage.settle(Duration::from_millis(16), 8);
//! assert_eq!(stage.root().rect().width, 400.0);
//!
//! stage.unmount().unwrap();
//! ```

use std::rc::Rc;
use std::time::Duration;

use spark_signals::{signal, Signal};
use tracing::{debug, info};

use crate::config::StageConfig;
use crate::error::Result;
use crate::layout::LayoutEngine;
use crate::primitives::{BoxContext, BoxController, BoxProps};
use crate::signals::{SignalBus, RESIZE};
use crate::state::{PositionAnimator, Tweener};
use crate::types::Viewport;

use super::root::RootController;
use super::terminal::detect_viewport;

// =============================================================================
// Stage
// =============================================================================

/// A mounted box tree with its services.
pub struct Stage {
    config: StageConfig,
    bus: Rc<SignalBus>,
    engine: LayoutEngine,
    animator: Rc<dyn PositionAnimator>,
    viewport: Signal<Viewport>,
    root: RootController,
}

impl Stage {
    /// Mount `content` under a new root using the built-in tweener.
    pub fn mount(config: StageConfig, content: BoxProps) -> Result<Self> {
        let animator = Rc::new(Tweener::new(config.animation));
        Self::mount_with_animator(config, content, animator)
    }

    /// Mount with a caller-supplied animator.
    pub fn mount_with_animator(
        config: StageConfig,
        content: BoxProps,
        animator: Rc<dyn PositionAnimator>,
    ) -> Result<Self> {
        let bus = Rc::new(SignalBus::with_layout_channels());
        let engine = LayoutEngine::new();
        let viewport = signal(config.initial_viewport.unwrap_or_else(detect_viewport));
        let boxes = content.count();

        let ctx = BoxContext::new(bus.clone(), engine.clone(), animator.clone());
        let mut root = RootController::new(viewport.clone(), content, &ctx)?;
        root.mount()?;

        info!(
            boxes,
            width = viewport.get().width,
            height = viewport.get().height,
            "stage mounted"
        );

        Ok(Self {
            config,
            bus,
            engine,
            animator,
            viewport,
            root,
        })
    }

    /// Record a new viewport and raise the raw resize signal.
    pub fn resize(&self, viewport: Viewport) {
        debug!(width = viewport.width, height = viewport.height, "resize");
        self.viewport.set(viewport);
        self.bus.publish(RESIZE);
    }

    /// Run one frame boundary, then advance animations by `dt`.
    ///
    /// Returns how many frame callbacks ran.
    pub fn frame(&self, dt: Duration) -> usize {
        let ran = self.bus.frame_boundary();
        self.animator.advance(dt);
        ran
    }

    /// Run frames until no frame work is pending, at most `max_frames`.
    /// Returns the number of frames run.
    pub fn settle(&self, dt: Duration, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.bus.frames().pending() > 0 {
            self.frame(dt);
            frames += 1;
        }
        frames
    }

    /// Tear down the tree. Listeners are removed before nodes.
    pub fn unmount(mut self) -> Result<()> {
        self.root.unmount()?;
        info!("stage unmounted");
        Ok(())
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn bus(&self) -> &Rc<SignalBus> {
        &self.bus
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn root(&self) -> &RootController {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut RootController {
        &mut self.root
    }

    pub fn content(&self) -> &BoxController {
        self.root.content()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Style;

    const DT: Duration = Duration::from_millis(16);

    fn setup() -> Stage {
        let config = StageConfig::default().with_viewport(Viewport::new(200.0, 100.0));
        let content = BoxProps::new(Style::new().flex_grow(1.0))
            .child(BoxProps::new(Style::new().width(20.0).height(20.0)));
        Stage::mount(config, content).unwrap()
    }

    #[test]
    fn test_mount_uses_configured_viewport() {
        let stage = setup();
        assert_eq!(stage.viewport(), Viewport::new(200.0, 100.0));
        assert_eq!(stage.engine().node_count(), 3);
    }

    #[test]
    fn test_settle_reaches_idle() {
        let stage = setup();
        let frames = stage.settle(DT, 10);

        assert_eq!(frames, 2);
        assert_eq!(stage.bus().frames().pending(), 0);
        assert_eq!(stage.content().previous_rect().width, 200.0);
    }

    #[test]
    fn test_resize_reflows_content() {
        let stage = setup();
        stage.settle(DT, 10);

        let child = &stage.content().children()[0];
        let surface = child.surface().unwrap();
        assert_eq!(surface.frame().width, 20.0);

        stage.resize(Viewport::new(50.0, 100.0));
        stage.settle(DT, 10);
        assert_eq!(stage.root().rect().width, 50.0);
    }

    #[test]
    fn test_unmount_frees_nodes() {
        let stage = setup();
        let engine = stage.engine().clone();
        stage.unmount().unwrap();
        assert_eq!(engine.node_count(), 0);
    }
}
