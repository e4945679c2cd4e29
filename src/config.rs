//! Stage and animation configuration.

use std::time::Duration;

use crate::state::easing::Easing;
use crate::types::Viewport;

/// Animation engine settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Duration of one position transition.
    pub duration: Duration,
    /// Timing curve applied when the caller does not pick one.
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOutQuad,
        }
    }
}

impl AnimationConfig {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Transitions are instant when the duration is zero.
    #[inline]
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }
}

/// Top-level stage settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageConfig {
    /// Target cadence of frame boundaries when driven by the terminal loop.
    pub frame_interval: Duration,
    /// Viewport used at mount. `None` asks the terminal.
    pub initial_viewport: Option<Viewport>,
    pub animation: AnimationConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            initial_viewport: None,
            animation: AnimationConfig::default(),
        }
    }
}

impl StageConfig {
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        // zero would spin the terminal loop
        self.frame_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.initial_viewport = Some(viewport);
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }
}
