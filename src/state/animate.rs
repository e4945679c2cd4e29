//! Position Animation - tweens surface translation between layout passes.
//!
//! Box controllers hand the animator a [`Surface`] and a bundle of
//! [`PropertyDeltas`]. The animator owns the interpolation; the caller only
//! guarantees one bundled call per box per layout update.
//!
//! # Pattern
//!
//! - `animate()` starts tweens and returns immediately
//! - `advance(dt)` is called once per frame and writes interpolated values
//! - A new tween on the same surface and property replaces the running one
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_motion::config::AnimationConfig;
//! use spark_motion::state::{AnimatedProperty, PositionAnimator, PropertyDeltas, Surface, Tweener};
//!
//! let tweener = Tweener::new(AnimationConfig::default());
//! let surface = Surface::new();
//!
//! let mut deltas = PropertyDeltas::new();
//! deltas.insert(AnimatedProperty::TranslateY, 0.0, 100.0);
//! tweener.animate(&surface, deltas);
//!
//! tweener.advance(Duration::from_millis(300));
//! assert_eq!(surface.frame().translate_y, 100.0);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::time::Duration;

use tracing::trace;

use super::surface::{Surface, SurfaceId};
use crate::config::AnimationConfig;
use crate::types::ComputedRect;

// =============================================================================
// PROPERTY DELTAS
// =============================================================================

/// Properties the animator can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimatedProperty {
    TranslateX,
    TranslateY,
}

impl AnimatedProperty {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TranslateX => "translateX",
            Self::TranslateY => "translateY",
        }
    }
}

/// Property name to `(from, to)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDeltas(BTreeMap<AnimatedProperty, (f32, f32)>);

impl PropertyDeltas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position deltas between two rectangles. Only axes that moved get a key.
    pub fn between(previous: &ComputedRect, next: &ComputedRect) -> Self {
        let mut deltas = Self::new();
        if next.left != previous.left {
            deltas.insert(AnimatedProperty::TranslateX, previous.left, next.left);
        }
        if next.top != previous.top {
            deltas.insert(AnimatedProperty::TranslateY, previous.top, next.top);
        }
        deltas
    }

    pub fn insert(&mut self, property: AnimatedProperty, from: f32, to: f32) {
        self.0.insert(property, (from, to));
    }

    pub fn get(&self, property: AnimatedProperty) -> Option<(f32, f32)> {
        self.0.get(&property).copied()
    }

    pub fn contains(&self, property: AnimatedProperty) -> bool {
        self.0.contains_key(&property)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimatedProperty, (f32, f32))> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

// =============================================================================
// ANIMATOR
// =============================================================================

/// Handle returned for a started animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

/// Facade over an animation engine.
pub trait PositionAnimator {
    /// Start animating `target` through `deltas`. Returns `None` when there
    /// was nothing to animate.
    fn animate(&self, target: &Surface, deltas: PropertyDeltas) -> Option<AnimationHandle>;

    /// Move running animations forward by `dt`. Returns how many remain.
    fn advance(&self, _dt: Duration) -> usize {
        0
    }
}

struct Tween {
    handle: AnimationHandle,
    target: Surface,
    property: AnimatedProperty,
    from: f32,
    to: f32,
    elapsed: Duration,
}

/// Frame-driven tween engine.
pub struct Tweener {
    config: AnimationConfig,
    tweens: RefCell<Vec<Tween>>,
    next_handle: Cell<u64>,
}

impl Tweener {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            tweens: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Number of running tweens.
    pub fn active(&self) -> usize {
        self.tweens.borrow().len()
    }

    pub fn is_animating(&self, surface: SurfaceId) -> bool {
        self.tweens.borrow().iter().any(|t| t.target.id() == surface)
    }

    pub fn is_running(&self, handle: AnimationHandle) -> bool {
        self.tweens.borrow().iter().any(|t| t.handle == handle)
    }
}

impl Default for Tweener {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl PositionAnimator for Tweener {
    fn animate(&self, target: &Surface, deltas: PropertyDeltas) -> Option<AnimationHandle> {
        if deltas.is_empty() {
            return None;
        }

        let handle = AnimationHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);

        let mut tweens = self.tweens.borrow_mut();
        for (property, (from, to)) in deltas.iter() {
            tweens.retain(|t| !(t.target.id() == target.id() && t.property == property));

            if self.config.is_instant() {
                target.set_property(property, to);
                continue;
            }

            target.set_property(property, from);
            tweens.push(Tween {
                handle,
                target: target.clone(),
                property,
                from,
                to,
                elapsed: Duration::ZERO,
            });
        }

        trace!(surface = target.id().raw(), properties = deltas.len(), "animate");
        Some(handle)
    }

    fn advance(&self, dt: Duration) -> usize {
        let duration = self.config.duration;
        let easing = self.config.easing;

        let mut tweens = self.tweens.borrow_mut();
        tweens.retain_mut(|tween| {
            tween.elapsed += dt;
            let running = tween.elapsed < duration;
            let value = if running {
                let t = tween.elapsed.as_secs_f32() / duration.as_secs_f32();
                easing.interpolate(tween.from, tween.to, t)
            } else {
                tween.to
            };
            tween.target.set_property(tween.property, value);
            running
        });
        tweens.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::easing::Easing;

    fn setup() -> (Tweener, Surface) {
        let config = AnimationConfig::default()
            .with_duration(Duration::from_millis(100))
            .with_easing(Easing::Linear);
        (Tweener::new(config), Surface::new())
    }

    fn deltas(pairs: &[(AnimatedProperty, f32, f32)]) -> PropertyDeltas {
        let mut deltas = PropertyDeltas::new();
        for &(property, from, to) in pairs {
            deltas.insert(property, from, to);
        }
        deltas
    }

    #[test]
    fn test_between_only_moved_axes() {
        let prev = ComputedRect::new(0.0, 0.0, 10.0, 10.0);
        let next = ComputedRect::new(5.0, 0.0, 20.0, 20.0);

        let d = PropertyDeltas::between(&prev, &next);
        assert_eq!(d.len(), 1);
        assert_eq!(d.get(AnimatedProperty::TranslateY), Some((0.0, 5.0)));
        assert!(!d.contains(AnimatedProperty::TranslateX));

        assert!(PropertyDeltas::between(&prev, &prev).is_empty());
    }

    #[test]
    fn test_empty_deltas_not_animated() {
        let (tweener, surface) = setup();
        assert!(tweener.animate(&surface, PropertyDeltas::new()).is_none());
        assert_eq!(tweener.active(), 0);
    }

    #[test]
    fn test_advance_interpolates_to_target() {
        let (tweener, surface) = setup();
        let handle = tweener
            .animate(&surface, deltas(&[(AnimatedProperty::TranslateX, 0.0, 100.0)]))
            .unwrap();

        assert_eq!(surface.frame().translate_x, 0.0);
        assert!(tweener.is_running(handle));

        assert_eq!(tweener.advance(Duration::from_millis(50)), 1);
        assert!((surface.frame().translate_x - 50.0).abs() < 1e-3);

        assert_eq!(tweener.advance(Duration::from_millis(50)), 0);
        assert_eq!(surface.frame().translate_x, 100.0);
        assert!(!tweener.is_animating(surface.id()));
    }

    #[test]
    fn test_axes_move_in_lockstep() {
        let (tweener, surface) = setup();
        tweener.animate(
            &surface,
            deltas(&[
                (AnimatedProperty::TranslateX, 0.0, 10.0),
                (AnimatedProperty::TranslateY, 0.0, 20.0),
            ]),
        );

        tweener.advance(Duration::from_millis(25));
        let frame = surface.frame();
        assert!((frame.translate_x * 2.0 - frame.translate_y).abs() < 1e-3);
    }

    #[test]
    fn test_new_tween_overrides_same_property() {
        let (tweener, surface) = setup();
        tweener.animate(&surface, deltas(&[(AnimatedProperty::TranslateY, 0.0, 100.0)]));
        tweener.advance(Duration::from_millis(50));

        tweener.animate(&surface, deltas(&[(AnimatedProperty::TranslateY, 100.0, 40.0)]));
        assert_eq!(tweener.active(), 1);

        tweener.advance(Duration::from_millis(100));
        assert_eq!(surface.frame().translate_y, 40.0);
    }

    #[test]
    fn test_instant_config_jumps() {
        let tweener = Tweener::new(AnimationConfig::default().with_duration(Duration::ZERO));
        let surface = Surface::new();

        tweener.animate(&surface, deltas(&[(AnimatedProperty::TranslateX, 3.0, 9.0)]));

        assert_eq!(tweener.active(), 0);
        assert_eq!(surface.frame().translate_x, 9.0);
    }
}
