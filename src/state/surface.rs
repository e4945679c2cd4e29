//! Surface - the visual target a box draws into.
//!
//! A surface carries the transform the animator writes (`translate_x`,
//! `translate_y`) and the size the box applies directly. The frame lives in a
//! signal so a renderer can read it reactively.

use std::sync::atomic::{AtomicU64, Ordering};

use spark_signals::{signal, Signal};

use super::animate::AnimatedProperty;

static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

/// Identity of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Current visual state of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceFrame {
    pub translate_x: f32,
    pub translate_y: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceFrame {
    pub fn get(&self, property: AnimatedProperty) -> f32 {
        match property {
            AnimatedProperty::TranslateX => self.translate_x,
            AnimatedProperty::TranslateY => self.translate_y,
        }
    }
}

/// Handle to a visual target. Clones share the same frame.
#[derive(Clone)]
pub struct Surface {
    id: SurfaceId,
    frame: Signal<SurfaceFrame>,
}

impl Surface {
    pub fn new() -> Self {
        Self {
            id: SurfaceId(NEXT_SURFACE.fetch_add(1, Ordering::Relaxed)),
            frame: signal(SurfaceFrame::default()),
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn frame(&self) -> SurfaceFrame {
        self.frame.get()
    }

    /// The underlying signal, for reactive readers.
    pub fn signal(&self) -> Signal<SurfaceFrame> {
        self.frame.clone()
    }

    pub fn set_property(&self, property: AnimatedProperty, value: f32) {
        let mut frame = self.frame.get();
        match property {
            AnimatedProperty::TranslateX => frame.translate_x = value,
            AnimatedProperty::TranslateY => frame.translate_y = value,
        }
        self.frame.set(frame);
    }

    pub fn set_size(&self, width: f32, height: f32) {
        let mut frame = self.frame.get();
        frame.width = width;
        frame.height = height;
        self.frame.set(frame);
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("frame", &self.frame.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        let a = Surface::new();
        let b = Surface::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clones_share_frame() {
        let surface = Surface::new();
        let view = surface.clone();

        surface.set_size(100.0, 50.0);
        surface.set_property(AnimatedProperty::TranslateY, -25.0);

        let frame = view.frame();
        assert_eq!(frame.width, 100.0);
        assert_eq!(frame.height, 50.0);
        assert_eq!(frame.translate_y, -25.0);
        assert_eq!(frame.get(AnimatedProperty::TranslateX), 0.0);
    }
}
