//! Primitive types - box props and the shared context boxes are built with.

use std::rc::Rc;

use crate::layout::LayoutEngine;
use crate::signals::{SignalBus, DIRTY_LAYOUT};
use crate::state::PositionAnimator;

use super::style::Style;

// =============================================================================
// Box Props
// =============================================================================

/// Declarative description of one box and its subtree.
#[derive(Debug, Clone, Default)]
pub struct BoxProps {
    /// Optional name, used in logs.
    pub id: Option<String>,
    pub style: Style,
    pub children: Vec<BoxProps>,
}

impl BoxProps {
    pub fn new(style: Style) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn child(mut self, child: BoxProps) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = BoxProps>) -> Self {
        self.children.extend(children);
        self
    }

    /// Boxes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(BoxProps::count).sum::<usize>()
    }
}

// =============================================================================
// Layout Trigger
// =============================================================================

/// Capability to request a layout pass.
///
/// Boxes receive this instead of reaching for the bus directly.
#[derive(Clone)]
pub struct LayoutTrigger(Rc<dyn Fn()>);

impl LayoutTrigger {
    pub fn new(trigger: impl Fn() + 'static) -> Self {
        Self(Rc::new(trigger))
    }

    /// Trigger that raises the raw dirty signal on `bus`.
    pub fn from_bus(bus: &Rc<SignalBus>) -> Self {
        let bus = Rc::downgrade(bus);
        Self::new(move || {
            if let Some(bus) = bus.upgrade() {
                bus.publish(DIRTY_LAYOUT);
            }
        })
    }

    pub fn fire(&self) {
        (self.0)()
    }
}

impl std::fmt::Debug for LayoutTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LayoutTrigger")
    }
}

// =============================================================================
// Box Context
// =============================================================================

/// Services every box in a tree shares.
#[derive(Clone)]
pub struct BoxContext {
    pub bus: Rc<SignalBus>,
    pub engine: LayoutEngine,
    pub animator: Rc<dyn PositionAnimator>,
    pub trigger: LayoutTrigger,
}

impl BoxContext {
    /// Context whose trigger publishes on `bus`.
    pub fn new(bus: Rc<SignalBus>, engine: LayoutEngine, animator: Rc<dyn PositionAnimator>) -> Self {
        let trigger = LayoutTrigger::from_bus(&bus);
        Self {
            bus,
            engine,
            animator,
            trigger,
        }
    }

    pub fn with_trigger(mut self, trigger: LayoutTrigger) -> Self {
        self.trigger = trigger;
        self
    }
}
