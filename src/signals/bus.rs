//! Signal Bus - named publish/subscribe with frame coalescing.
//!
//! One bus is constructed at startup and handed to every component that
//! publishes or subscribes. Raw signals dispatch synchronously. A coalesced
//! channel listens to a raw signal and republishes under its own name at
//! most once per frame boundary, with no payload.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use spark_motion::signals::{SignalBus, DIRTY_LAYOUT, OPTIMIZED_DIRTY_LAYOUT};
//!
//! let bus = SignalBus::with_layout_channels();
//! let passes = Rc::new(Cell::new(0));
//! let counter = passes.clone();
//! bus.subscribe(OPTIMIZED_DIRTY_LAYOUT, move |_| {
//!     counter.set(counter.get() + 1);
//!     Ok(())
//! });
//!
//! for _ in 0..50 {
//!     bus.publish(DIRTY_LAYOUT);
//! }
//! bus.frame_boundary();
//! assert_eq!(passes.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::Result;

use super::frame::FrameScheduler;
use super::names::{
    DIRTY_LAYOUT, OPTIMIZED_DIRTY_LAYOUT, OPTIMIZED_RESIZE, OPTIMIZED_UPDATE_LAYOUT, RESIZE,
    UPDATE_LAYOUT,
};

// =============================================================================
// TYPES
// =============================================================================

/// Listener callback. Errors are logged and isolated to the failing listener.
pub type Handler = Rc<dyn Fn(&SignalBus) -> Result<()>>;

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    handler: Handler,
}

// =============================================================================
// BUS
// =============================================================================

#[derive(Default)]
pub struct SignalBus {
    listeners: RefCell<HashMap<String, Vec<Listener>>>,
    live: RefCell<HashSet<ListenerId>>,
    /// Coalesced name -> "dispatch already scheduled" flag.
    channels: RefCell<HashMap<String, Rc<Cell<bool>>>>,
    frames: FrameScheduler,
    next_id: Cell<u64>,
}

impl SignalBus {
    /// Create a bus with no coalesced channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus with the resize, dirty-layout and update-layout channels
    /// installed.
    pub fn with_layout_channels() -> Self {
        let bus = Self::new();
        bus.coalesce(RESIZE, OPTIMIZED_RESIZE);
        bus.coalesce(DIRTY_LAYOUT, OPTIMIZED_DIRTY_LAYOUT);
        bus.coalesce(UPDATE_LAYOUT, OPTIMIZED_UPDATE_LAYOUT);
        bus
    }

    /// Subscribe `handler` to `name`.
    ///
    /// Subscribing from inside a dispatch is allowed; the new listener first
    /// hears the next dispatch of `name`.
    pub fn subscribe<F>(&self, name: &str, handler: F) -> ListenerId
    where
        F: Fn(&SignalBus) -> Result<()> + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.listeners
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(Listener {
                id,
                handler: Rc::new(handler),
            });
        self.live.borrow_mut().insert(id);
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    ///
    /// A listener removed mid-dispatch does not receive the rest of it.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        if !self.live.borrow_mut().remove(&id) {
            return false;
        }
        for list in self.listeners.borrow_mut().values_mut() {
            list.retain(|listener| listener.id != id);
        }
        true
    }

    /// Dispatch `name` synchronously to its current listeners.
    ///
    /// Returns how many listeners were invoked.
    pub fn publish(&self, name: &str) -> usize {
        let snapshot: Vec<(ListenerId, Handler)> = match self.listeners.borrow().get(name) {
            Some(list) => list
                .iter()
                .map(|listener| (listener.id, listener.handler.clone()))
                .collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for (id, handler) in snapshot {
            if !self.live.borrow().contains(&id) {
                continue;
            }
            delivered += 1;
            if let Err(err) = handler(self) {
                tracing::error!(signal = name, listener = id.0, %err, "listener failed");
            }
        }
        delivered
    }

    /// Install a coalesced channel: every `raw` occurrence guarantees one
    /// dispatch of `coalesced` at the next frame boundary, and never more
    /// than one per boundary.
    pub fn coalesce(&self, raw: &str, coalesced: &str) -> ListenerId {
        let scheduled = Rc::new(Cell::new(false));
        self.channels
            .borrow_mut()
            .insert(coalesced.to_string(), scheduled.clone());

        let coalesced = coalesced.to_string();
        self.subscribe(raw, move |bus| {
            if scheduled.get() {
                tracing::trace!(signal = %coalesced, "absorbed into scheduled dispatch");
                return Ok(());
            }
            scheduled.set(true);

            let flag = scheduled.clone();
            let name = coalesced.clone();
            bus.frames.request(Box::new(move |bus: &SignalBus| {
                // cleared first: a raw occurrence raised by a listener below
                // must schedule the next frame instead of being absorbed
                flag.set(false);
                let delivered = bus.publish(&name);
                tracing::debug!(signal = %name, delivered, "coalesced dispatch");
            }));
            Ok(())
        })
    }

    /// True while `coalesced` has a dispatch waiting for the next boundary.
    pub fn is_pending(&self, coalesced: &str) -> bool {
        self.channels
            .borrow()
            .get(coalesced)
            .is_some_and(|flag| flag.get())
    }

    /// Number of live listeners on `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners
            .borrow()
            .get(name)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Run one frame boundary. Returns how many frame callbacks ran.
    pub fn frame_boundary(&self) -> usize {
        self.frames.run(self)
    }

    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn counter(bus: &SignalBus, name: &str) -> Rc<Cell<usize>> {
        let hits = Rc::new(Cell::new(0));
        let hits_for_handler = hits.clone();
        bus.subscribe(name, move |_| {
            hits_for_handler.set(hits_for_handler.get() + 1);
            Ok(())
        });
        hits
    }

    #[test]
    fn test_raw_publish_is_synchronous() {
        let bus = SignalBus::new();
        let hits = counter(&bus, "ping");

        assert_eq!(bus.publish("ping"), 1);
        assert_eq!(bus.publish("ping"), 1);
        assert_eq!(hits.get(), 2);
        assert_eq!(bus.publish("nobody-listens"), 0);
    }

    #[test]
    fn test_coalescing_minimality() {
        let bus = SignalBus::with_layout_channels();
        let hits = counter(&bus, OPTIMIZED_DIRTY_LAYOUT);

        for _ in 0..1000 {
            bus.publish(DIRTY_LAYOUT);
        }
        assert_eq!(hits.get(), 0);
        assert!(bus.is_pending(OPTIMIZED_DIRTY_LAYOUT));

        bus.frame_boundary();
        assert_eq!(hits.get(), 1);
        assert!(!bus.is_pending(OPTIMIZED_DIRTY_LAYOUT));
    }

    #[test]
    fn test_coalescing_liveness_per_frame() {
        let bus = SignalBus::with_layout_channels();
        let hits = counter(&bus, OPTIMIZED_RESIZE);

        for n in 1..=5 {
            for _ in 0..n {
                bus.publish(RESIZE);
            }
            bus.frame_boundary();
            assert_eq!(hits.get(), n);
        }

        // nothing raised, nothing dispatched
        bus.frame_boundary();
        assert_eq!(hits.get(), 5);
    }

    #[test]
    fn test_channels_are_independent() {
        let bus = SignalBus::with_layout_channels();
        let resize = counter(&bus, OPTIMIZED_RESIZE);
        let dirty = counter(&bus, OPTIMIZED_DIRTY_LAYOUT);
        let update = counter(&bus, OPTIMIZED_UPDATE_LAYOUT);

        bus.publish(RESIZE);
        bus.publish(DIRTY_LAYOUT);
        bus.publish(DIRTY_LAYOUT);
        assert!(!bus.is_pending(OPTIMIZED_UPDATE_LAYOUT));

        bus.frame_boundary();
        assert_eq!((resize.get(), dirty.get(), update.get()), (1, 1, 0));
    }

    #[test]
    fn test_republish_during_dispatch_schedules_next_frame() {
        let bus = SignalBus::with_layout_channels();
        let hits = Rc::new(Cell::new(0));
        let hits_for_handler = hits.clone();
        bus.subscribe(OPTIMIZED_DIRTY_LAYOUT, move |bus| {
            hits_for_handler.set(hits_for_handler.get() + 1);
            if hits_for_handler.get() == 1 {
                bus.publish(DIRTY_LAYOUT);
            }
            Ok(())
        });

        bus.publish(DIRTY_LAYOUT);
        bus.frame_boundary();
        assert_eq!(hits.get(), 1);
        assert!(bus.is_pending(OPTIMIZED_DIRTY_LAYOUT));

        bus.frame_boundary();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_failing_listener_does_not_block_others() {
        let bus = SignalBus::new();
        bus.subscribe("tick", |_| Err(Error::Engine("boom".into())));
        let hits = counter(&bus, "tick");

        assert_eq!(bus.publish("tick"), 2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_skips_removed() {
        let bus = Rc::new(SignalBus::new());
        let victim: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let victim_for_handler = victim.clone();
        bus.subscribe("tick", move |bus| {
            if let Some(id) = victim_for_handler.get() {
                bus.unsubscribe(id);
            }
            Ok(())
        });
        let hits = Rc::new(Cell::new(0));
        let hits_for_handler = hits.clone();
        let id = bus.subscribe("tick", move |_| {
            hits_for_handler.set(hits_for_handler.get() + 1);
            Ok(())
        });
        victim.set(Some(id));

        assert_eq!(bus.publish("tick"), 1);
        assert_eq!(hits.get(), 0);
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.listener_count("tick"), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_waits_for_next() {
        let bus = SignalBus::new();
        let late_hits = Rc::new(Cell::new(0));

        let late_for_handler = late_hits.clone();
        let added = Rc::new(Cell::new(false));
        bus.subscribe("tick", move |bus| {
            if !added.get() {
                added.set(true);
                let late = late_for_handler.clone();
                bus.subscribe("tick", move |_| {
                    late.set(late.get() + 1);
                    Ok(())
                });
            }
            Ok(())
        });

        bus.publish("tick");
        assert_eq!(late_hits.get(), 0);
        bus.publish("tick");
        assert_eq!(late_hits.get(), 1);
    }
}
