//! Frame scheduler - queue of callbacks run at the next frame boundary.
//!
//! The host decides when a boundary happens (a paint tick, a terminal poll
//! timeout, a test step). Callbacks requested while a boundary is running are
//! deferred to the following one, so a chain of re-requests always advances
//! one frame per hop.

use std::cell::{Cell, RefCell};

use super::bus::SignalBus;

/// Callback run once at a frame boundary.
pub type FrameCallback = Box<dyn FnOnce(&SignalBus)>;

#[derive(Default)]
pub struct FrameScheduler {
    pending: RefCell<Vec<FrameCallback>>,
    frames: Cell<u64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `callback` for the next boundary.
    pub fn request(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push(callback);
    }

    /// Number of callbacks waiting for the next boundary.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Number of boundaries run so far.
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }

    /// Run every callback queued before this call. Returns how many ran.
    pub(crate) fn run(&self, bus: &SignalBus) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        self.frames.set(self.frames.get() + 1);

        let count = due.len();
        for callback in due {
            callback(bus);
        }
        count
    }
}
