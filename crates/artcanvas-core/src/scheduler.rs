//! Redraw coalescing.
//!
//! Any number of redraw requests between two display refreshes collapse into
//! a single pending frame. Each request cancels the pending handle and
//! schedules a fresh one; the host fires whichever handle is current when the
//! display is ready. Stale handles are ignored.

/// Handle identifying one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Keeps at most one pending frame.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    pending: Option<FrameHandle>,
    next_id: u64,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending frame and schedule a new one.
    pub fn request(&mut self) -> FrameHandle {
        if let Some(previous) = self.pending.take() {
            log::trace!("Coalescing redraw: cancelled frame {:?}", previous);
        }
        let handle = FrameHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending = Some(handle);
        handle
    }

    /// Cancel the pending frame, if any.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// The frame currently scheduled.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fire a specific frame. Returns true if it was the pending one and a
    /// paint should happen now.
    pub fn fire(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Consume whatever frame is pending. Returns true if a paint is due.
    pub fn take(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
