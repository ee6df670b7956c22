//! Redraw loop scheduling
//!
//! The engine advances on animation frames rather than on the media's own
//! coarse time events. At most one frame is pending at a time. The pending
//! frame must be cancelled whenever playback pauses, ends, or the source
//! changes; a leaked frame would keep polling a dead or replaced source.

/// Platform frame request id (`requestAnimationFrame`'s return value on the web)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i64);

/// Platform redraw-loop primitive
pub trait FrameScheduler {
    /// Ask for one callback on the next frame
    ///
    /// Returns `None` when the platform refuses the request; no callback
    /// will follow.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Withdraw a previously requested frame
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Bookkeeping for the single pending frame
#[derive(Debug, Default)]
pub struct TickLoop {
    pending: Option<FrameHandle>,
    ticks: u64,
}

impl TickLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame unless one is already pending
    ///
    /// A refused request leaves the loop stopped, so the next `start`
    /// asks again.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.pending.is_some() {
            return;
        }
        match scheduler.request_frame() {
            Some(handle) => {
                tracing::trace!(handle = handle.0, "Frame requested");
                self.pending = Some(handle);
            }
            None => tracing::warn!("Frame request refused, redraw loop stopped"),
        }
    }

    /// Cancel the pending frame, if any
    pub fn cancel(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            tracing::trace!(handle = handle.0, "Frame cancelled");
            scheduler.cancel_frame(handle);
        }
    }

    /// Consume a delivered frame
    ///
    /// Returns `false` for frames that are not the pending one: callbacks
    /// that fired after a cancel, or that belong to a replaced source.
    pub fn accept(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            self.ticks += 1;
            true
        } else {
            tracing::trace!(handle = handle.0, "Stale frame dropped");
            false
        }
    }

    /// Whether a frame is pending
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Frame currently awaited
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames accepted since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Recording scheduler for unit tests
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    pub struct FakeSchedulerState {
        pub next_id: i64,
        pub refuse: bool,
        pub requested: Vec<FrameHandle>,
        pub cancelled: Vec<FrameHandle>,
    }

    impl FakeSchedulerState {
        /// Requested frames that were neither cancelled nor delivered yet
        pub fn outstanding(&self) -> Vec<FrameHandle> {
            self.requested
                .iter()
                .filter(|h| !self.cancelled.contains(h))
                .copied()
                .collect()
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct FakeScheduler(pub Rc<RefCell<FakeSchedulerState>>);

    impl FakeScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn last_requested(&self) -> Option<FrameHandle> {
            self.0.borrow().requested.last().copied()
        }

        pub fn state(&self) -> std::cell::Ref<'_, FakeSchedulerState> {
            self.0.borrow()
        }
    }

    impl FrameScheduler for FakeScheduler {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            let mut state = self.0.borrow_mut();
            if state.refuse {
                return None;
            }
            state.next_id += 1;
            let handle = FrameHandle(state.next_id);
            state.requested.push(handle);
            Some(handle)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.0.borrow_mut().cancelled.push(handle);
        }
    }
}
