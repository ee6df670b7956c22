//! Segment locator
//!
//! Bridges clock ticks to segment lookups. The locator remembers the last
//! active segment and reports `changed` only when a tick lands in a different
//! one, so hosts re-render highlight state at segment boundaries instead of
//! on every animation frame.

use serde::{Deserialize, Serialize};

use crate::segment_index::SegmentIndex;
use crate::types::sentinel;

/// Locator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocatorState {
    /// No track attached or player hidden; nothing is highlighted
    #[default]
    Inactive,

    /// Receiving ticks
    Tracking,
}

/// Result of feeding one tick to the locator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorUpdate {
    /// Whether the active segment differs from the previous tick
    pub changed: bool,

    /// Active segment after this tick
    pub index: Option<usize>,
}

/// Tracks the active segment across ticks
#[derive(Debug, Clone, Default)]
pub struct SegmentLocator {
    state: LocatorState,
    active: Option<usize>,
}

impl SegmentLocator {
    /// Create an inactive locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting ticks
    pub fn activate(&mut self) {
        if self.state == LocatorState::Inactive {
            tracing::trace!("Segment locator tracking");
        }
        self.state = LocatorState::Tracking;
    }

    /// Stop accepting ticks and drop the active segment
    ///
    /// Returns the segment that was active, so the caller can clear its
    /// highlight.
    pub fn deactivate(&mut self) -> Option<usize> {
        self.state = LocatorState::Inactive;
        self.active.take()
    }

    /// Forget the active segment while keeping the current state
    pub fn reset(&mut self) -> Option<usize> {
        self.active.take()
    }

    /// Recompute the active segment for `time`
    ///
    /// While inactive nothing is looked up and `index` is always `None`.
    pub fn update(&mut self, index: &SegmentIndex, time: f64) -> LocatorUpdate {
        if self.state == LocatorState::Inactive {
            tracing::trace!(time, "Tick ignored by inactive locator");
            return LocatorUpdate {
                changed: false,
                index: None,
            };
        }

        let next = index.lookup(time);
        let changed = next != self.active;
        if changed {
            tracing::trace!(
                time,
                from = sentinel(self.active),
                to = sentinel(next),
                "Active segment changed"
            );
            self.active = next;
        }

        LocatorUpdate {
            changed,
            index: next,
        }
    }

    /// Currently active segment
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Current lifecycle state
    pub fn state(&self) -> LocatorState {
        self.state
    }

    /// Whether ticks are being tracked
    pub fn is_tracking(&self) -> bool {
        self.state == LocatorState::Tracking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_verses() -> SegmentIndex {
        SegmentIndex::from_spans([(0.0, 10.0, "A"), (10.0, 20.0, "B")])
    }

    #[test]
    fn reports_each_boundary_crossing_once() {
        let index = two_verses();
        let mut locator = SegmentLocator::new();
        locator.activate();

        let mut changes = Vec::new();
        for tick in 0..200 {
            let time = f64::from(tick) * 0.1;
            let update = locator.update(&index, time);
            if update.changed {
                changes.push(update.index);
            }
        }

        assert_eq!(changes, vec![Some(0), Some(1)]);
    }

    #[test]
    fn crossing_from_first_to_second_verse() {
        let index = two_verses();
        let mut locator = SegmentLocator::new();
        locator.activate();

        assert_eq!(
            locator.update(&index, 9.9),
            LocatorUpdate {
                changed: true,
                index: Some(0)
            }
        );
        assert_eq!(
            locator.update(&index, 9.95),
            LocatorUpdate {
                changed: false,
                index: Some(0)
            }
        );
        assert_eq!(
            locator.update(&index, 10.1),
            LocatorUpdate {
                changed: true,
                index: Some(1)
            }
        );
    }

    #[test]
    fn leaving_the_timeline_is_a_change() {
        let index = two_verses();
        let mut locator = SegmentLocator::new();
        locator.activate();

        locator.update(&index, 19.0);
        let update = locator.update(&index, 20.0);

        assert!(update.changed);
        assert_eq!(update.index, None);
        assert_eq!(locator.active(), None);
    }

    #[test]
    fn inactive_locator_ignores_ticks() {
        let index = two_verses();
        let mut locator = SegmentLocator::new();

        let update = locator.update(&index, 5.0);
        assert!(!update.changed);
        assert_eq!(update.index, None);
        assert_eq!(locator.state(), LocatorState::Inactive);
    }

    #[test]
    fn deactivate_clears_stale_highlight() {
        let index = two_verses();
        let mut locator = SegmentLocator::new();
        locator.activate();
        locator.update(&index, 15.0);

        assert_eq!(locator.deactivate(), Some(1));
        assert_eq!(locator.active(), None);

        // Re-activating on a new track starts from nothing
        locator.activate();
        let update = locator.update(&index, 15.0);
        assert!(update.changed);
    }

    #[test]
    fn reset_keeps_tracking() {
        let index = two_verses();
        let mut locator = SegmentLocator::new();
        locator.activate();
        locator.update(&index, 3.0);

        assert_eq!(locator.reset(), Some(0));
        assert!(locator.is_tracking());
        assert!(locator.update(&index, 3.0).changed);
    }
}
