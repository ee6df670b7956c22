//! Highlight rendering
//!
//! Two views of the same rule (exactly one segment, or none, is active):
//! - [`render`] derives the full list from its inputs, for initial paint and
//!   for re-renders triggered by unrelated state such as a theme change
//! - [`HighlightTracker`] turns successive active indices into a patch that
//!   touches at most two spans

use serde::{Deserialize, Serialize};

use crate::segment_index::SegmentIndex;
use crate::types::Segment;

/// A segment paired with its highlight flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightedSegment<'a> {
    pub segment: &'a Segment,
    pub is_active: bool,
}

/// Derive highlight flags for every segment
///
/// Pure: the output depends only on `segments` and `active`.
pub fn render(segments: &SegmentIndex, active: Option<usize>) -> Vec<HighlightedSegment<'_>> {
    segments
        .iter()
        .map(|segment| HighlightedSegment {
            segment,
            is_active: active == Some(segment.index),
        })
        .collect()
}

/// Minimal change to apply to an already-rendered transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighlightPatch {
    /// Segment whose highlight must be removed
    pub deactivate: Option<usize>,

    /// Segment that must become highlighted
    pub activate: Option<usize>,
}

impl HighlightPatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.deactivate.is_none() && self.activate.is_none()
    }
}

/// Remembers which segment the host currently shows as highlighted
#[derive(Debug, Clone, Default)]
pub struct HighlightTracker {
    applied: Option<usize>,
}

impl HighlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the highlight to `active`, returning what the host must touch
    pub fn apply(&mut self, active: Option<usize>) -> HighlightPatch {
        if active == self.applied {
            return HighlightPatch::default();
        }

        let patch = HighlightPatch {
            deactivate: self.applied,
            activate: active,
        };
        self.applied = active;
        patch
    }

    /// Drop the highlight entirely (track switch, player closed)
    pub fn clear(&mut self) -> HighlightPatch {
        self.apply(None)
    }

    /// Segment currently shown as highlighted
    pub fn applied(&self) -> Option<usize> {
        self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_verses() -> SegmentIndex {
        SegmentIndex::from_spans([(0.0, 5.0, "A"), (5.0, 10.0, "B"), (10.0, 15.0, "C")])
    }

    #[test]
    fn render_flags_exactly_one_segment() {
        let index = three_verses();
        let rendered = render(&index, Some(1));

        let active: Vec<_> = rendered
            .iter()
            .filter(|entry| entry.is_active)
            .map(|entry| entry.segment.text.as_str())
            .collect();
        assert_eq!(active, vec!["B"]);
    }

    #[test]
    fn render_without_active_segment_flags_nothing() {
        let index = three_verses();
        assert!(render(&index, None).iter().all(|entry| !entry.is_active));
    }

    #[test]
    fn render_is_stable_across_repeated_calls() {
        let index = three_verses();
        assert_eq!(render(&index, Some(2)), render(&index, Some(2)));
    }

    #[test]
    fn tracker_emits_minimal_patches() {
        let mut tracker = HighlightTracker::new();

        assert_eq!(
            tracker.apply(Some(0)),
            HighlightPatch {
                deactivate: None,
                activate: Some(0)
            }
        );
        assert!(tracker.apply(Some(0)).is_empty());
        assert_eq!(
            tracker.apply(Some(1)),
            HighlightPatch {
                deactivate: Some(0),
                activate: Some(1)
            }
        );
        assert_eq!(
            tracker.clear(),
            HighlightPatch {
                deactivate: Some(1),
                activate: None
            }
        );
        assert_eq!(tracker.applied(), None);
    }
}
