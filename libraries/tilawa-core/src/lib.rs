//! Tilawa Core
//!
//! Platform-agnostic transcript timeline types for Tilawa.
//!
//! This crate provides the pieces of the synchronized-reading engine that do
//! not depend on any media backend:
//! - **Segments**: timed transcript units (a verse or a commentary sentence)
//! - **Segment Index**: the immutable, ordered timeline for one audio track
//! - **Segment Locator**: maps playback ticks to the active segment, reporting
//!   only real changes
//! - **Highlight Renderer**: derives per-segment highlight flags and minimal
//!   patches for the host UI
//! - **Time helpers**: `mm:ss` labels and division-safe percentages
//!
//! # Example
//!
//! ```rust
//! use tilawa_core::{SegmentIndex, SegmentLocator};
//!
//! let index = SegmentIndex::from_spans([
//!     (0.0, 10.0, "In the name of God"),
//!     (10.0, 20.0, "Praise be to God"),
//! ]);
//!
//! let mut locator = SegmentLocator::new();
//! locator.activate();
//!
//! let first = locator.update(&index, 9.9);
//! assert!(first.changed);
//! assert_eq!(first.index, Some(0));
//!
//! let second = locator.update(&index, 10.1);
//! assert!(second.changed);
//! assert_eq!(second.index, Some(1));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod highlight;
pub mod locator;
pub mod segment_index;
pub mod time;
pub mod types;

pub use error::{Result, TranscriptError};
pub use highlight::{render, HighlightPatch, HighlightTracker, HighlightedSegment};
pub use locator::{LocatorState, LocatorUpdate, SegmentLocator};
pub use segment_index::{SegmentIndex, SegmentIssue};
pub use time::{format_clock, ratio_percent};
pub use types::{sentinel, Segment, TrackDescriptor};
