//! Segment index - the static transcript timeline for one audio track
//!
//! An index is built once per track from editorial data and never mutated
//! during playback. Lookups are a linear scan: transcripts hold tens to a few
//! hundred segments, and a scan over that many `f64` pairs is cheaper than
//! keeping a search structure in sync. Switch to `partition_point` if
//! transcripts ever grow unbounded.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::error::{Result, TranscriptError};
use crate::types::Segment;

/// A configuration problem found in a timeline
///
/// Issues never change lookup behavior; they exist so tests and editorial
/// tooling can reject bad data before it ships.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentIssue {
    /// Start or end is NaN or infinite
    #[error("segment at position {position} has a non-finite bound")]
    NonFinite { position: usize },

    /// `start_time >= end_time`
    #[error("segment at position {position} is empty ({start}..{end})")]
    EmptyRange { position: usize, start: f64, end: f64 },

    /// Segment starts before its predecessor
    #[error("segment at position {position} starts before the previous one")]
    OutOfOrder { position: usize },

    /// Segment starts before its predecessor ends
    #[error("segments at positions {first} and {second} overlap")]
    Overlap { first: usize, second: usize },

    /// Two segments share the same ordinal index
    #[error("segment index {index} is used more than once")]
    DuplicateIndex { index: usize },
}

/// Editorial JSON entry; `index` is assigned ordinally when omitted
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    #[serde(default)]
    index: Option<usize>,
    start_time: f64,
    end_time: f64,
    text: String,
}

/// Immutable, ordered sequence of segments
///
/// Deserializes from an array of `{startTime, endTime, text}` objects; an
/// entry without `index` takes its position in the array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentIndex {
    segments: Vec<Segment>,
}

impl<'de> Deserialize<'de> for SegmentIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Vec::<RawSegment>::deserialize(deserializer)?;
        let segments = raw
            .into_iter()
            .enumerate()
            .map(|(position, raw)| Segment {
                index: raw.index.unwrap_or(position),
                start_time: raw.start_time,
                end_time: raw.end_time,
                text: raw.text,
            })
            .collect();
        Ok(Self { segments })
    }
}

impl SegmentIndex {
    /// Create an index from already-numbered segments
    ///
    /// Segments are kept in the given order. Use [`SegmentIndex::validate`]
    /// to check ordering and overlap.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Index with no segments; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from `(start, end, text)` spans, numbering them in order
    pub fn from_spans<I, T>(spans: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, T)>,
        T: Into<String>,
    {
        let segments = spans
            .into_iter()
            .enumerate()
            .map(|(index, (start, end, text))| Segment::new(index, start, end, text))
            .collect();
        Self { segments }
    }

    /// Parse a JSON array of `{startTime, endTime, text}` objects
    pub fn from_json(json: &str) -> Result<Self> {
        let index: Self = serde_json::from_str(json)?;
        tracing::debug!(segments = index.len(), "Loaded transcript timeline");
        Ok(index)
    }

    /// Read a transcript JSON file, as exported by the editorial tooling
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Find the segment whose half-open range contains `time`
    ///
    /// Returns the segment's ordinal `index`, or `None` before the first
    /// segment, at/after the last end, inside gaps, and for NaN. When
    /// segments overlap the first match in order wins.
    pub fn lookup(&self, time: f64) -> Option<usize> {
        if time.is_nan() {
            return None;
        }

        self.segments
            .iter()
            .find(|segment| segment.contains(time))
            .map(|segment| segment.index)
    }

    /// Segment carrying the given ordinal index
    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments
            .get(index)
            .filter(|segment| segment.index == index)
            .or_else(|| self.segments.iter().find(|segment| segment.index == index))
    }

    /// All segments in timeline order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Iterate segments in timeline order
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the index has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First start and last end, if any segments exist
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.segments.first()?;
        let last = self.segments.last()?;
        Some((first.start_time, last.end_time))
    }

    /// Report configuration problems without failing
    pub fn validate(&self) -> Vec<SegmentIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::with_capacity(self.segments.len());

        for (position, segment) in self.segments.iter().enumerate() {
            if !seen.insert(segment.index) {
                issues.push(SegmentIssue::DuplicateIndex {
                    index: segment.index,
                });
            }

            if !segment.start_time.is_finite() || !segment.end_time.is_finite() {
                issues.push(SegmentIssue::NonFinite { position });
                continue;
            }

            if segment.start_time >= segment.end_time {
                issues.push(SegmentIssue::EmptyRange {
                    position,
                    start: segment.start_time,
                    end: segment.end_time,
                });
            }

            if position == 0 {
                continue;
            }

            let previous = &self.segments[position - 1];
            if segment.start_time < previous.start_time {
                issues.push(SegmentIssue::OutOfOrder { position });
            } else if segment.start_time < previous.end_time {
                issues.push(SegmentIssue::Overlap {
                    first: position - 1,
                    second: position,
                });
            }
        }

        issues
    }

    /// Fail with `InvalidTimeline` if [`SegmentIndex::validate`] finds anything
    pub fn ensure_valid(&self) -> Result<()> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(())
        } else {
            tracing::warn!(issues = issues.len(), "Transcript timeline failed validation");
            Err(TranscriptError::InvalidTimeline(issues))
        }
    }
}

impl<'a> IntoIterator for &'a SegmentIndex {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl From<Vec<Segment>> for SegmentIndex {
    fn from(segments: Vec<Segment>) -> Self {
        Self::new(segments)
    }
}
