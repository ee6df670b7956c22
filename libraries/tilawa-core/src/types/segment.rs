/// Timed transcript segment
use serde::{Deserialize, Serialize};

/// One timed transcript unit: a verse or a commentary sentence
///
/// The time range is half-open: `start_time` is inclusive and `end_time` is
/// exclusive, so two adjacent segments may share a boundary without both
/// matching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Ordinal position in the transcript
    pub index: usize,

    /// Start of the range in seconds (inclusive)
    pub start_time: f64,

    /// End of the range in seconds (exclusive)
    pub end_time: f64,

    /// Text rendered for this segment
    pub text: String,
}

impl Segment {
    /// Create a new segment
    pub fn new(index: usize, start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            index,
            start_time,
            end_time,
            text: text.into(),
        }
    }

    /// Whether `time` falls inside `[start_time, end_time)`
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    /// Length of the segment in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Integer form of an active segment reference, `-1` when nothing is active
///
/// Used at JS boundaries and in log fields where `Option` does not translate.
pub fn sentinel(active: Option<usize>) -> i64 {
    active.map_or(-1, |index| index as i64)
}
