/// Core error types for Tilawa
use thiserror::Error;

use crate::segment_index::SegmentIssue;

/// Result type alias using `TranscriptError`
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Errors raised while loading or checking a transcript timeline
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The timeline has overlapping, unsorted or degenerate segments
    #[error("Invalid timeline: {} issue(s), first: {}", .0.len(), first_issue(.0))]
    InvalidTimeline(Vec<SegmentIssue>),

    /// Transcript JSON could not be parsed
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn first_issue(issues: &[SegmentIssue]) -> String {
    issues
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}

impl TranscriptError {
    /// Issues carried by an `InvalidTimeline` error, empty for other variants
    pub fn issues(&self) -> &[SegmentIssue] {
        match self {
            Self::InvalidTimeline(issues) => issues,
            _ => &[],
        }
    }
}
