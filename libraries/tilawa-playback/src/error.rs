//! Error types for playback

use thiserror::Error;
use tilawa_core::TranscriptError;

/// Playback errors
///
/// Control operations (play, seek, skip, scrubbing) recover from these
/// internally and log instead of returning them; see [`crate::PlaybackSession`].
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No media source is attached
    #[error("No source attached")]
    NoSource,

    /// Duration has not been reported yet
    #[error("Duration unknown")]
    DurationUnknown,

    /// The platform refused to start playback without a user gesture
    #[error("Autoplay blocked: {0}")]
    AutoplayBlocked(String),

    /// Media failed to load or decode
    #[error("Media error: {0}")]
    Media(String),

    /// Invalid or unreadable player configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transcript could not be loaded
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
