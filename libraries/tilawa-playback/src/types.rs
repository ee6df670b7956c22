//! Core types for playback

use serde::{Deserialize, Serialize};

/// Session lifecycle
///
/// `Idle -> Loading -> Paused <-> Playing`, back to `Idle` on every source
/// change. `Paused { ended: true }` is reached when the media finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No source attached
    #[default]
    Idle,

    /// Source attached, metadata not yet known
    Loading,

    /// Ready and not playing
    Paused {
        /// Reached through the media's end rather than a user pause
        ended: bool,
    },

    /// Ready and playing
    Playing,
}

impl SessionState {
    /// Whether metadata has arrived for the current source
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Paused { .. } | Self::Playing)
    }

    /// Short lowercase name, used by the web bindings and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Paused { ended: false } => "paused",
            Self::Paused { ended: true } => "ended",
            Self::Playing => "playing",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable playback state
///
/// Owned by the session; everything else reads copies of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Position in seconds, as last sampled from the clock
    pub current_time: f64,

    /// Track length in seconds, `None` until metadata loads
    pub duration: Option<f64>,

    /// End of the last contiguous buffered range in seconds
    pub buffered_end: f64,

    pub is_playing: bool,

    /// Waiting for metadata or rebuffering
    pub is_loading: bool,

    /// A scrubber drag is in progress
    pub is_dragging: bool,

    /// Last media error, shown inline by the host
    pub error: Option<String>,
}

impl PlaybackState {
    /// State right after a source is attached
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    /// Whether seeking and skipping may be offered
    pub fn duration_known(&self) -> bool {
        self.duration.is_some()
    }
}

/// Media events forwarded by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Duration became known
    LoadedMetadata,

    /// Playback reached the end of the media
    Ended,

    /// Media failed to load or decode
    Error(String),

    /// Playback stalled waiting for data
    Waiting,

    /// Enough data is available to continue
    CanPlay,

    /// More of the media was downloaded
    Progress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_state_has_unknown_duration() {
        let state = PlaybackState::loading();
        assert!(state.is_loading);
        assert!(!state.is_playing);
        assert!(!state.duration_known());
        assert_eq!(state.current_time, 0.0);
    }

    #[test]
    fn session_state_names() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::Paused { ended: true }.as_str(), "ended");
        assert!(SessionState::Playing.is_ready());
        assert!(!SessionState::Loading.is_ready());
    }
}
