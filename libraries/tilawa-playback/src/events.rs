//! Session events
//!
//! Queued by the session and drained by the host, which applies them to its
//! UI in one place:
//! - State changes (loading/paused/playing/ended)
//! - Source changes and metadata arrival
//! - Active segment changes (with the minimal highlight patch)
//! - Autoplay rejections and media errors
//! - Player dismissal

use serde::{Deserialize, Serialize};
use tilawa_core::HighlightPatch;

use crate::types::SessionState;

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Session state changed
    StateChanged {
        from: SessionState,
        to: SessionState,
    },

    /// A new source was attached (or the source was cleared when `src` is `None`)
    SourceChanged {
        src: Option<String>,
        title: Option<String>,
    },

    /// Duration became known
    MetadataLoaded {
        duration: f64,
    },

    /// The highlighted segment changed
    ActiveSegmentChanged {
        previous: Option<usize>,
        current: Option<usize>,
        /// Spans the host has to restyle
        patch: HighlightPatch,
        /// Produced by a scrubber preview; hosts should not auto-scroll to it
        scrubbing: bool,
    },

    /// Media reached its end
    Ended,

    /// The platform refused to start playback
    PlayRejected {
        reason: String,
    },

    /// Media failed to load or decode
    Error {
        message: String,
    },

    /// The user dismissed the player
    Closed,
}
