/// Track descriptor supplied by the host page
use serde::{Deserialize, Serialize};

/// Audio track handed to the player by the surrounding page
///
/// The engine never fetches or persists tracks; hosts build these from their
/// own content (a surah recitation, a commentary reading, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDescriptor {
    /// Media URL loaded into the platform player
    pub audio_src: String,

    /// Title shown next to the controls
    pub title: String,
}

impl TrackDescriptor {
    /// Create a new track descriptor
    pub fn new(audio_src: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            audio_src: audio_src.into(),
            title: title.into(),
        }
    }

    /// Whether the descriptor points at an actual source
    pub fn has_source(&self) -> bool {
        !self.audio_src.trim().is_empty()
    }
}
