//! Render-ready view of a session
//!
//! Everything a host needs to draw the player in one value: fill widths,
//! control availability and time labels.

use serde::{Deserialize, Serialize};
use tilawa_core::format_clock;

use crate::types::{PlaybackState, SessionState};

/// Which controls are usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    /// Play/pause button enabled
    pub can_play: bool,

    /// Skip buttons and the scrubber enabled
    pub can_skip: bool,

    /// Spinner shown in place of the play button
    pub show_spinner: bool,
}

impl Controls {
    pub(crate) fn derive(state: &PlaybackState, has_source: bool, stalled: bool) -> Self {
        Self {
            can_play: has_source && !state.is_loading,
            can_skip: !state.is_loading && state.duration_known(),
            show_spinner: has_source && (state.is_loading || stalled),
        }
    }
}

/// Snapshot of everything the player UI draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub state: SessionState,
    pub playback: PlaybackState,

    /// Title of the attached track
    pub title: Option<String>,

    /// Progress fill width, percent; follows the drag while dragging
    pub progress_percent: f64,

    /// Buffered fill width, percent
    pub buffered_percent: f64,

    /// Knob drawn without hover
    pub knob_visible: bool,

    /// Highlighted segment
    pub active_segment: Option<usize>,

    pub controls: Controls,

    /// Position label, `mm:ss`
    pub elapsed_label: String,

    /// Duration label, `mm:ss` (`00:00` while unknown)
    pub duration_label: String,
}

impl PlaybackSnapshot {
    pub(crate) fn labels(displayed_time: f64, duration: Option<f64>) -> (String, String) {
        (
            format_clock(displayed_time),
            format_clock(duration.unwrap_or(f64::NAN)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_while_loading() {
        let controls = Controls::derive(&PlaybackState::loading(), true, false);
        assert!(!controls.can_play);
        assert!(!controls.can_skip);
        assert!(controls.show_spinner);
    }

    #[test]
    fn controls_once_ready() {
        let state = PlaybackState {
            duration: Some(120.0),
            ..PlaybackState::default()
        };
        let controls = Controls::derive(&state, true, false);
        assert!(controls.can_play);
        assert!(controls.can_skip);
        assert!(!controls.show_spinner);
    }

    #[test]
    fn stalled_playback_shows_spinner_but_stays_playable() {
        let state = PlaybackState {
            duration: Some(120.0),
            is_playing: true,
            ..PlaybackState::default()
        };
        let controls = Controls::derive(&state, true, true);
        assert!(controls.show_spinner);
        assert!(controls.can_play);
        assert!(controls.can_skip);
    }

    #[test]
    fn controls_without_source() {
        let controls = Controls::derive(&PlaybackState::default(), false, false);
        assert_eq!(controls, Controls::default());
    }

    #[test]
    fn labels_for_unknown_duration() {
        let (elapsed, total) = PlaybackSnapshot::labels(61.0, None);
        assert_eq!(elapsed, "01:01");
        assert_eq!(total, "00:00");
    }
}
