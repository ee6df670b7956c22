//! Platform-agnostic media element trait
//!
//! Abstracts the platform playback primitive (an HTML media element on the
//! web, a native player elsewhere). Decoding and network transport stay on
//! the platform side; the engine only reads positions and issues commands.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One contiguous buffered range, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// End of the last buffered range, `0.0` when nothing is buffered
///
/// Disjoint earlier ranges are not represented; the progress bar shows a
/// single buffered fill.
pub fn last_range_end(ranges: &[TimeRange]) -> f64 {
    ranges
        .last()
        .map(|range| range.end)
        .filter(|end| end.is_finite() && *end > 0.0)
        .unwrap_or(0.0)
}

/// Platform media playback primitive
///
/// All commands are fire-and-forget: the engine never waits for the platform
/// to act on them and observes the outcome on the next tick.
pub trait MediaElement {
    /// Point the element at a new source and start loading it
    ///
    /// Must discard the previous source's position, duration and buffer.
    fn load(&mut self, src: &str);

    /// Start playback
    ///
    /// # Returns
    /// * `Ok(())` - Playback requested (it may still be rejected later, see
    ///   [`MediaElement::poll_play_rejection`])
    /// * `Err(PlaybackError::AutoplayBlocked)` - Refused synchronously
    fn play(&mut self) -> Result<()>;

    /// Pause playback; calling it while paused is harmless
    fn pause(&mut self);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Move the playhead, in seconds
    fn set_current_time(&mut self, seconds: f64);

    /// Track length in seconds; NaN or infinite until metadata is known
    fn duration(&self) -> f64;

    /// Buffered ranges in ascending order
    fn buffered(&self) -> Vec<TimeRange>;

    /// Whether the element is paused
    fn is_paused(&self) -> bool;

    /// Take an asynchronous play rejection, if one arrived since the last call
    ///
    /// Platforms whose `play` resolves later (the web's promise-returning
    /// `play()`) report rejections here.
    fn poll_play_rejection(&mut self) -> Option<String> {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_range_end_uses_final_range() {
        let ranges = [TimeRange::new(0.0, 12.0), TimeRange::new(30.0, 54.0)];
        assert_eq!(last_range_end(&ranges), 54.0);
    }

    #[test]
    fn last_range_end_without_ranges_is_zero() {
        assert_eq!(last_range_end(&[]), 0.0);
        assert_eq!(last_range_end(&[TimeRange::new(0.0, f64::NAN)]), 0.0);
    }
}
