//! Playback clock adapter
//!
//! Wraps a [`MediaElement`] and presents a uniform surface to the rest of the
//! engine: a normalized duration (`None` until metadata is known), clamped
//! seeks, and one [`ClockSample`] per tick that every consumer of that tick
//! reads from.

use crate::error::{PlaybackError, Result};
use crate::media::{last_range_end, MediaElement};
use tilawa_core::ratio_percent;

/// Clock readings taken once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSample {
    /// Position in seconds
    pub current_time: f64,

    /// Track length, `None` while unknown
    pub duration: Option<f64>,

    /// End of the last buffered range in seconds
    pub buffered_end: f64,

    /// `buffered_end` as a percentage of the duration, `0.0` while unknown
    pub buffered_percent: f64,
}

/// Adapter over the platform media element
pub struct PlaybackClock {
    media: Box<dyn MediaElement>,
    duration: Option<f64>,
    current_time: f64,
    buffered_end: f64,
    is_playing: bool,
}

/// Treat NaN, infinite (live streams) and non-positive durations as unknown
fn normalize_duration(raw: f64) -> Option<f64> {
    (raw.is_finite() && raw > 0.0).then_some(raw)
}

impl PlaybackClock {
    /// Wrap a media element
    pub fn new(media: Box<dyn MediaElement>) -> Self {
        Self {
            media,
            duration: None,
            current_time: 0.0,
            buffered_end: 0.0,
            is_playing: false,
        }
    }

    /// Load a new source and forget everything about the previous one
    pub fn load(&mut self, src: &str) {
        self.clear();
        self.media.load(src);
    }

    /// Stop and forget the current source without loading another
    pub fn clear(&mut self) {
        self.media.pause();
        self.duration = None;
        self.current_time = 0.0;
        self.buffered_end = 0.0;
        self.is_playing = false;
    }

    /// Request playback
    ///
    /// A refusal (browser autoplay policy) is logged and leaves the clock
    /// paused; it is not an error for the caller.
    pub fn play(&mut self) -> bool {
        match self.media.play() {
            Ok(()) => {
                self.is_playing = true;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Playback request rejected");
                self.is_playing = false;
                false
            }
        }
    }

    /// Pause playback (idempotent)
    pub fn pause(&mut self) {
        self.media.pause();
        self.is_playing = false;
    }

    /// Seek to `time`, clamped to `[0, duration]`
    ///
    /// Returns the position actually applied. Fails only while the duration
    /// is unknown, since there is no bound to clamp against.
    pub fn seek(&mut self, time: f64) -> Result<f64> {
        let duration = self.duration.ok_or(PlaybackError::DurationUnknown)?;
        let target = if time.is_nan() {
            self.current_time
        } else {
            time.clamp(0.0, duration)
        };

        self.media.set_current_time(target);
        self.current_time = target;
        tracing::trace!(requested = time, applied = target, "Seek");
        Ok(target)
    }

    /// Move by `delta` seconds from the live media position, clamped
    pub fn skip(&mut self, delta: f64) -> Result<f64> {
        let from = self.media.current_time();
        self.seek(from + delta)
    }

    /// Read the duration once metadata has arrived
    pub fn metadata_loaded(&mut self) -> Option<f64> {
        self.duration = normalize_duration(self.media.duration());
        if self.duration.is_none() {
            tracing::warn!(
                raw = self.media.duration(),
                "Metadata loaded without a usable duration"
            );
        }
        self.duration
    }

    /// Playback reached the end of the media
    pub fn mark_ended(&mut self) {
        self.is_playing = false;
        if let Some(duration) = self.duration {
            self.current_time = duration;
        }
    }

    /// Take an asynchronous play rejection reported by the platform
    pub fn poll_rejection(&mut self) -> Option<String> {
        let reason = self.media.poll_play_rejection()?;
        self.is_playing = false;
        Some(reason)
    }

    /// Read position and buffering for this tick
    pub fn sample(&mut self) -> ClockSample {
        let time = self.media.current_time();
        if time.is_finite() {
            self.current_time = time.max(0.0);
        }
        self.refresh_buffered();

        ClockSample {
            current_time: self.current_time,
            duration: self.duration,
            buffered_end: self.buffered_end,
            buffered_percent: self.buffered_percent(),
        }
    }

    /// Re-read the buffered ranges without touching the position
    ///
    /// Downloading continues while paused, when no ticks arrive.
    pub fn refresh_buffered(&mut self) {
        self.buffered_end = last_range_end(&self.media.buffered());
    }

    /// Buffered end as a percentage of duration
    pub fn buffered_percent(&self) -> f64 {
        ratio_percent(self.buffered_end, self.duration)
    }

    /// Position as of the last sample or seek
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn buffered_end(&self) -> f64 {
        self.buffered_end
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether the underlying element reports itself paused
    pub fn media_paused(&self) -> bool {
        self.media.is_paused()
    }
}

impl std::fmt::Debug for PlaybackClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackClock")
            .field("duration", &self.duration)
            .field("current_time", &self.current_time)
            .field("buffered_end", &self.buffered_end)
            .field("is_playing", &self.is_playing)
            .finish_non_exhaustive()
    }
}
