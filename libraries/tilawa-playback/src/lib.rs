//! Tilawa - Playback Engine
//!
//! Time-synchronized audio playback for recitation transcripts.
//!
//! This crate provides:
//! - A playback session state machine (idle, loading, paused, playing, ended)
//! - A per-frame redraw loop that tracks the active transcript segment
//! - Scrubber interaction (click-to-seek, drag with live preview)
//! - Skip by a configurable offset, clamped to the track
//! - Minimal highlight patches for the transcript view
//! - Player configuration from `tilawa.toml` and `TILAWA_*` variables
//!
//! # Architecture
//!
//! `tilawa-playback` is platform-agnostic. The platform provides three
//! primitives through traits:
//! - [`MediaElement`] - plays the audio and reports position and buffering
//! - [`FrameScheduler`] - delivers redraw frames
//! - [`PointerCapture`] - routes document-level pointer events during drags
//!
//! Browser implementations live behind the `wasm` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tilawa_core::{SegmentIndex, TrackDescriptor};
//! use tilawa_playback::{
//!     FrameHandle, FrameScheduler, MediaElement, MediaEvent, PlaybackSession, PlayerConfig,
//!     Result, TimeRange,
//! };
//!
//! struct NativePlayer;
//!
//! impl MediaElement for NativePlayer {
//!     fn load(&mut self, _src: &str) {}
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 { 0.0 }
//!     fn set_current_time(&mut self, _seconds: f64) {}
//!     fn duration(&self) -> f64 { 180.0 }
//!     fn buffered(&self) -> Vec<TimeRange> { Vec::new() }
//!     fn is_paused(&self) -> bool { true }
//! }
//!
//! struct VsyncScheduler(i64);
//!
//! impl FrameScheduler for VsyncScheduler {
//!     fn request_frame(&mut self) -> Option<FrameHandle> {
//!         self.0 += 1;
//!         Some(FrameHandle(self.0))
//!     }
//!     fn cancel_frame(&mut self, _handle: FrameHandle) {}
//! }
//!
//! let mut session = PlaybackSession::new(
//!     PlayerConfig::default(),
//!     Box::new(NativePlayer),
//!     Box::new(VsyncScheduler(0)),
//! );
//!
//! let transcript = SegmentIndex::from_spans([(0.0, 6.5, "verse 1"), (6.5, 14.0, "verse 2")]);
//! session.attach(
//!     TrackDescriptor::new("/audio/fatiha.mp3", "Al-Fatiha"),
//!     Arc::new(transcript),
//! );
//! session.handle_media_event(MediaEvent::LoadedMetadata);
//! session.play();
//!
//! for event in session.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

mod clock;
mod config;
mod error;
mod events;
mod frame;
mod media;
mod scrubber;
mod session;
pub mod types;
mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use clock::{ClockSample, PlaybackClock};
pub use self::config::PlayerConfig;
pub use error::{PlaybackError, Result};
pub use events::SessionEvent;
pub use frame::{FrameHandle, FrameScheduler, TickLoop};
pub use media::{last_range_end, MediaElement, TimeRange};
pub use scrubber::{BarGeometry, DragStep, NoopCapture, PointerCapture, ScrubMode, ScrubberController};
pub use session::PlaybackSession;
pub use types::{MediaEvent, PlaybackState, SessionState};
pub use view::{Controls, PlaybackSnapshot};
