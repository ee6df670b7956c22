//! Playback session - core orchestration
//!
//! Binds the clock, tick loop, scrubber, locator and highlight tracker for one
//! player instance. Create one session per visible player and drop it (or
//! call [`PlaybackSession::close`]) when the player unmounts; nothing here is
//! global.
//!
//! Everything runs on the host's single event thread. Ordering matters only
//! at source boundaries: the pending frame and any drag capture are released
//! before a new source is loaded, so no callback from the previous track can
//! write into the next one.

use std::sync::Arc;

use tilawa_core::{
    render, sentinel, HighlightTracker, HighlightedSegment, SegmentIndex, SegmentLocator,
    TrackDescriptor,
};

use crate::{
    clock::{ClockSample, PlaybackClock},
    config::PlayerConfig,
    error::{PlaybackError, Result},
    events::SessionEvent,
    frame::{FrameHandle, FrameScheduler, TickLoop},
    media::MediaElement,
    scrubber::{BarGeometry, NoopCapture, PointerCapture, ScrubberController},
    types::{MediaEvent, PlaybackState, SessionState},
    view::{Controls, PlaybackSnapshot},
};

type TimeUpdateCallback = Box<dyn FnMut(f64)>;
type CloseCallback = Box<dyn FnMut()>;

/// Top-level playback state machine
///
/// Orchestrates:
/// - Source lifecycle (attach, detach, close)
/// - Play/pause and skip by offset
/// - The redraw loop driving ticks while playing
/// - Scrubber clicks and drags
/// - Active segment tracking and highlight patches
pub struct PlaybackSession {
    // State
    state: SessionState,
    track: Option<TrackDescriptor>,
    segments: Arc<SegmentIndex>,
    error: Option<String>,
    stalled: bool,
    visible: bool,

    // Components
    clock: PlaybackClock,
    scheduler: Box<dyn FrameScheduler>,
    tick_loop: TickLoop,
    scrubber: ScrubberController,
    locator: SegmentLocator,
    highlight: HighlightTracker,

    // Settings
    config: PlayerConfig,

    // Host callbacks
    on_time_update: Option<TimeUpdateCallback>,
    on_close: Option<CloseCallback>,

    // Event queue for UI synchronization
    pending_events: Vec<SessionEvent>,
}

impl PlaybackSession {
    /// Create a session over a platform media element and frame scheduler
    ///
    /// Pointer capture defaults to [`NoopCapture`]; use
    /// [`PlaybackSession::with_pointer_capture`] when the platform needs
    /// document-level listeners for drags.
    pub fn new(
        config: PlayerConfig,
        media: Box<dyn MediaElement>,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Self {
        let scrubber = ScrubberController::new(config.scrub_mode, Box::new(NoopCapture));

        Self {
            state: SessionState::Idle,
            track: None,
            segments: Arc::new(SegmentIndex::empty()),
            error: None,
            stalled: false,
            visible: true,
            clock: PlaybackClock::new(media),
            scheduler,
            tick_loop: TickLoop::new(),
            scrubber,
            locator: SegmentLocator::new(),
            highlight: HighlightTracker::new(),
            config,
            on_time_update: None,
            on_close: None,
            pending_events: Vec::new(),
        }
    }

    /// Use a platform pointer capture for drags
    pub fn with_pointer_capture(mut self, capture: Box<dyn PointerCapture>) -> Self {
        self.scrubber = ScrubberController::new(self.config.scrub_mode, capture);
        self
    }

    /// Called with the playback position on every tick and after every seek
    ///
    /// Lets a host follow the same audio with a different transcript.
    pub fn set_on_time_update(&mut self, callback: impl FnMut(f64) + 'static) {
        self.on_time_update = Some(Box::new(callback));
    }

    /// Called once when the user dismisses the player
    pub fn set_on_close(&mut self, callback: impl FnMut() + 'static) {
        self.on_close = Some(Box::new(callback));
    }

    // ===== Source Lifecycle =====

    /// Attach a track and its transcript, replacing whatever was attached
    ///
    /// Position resets to zero, duration becomes unknown and the highlight is
    /// cleared before the new source starts loading. A descriptor without a
    /// source behaves like [`PlaybackSession::detach`].
    pub fn attach(&mut self, track: TrackDescriptor, segments: Arc<SegmentIndex>) {
        if !track.has_source() {
            tracing::debug!(title = %track.title, "Track without source, detaching");
            self.detach();
            return;
        }

        self.teardown();
        self.set_state(SessionState::Idle);

        tracing::debug!(
            src = %track.audio_src,
            title = %track.title,
            segments = segments.len(),
            "Attaching source"
        );

        self.clock.load(&track.audio_src);
        self.segments = segments;
        self.pending_events.push(SessionEvent::SourceChanged {
            src: Some(track.audio_src.clone()),
            title: Some(track.title.clone()),
        });
        self.track = Some(track);

        if self.visible {
            self.locator.activate();
        }
        self.set_state(SessionState::Loading);
    }

    /// Attach a track with its transcript given as editorial JSON
    ///
    /// Timeline issues (overlaps, mis-ordering) are logged and the transcript
    /// is still used; lookup stays deterministic. Malformed JSON leaves the
    /// current source untouched.
    pub fn attach_json(&mut self, track: TrackDescriptor, json: &str) -> Result<()> {
        if !track.has_source() {
            return Err(PlaybackError::NoSource);
        }

        let segments = SegmentIndex::from_json(json)?;
        for issue in segments.validate() {
            tracing::warn!(%issue, title = %track.title, "Transcript timeline issue");
        }

        self.attach(track, Arc::new(segments));
        Ok(())
    }

    /// Release the current source
    pub fn detach(&mut self) {
        let had_track = self.track.is_some();

        self.teardown();
        self.clock.clear();
        self.track = None;
        self.segments = Arc::new(SegmentIndex::empty());
        self.set_state(SessionState::Idle);

        if had_track {
            tracing::debug!("Source detached");
            self.pending_events.push(SessionEvent::SourceChanged {
                src: None,
                title: None,
            });
        }
    }

    /// Dismiss the player: detach and notify the host
    pub fn close(&mut self) {
        self.detach();
        self.pending_events.push(SessionEvent::Closed);
        if let Some(callback) = self.on_close.as_mut() {
            callback();
        }
    }

    /// Cancel everything tied to the current source
    fn teardown(&mut self) {
        self.tick_loop.cancel(self.scheduler.as_mut());
        self.scrubber.cancel();
        self.clear_highlight();
        self.error = None;
        self.stalled = false;
    }

    /// Show or hide the player
    ///
    /// A hidden player keeps its source but stops tracking segments, so no
    /// stale highlight survives while it is off screen.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;

        if !visible {
            self.clear_highlight();
        } else if self.track.is_some() {
            self.locator.activate();
            let time = self.displayed_time();
            self.locate(time);
        }
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// Ignored until metadata has loaded. Returns whether playback is running
    /// afterwards; a platform refusal is reported as
    /// [`SessionEvent::PlayRejected`] and leaves the session paused.
    pub fn play(&mut self) -> bool {
        match self.state {
            SessionState::Playing => {
                self.tick_loop.start(self.scheduler.as_mut());
                true
            }
            SessionState::Idle | SessionState::Loading => {
                tracing::debug!(state = %self.state, "Play ignored before metadata");
                false
            }
            SessionState::Paused { .. } => {
                if self.clock.play() {
                    self.set_state(SessionState::Playing);
                    self.tick_loop.start(self.scheduler.as_mut());
                    true
                } else {
                    self.pending_events.push(SessionEvent::PlayRejected {
                        reason: "playback was not allowed to start".to_string(),
                    });
                    false
                }
            }
        }
    }

    /// Pause playback (idempotent)
    pub fn pause(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }

        self.clock.pause();
        self.tick_loop.cancel(self.scheduler.as_mut());
        self.set_state(SessionState::Paused { ended: false });

        // Freeze position and highlight where the media actually stopped
        let sample = self.clock.sample();
        self.apply_sample(sample);
    }

    /// Play if paused, pause if playing
    pub fn toggle(&mut self) -> bool {
        if self.state == SessionState::Playing {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    /// Move by `delta` seconds, clamped to the track
    ///
    /// No-op while loading or while the duration is unknown. Returns the
    /// applied position.
    pub fn skip(&mut self, delta: f64) -> Option<f64> {
        if !self.can_seek() {
            tracing::trace!(delta, "Skip ignored, duration unknown");
            return None;
        }

        match self.clock.skip(delta) {
            Ok(time) => {
                self.after_seek(time);
                Some(time)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skip failed");
                None
            }
        }
    }

    /// Skip forward by the configured offset
    pub fn skip_forward(&mut self) -> Option<f64> {
        self.skip(self.config.skip_seconds)
    }

    /// Skip backward by the configured offset
    pub fn skip_backward(&mut self) -> Option<f64> {
        self.skip(-self.config.skip_seconds)
    }

    /// Seek to `time` in seconds, clamped to the track
    pub fn seek(&mut self, time: f64) -> Option<f64> {
        if !self.can_seek() {
            tracing::trace!(time, "Seek ignored, duration unknown");
            return None;
        }

        match self.clock.seek(time) {
            Ok(applied) => {
                self.after_seek(applied);
                Some(applied)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Seek failed");
                None
            }
        }
    }

    fn can_seek(&self) -> bool {
        self.state.is_ready() && self.clock.duration().is_some()
    }

    fn after_seek(&mut self, time: f64) {
        if let SessionState::Paused { ended: true } = self.state {
            if self.clock.duration().is_some_and(|d| time < d) {
                self.set_state(SessionState::Paused { ended: false });
            }
        }

        self.locate(time);
        self.notify_time(time);
    }

    // ===== Media Events =====

    /// Feed a platform media event into the state machine
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if self.track.is_none() {
            tracing::trace!(?event, "Media event without source ignored");
            return;
        }

        match event {
            MediaEvent::LoadedMetadata => self.on_metadata_loaded(),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::Error(message) => self.on_media_error(message),
            MediaEvent::Waiting => self.stalled = true,
            MediaEvent::CanPlay => self.stalled = false,
            MediaEvent::Progress => self.clock.refresh_buffered(),
        }
    }

    fn on_metadata_loaded(&mut self) {
        let Some(duration) = self.clock.metadata_loaded() else {
            // Stays in Loading; the host keeps showing the spinner
            return;
        };

        tracing::debug!(duration, "Metadata loaded");
        self.pending_events
            .push(SessionEvent::MetadataLoaded { duration });

        if self.state == SessionState::Loading {
            self.set_state(SessionState::Paused { ended: false });
        }

        let sample = self.clock.sample();
        self.apply_sample(sample);
    }

    fn on_ended(&mut self) {
        if !self.state.is_ready() {
            return;
        }

        self.clock.mark_ended();
        self.tick_loop.cancel(self.scheduler.as_mut());
        self.set_state(SessionState::Paused { ended: true });
        self.pending_events.push(SessionEvent::Ended);

        let time = self.clock.current_time();
        self.locate(time);
        self.notify_time(time);
    }

    fn on_media_error(&mut self, message: String) {
        tracing::warn!(error = %message, "Media error");

        self.tick_loop.cancel(self.scheduler.as_mut());
        self.clock.pause();
        if self.state == SessionState::Playing {
            self.set_state(SessionState::Paused { ended: false });
        }

        self.error = Some(message.clone());
        self.pending_events.push(SessionEvent::Error { message });
    }

    // ===== Tick Loop =====

    /// Deliver a frame requested through the [`FrameScheduler`]
    ///
    /// Frames that were cancelled, or that belong to a previous source, are
    /// dropped. While playing, each accepted frame samples the clock once,
    /// feeds that sample to the locator and the host, then requests the next
    /// frame.
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if !self.tick_loop.accept(handle) {
            return;
        }
        if self.state != SessionState::Playing {
            return;
        }

        if let Some(reason) = self.clock.poll_rejection() {
            tracing::warn!(%reason, "Playback rejected by platform");
            self.set_state(SessionState::Paused { ended: false });
            self.pending_events
                .push(SessionEvent::PlayRejected { reason });
            return;
        }

        let sample = self.clock.sample();
        self.apply_sample(sample);

        self.tick_loop.start(self.scheduler.as_mut());
    }

    /// Route one clock sample to the locator and the host
    fn apply_sample(&mut self, sample: ClockSample) {
        match self.scrubber.preview_time() {
            Some(preview) => {
                self.locate(preview);
                if self.config.emit_time_updates_while_dragging {
                    self.notify_time(preview);
                }
            }
            None => {
                self.locate(sample.current_time);
                self.notify_time(sample.current_time);
            }
        }
    }

    // ===== Scrubber =====

    /// Click on the progress bar
    pub fn click(&mut self, pointer_x: f64, geometry: BarGeometry) -> Option<f64> {
        if !self.can_seek() {
            return None;
        }
        let target = self
            .scrubber
            .on_click(pointer_x, geometry, self.clock.duration())?;
        self.seek(target)
    }

    /// Pointer pressed on the progress bar
    pub fn drag_start(&mut self, pointer_x: f64, geometry: BarGeometry) -> bool {
        if !self.can_seek() {
            return false;
        }
        if !self
            .scrubber
            .on_drag_start(pointer_x, geometry, self.clock.duration())
        {
            return false;
        }

        self.preview_drag();
        true
    }

    /// Pointer moved anywhere in the document during a drag
    pub fn drag_move(&mut self, pointer_x: f64) {
        let Some(step) = self.scrubber.on_drag_move(pointer_x) else {
            return;
        };

        if let Some(target) = step.seek {
            if let Err(e) = self.clock.seek(target) {
                tracing::debug!(error = %e, "Live scrub seek failed");
            }
        }
        self.preview_drag();
    }

    /// Pointer released, committing the drag with a single seek
    pub fn drag_end(&mut self, pointer_x: Option<f64>) -> Option<f64> {
        let target = self.scrubber.on_drag_end(pointer_x)?;
        self.seek(target)
    }

    /// Abandon a drag without seeking
    ///
    /// The highlight returns to the segment under the playback position.
    pub fn cancel_drag(&mut self) {
        if !self.scrubber.is_dragging() {
            return;
        }
        self.scrubber.cancel();

        let time = self.clock.current_time();
        self.locate(time);
        self.notify_time(time);
    }

    fn preview_drag(&mut self) {
        let Some(preview) = self.scrubber.preview_time() else {
            return;
        };
        self.locate(preview);
        if self.config.emit_time_updates_while_dragging {
            self.notify_time(preview);
        }
    }

    // ===== Highlighting =====

    fn locate(&mut self, time: f64) {
        let update = self.locator.update(&self.segments, time);
        if !update.changed {
            return;
        }

        let previous = self.highlight.applied();
        let patch = self.highlight.apply(update.index);
        tracing::trace!(
            from = sentinel(previous),
            to = sentinel(update.index),
            time,
            "Highlight moved"
        );
        self.pending_events.push(SessionEvent::ActiveSegmentChanged {
            previous,
            current: update.index,
            patch,
            scrubbing: self.scrubber.is_dragging(),
        });
    }

    fn clear_highlight(&mut self) {
        self.locator.deactivate();
        let previous = self.highlight.applied();
        let patch = self.highlight.clear();
        if !patch.is_empty() {
            self.pending_events.push(SessionEvent::ActiveSegmentChanged {
                previous,
                current: None,
                patch,
                scrubbing: false,
            });
        }
    }

    fn notify_time(&mut self, time: f64) {
        if let Some(callback) = self.on_time_update.as_mut() {
            callback(time);
        }
    }

    // ===== State Queries =====

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current observable playback state
    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState {
            current_time: self.clock.current_time(),
            duration: self.clock.duration(),
            buffered_end: self.clock.buffered_end(),
            is_playing: self.state == SessionState::Playing,
            is_loading: self.state == SessionState::Loading,
            is_dragging: self.scrubber.is_dragging(),
            error: self.error.clone(),
        }
    }

    /// Highlighted segment
    pub fn active_segment(&self) -> Option<usize> {
        self.highlight.applied()
    }

    /// Transcript of the attached track
    pub fn segments(&self) -> &SegmentIndex {
        &self.segments
    }

    /// Full transcript with highlight flags
    pub fn highlighted(&self) -> Vec<HighlightedSegment<'_>> {
        render(&self.segments, self.active_segment())
    }

    pub fn track(&self) -> Option<&TrackDescriptor> {
        self.track.as_ref()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a frame is pending
    pub fn is_ticking(&self) -> bool {
        self.tick_loop.is_running()
    }

    /// Time shown by the UI: the drag preview while dragging, the clock otherwise
    pub fn displayed_time(&self) -> f64 {
        self.scrubber
            .preview_time()
            .unwrap_or_else(|| self.clock.current_time())
    }

    /// Everything the player UI draws
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let playback = self.playback_state();
        let progress_percent = self
            .scrubber
            .progress_percent(playback.current_time, playback.duration);
        let (elapsed_label, duration_label) =
            PlaybackSnapshot::labels(self.displayed_time(), playback.duration);

        PlaybackSnapshot {
            state: self.state,
            title: self.track.as_ref().map(|t| t.title.clone()),
            progress_percent,
            buffered_percent: self.clock.buffered_percent(),
            knob_visible: self.scrubber.knob_visible(progress_percent),
            active_segment: self.active_segment(),
            controls: Controls::derive(&playback, self.track.is_some(), self.stalled),
            elapsed_label,
            duration_label,
            playback,
        }
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// The host should call this after every operation or frame and apply
    /// the events in order.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state == state {
            return;
        }

        tracing::debug!(from = %self.state, to = %state, "Session state changed");
        self.pending_events.push(SessionEvent::StateChanged {
            from: self.state,
            to: state,
        });
        self.state = state;
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.tick_loop.cancel(self.scheduler.as_mut());
        self.scrubber.cancel();
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("state", &self.state)
            .field("track", &self.track)
            .field("segments", &self.segments.len())
            .field("clock", &self.clock)
            .field("scrubber", &self.scrubber)
            .field("active_segment", &self.highlight.applied())
            .finish_non_exhaustive()
    }
}
