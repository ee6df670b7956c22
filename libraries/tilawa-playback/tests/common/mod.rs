//! Shared test infrastructure for playback integration tests

#![allow(dead_code)]

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::sync::{Arc, Once};

use tilawa_core::{SegmentIndex, TrackDescriptor};
use tilawa_playback::{
    FrameHandle, FrameScheduler, MediaElement, MediaEvent, PlaybackError, PlaybackSession,
    PlayerConfig, PointerCapture, Result, TimeRange,
};

static INIT: Once = Once::new();

/// Initialize logging once per test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// ============================================================================
// Mock media element
// ============================================================================

#[derive(Debug)]
pub struct MediaLog {
    pub src: Option<String>,
    pub loads: usize,
    pub current_time: f64,
    pub duration: f64,
    pub buffered: Vec<TimeRange>,
    pub paused: bool,
    pub seeks: Vec<f64>,
    pub block_play: bool,
    pub late_rejection: Option<String>,
}

impl Default for MediaLog {
    fn default() -> Self {
        Self {
            src: None,
            loads: 0,
            current_time: 0.0,
            duration: f64::NAN,
            buffered: Vec::new(),
            paused: true,
            seeks: Vec::new(),
            block_play: false,
            late_rejection: None,
        }
    }
}

/// Scriptable media element; clones share state
#[derive(Debug, Clone, Default)]
pub struct MockMedia(Rc<RefCell<MediaLog>>);

impl MockMedia {
    pub fn log(&self) -> Ref<'_, MediaLog> {
        self.0.borrow()
    }

    pub fn log_mut(&self) -> RefMut<'_, MediaLog> {
        self.0.borrow_mut()
    }

    /// Playback advanced to `seconds` on its own
    pub fn advance_to(&self, seconds: f64) {
        self.0.borrow_mut().current_time = seconds;
    }

    /// Metadata arrived with this duration
    pub fn set_duration(&self, seconds: f64) {
        self.0.borrow_mut().duration = seconds;
    }
}

impl MediaElement for MockMedia {
    fn load(&mut self, src: &str) {
        let mut log = self.0.borrow_mut();
        log.src = Some(src.to_string());
        log.loads += 1;
        log.current_time = 0.0;
        log.duration = f64::NAN;
        log.buffered.clear();
        log.paused = true;
    }

    fn play(&mut self) -> Result<()> {
        let mut log = self.0.borrow_mut();
        if log.block_play {
            return Err(PlaybackError::AutoplayBlocked("NotAllowedError".to_string()));
        }
        log.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.borrow_mut().paused = true;
    }

    fn current_time(&self) -> f64 {
        self.0.borrow().current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut log = self.0.borrow_mut();
        log.current_time = seconds;
        log.seeks.push(seconds);
    }

    fn duration(&self) -> f64 {
        self.0.borrow().duration
    }

    fn buffered(&self) -> Vec<TimeRange> {
        self.0.borrow().buffered.clone()
    }

    fn is_paused(&self) -> bool {
        self.0.borrow().paused
    }

    fn poll_play_rejection(&mut self) -> Option<String> {
        self.0.borrow_mut().late_rejection.take()
    }
}

// ============================================================================
// Mock frame scheduler
// ============================================================================

#[derive(Debug, Default)]
pub struct FrameLog {
    pub next_id: i64,
    pub refuse: bool,
    pub requested: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
}

#[derive(Debug, Clone, Default)]
pub struct MockScheduler(Rc<RefCell<FrameLog>>);

impl MockScheduler {
    pub fn log(&self) -> Ref<'_, FrameLog> {
        self.0.borrow()
    }

    pub fn last_requested(&self) -> Option<FrameHandle> {
        self.0.borrow().requested.last().copied()
    }

    /// Make later frame requests fail, as a throttled tab might
    pub fn set_refuse(&self, refuse: bool) {
        self.0.borrow_mut().refuse = refuse;
    }
}

impl FrameScheduler for MockScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let mut log = self.0.borrow_mut();
        if log.refuse {
            return None;
        }
        log.next_id += 1;
        let handle = FrameHandle(log.next_id);
        log.requested.push(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.0.borrow_mut().cancelled.push(handle);
    }
}

// ============================================================================
// Mock pointer capture
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MockCapture(Rc<RefCell<(usize, usize)>>);

impl MockCapture {
    pub fn is_attached(&self) -> bool {
        let (attached, detached) = *self.0.borrow();
        attached > detached
    }

    pub fn attach_count(&self) -> usize {
        self.0.borrow().0
    }
}

impl PointerCapture for MockCapture {
    fn attach(&mut self) {
        self.0.borrow_mut().0 += 1;
    }

    fn detach(&mut self) {
        self.0.borrow_mut().1 += 1;
    }
}

// ============================================================================
// Player harness
// ============================================================================

pub struct Player {
    pub session: PlaybackSession,
    pub media: MockMedia,
    pub scheduler: MockScheduler,
    pub capture: MockCapture,
    pub time_updates: Rc<RefCell<Vec<f64>>>,
}

impl Player {
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        init_tracing();

        let media = MockMedia::default();
        let scheduler = MockScheduler::default();
        let capture = MockCapture::default();
        let mut session = PlaybackSession::new(
            config,
            Box::new(media.clone()),
            Box::new(scheduler.clone()),
        )
        .with_pointer_capture(Box::new(capture.clone()));

        let time_updates = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&time_updates);
        session.set_on_time_update(move |time| sink.borrow_mut().push(time));

        Self {
            session,
            media,
            scheduler,
            capture,
            time_updates,
        }
    }

    /// Attach a track without delivering metadata
    pub fn attach(&mut self, src: &str, segments: SegmentIndex) {
        self.session
            .attach(TrackDescriptor::new(src, "Recitation"), Arc::new(segments));
    }

    /// Attach a track and deliver metadata with `duration`
    pub fn attach_ready(&mut self, src: &str, segments: SegmentIndex, duration: f64) {
        self.attach(src, segments);
        self.media.set_duration(duration);
        self.session.handle_media_event(MediaEvent::LoadedMetadata);
    }

    /// Let playback run to `seconds` and deliver the pending frame
    pub fn tick_at(&mut self, seconds: f64) {
        self.media.advance_to(seconds);
        if let Some(handle) = self.scheduler.last_requested() {
            self.session.on_frame(handle);
        }
    }
}

/// Two ten-second verses
pub fn two_verses() -> SegmentIndex {
    SegmentIndex::from_spans([(0.0, 10.0, "A"), (10.0, 20.0, "B")])
}

/// Verses with an intro silence and a gap
pub fn surah_with_gaps() -> SegmentIndex {
    SegmentIndex::from_spans([
        (4.0, 11.5, "bismillah"),
        (11.5, 19.0, "alhamdu"),
        (20.0, 27.25, "ar-rahman"),
        (27.25, 33.0, "maliki"),
    ])
}
