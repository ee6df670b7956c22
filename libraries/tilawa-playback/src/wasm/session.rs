//! WASM-compatible PlaybackSession wrapper

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use js_sys::Function;
use tilawa_core::{sentinel, SegmentIndex, TrackDescriptor};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlMediaElement, PointerEvent};

use super::frame::WebFrameScheduler;
use super::media::{describe_media_error, WebMediaElement};
use super::pointer::DocumentPointerCapture;
use crate::{
    BarGeometry, FrameHandle, MediaEvent, PlaybackSession, PlayerConfig, SessionEvent,
};

/// Media element events forwarded to the session
const MEDIA_EVENTS: [&str; 6] = [
    "loadedmetadata",
    "ended",
    "error",
    "waiting",
    "canplay",
    "progress",
];

#[derive(Default, Clone)]
struct Callbacks {
    on_event: Option<Function>,
    on_time_update: Option<Function>,
    on_close: Option<Function>,
}

/// State reachable from browser callbacks
struct Shared {
    session: RefCell<PlaybackSession>,
    element: HtmlMediaElement,
    times: Rc<RefCell<Vec<f64>>>,
    callbacks: RefCell<Callbacks>,
}

impl Shared {
    /// Run `f` against the session, then dispatch what it produced
    ///
    /// JavaScript callbacks run after the session borrow is released, so they
    /// may call back into the player.
    fn with_session<R>(&self, f: impl FnOnce(&mut PlaybackSession) -> R) -> Option<R> {
        let (result, events) = {
            let Ok(mut session) = self.session.try_borrow_mut() else {
                tracing::warn!("Re-entrant player call ignored");
                return None;
            };
            let result = f(&mut session);
            (result, session.drain_events())
        };

        let times = std::mem::take(&mut *self.times.borrow_mut());
        self.dispatch(times, events);
        Some(result)
    }

    fn dispatch(&self, times: Vec<f64>, events: Vec<SessionEvent>) {
        let callbacks = self.callbacks.borrow().clone();

        if let Some(cb) = callbacks.on_time_update.as_ref() {
            for time in times {
                cb.call1(&JsValue::NULL, &JsValue::from_f64(time)).ok();
            }
        }

        for event in events {
            if event == SessionEvent::Closed {
                if let Some(cb) = callbacks.on_close.as_ref() {
                    cb.call0(&JsValue::NULL).ok();
                }
            }
            if let Some(cb) = callbacks.on_event.as_ref() {
                if let Ok(js_event) = serde_wasm_bindgen::to_value(&event) {
                    cb.call1(&JsValue::NULL, &js_event).ok();
                }
            }
        }
    }
}

fn upgrade_and_run<R>(weak: &Weak<Shared>, f: impl FnOnce(&mut PlaybackSession) -> R) -> Option<R> {
    weak.upgrade()?.with_session(f)
}

fn media_event(name: &str, element: &HtmlMediaElement) -> Option<MediaEvent> {
    match name {
        "loadedmetadata" => Some(MediaEvent::LoadedMetadata),
        "ended" => Some(MediaEvent::Ended),
        "error" => Some(MediaEvent::Error(describe_media_error(element))),
        "waiting" => Some(MediaEvent::Waiting),
        "canplay" => Some(MediaEvent::CanPlay),
        "progress" => Some(MediaEvent::Progress),
        _ => None,
    }
}

/// WASM-compatible playback session
///
/// Owns one `<audio>` element's player: it listens to the element's media
/// events, drives the redraw loop with `requestAnimationFrame`, and captures
/// the pointer at document level during scrubber drags.
#[wasm_bindgen]
pub struct WasmPlaybackSession {
    shared: Rc<Shared>,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

#[wasm_bindgen]
impl WasmPlaybackSession {
    /// Create a player for `element`
    ///
    /// `config` is an optional object with `skip_seconds`, `scrub_mode`
    /// (`"seek_on_release"` or `"live"`) and `emit_time_updates_while_dragging`.
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlMediaElement, config: JsValue) -> Result<WasmPlaybackSession, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let pending = Rc::new(Cell::new(0));
            let on_frame = {
                let weak = weak.clone();
                let pending = Rc::clone(&pending);
                Closure::wrap(Box::new(move |_timestamp: f64| {
                    upgrade_and_run(&weak, |s| s.on_frame(FrameHandle(pending.get())));
                }) as Box<dyn FnMut(f64)>)
            };
            let scheduler = WebFrameScheduler::new(window, pending, on_frame);

            let on_move = {
                let weak = weak.clone();
                Closure::wrap(Box::new(move |event: PointerEvent| {
                    upgrade_and_run(&weak, |s| s.drag_move(f64::from(event.client_x())));
                }) as Box<dyn FnMut(PointerEvent)>)
            };
            let on_up = {
                let weak = weak.clone();
                Closure::wrap(Box::new(move |event: PointerEvent| {
                    upgrade_and_run(&weak, |s| {
                        s.drag_end(Some(f64::from(event.client_x())));
                    });
                }) as Box<dyn FnMut(PointerEvent)>)
            };
            let capture = DocumentPointerCapture::new(document, on_move, on_up);

            let times = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&times);
            let mut session = PlaybackSession::new(
                config,
                Box::new(WebMediaElement::new(element.clone())),
                Box::new(scheduler),
            )
            .with_pointer_capture(Box::new(capture));
            session.set_on_time_update(move |time| sink.borrow_mut().push(time));

            Shared {
                session: RefCell::new(session),
                element,
                times,
                callbacks: RefCell::new(Callbacks::default()),
            }
        });

        let mut listeners = Vec::with_capacity(MEDIA_EVENTS.len());
        for name in MEDIA_EVENTS {
            let weak = Rc::downgrade(&shared);
            let listener = Closure::wrap(Box::new(move |_event: Event| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if let Some(event) = media_event(name, &shared.element) {
                    shared.with_session(|s| s.handle_media_event(event));
                }
            }) as Box<dyn FnMut(Event)>);

            shared
                .element
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
            listeners.push((name, listener));
        }

        Ok(Self { shared, listeners })
    }

    // ===== Source Lifecycle =====

    /// Attach a track and its transcript (an array of `{startTime, endTime, text}`)
    pub fn attach(&mut self, src: String, title: String, segments: JsValue) -> Result<(), JsValue> {
        let index: SegmentIndex = serde_wasm_bindgen::from_value(segments)?;

        let issues = index.validate();
        if !issues.is_empty() {
            tracing::warn!(count = issues.len(), "Transcript timeline has issues");
        }

        self.run(|s| s.attach(TrackDescriptor::new(src, title), Arc::new(index)));
        Ok(())
    }

    /// Attach a track with its transcript given as JSON text
    #[wasm_bindgen(js_name = attachJson)]
    pub fn attach_json(&mut self, src: String, title: String, json: &str) -> Result<(), JsValue> {
        self.run(|s| s.attach_json(TrackDescriptor::new(src, title), json))
            .unwrap_or(Ok(()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Release the current source
    pub fn detach(&mut self) {
        self.run(PlaybackSession::detach);
    }

    /// Dismiss the player; fires `onClose`
    pub fn close(&mut self) {
        self.run(PlaybackSession::close);
    }

    #[wasm_bindgen(js_name = setVisible)]
    pub fn set_visible(&mut self, visible: bool) {
        self.run(|s| s.set_visible(visible));
    }

    // ===== Playback Control =====

    /// Start or resume playback
    pub fn play(&mut self) -> bool {
        self.run(PlaybackSession::play).unwrap_or(false)
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.run(PlaybackSession::pause);
    }

    /// Toggle play/pause
    pub fn toggle(&mut self) -> bool {
        self.run(PlaybackSession::toggle).unwrap_or(false)
    }

    /// Seek to position in seconds
    pub fn seek(&mut self, time: f64) -> Option<f64> {
        self.run(|s| s.seek(time)).flatten()
    }

    /// Move by `delta` seconds
    pub fn skip(&mut self, delta: f64) -> Option<f64> {
        self.run(|s| s.skip(delta)).flatten()
    }

    #[wasm_bindgen(js_name = skipForward)]
    pub fn skip_forward(&mut self) -> Option<f64> {
        self.run(PlaybackSession::skip_forward).flatten()
    }

    #[wasm_bindgen(js_name = skipBackward)]
    pub fn skip_backward(&mut self) -> Option<f64> {
        self.run(PlaybackSession::skip_backward).flatten()
    }

    // ===== Scrubber =====

    /// Click on the progress bar (`left`/`width` from `getBoundingClientRect`)
    pub fn click(&mut self, client_x: f64, left: f64, width: f64) -> Option<f64> {
        self.run(|s| s.click(client_x, BarGeometry::new(left, width)))
            .flatten()
    }

    /// `pointerdown` on the progress bar
    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, client_x: f64, left: f64, width: f64) -> bool {
        self.run(|s| s.drag_start(client_x, BarGeometry::new(left, width)))
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) {
        self.run(PlaybackSession::cancel_drag);
    }

    // ===== State Queries =====

    /// Everything the player UI draws
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.shared.session.borrow().snapshot();
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }

    /// Highlighted segment index, `-1` when none
    #[wasm_bindgen(js_name = activeSegment)]
    pub fn active_segment(&self) -> i64 {
        sentinel(self.shared.session.borrow().active_segment())
    }

    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        self.shared.session.borrow().state().as_str().to_string()
    }

    // ===== Callbacks =====

    /// Called with every session event
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_event = Some(callback);
    }

    /// Called with the playback position on every frame and seek
    #[wasm_bindgen(js_name = onTimeUpdate)]
    pub fn on_time_update(&mut self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_time_update = Some(callback);
    }

    /// Called when the player is dismissed
    #[wasm_bindgen(js_name = onClose)]
    pub fn on_close(&mut self, callback: Function) {
        self.shared.callbacks.borrow_mut().on_close = Some(callback);
    }
}

impl WasmPlaybackSession {
    fn run<R>(&self, f: impl FnOnce(&mut PlaybackSession) -> R) -> Option<R> {
        self.shared.with_session(f)
    }
}

impl Drop for WasmPlaybackSession {
    fn drop(&mut self) {
        for (name, listener) in &self.listeners {
            self.shared
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .ok();
        }
        if let Ok(mut session) = self.shared.session.try_borrow_mut() {
            session.detach();
        }
    }
}
