//! `HTMLMediaElement` adapter

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlMediaElement;

use crate::error::{PlaybackError, Result};
use crate::media::{MediaElement, TimeRange};

/// [`MediaElement`] backed by an `<audio>` or `<video>` element
///
/// `play()` returns a promise in browsers; a rejection that arrives after the
/// call returned is parked and surfaced through
/// [`MediaElement::poll_play_rejection`] on the next frame.
pub struct WebMediaElement {
    element: HtmlMediaElement,
    rejection: Rc<RefCell<Option<String>>>,
    on_rejected: Closure<dyn FnMut(JsValue)>,
}

impl WebMediaElement {
    pub fn new(element: HtmlMediaElement) -> Self {
        let rejection = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&rejection);
        let on_rejected = Closure::wrap(Box::new(move |reason: JsValue| {
            *slot.borrow_mut() = Some(describe_js_error(&reason));
        }) as Box<dyn FnMut(JsValue)>);

        Self {
            element,
            rejection,
            on_rejected,
        }
    }

    pub fn element(&self) -> &HtmlMediaElement {
        &self.element
    }
}

/// Message for a thrown or rejected JavaScript value
pub(crate) fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return format!(
            "{}: {}",
            String::from(error.name()),
            String::from(error.message())
        );
    }
    value
        .as_string()
        .unwrap_or_else(|| "playback was not allowed to start".to_string())
}

/// Message for the element's current `MediaError`
pub(crate) fn describe_media_error(element: &HtmlMediaElement) -> String {
    match element.error() {
        Some(error) => {
            let kind = match error.code() {
                1 => "MEDIA_ERR_ABORTED",
                2 => "MEDIA_ERR_NETWORK",
                3 => "MEDIA_ERR_DECODE",
                4 => "MEDIA_ERR_SRC_NOT_SUPPORTED",
                _ => "MEDIA_ERR_UNKNOWN",
            };
            let detail = error.message();
            if detail.is_empty() {
                kind.to_string()
            } else {
                format!("{kind}: {detail}")
            }
        }
        None => "MEDIA_ERR_UNKNOWN".to_string(),
    }
}

impl MediaElement for WebMediaElement {
    fn load(&mut self, src: &str) {
        self.rejection.borrow_mut().take();
        self.element.set_src(src);
        self.element.load();
    }

    fn play(&mut self) -> Result<()> {
        let promise = self.element.play().map_err(|e| {
            let message = describe_js_error(&e);
            if message.starts_with("NotAllowedError") {
                PlaybackError::AutoplayBlocked(message)
            } else {
                PlaybackError::Media(message)
            }
        })?;
        let _ = promise.catch(&self.on_rejected);
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            tracing::debug!(error = %describe_js_error(&e), "pause() failed");
        }
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn buffered(&self) -> Vec<TimeRange> {
        let ranges = self.element.buffered();
        (0..ranges.length())
            .filter_map(|i| Some(TimeRange::new(ranges.start(i).ok()?, ranges.end(i).ok()?)))
            .collect()
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn poll_play_rejection(&mut self) -> Option<String> {
        self.rejection.borrow_mut().take()
    }
}
