//! Document-level pointer capture for scrubber drags

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, PointerEvent};

use crate::scrubber::PointerCapture;

/// Listens for `pointermove`/`pointerup` on the whole document during a drag
pub struct DocumentPointerCapture {
    document: Document,
    on_move: Closure<dyn FnMut(PointerEvent)>,
    on_up: Closure<dyn FnMut(PointerEvent)>,
    attached: bool,
}

impl DocumentPointerCapture {
    pub fn new(
        document: Document,
        on_move: Closure<dyn FnMut(PointerEvent)>,
        on_up: Closure<dyn FnMut(PointerEvent)>,
    ) -> Self {
        Self {
            document,
            on_move,
            on_up,
            attached: false,
        }
    }

    fn listeners(&self) -> [(&'static str, &js_sys::Function); 2] {
        [
            ("pointermove", self.on_move.as_ref().unchecked_ref()),
            ("pointerup", self.on_up.as_ref().unchecked_ref()),
        ]
    }
}

impl PointerCapture for DocumentPointerCapture {
    fn attach(&mut self) {
        if self.attached {
            return;
        }
        for (name, listener) in self.listeners() {
            if let Err(e) = self.document.add_event_listener_with_callback(name, listener) {
                tracing::warn!(event = name, error = ?e, "Failed to attach pointer listener");
            }
        }
        self.attached = true;
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        for (name, listener) in self.listeners() {
            if let Err(e) = self
                .document
                .remove_event_listener_with_callback(name, listener)
            {
                tracing::debug!(event = name, error = ?e, "Failed to detach pointer listener");
            }
        }
        self.attached = false;
    }
}

impl Drop for DocumentPointerCapture {
    fn drop(&mut self) {
        self.detach();
    }
}
