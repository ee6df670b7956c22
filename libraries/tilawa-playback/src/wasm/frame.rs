//! `requestAnimationFrame` scheduler

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::frame::{FrameHandle, FrameScheduler};

/// [`FrameScheduler`] over the window's animation frames
///
/// The callback is shared by every request. Since at most one frame is
/// pending, `pending` tells the callback which handle it is delivering.
pub struct WebFrameScheduler {
    window: Window,
    pending: Rc<Cell<i64>>,
    callback: Closure<dyn FnMut(f64)>,
}

impl WebFrameScheduler {
    pub fn new(window: Window, pending: Rc<Cell<i64>>, callback: Closure<dyn FnMut(f64)>) -> Self {
        Self {
            window,
            pending,
            callback,
        }
    }
}

impl FrameScheduler for WebFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => {
                self.pending.set(i64::from(id));
                Some(FrameHandle(i64::from(id)))
            }
            Err(e) => {
                tracing::warn!(error = ?e, "requestAnimationFrame failed");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let Ok(id) = i32::try_from(handle.0) else {
            return;
        };
        if let Err(e) = self.window.cancel_animation_frame(id) {
            tracing::debug!(error = ?e, "cancelAnimationFrame failed");
        }
    }
}
