//! Scrubber controller
//!
//! Owns the progress bar interaction: click-to-seek, drag-to-seek with a live
//! knob preview, and the fill widths the host draws. The controller never
//! touches the clock itself; it returns seek targets and the session applies
//! them.
//!
//! While a drag is active the drag ratio is the source of truth for the knob
//! and for highlight preview. Pointer listeners are attached at document
//! level through [`PointerCapture`] so a drag keeps tracking after the
//! pointer leaves the bar.

use serde::{Deserialize, Serialize};
use tilawa_core::ratio_percent;

/// Horizontal placement of the progress bar, in the pointer's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub left: f64,
    pub width: f64,
}

impl BarGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Pointer position as a fraction of the bar, clamped to `[0, 1]`
    ///
    /// A collapsed bar (zero or negative width) maps everything to `0`.
    pub fn ratio_at(&self, pointer_x: f64) -> f64 {
        if !(self.width.is_finite() && self.width > 0.0) || !pointer_x.is_finite() {
            return 0.0;
        }
        ((pointer_x - self.left) / self.width).clamp(0.0, 1.0)
    }
}

/// When a drag writes back to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrubMode {
    /// Seek once, when the pointer is released
    #[default]
    SeekOnRelease,

    /// Also seek on every pointer move so audio scrubs along
    Live,
}

/// Document-level pointer listener registration
pub trait PointerCapture {
    /// Start receiving pointermove/pointerup anywhere in the document
    fn attach(&mut self);

    /// Stop receiving document-level pointer events
    fn detach(&mut self);
}

/// Capture for hosts that route pointer events themselves
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCapture;

impl PointerCapture for NoopCapture {
    fn attach(&mut self) {}
    fn detach(&mut self) {}
}

/// Outcome of one pointer move during a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    /// Where the knob and the highlight preview should be
    pub preview_time: f64,

    /// Seek to apply now (only in [`ScrubMode::Live`])
    pub seek: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    geometry: BarGeometry,
    duration: f64,
    ratio: f64,
}

impl Drag {
    fn time(&self) -> f64 {
        self.ratio * self.duration
    }
}

/// Progress bar interaction state
pub struct ScrubberController {
    mode: ScrubMode,
    capture: Box<dyn PointerCapture>,
    drag: Option<Drag>,
    swallow_click: bool,
}

impl ScrubberController {
    pub fn new(mode: ScrubMode, capture: Box<dyn PointerCapture>) -> Self {
        Self {
            mode,
            capture,
            drag: None,
            swallow_click: false,
        }
    }

    /// Seek target for a click on the bar
    ///
    /// Ignored while the duration is unknown, and for the click event a
    /// browser fires right after a drag ends (the release already seeked).
    pub fn on_click(
        &mut self,
        pointer_x: f64,
        geometry: BarGeometry,
        duration: Option<f64>,
    ) -> Option<f64> {
        if std::mem::take(&mut self.swallow_click) {
            tracing::trace!("Click after drag release ignored");
            return None;
        }
        let duration = duration?;
        Some(geometry.ratio_at(pointer_x) * duration)
    }

    /// Begin a drag at `pointer_x`
    ///
    /// Returns `false` (and does nothing) while the duration is unknown.
    pub fn on_drag_start(
        &mut self,
        pointer_x: f64,
        geometry: BarGeometry,
        duration: Option<f64>,
    ) -> bool {
        self.swallow_click = false;
        let Some(duration) = duration else {
            return false;
        };

        if self.drag.is_none() {
            self.capture.attach();
        }
        self.drag = Some(Drag {
            geometry,
            duration,
            ratio: geometry.ratio_at(pointer_x),
        });
        tracing::trace!(pointer_x, "Drag started");
        true
    }

    /// Follow the pointer during a drag
    ///
    /// The ratio is computed exactly as for a click, against the geometry
    /// captured when the drag started.
    pub fn on_drag_move(&mut self, pointer_x: f64) -> Option<DragStep> {
        let drag = self.drag.as_mut()?;
        drag.ratio = drag.geometry.ratio_at(pointer_x);
        let preview_time = drag.time();

        Some(DragStep {
            preview_time,
            seek: (self.mode == ScrubMode::Live).then_some(preview_time),
        })
    }

    /// Finish the drag, returning the single seek to commit
    ///
    /// `pointer_x` updates the ratio one last time when the release event
    /// carries a position.
    pub fn on_drag_end(&mut self, pointer_x: Option<f64>) -> Option<f64> {
        let mut drag = self.drag.take()?;
        if let Some(x) = pointer_x {
            drag.ratio = drag.geometry.ratio_at(x);
        }

        self.capture.detach();
        self.swallow_click = true;
        tracing::trace!(ratio = drag.ratio, "Drag released");
        Some(drag.time())
    }

    /// Abandon a drag without seeking (source change, teardown)
    pub fn cancel(&mut self) {
        if self.drag.take().is_some() {
            self.capture.detach();
            tracing::trace!("Drag cancelled");
        }
        self.swallow_click = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Live drag ratio, if dragging
    pub fn drag_ratio(&self) -> Option<f64> {
        self.drag.map(|drag| drag.ratio)
    }

    /// Time under the knob while dragging
    pub fn preview_time(&self) -> Option<f64> {
        self.drag.map(|drag| drag.time())
    }

    /// Progress fill width in percent
    ///
    /// Follows the drag ratio while dragging, the clock otherwise.
    pub fn progress_percent(&self, current_time: f64, duration: Option<f64>) -> f64 {
        match self.drag {
            Some(drag) => drag.ratio * 100.0,
            None => ratio_percent(current_time, duration),
        }
    }

    /// Whether the knob is drawn without hover
    pub fn knob_visible(&self, progress_percent: f64) -> bool {
        self.is_dragging() || progress_percent > 0.0
    }

    pub fn mode(&self) -> ScrubMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ScrubMode) {
        self.mode = mode;
    }
}

impl std::fmt::Debug for ScrubberController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrubberController")
            .field("mode", &self.mode)
            .field("drag", &self.drag)
            .field("swallow_click", &self.swallow_click)
            .finish_non_exhaustive()
    }
}
