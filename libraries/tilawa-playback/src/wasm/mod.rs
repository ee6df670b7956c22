//! WASM bindings for tilawa-playback
//!
//! Browser implementations of the platform seams (media element, animation
//! frames, document pointer capture) and a JavaScript-facing session that
//! wires them together.

pub mod frame;
pub mod media;
pub mod pointer;
pub mod session;

pub use frame::WebFrameScheduler;
pub use media::WebMediaElement;
pub use pointer::DocumentPointerCapture;
pub use session::WasmPlaybackSession;
