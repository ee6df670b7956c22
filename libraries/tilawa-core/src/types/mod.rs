/// Domain types for Tilawa
mod segment;
mod track;

pub use segment::{sentinel, Segment};
pub use track::TrackDescriptor;
