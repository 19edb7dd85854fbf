//! Track construction: audio descriptor, background segments, caption
//! overlays.

pub mod build;
