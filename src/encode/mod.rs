//! Encoding: one `ffmpeg` invocation from a composed plan.

pub mod ffmpeg;
