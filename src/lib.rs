//! Clipmill is a timeline assignment and rendering engine.
//!
//! Given a narration audio file, a list of timed caption cues, and a list of
//! timed background-asset assignments, it merges the assignments into gap-free
//! timeline coverage, fetches each background asset into job-scoped scratch
//! storage, and composites everything into a single H.264/AAC file through one
//! `ffmpeg` invocation:
//!
//! - Normalize assignments with [`timeline::merge::merge_unassigned`]
//! - Create a [`RenderJob`] and call [`RenderJob::run`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod compose;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod session;
pub mod timeline;
pub mod tracks;

pub use crate::foundation::core::{Canvas, Fps, TimeInterval};
pub use crate::foundation::error::{ClipmillError, ClipmillResult};

pub use crate::assets::fetch::{FetchAssets, HttpFetcher};
pub use crate::assets::scratch::ScratchRegistry;
pub use crate::compose::plan::CompositionPlan;
pub use crate::config::{CaptionStyle, RenderConfig};
pub use crate::encode::ffmpeg::{RenderWriter, RenderedOutput};
pub use crate::session::render_job::{JobState, RenderJob, RenderJobInputs};
pub use crate::timeline::model::{AssetAssignment, CaptionCue};
pub use crate::tracks::build::{AudioTrack, CaptionOverlay, TrackBuilder, VisualSegment};
