use std::path::{Path, PathBuf};

use tracing::info;

use crate::assets::fetch::FetchAssets;
use crate::assets::probe::probe_media;
use crate::assets::scratch::ScratchRegistry;
use crate::foundation::core::TimeInterval;
use crate::foundation::error::{ClipmillError, ClipmillResult};
use crate::timeline::model::{AssetAssignment, CaptionCue};

/// The narration audio: the authoritative duration reference the visual
/// tracks are reconciled against.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    pub path: PathBuf,
    pub duration_sec: f64,
    /// Apply loudness normalization in the composed audio chain.
    pub normalize: bool,
}

/// One background clip bound to its `[start, end)` timeline window.
///
/// The scratch file is owned by the job's registry until cleanup.
#[derive(Clone, Debug)]
pub struct VisualSegment {
    pub interval: TimeInterval,
    pub path: PathBuf,
    /// Length of the downloaded source material; the compositor holds the
    /// last frame when the window outlasts it.
    pub source_duration_sec: f64,
    /// Original asset reference, kept for error attribution.
    pub reference: String,
}

/// One caption cue bound for rendering; presentation comes from the shared
/// [`crate::config::CaptionStyle`], never per-cue.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionOverlay {
    pub cue: CaptionCue,
}

/// Builds the three composition inputs from collaborator data.
///
/// This is the most failure-prone stage: every error is attributed to the
/// interval, asset reference, or file path that caused it, and a single bad
/// segment aborts the whole render rather than being silently omitted.
pub struct TrackBuilder<'a> {
    fetcher: &'a dyn FetchAssets,
}

impl<'a> TrackBuilder<'a> {
    pub fn new(fetcher: &'a dyn FetchAssets) -> Self {
        Self { fetcher }
    }

    /// Probe and validate the narration audio file.
    pub fn build_audio_track(&self, path: &Path) -> ClipmillResult<AudioTrack> {
        if !path.exists() {
            return Err(ClipmillError::audio(path, "audio file not found"));
        }
        let info =
            probe_media(path).map_err(|e| ClipmillError::audio(path, format!("probe failed: {e}")))?;
        if !info.has_audio {
            return Err(ClipmillError::audio(path, "no audio stream"));
        }
        if info.duration_sec <= 0.0 {
            return Err(ClipmillError::audio(
                path,
                format!("zero or negative duration ({})", info.duration_sec),
            ));
        }
        info!(path = %path.display(), duration_sec = info.duration_sec, "audio track ready");
        Ok(AudioTrack {
            path: path.to_path_buf(),
            duration_sec: info.duration_sec,
            normalize: true,
        })
    }

    /// Fetch, probe, and clip one background segment per merged assignment.
    ///
    /// Output order is by interval start regardless of fetch completion
    /// order.
    pub fn build_visual_segments(
        &self,
        merged: &[AssetAssignment],
        registry: &mut ScratchRegistry,
    ) -> ClipmillResult<Vec<VisualSegment>> {
        let mut segments = Vec::with_capacity(merged.len());
        for assignment in merged {
            let reference = assignment.asset.as_deref().ok_or_else(|| {
                ClipmillError::coverage(format!(
                    "unassigned interval [{}, {}) reached the track builder; merge must run first",
                    assignment.interval.start, assignment.interval.end
                ))
            })?;

            let path = self.fetcher.fetch(reference, registry)?;
            let source = probe_media(&path)
                .map_err(|e| ClipmillError::asset(reference, format!("probe failed: {e}")))?;
            if !source.has_video {
                return Err(ClipmillError::asset(reference, "no video stream"));
            }
            if source.duration_sec <= 0.0 {
                return Err(ClipmillError::asset(reference, "zero-duration video"));
            }

            info!(
                reference,
                start = assignment.interval.start,
                end = assignment.interval.end,
                "background segment ready"
            );
            segments.push(VisualSegment {
                interval: assignment.interval,
                path,
                source_duration_sec: source.duration_sec,
                reference: reference.to_owned(),
            });
        }
        segments.sort_by(|a, b| a.interval.start.total_cmp(&b.interval.start));
        Ok(segments)
    }

    /// Bind cues into overlays, ordered by cue start.
    pub fn build_caption_overlays(
        &self,
        cues: &[CaptionCue],
    ) -> ClipmillResult<Vec<CaptionOverlay>> {
        let mut overlays: Vec<CaptionOverlay> = cues
            .iter()
            .cloned()
            .map(|cue| CaptionOverlay { cue })
            .collect();
        overlays.sort_by(|a, b| a.cue.interval.start.total_cmp(&b.cue.interval.start));
        Ok(overlays)
    }
}
