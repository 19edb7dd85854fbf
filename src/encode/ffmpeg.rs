use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::assets::probe::probe_media;
use crate::compose::plan::CompositionPlan;
use crate::config::RenderConfig;
use crate::foundation::error::{ClipmillError, ClipmillResult};

/// The final container file, valid only after [`RenderWriter::write`]
/// confirmed it exists with non-zero audio/video content.
#[derive(Clone, Debug)]
pub struct RenderedOutput {
    pub path: PathBuf,
    pub duration_sec: f64,
}

/// Encodes a composed plan to the configured container via system `ffmpeg`.
pub struct RenderWriter<'a> {
    config: &'a RenderConfig,
}

impl<'a> RenderWriter<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Run the encode and validate the written file.
    ///
    /// Scratch cleanup is not performed here; the owning render job releases
    /// the registry unconditionally after this returns.
    pub fn write(&self, plan: &CompositionPlan) -> ClipmillResult<RenderedOutput> {
        if !is_ffmpeg_on_path() {
            return Err(ClipmillError::render(
                "ffmpeg is required for encoding, but was not found on PATH",
            ));
        }
        ensure_parent_dir(&self.config.output_path)?;

        let args = build_ffmpeg_args(plan, self.config);
        debug!(args = ?args, "running ffmpeg");
        let out = Command::new("ffmpeg")
            .args(&args)
            .output()
            .map_err(|e| ClipmillError::render(format!("failed to spawn ffmpeg: {e}")))?;
        if !out.status.success() {
            return Err(ClipmillError::render(format!(
                "ffmpeg exited with status {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        self.validate_output()?;
        info!(
            path = %self.config.output_path.display(),
            duration_sec = plan.duration_sec,
            "rendered output written"
        );
        Ok(RenderedOutput {
            path: self.config.output_path.clone(),
            duration_sec: plan.duration_sec,
        })
    }

    fn validate_output(&self) -> ClipmillResult<()> {
        let path = &self.config.output_path;
        let meta = std::fs::metadata(path).map_err(|_| {
            ClipmillError::render(format!(
                "output file '{}' is missing after encode",
                path.display()
            ))
        })?;
        if meta.len() == 0 {
            return Err(ClipmillError::render(format!(
                "output file '{}' is empty after encode",
                path.display()
            )));
        }

        let probed = probe_media(path).map_err(|e| {
            ClipmillError::render(format!(
                "output file '{}' failed validation probe: {e}",
                path.display()
            ))
        })?;
        if !probed.has_video || !probed.has_audio || probed.duration_sec <= 0.0 {
            return Err(ClipmillError::render(format!(
                "output file '{}' has no usable audio/video content",
                path.display()
            )));
        }
        Ok(())
    }
}

/// Assemble the full argument list for one encode invocation.
pub fn build_ffmpeg_args(plan: &CompositionPlan, config: &RenderConfig) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into(), "-loglevel".into(), "error".into()];
    for input in &plan.inputs {
        args.push("-i".into());
        args.push(input.to_string_lossy().into_owned());
    }
    args.push("-filter_complex".into());
    args.push(plan.filter_graph.clone());
    args.extend([
        "-map".into(),
        format!("[{}]", plan.video_label),
        "-map".into(),
        format!("[{}]", plan.audio_label),
        "-c:v".into(),
        config.video_codec.clone(),
        "-preset".into(),
        config.encode_preset.clone(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-r".into(),
        format!("{}/{}", config.frame_rate.num, config.frame_rate.den),
        "-c:a".into(),
        config.audio_codec.clone(),
        "-movflags".into(),
        "+faststart".into(),
    ]);
    args.push(config.output_path.to_string_lossy().into_owned());
    args
}

/// Ensure the parent directory of `path` exists.
fn ensure_parent_dir(path: &Path) -> ClipmillResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            use anyhow::Context as _;
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
