use std::path::PathBuf;

use crate::config::{CaptionStyle, RenderConfig};
use crate::foundation::core::{TIME_EPSILON, TimeInterval};
use crate::foundation::error::{ClipmillError, ClipmillResult};
use crate::tracks::build::{AudioTrack, CaptionOverlay, VisualSegment};

/// A fully-planned composition, ready for one `ffmpeg` invocation.
///
/// Pure value: building it performs no I/O, so layering, windowing, and
/// duration reconciliation are all assertable on the filter graph string.
#[derive(Clone, Debug)]
pub struct CompositionPlan {
    /// Input files in `-i` order: background segments first, audio last.
    pub inputs: Vec<PathBuf>,
    /// Complete `-filter_complex` graph.
    pub filter_graph: String,
    /// Label of the final video stream.
    pub video_label: String,
    /// Label of the final audio stream.
    pub audio_label: String,
    /// Reconciled timeline window of each segment, in order; the last window
    /// may extend past its assignment when the audio track is longer.
    pub segment_windows: Vec<TimeInterval>,
    /// Final composed duration in seconds.
    pub duration_sec: f64,
}

/// Combine segments and caption overlays into a layered plan and bind audio.
///
/// Z-order: background segments are concatenated beneath (ascending start),
/// caption overlays draw above in cue order, audio binds last.
///
/// Duration reconciliation: when the visual track ends before the audio, the
/// final segment's window extends to the audio duration and its last frame is
/// held over any stretch beyond the source material — never a blank span,
/// never trimmed audio. When the visual track is longer, its duration stands
/// and the audio simply ends early. Net: composed duration equals
/// `max(visual, audio)`.
pub fn compose(
    audio: &AudioTrack,
    segments: &[VisualSegment],
    overlays: &[CaptionOverlay],
    config: &RenderConfig,
) -> ClipmillResult<CompositionPlan> {
    if segments.is_empty() {
        return Err(ClipmillError::coverage(
            "no background segments to composite",
        ));
    }
    validate_segment_coverage(segments)?;

    let visual_end = segments
        .last()
        .map(|s| s.interval.end)
        .unwrap_or(0.0);
    let duration_sec = visual_end.max(audio.duration_sec);

    // Reconciled windows: only the last segment's end can move.
    let mut segment_windows: Vec<TimeInterval> =
        segments.iter().map(|s| s.interval).collect();
    if visual_end < audio.duration_sec
        && let Some(last) = segment_windows.last_mut()
    {
        *last = TimeInterval::new(last.start, audio.duration_sec)?;
    }

    let mut filters: Vec<String> = Vec::new();
    let canvas = config.canvas;
    let fps = config.frame_rate;

    for (i, (segment, window)) in segments.iter().zip(&segment_windows).enumerate() {
        let window_len = window.duration();
        let mut chain = format!(
            "[{i}:v]trim=start=0:end={window_len},setpts=PTS-STARTPTS,\
             scale={w}:{h}:force_original_aspect_ratio=decrease,\
             pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,fps={fps_num}/{fps_den}",
            w = canvas.width,
            h = canvas.height,
            fps_num = fps.num,
            fps_den = fps.den,
        );
        // Hold the last frame when the window outlasts the source material.
        let shortfall = window_len - segment.source_duration_sec;
        if shortfall > TIME_EPSILON {
            chain.push_str(&format!(",tpad=stop_mode=clone:stop_duration={shortfall}"));
        }
        chain.push_str(&format!("[v{i}]"));
        filters.push(chain);
    }

    let concat_inputs: String = (0..segments.len()).map(|i| format!("[v{i}]")).collect();
    let background_label = if overlays.is_empty() { "vout" } else { "bgv" };
    filters.push(format!(
        "{concat_inputs}concat=n={n}:v=1:a=0[{background_label}]",
        n = segments.len()
    ));

    if !overlays.is_empty() {
        let drawtext_chain: Vec<String> = overlays
            .iter()
            .map(|overlay| drawtext_filter(overlay, &config.caption_style))
            .collect();
        filters.push(format!("[bgv]{}[vout]", drawtext_chain.join(",")));
    }

    let audio_input_index = segments.len();
    let audio_chain = if audio.normalize { "loudnorm" } else { "anull" };
    filters.push(format!("[{audio_input_index}:a]{audio_chain}[aout]"));

    let mut inputs: Vec<PathBuf> = segments.iter().map(|s| s.path.clone()).collect();
    inputs.push(audio.path.clone());

    Ok(CompositionPlan {
        inputs,
        filter_graph: filters.join(";"),
        video_label: "vout".to_owned(),
        audio_label: "aout".to_owned(),
        segment_windows,
        duration_sec,
    })
}

/// One bottom-center caption overlay, enabled exactly for its cue window.
fn drawtext_filter(overlay: &CaptionOverlay, style: &CaptionStyle) -> String {
    let window = overlay.cue.interval;
    format!(
        "drawtext=text='{text}':font='{font}':fontsize={size}:fontcolor={fill}:\
         borderw={bw}:bordercolor={oc}:x=(w-text_w)/2:y=h-text_h-{margin}:\
         enable='between(t,{start},{end})'",
        text = escape_drawtext_text(&overlay.cue.text),
        font = style.font,
        size = style.font_size,
        fill = style.fill_color,
        bw = style.outline_width,
        oc = style.outline_color,
        margin = style.bottom_margin_px,
        start = window.start,
        end = window.end,
    )
}

/// Escape caption text for a quoted drawtext value.
fn escape_drawtext_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "'\\''")
}

/// The merge invariant must still hold here: ordered, abutting windows.
fn validate_segment_coverage(segments: &[VisualSegment]) -> ClipmillResult<()> {
    for pair in segments.windows(2) {
        if !pair[0].interval.abuts(pair[1].interval) {
            return Err(ClipmillError::coverage(format!(
                "segments must be contiguous: [{}, {}) is followed by [{}, {})",
                pair[0].interval.start,
                pair[0].interval.end,
                pair[1].interval.start,
                pair[1].interval.end
            )));
        }
    }
    Ok(())
}
