use std::path::PathBuf;

use crate::foundation::core::{Canvas, Fps};

/// Fixed caption presentation, applied uniformly to every cue.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CaptionStyle {
    /// Fontconfig lookup string for the caption face.
    pub font: String,
    /// Point size of the caption text.
    pub font_size: u32,
    /// Fill color name or `0xRRGGBB` value.
    pub fill_color: String,
    /// Outline color contrasting the fill.
    pub outline_color: String,
    /// Outline thickness in pixels.
    pub outline_width: u32,
    /// Gap between the text baseline box and the bottom frame edge.
    pub bottom_margin_px: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: "Arial-Bold".to_owned(),
            font_size: 70,
            fill_color: "white".to_owned(),
            outline_color: "black".to_owned(),
            outline_width: 2,
            bottom_margin_px: 0,
        }
    }
}

/// Output and encode parameters for one render job.
///
/// Everything that used to be a module-level constant in ad-hoc render
/// scripts lives here and is passed into the track builder and the render
/// writer explicitly.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderConfig {
    /// Final container file path.
    pub output_path: PathBuf,
    /// Video encoder passed to ffmpeg (`-c:v`).
    pub video_codec: String,
    /// Audio encoder passed to ffmpeg (`-c:a`).
    pub audio_codec: String,
    /// Constant output frame rate.
    pub frame_rate: Fps,
    /// Encoder preset (`-preset`), speed-oriented by default.
    pub encode_preset: String,
    /// Canvas every background segment is scaled and padded to.
    pub canvas: Canvas,
    /// Caption presentation shared by all cues.
    pub caption_style: CaptionStyle,
}

impl RenderConfig {
    /// Default parameters with a caller-chosen output path.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Self::default()
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("rendered_video.mp4"),
            video_codec: "libx264".to_owned(),
            audio_codec: "aac".to_owned(),
            frame_rate: Fps { num: 25, den: 1 },
            encode_preset: "veryfast".to_owned(),
            canvas: Canvas {
                width: 1920,
                height: 1080,
            },
            caption_style: CaptionStyle::default(),
        }
    }
}
