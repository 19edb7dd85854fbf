use std::path::PathBuf;

use clipmill::compose::plan::compose;
use clipmill::{
    AudioTrack, CaptionCue, CaptionOverlay, RenderConfig, TimeInterval, VisualSegment,
};

fn segment(start: f64, end: f64, source_duration: f64, name: &str) -> VisualSegment {
    VisualSegment {
        interval: TimeInterval::new(start, end).unwrap(),
        path: PathBuf::from(format!("/scratch/{name}.mp4")),
        source_duration_sec: source_duration,
        reference: format!("https://example.com/{name}.mp4"),
    }
}

fn audio(duration: f64) -> AudioTrack {
    AudioTrack {
        path: PathBuf::from("/audio/tts.wav"),
        duration_sec: duration,
        normalize: true,
    }
}

/// Audio 12.0 over a 10.0 visual track: the final window stretches to 12.0
/// and the composed duration follows the audio.
#[test]
fn audio_longer_than_visual_extends_the_final_segment() {
    let segments = vec![
        segment(0.0, 6.0, 8.0, "a"),
        segment(6.0, 10.0, 8.0, "b"),
    ];
    let plan = compose(&audio(12.0), &segments, &[], &RenderConfig::default()).unwrap();

    assert_eq!(plan.duration_sec, 12.0);
    assert_eq!(
        plan.segment_windows,
        vec![
            TimeInterval::new(0.0, 6.0).unwrap(),
            TimeInterval::new(6.0, 12.0).unwrap(),
        ]
    );
}

/// Audio 8.0 under a 9.0 visual track: the visual duration stands and the
/// audio just ends early.
#[test]
fn visual_longer_than_audio_keeps_the_visual_duration() {
    let segments = vec![
        segment(0.0, 4.0, 5.0, "a"),
        segment(4.0, 9.0, 6.0, "b"),
    ];
    let plan = compose(&audio(8.0), &segments, &[], &RenderConfig::default()).unwrap();

    assert_eq!(plan.duration_sec, 9.0);
    assert_eq!(
        plan.segment_windows,
        vec![
            TimeInterval::new(0.0, 4.0).unwrap(),
            TimeInterval::new(4.0, 9.0).unwrap(),
        ]
    );
}

/// Three segments and two caption cues over 30 s of narration, planned
/// without touching ffmpeg.
#[test]
fn thirty_second_timeline_plans_three_segments_and_two_captions() {
    let segments = vec![
        segment(0.0, 10.0, 12.0, "a"),
        segment(10.0, 20.0, 12.0, "b"),
        segment(20.0, 30.0, 12.0, "c"),
    ];
    let overlays = vec![
        CaptionOverlay {
            cue: CaptionCue::new(TimeInterval::new(0.0, 5.0).unwrap(), "opening line"),
        },
        CaptionOverlay {
            cue: CaptionCue::new(TimeInterval::new(5.0, 30.0).unwrap(), "the rest"),
        },
    ];
    let plan = compose(&audio(30.0), &segments, &overlays, &RenderConfig::default()).unwrap();

    assert_eq!(plan.duration_sec, 30.0);
    assert_eq!(plan.inputs.len(), 4);

    let graph = &plan.filter_graph;
    assert!(graph.contains("concat=n=3:v=1:a=0[bgv]"));
    assert_eq!(graph.matches("drawtext=").count(), 2);
    assert!(graph.contains("enable='between(t,0,5)'"));
    assert!(graph.contains("enable='between(t,5,30)'"));
    assert!(graph.contains("[3:a]loudnorm[aout]"));
}
