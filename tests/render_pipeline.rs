use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use clipmill::assets::probe::probe_media;
use clipmill::{
    AssetAssignment, CaptionCue, ClipmillError, ClipmillResult, FetchAssets, JobState,
    RenderConfig, RenderJob, RenderJobInputs, ScratchRegistry, TimeInterval,
};

fn ffmpeg_tools_available() -> bool {
    let ffmpeg_ok = Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    let ffprobe_ok = Command::new("ffprobe")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    ffmpeg_ok && ffprobe_ok
}

/// Caption burn-in needs an ffmpeg built with libfreetype.
fn drawtext_available() -> bool {
    Command::new("ffmpeg")
        .args(["-hide_banner", "-filters"])
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).contains("drawtext"))
        .unwrap_or(false)
}

/// Synthesize three 12 s background clips and one 30 s narration tone.
fn synth_media(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(root)?;

    let mut clips = Vec::new();
    for i in 0..3 {
        let clip = root.join(format!("clip{i}.mp4"));
        let status = Command::new("ffmpeg")
            .args([
                "-v",
                "error",
                "-y",
                "-f",
                "lavfi",
                "-i",
                "testsrc=size=128x72:rate=25",
                "-t",
                "12",
                "-pix_fmt",
                "yuv420p",
                "-c:v",
                "libx264",
            ])
            .arg(&clip)
            .status()?;
        anyhow::ensure!(status.success(), "ffmpeg failed creating clip{i}.mp4");
        clips.push(clip);
    }

    let wav = root.join("narration.wav");
    let status = Command::new("ffmpeg")
        .args([
            "-v",
            "error",
            "-y",
            "-f",
            "lavfi",
            "-i",
            "sine=frequency=220:sample_rate=44100",
            "-t",
            "30",
            "-c:a",
            "pcm_s16le",
        ])
        .arg(&wav)
        .status()?;
    anyhow::ensure!(status.success(), "ffmpeg failed creating narration.wav");
    clips.push(wav);

    Ok(clips)
}

/// Resolves URLs against local files, recording every scratch path it wrote
/// so tests can verify the registry released them.
struct LocalFetcher {
    sources: HashMap<String, PathBuf>,
    written: RefCell<Vec<PathBuf>>,
    fail_for: Option<String>,
}

impl FetchAssets for LocalFetcher {
    fn fetch(&self, url: &str, registry: &mut ScratchRegistry) -> ClipmillResult<PathBuf> {
        if self.fail_for.as_deref() == Some(url) {
            return Err(ClipmillError::fetch(url, "simulated connection reset"));
        }
        let source = self
            .sources
            .get(url)
            .ok_or_else(|| ClipmillError::fetch(url, "unknown test url"))?;
        let path = registry.allocate("mp4");
        std::fs::copy(source, &path)
            .map_err(|e| ClipmillError::fetch(url, format!("copy failed: {e}")))?;
        self.written.borrow_mut().push(path.clone());
        Ok(path)
    }
}

fn thirty_second_inputs(audio_path: PathBuf) -> RenderJobInputs {
    RenderJobInputs {
        audio_path,
        captions: vec![
            CaptionCue::new(TimeInterval::new(0.0, 5.0).unwrap(), "opening line"),
            CaptionCue::new(TimeInterval::new(5.0, 30.0).unwrap(), "the rest of it"),
        ],
        assignments: vec![
            AssetAssignment::assigned(TimeInterval::new(0.0, 10.0).unwrap(), "test://a"),
            AssetAssignment::assigned(TimeInterval::new(10.0, 20.0).unwrap(), "test://b"),
            AssetAssignment::assigned(TimeInterval::new(20.0, 30.0).unwrap(), "test://c"),
        ],
    }
}

fn small_canvas_config(out: PathBuf) -> RenderConfig {
    let mut config = RenderConfig::new(out);
    config.canvas = clipmill::Canvas {
        width: 128,
        height: 72,
    };
    config
}

#[test]
fn end_to_end_render_produces_a_thirty_second_file() {
    if !ffmpeg_tools_available() || !drawtext_available() {
        return;
    }
    let root = tempfile::tempdir().unwrap();
    let media = synth_media(root.path()).unwrap();

    let fetcher = LocalFetcher {
        sources: HashMap::from([
            ("test://a".to_owned(), media[0].clone()),
            ("test://b".to_owned(), media[1].clone()),
            ("test://c".to_owned(), media[2].clone()),
        ]),
        written: RefCell::new(Vec::new()),
        fail_for: None,
    };

    let out = root.path().join("rendered_video.mp4");
    let mut job = RenderJob::new(small_canvas_config(out.clone()), &fetcher);
    let output = job.run(&thirty_second_inputs(media[3].clone())).unwrap();

    assert_eq!(*job.state(), JobState::Done);
    assert_eq!(output.path, out);
    assert!(out.exists());

    let probed = probe_media(&out).unwrap();
    assert!(probed.has_video);
    assert!(probed.has_audio);
    assert!(
        (probed.duration_sec - 30.0).abs() < 1.0,
        "expected ~30s output, got {}",
        probed.duration_sec
    );

    // All three downloads were scratch-owned and are gone after the job.
    assert_eq!(fetcher.written.borrow().len(), 3);
    for path in fetcher.written.borrow().iter() {
        assert!(!path.exists(), "scratch file leaked: {}", path.display());
    }
}

#[test]
fn failed_fetch_aborts_the_render_and_releases_fetched_scratch_files() {
    if !ffmpeg_tools_available() {
        return;
    }
    let root = tempfile::tempdir().unwrap();
    let media = synth_media(root.path()).unwrap();

    let fetcher = LocalFetcher {
        sources: HashMap::from([
            ("test://a".to_owned(), media[0].clone()),
            ("test://b".to_owned(), media[1].clone()),
            ("test://c".to_owned(), media[2].clone()),
        ]),
        written: RefCell::new(Vec::new()),
        fail_for: Some("test://c".to_owned()),
    };

    let out = root.path().join("rendered_video.mp4");
    let mut job = RenderJob::new(small_canvas_config(out.clone()), &fetcher);
    let err = job
        .run(&thirty_second_inputs(media[3].clone()))
        .unwrap_err();

    match err {
        ClipmillError::Fetch { url, .. } => assert_eq!(url, "test://c"),
        other => panic!("expected fetch error, got {other}"),
    }
    assert!(matches!(job.state(), JobState::Failed(_)));
    assert!(!out.exists());

    // The two segments fetched before the failure are confirmed removed.
    assert_eq!(fetcher.written.borrow().len(), 2);
    for path in fetcher.written.borrow().iter() {
        assert!(!path.exists(), "scratch file leaked: {}", path.display());
    }
}
