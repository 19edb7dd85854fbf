use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use clipmill::timeline::merge::merge_unassigned;
use clipmill::timeline::model::{load_assignments, load_captions};
use clipmill::{HttpFetcher, RenderConfig, RenderJob, RenderJobInputs};

#[derive(Parser, Debug)]
#[command(name = "clipmill", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a video from narration audio, captions, and asset assignments
    /// (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Merge an assignment list into gap-free coverage and print it as JSON.
    Merge(MergeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Narration audio file from the speech synthesizer.
    #[arg(long)]
    audio: PathBuf,

    /// Timed caption JSON from the transcriber: [[[start,end],"text"],...].
    #[arg(long)]
    captions: PathBuf,

    /// Timed assignment JSON from the footage index:
    /// [[[start,end],"url"|null],...].
    #[arg(long)]
    assignments: PathBuf,

    /// Output MP4 path.
    #[arg(long, default_value = "rendered_video.mp4")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Timed assignment JSON from the footage index.
    #[arg(long)]
    assignments: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Merge(args) => cmd_merge(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let captions = load_captions(&args.captions)?;
    let assignments = load_assignments(&args.assignments)?;

    let fetcher = HttpFetcher::new()?;
    let mut job = RenderJob::new(RenderConfig::new(args.out), &fetcher);
    let output = job
        .run(&RenderJobInputs {
            audio_path: args.audio,
            captions,
            assignments,
        })
        .context("render job failed")?;

    println!("{}", output.path.display());
    Ok(())
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    let assignments = load_assignments(&args.assignments)?;
    let merged = merge_unassigned(&assignments).context("merge failed")?;
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}
