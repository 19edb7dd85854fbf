use std::path::PathBuf;

use tracing::info;

use crate::assets::fetch::FetchAssets;
use crate::assets::scratch::ScratchRegistry;
use crate::compose::plan::compose;
use crate::config::RenderConfig;
use crate::encode::ffmpeg::{RenderWriter, RenderedOutput};
use crate::foundation::error::{ClipmillError, ClipmillResult};
use crate::timeline::merge::merge_unassigned;
use crate::timeline::model::{AssetAssignment, CaptionCue};
use crate::tracks::build::TrackBuilder;

/// Stage of one render job.
///
/// `Done` and `Failed` are terminal; a failed render is restarted by
/// constructing a fresh job, never resumed mid-pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobState {
    Merging,
    Fetching,
    Building,
    Compositing,
    Writing,
    Done,
    Failed(String),
}

/// Collaborator outputs a render job consumes.
#[derive(Clone, Debug)]
pub struct RenderJobInputs {
    /// Narration audio file from the speech synthesizer.
    pub audio_path: PathBuf,
    /// Timed caption cues from the transcriber.
    pub captions: Vec<CaptionCue>,
    /// Timed asset assignments from the search-term planner / footage index.
    pub assignments: Vec<AssetAssignment>,
}

/// One sequential render pipeline: merge, fetch, build, composite, write.
///
/// The job owns a scratch registry for the downloads it triggers and releases
/// every scratch file unconditionally, whether the pipeline reaches `Done` or
/// `Failed`.
pub struct RenderJob<'a> {
    config: RenderConfig,
    fetcher: &'a dyn FetchAssets,
    state: JobState,
}

impl<'a> RenderJob<'a> {
    pub fn new(config: RenderConfig, fetcher: &'a dyn FetchAssets) -> Self {
        Self {
            config,
            fetcher,
            state: JobState::Merging,
        }
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Execute the pipeline once.
    ///
    /// The caller receives either a validated output or the typed error of
    /// the failing stage; scratch files are gone in both cases.
    pub fn run(&mut self, inputs: &RenderJobInputs) -> ClipmillResult<RenderedOutput> {
        if matches!(self.state, JobState::Done | JobState::Failed(_)) {
            return Err(ClipmillError::render(
                "render job already finished; start a new job",
            ));
        }

        let mut registry = ScratchRegistry::new()?;
        let result = self.run_stages(inputs, &mut registry);
        registry.release_all();

        match &result {
            Ok(output) => {
                self.state = JobState::Done;
                info!(path = %output.path.display(), "render job done");
            }
            Err(e) => {
                self.state = JobState::Failed(e.to_string());
                info!(error = %e, "render job failed");
            }
        }
        result
    }

    #[tracing::instrument(skip_all)]
    fn run_stages(
        &mut self,
        inputs: &RenderJobInputs,
        registry: &mut ScratchRegistry,
    ) -> ClipmillResult<RenderedOutput> {
        self.state = JobState::Merging;
        info!(assignments = inputs.assignments.len(), "merging intervals");
        let merged = merge_unassigned(&inputs.assignments)?;

        let builder = TrackBuilder::new(self.fetcher);

        self.state = JobState::Fetching;
        info!(segments = merged.len(), "fetching background segments");
        let segments = builder.build_visual_segments(&merged, registry)?;

        self.state = JobState::Building;
        info!(captions = inputs.captions.len(), "building tracks");
        let audio = builder.build_audio_track(&inputs.audio_path)?;
        let overlays = builder.build_caption_overlays(&inputs.captions)?;

        self.state = JobState::Compositing;
        let plan = compose(&audio, &segments, &overlays, &self.config)?;
        info!(
            duration_sec = plan.duration_sec,
            inputs = plan.inputs.len(),
            "composition planned"
        );

        self.state = JobState::Writing;
        RenderWriter::new(&self.config).write(&plan)
    }
}
