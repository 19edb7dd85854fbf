use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::TimeInterval;
use crate::foundation::error::ClipmillResult;

/// One timeline window paired with a background asset reference.
///
/// `asset: None` is the unassigned sentinel the footage index emits when no
/// suitable clip was found for the window's search terms. Wire format:
/// `[[start, end], "https://..." | null]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(
    from = "(TimeInterval, Option<String>)",
    into = "(TimeInterval, Option<String>)"
)]
pub struct AssetAssignment {
    pub interval: TimeInterval,
    pub asset: Option<String>,
}

impl AssetAssignment {
    /// An assignment resolved to an asset reference.
    pub fn assigned(interval: TimeInterval, asset: impl Into<String>) -> Self {
        Self {
            interval,
            asset: Some(asset.into()),
        }
    }

    /// An assignment with no suitable asset.
    pub fn unassigned(interval: TimeInterval) -> Self {
        Self {
            interval,
            asset: None,
        }
    }

    /// Return `true` when the window carries an asset reference.
    pub fn is_assigned(&self) -> bool {
        self.asset.is_some()
    }
}

impl From<(TimeInterval, Option<String>)> for AssetAssignment {
    fn from(value: (TimeInterval, Option<String>)) -> Self {
        Self {
            interval: value.0,
            asset: value.1,
        }
    }
}

impl From<AssetAssignment> for (TimeInterval, Option<String>) {
    fn from(value: AssetAssignment) -> Self {
        (value.interval, value.asset)
    }
}

/// One timeline window paired with caption text, as produced by the
/// transcriber. Wire format: `[[start, end], "text"]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "(TimeInterval, String)", into = "(TimeInterval, String)")]
pub struct CaptionCue {
    pub interval: TimeInterval,
    pub text: String,
}

impl CaptionCue {
    pub fn new(interval: TimeInterval, text: impl Into<String>) -> Self {
        Self {
            interval,
            text: text.into(),
        }
    }
}

impl From<(TimeInterval, String)> for CaptionCue {
    fn from(value: (TimeInterval, String)) -> Self {
        Self {
            interval: value.0,
            text: value.1,
        }
    }
}

impl From<CaptionCue> for (TimeInterval, String) {
    fn from(value: CaptionCue) -> Self {
        (value.interval, value.text)
    }
}

/// Load an assignment list from a collaborator JSON file.
pub fn load_assignments(path: &Path) -> ClipmillResult<Vec<AssetAssignment>> {
    let f = File::open(path).with_context(|| format!("open assignments '{}'", path.display()))?;
    let assignments: Vec<AssetAssignment> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse assignments JSON '{}'", path.display()))?;
    Ok(assignments)
}

/// Load a caption cue list from a collaborator JSON file.
pub fn load_captions(path: &Path) -> ClipmillResult<Vec<CaptionCue>> {
    let f = File::open(path).with_context(|| format!("open captions '{}'", path.display()))?;
    let cues: Vec<CaptionCue> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse captions JSON '{}'", path.display()))?;
    Ok(cues)
}
