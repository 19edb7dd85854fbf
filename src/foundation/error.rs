use std::path::{Path, PathBuf};

pub type ClipmillResult<T> = Result<T, ClipmillError>;

/// Pipeline error taxonomy.
///
/// Every stage fails fast and names the input that caused the failure: the
/// interval that broke coverage, the URL that could not be fetched, the file
/// that could not be decoded. Nothing is silently substituted with a default.
#[derive(thiserror::Error, Debug)]
pub enum ClipmillError {
    #[error("coverage error: {0}")]
    Coverage(String),

    #[error("fetch error for '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("audio error for '{}': {reason}", .path.display())]
    Audio { path: PathBuf, reason: String },

    #[error("asset error for '{reference}': {reason}")]
    Asset { reference: String, reason: String },

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClipmillError {
    pub fn coverage(msg: impl Into<String>) -> Self {
        Self::Coverage(msg.into())
    }

    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn audio(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Audio {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn asset(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Asset {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ClipmillError::coverage("x")
                .to_string()
                .contains("coverage error:")
        );
        assert!(
            ClipmillError::render("x")
                .to_string()
                .contains("render error:")
        );
    }

    #[test]
    fn errors_name_the_offending_input() {
        let err = ClipmillError::fetch("https://example.com/a.mp4", "status 404");
        assert!(err.to_string().contains("https://example.com/a.mp4"));
        assert!(err.to_string().contains("status 404"));

        let err = ClipmillError::audio("/tmp/tts.wav", "zero duration");
        assert!(err.to_string().contains("/tmp/tts.wav"));

        let err = ClipmillError::asset("https://example.com/b.mp4", "no video stream");
        assert!(err.to_string().contains("https://example.com/b.mp4"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ClipmillError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
