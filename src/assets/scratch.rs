use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::ClipmillResult;

/// Job-scoped owner of every scratch file backing a downloaded asset.
///
/// Paths are allocated here and handed to the fetcher; cleanup deletes the
/// tracked handles, never re-derived names. The backing temp directory is
/// removed on drop, so scratch files cannot outlive the job even when an
/// error unwinds past the explicit [`ScratchRegistry::release_all`] call.
pub struct ScratchRegistry {
    dir: tempfile::TempDir,
    next_id: u64,
    tracked: Vec<PathBuf>,
}

impl ScratchRegistry {
    /// Create a registry backed by a fresh uniquely-named temp directory.
    pub fn new() -> ClipmillResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("clipmill_scratch_")
            .tempdir()
            .context("create scratch directory")?;
        Ok(Self {
            dir,
            next_id: 0,
            tracked: Vec::new(),
        })
    }

    /// Allocate a uniquely-named scratch path and track it for release.
    ///
    /// The file itself is created by whoever writes the download.
    pub fn allocate(&mut self, extension: &str) -> PathBuf {
        self.next_id += 1;
        let path = self
            .dir
            .path()
            .join(format!("asset_{:04}.{extension}", self.next_id));
        self.tracked.push(path.clone());
        path
    }

    /// Every path handed out so far, in allocation order.
    pub fn tracked(&self) -> &[PathBuf] {
        &self.tracked
    }

    /// The scratch directory backing this registry.
    pub fn scratch_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Delete every tracked scratch file. Safe to call on any exit path;
    /// paths that were never written are skipped silently.
    pub fn release_all(&mut self) {
        for path in self.tracked.drain(..) {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove scratch file");
                }
            }
        }
    }
}
