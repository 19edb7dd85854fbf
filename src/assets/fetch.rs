use std::path::PathBuf;

use crate::assets::scratch::ScratchRegistry;
use crate::foundation::error::{ClipmillError, ClipmillResult};

/// Identifying header sent with footage downloads; stock-footage CDNs reject
/// anonymous clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Seam between the track builder and asset retrieval.
///
/// Implementations produce a local readable file for `url` inside the
/// registry's scratch space. No retry happens at this layer; retry policy
/// belongs to the caller.
pub trait FetchAssets {
    fn fetch(&self, url: &str, registry: &mut ScratchRegistry) -> ClipmillResult<PathBuf>;
}

/// Blocking HTTP fetcher for remote footage URLs.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> ClipmillResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| anyhow::anyhow!("build http client: {e}"))?;
        Ok(Self { client })
    }
}

impl FetchAssets for HttpFetcher {
    fn fetch(&self, url: &str, registry: &mut ScratchRegistry) -> ClipmillResult<PathBuf> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ClipmillError::fetch(url, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClipmillError::fetch(
                url,
                format!("server returned status {status}"),
            ));
        }

        let bytes = response
            .bytes()
            .map_err(|e| ClipmillError::fetch(url, format!("read body failed: {e}")))?;
        if bytes.is_empty() {
            return Err(ClipmillError::fetch(url, "downloaded file is empty"));
        }

        let path = registry.allocate("mp4");
        std::fs::write(&path, &bytes).map_err(|e| {
            ClipmillError::fetch(
                url,
                format!("write scratch file '{}' failed: {e}", path.display()),
            )
        })?;
        tracing::debug!(url, path = %path.display(), bytes = bytes.len(), "fetched asset");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_url_is_a_fetch_error_naming_the_url() {
        let fetcher = HttpFetcher::new().unwrap();
        let mut registry = ScratchRegistry::new().unwrap();
        let err = fetcher
            .fetch("not-a-url", &mut registry)
            .expect_err("malformed url must fail");
        match err {
            ClipmillError::Fetch { url, .. } => assert_eq!(url, "not-a-url"),
            other => panic!("expected fetch error, got {other}"),
        }
        // Nothing was allocated for the failed request.
        assert!(registry.tracked().is_empty());
    }
}
