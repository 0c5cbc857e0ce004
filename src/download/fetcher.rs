//! The fetch seam between the coordinator and the transport.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::FetchError;

/// Retrieves one remote image into a local directory.
///
/// [`HttpClient`](super::HttpClient) is the production implementation; the
/// coordinator only depends on this trait.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Downloads `url` into `target_dir`, returning the path of the new file.
    ///
    /// URL-derived filenames shorter than `min_filename_len` characters are
    /// replaced by a generated name.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the image could not be retrieved or stored.
    async fn fetch(
        &self,
        url: &str,
        target_dir: &Path,
        min_filename_len: usize,
    ) -> Result<PathBuf, FetchError>;
}

/// Outcome of fetching one URL.
#[derive(Debug)]
pub struct FetchResult {
    /// The URL that was fetched.
    pub url: String,
    /// Local path on success, error detail on failure.
    pub outcome: Result<PathBuf, FetchError>,
}

impl FetchResult {
    /// Creates a result from a fetch outcome.
    #[must_use]
    pub fn new(url: impl Into<String>, outcome: Result<PathBuf, FetchError>) -> Self {
        Self {
            url: url.into(),
            outcome,
        }
    }

    /// True if the image was stored locally.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Local path of the stored image, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.outcome.as_ref().ok().map(PathBuf::as_path)
    }

    /// The failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        self.outcome.as_ref().err()
    }
}
