//! HTTP client wrapper for fetching images into a resources directory.
//!
//! This module provides the `HttpClient` struct which streams a response body
//! to a collision-free file with proper timeout configuration and error handling.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::FetchError;
use super::fetcher::ImageFetcher;
use super::filename::{candidate_filename, reserve_unique_path};
use crate::user_agent;

/// HTTP client for downloading images with streaming support.
///
/// This client is designed to be created once and reused for every document
/// in a run, taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use localizer_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let path = client
///     .fetch_image("https://example.com/pic.png", Path::new("./resources"), 3)
///     .await?;
/// println!("Saved to: {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        Self::try_new_with_timeouts(connect_timeout_secs, read_timeout_secs)
            .expect("failed to build HTTP client with static configuration")
    }

    /// Fallible variant of [`new_with_timeouts`](Self::new_with_timeouts).
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error (e.g. TLS backend initialization failure).
    pub fn try_new_with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()?;
        Ok(Self { client })
    }

    /// Downloads `url` into `target_dir` and returns the path of the new file.
    ///
    /// The directory is created if missing. The filename comes from the last
    /// URL path segment (a generated name when it is shorter than
    /// `min_filename_len`); if that name is taken, `_1`, `_2`, ... is appended
    /// before the extension. No existing file is ever overwritten.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns a non-success status
    /// - Creating the directory or writing the file fails
    ///
    /// On error no file is left at the allocated path.
    #[must_use = "fetch result contains the path to the downloaded image"]
    #[instrument(skip(self), fields(url = %url, dir = %target_dir.display()))]
    pub async fn fetch_image(
        &self,
        url: &str,
        target_dir: &Path,
        min_filename_len: usize,
    ) -> Result<PathBuf, FetchError> {
        debug!("starting fetch");

        let parsed_url = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        tokio::fs::create_dir_all(target_dir)
            .await
            .map_err(|e| FetchError::io(target_dir, e))?;

        let filename = candidate_filename(&parsed_url, min_filename_len);

        let response = self.send_request(url).await?;

        let (file_path, mut file) = reserve_unique_path(target_dir, &filename)
            .await
            .map_err(|e| FetchError::io(target_dir.join(&filename), e))?;
        debug!(filename = %filename, path = %file_path.display(), "resolved output path");

        let stream_result = stream_to_file(&mut file, response, url, &file_path).await;
        drop(file);

        let bytes_written = match stream_result {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %file_path.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&file_path).await;
                return Err(e);
            }
        };

        info!(path = %file_path.display(), bytes = bytes_written, "image downloaded");
        Ok(file_path)
    }

    async fn send_request(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ImageFetcher for HttpClient {
    async fn fetch(
        &self,
        url: &str,
        target_dir: &Path,
        min_filename_len: usize,
    ) -> Result<PathBuf, FetchError> {
        self.fetch_image(url, target_dir, min_filename_len).await
    }
}

/// Streams response body to file, returning bytes written.
///
/// This is extracted to enable cleanup on error in the caller.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, FetchError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| FetchError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| FetchError::io(file_path, e))?;

    Ok(bytes_written)
}
