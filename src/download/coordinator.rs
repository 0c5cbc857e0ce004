//! Download coordinator for bounded concurrent image fetches.
//!
//! This module provides the `DownloadCoordinator` which dispatches one fetch
//! task per URL using a semaphore-based concurrency control pattern and
//! collects the successful results into a [`FetchMapping`].
//!
//! # Example
//!
//! ```no_run
//! use localizer_core::download::{DownloadCoordinator, HttpClient, ImageFetcher};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = DownloadCoordinator::new(10)?;
//! let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpClient::new());
//! let urls = vec!["https://example.com/a.png".to_string()];
//! let mapping = coordinator
//!     .download_all(fetcher, &urls, Path::new("./resources"))
//!     .await?;
//! println!("Fetched {} of {}", mapping.len(), urls.len());
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::constants::DEFAULT_MIN_FILENAME_LEN;
use super::error::FetchError;
use super::fetcher::{FetchResult, ImageFetcher};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// URL → local path for every URL that was fetched successfully.
pub type FetchMapping = HashMap<String, PathBuf>;

/// Error type for coordinator operations.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Dispatches image fetches with a fixed upper bound on in-flight requests.
///
/// # Concurrency Model
///
/// - Each fetch runs in its own Tokio task
/// - A semaphore permit is acquired before spawning each task
/// - Permits are released automatically when a fetch finishes (RAII)
/// - A slow fetch only holds its own permit; others keep starting
///
/// A limit of 1 processes URLs one at a time.
#[derive(Debug)]
pub struct DownloadCoordinator {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    min_filename_len: usize,
}

impl Default for DownloadCoordinator {
    fn default() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
            concurrency: DEFAULT_CONCURRENCY,
            min_filename_len: DEFAULT_MIN_FILENAME_LEN,
        }
    }
}

impl DownloadCoordinator {
    /// Creates a coordinator with the given concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use localizer_core::download::DownloadCoordinator;
    ///
    /// let coordinator = DownloadCoordinator::new(4).unwrap();
    /// assert_eq!(coordinator.concurrency(), 4);
    /// assert!(DownloadCoordinator::new(0).is_err());
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, CoordinatorError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(CoordinatorError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download coordinator");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            min_filename_len: DEFAULT_MIN_FILENAME_LEN,
        })
    }

    /// Sets the filename length below which every fetch uses a generated name.
    #[must_use]
    pub fn with_min_filename_len(mut self, min_filename_len: usize) -> Self {
        self.min_filename_len = min_filename_len;
        self
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the minimum filename length passed to every fetch.
    #[must_use]
    pub fn min_filename_len(&self) -> usize {
        self.min_filename_len
    }

    /// Fetches every URL and returns one [`FetchResult`] per distinct URL.
    ///
    /// Results are listed in input order; the order in which fetches actually
    /// complete is unspecified. Duplicate URLs are fetched once.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::SemaphoreClosed`] if the semaphore is closed.
    ///
    /// Note: individual fetch failures do NOT cause this method to error.
    #[instrument(skip(self, fetcher, urls), fields(urls = urls.len(), dir = %target_dir.display()))]
    pub async fn fetch_all(
        &self,
        fetcher: Arc<dyn ImageFetcher>,
        urls: &[String],
        target_dir: &Path,
    ) -> Result<Vec<FetchResult>, CoordinatorError> {
        let mut seen = HashSet::new();
        let mut handles = Vec::new();

        for url in urls {
            if !seen.insert(url.as_str()) {
                debug!(url = %url, "skipping duplicate URL");
                continue;
            }

            // Blocks while `concurrency` fetches are already in flight
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| CoordinatorError::SemaphoreClosed)?;

            let fetcher = Arc::clone(&fetcher);
            let task_url = url.clone();
            let target_dir = target_dir.to_path_buf();
            let min_filename_len = self.min_filename_len;

            handles.push((
                url.clone(),
                tokio::spawn(async move {
                    let _permit = permit;
                    fetcher.fetch(&task_url, &target_dir, min_filename_len).await
                }),
            ));
        }

        debug!(task_count = handles.len(), "waiting for fetches to complete");

        let mut results = Vec::with_capacity(handles.len());
        for (url, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    warn!(url = %url, error = %join_error, "fetch task panicked");
                    Err(FetchError::aborted(&url, join_error.to_string()))
                }
            };
            if let Err(e) = &outcome {
                warn!(url = %url, error = %e, "image fetch failed");
            }
            results.push(FetchResult::new(url, outcome));
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(
            succeeded,
            failed = results.len() - succeeded,
            "fetch batch complete"
        );

        Ok(results)
    }

    /// Fetches every URL and returns the mapping of successful fetches only.
    ///
    /// Failed URLs are simply absent from the mapping.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_all`](Self::fetch_all).
    pub async fn download_all(
        &self,
        fetcher: Arc<dyn ImageFetcher>,
        urls: &[String],
        target_dir: &Path,
    ) -> Result<FetchMapping, CoordinatorError> {
        let results = self.fetch_all(fetcher, urls, target_dir).await?;
        Ok(into_mapping(results))
    }
}

/// Keeps only successful results, keyed by URL.
#[must_use]
pub fn into_mapping(results: Vec<FetchResult>) -> FetchMapping {
    results
        .into_iter()
        .filter_map(|result| match result.outcome {
            Ok(path) => Some((result.url, path)),
            Err(_) => None,
        })
        .collect()
}
