//! Per-document orchestration: read, extract, fetch, rewrite, write.
//!
//! Documents are processed one at a time; the images of a single document
//! are fetched concurrently through the [`DownloadCoordinator`]. No failure
//! of a single document or image escapes [`Localizer::process_documents`];
//! the [`BatchSummary`] is always produced.
//!
//! # Example
//!
//! ```no_run
//! use localizer_core::{HttpClient, Localizer, LocalizerConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let localizer = Localizer::new(LocalizerConfig::default(), Arc::new(HttpClient::new()))?;
//! let summary = localizer.process_directory(Path::new("./notes")).await?;
//! println!("{} of {} images localized", summary.images_updated, summary.images_found);
//! # Ok(())
//! # }
//! ```

pub mod encoding;
mod job;
mod summary;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

pub use job::{DocumentError, DocumentJob};
pub use summary::{BatchSummary, DocumentReport, DocumentStatus};

use crate::config::{ConfigError, LocalizerConfig};
use crate::discovery::discover_documents;
use crate::download::{DownloadCoordinator, FetchResult, ImageFetcher, into_mapping};
use crate::parser::{extract_references_with, unique_urls};
use crate::rewrite::rewrite_document;

/// Runs the extract-download-rewrite pipeline over documents.
pub struct Localizer {
    config: LocalizerConfig,
    coordinator: DownloadCoordinator,
    fetcher: Arc<dyn ImageFetcher>,
}

impl std::fmt::Debug for Localizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localizer")
            .field("config", &self.config)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

impl Localizer {
    /// Creates a localizer after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: LocalizerConfig, fetcher: Arc<dyn ImageFetcher>) -> Result<Self, ConfigError> {
        config.validate()?;
        let coordinator = DownloadCoordinator::new(config.concurrency)?
            .with_min_filename_len(config.min_filename_len);
        Ok(Self {
            config,
            coordinator,
            fetcher,
        })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    /// Discovers documents under `root` and processes them.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] only if `root` is missing or not a directory.
    pub async fn process_directory(&self, root: &Path) -> Result<BatchSummary, ConfigError> {
        self.process_directory_with(root, |_| {}).await
    }

    /// Like [`process_directory`](Self::process_directory), calling `on_document`
    /// after each document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] only if `root` is missing or not a directory.
    pub async fn process_directory_with<F>(
        &self,
        root: &Path,
        on_document: F,
    ) -> Result<BatchSummary, ConfigError>
    where
        F: FnMut(&DocumentReport),
    {
        let documents = discover_documents(root, &self.config.extensions)?;
        if documents.is_empty() {
            info!(root = %root.display(), "no documents found");
        } else {
            info!(root = %root.display(), count = documents.len(), "found documents");
        }
        Ok(self.process_documents(&documents, on_document).await)
    }

    /// Processes `documents` sequentially and aggregates their counts.
    pub async fn process_documents<F>(&self, documents: &[PathBuf], mut on_document: F) -> BatchSummary
    where
        F: FnMut(&DocumentReport),
    {
        let mut summary = BatchSummary::new();
        for path in documents {
            let report = self.process_document(path).await;
            summary.record(&report);
            on_document(&report);
        }

        info!(
            documents = summary.documents,
            found = summary.images_found,
            updated = summary.images_updated,
            failed = summary.images_failed(),
            failed_documents = summary.failed_documents,
            "batch complete"
        );
        summary
    }

    /// Localizes the images of one document. Never fails; problems are in the report.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn process_document(&self, path: &Path) -> DocumentReport {
        info!("processing document");

        let mut job = match DocumentJob::load(path, &self.config.resources_dir).await {
            Ok(job) => job,
            Err(e) => {
                warn!(error = %e, "skipping unreadable document");
                return DocumentReport {
                    error: Some(e.to_string()),
                    ..DocumentReport::new(path.to_path_buf(), DocumentStatus::ReadFailed)
                };
            }
        };

        let references = extract_references_with(&job.text, &self.config.classifier);
        if references.is_empty() {
            info!("no remote images found");
            return DocumentReport::new(job.path, DocumentStatus::NoImages);
        }
        job.found = references.len();
        info!(found = job.found, "found remote images");

        if self.config.dry_run {
            return DocumentReport {
                found: job.found,
                ..DocumentReport::new(job.path, DocumentStatus::DryRun)
            };
        }

        let urls = unique_urls(&references);
        let results = match self
            .coordinator
            .fetch_all(Arc::clone(&self.fetcher), &urls, &job.resources_dir)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "download coordinator failed; leaving document untouched");
                Vec::new()
            }
        };
        let failed_urls = failed_urls(&urls, &results);
        let mapping = into_mapping(results);

        let outcome = rewrite_document(&job.text, &mapping, &job.directory());
        for url in mapping.keys().filter(|url| !outcome.rewritten_urls.contains(*url)) {
            debug!(url = %url, "fetched URL no longer present in text");
        }
        job.updated = references
            .iter()
            .filter(|reference| outcome.rewritten_urls.contains(&reference.url))
            .count();

        let report = DocumentReport {
            found: job.found,
            updated: job.updated,
            failed_urls,
            ..DocumentReport::new(job.path.clone(), DocumentStatus::Unchanged)
        };

        if !outcome.changed() {
            info!(found = job.found, "no references updated");
            return report;
        }

        job.text = outcome.text;
        if let Err(e) = job.persist().await {
            warn!(error = %e, "failed to save rewritten document; downloaded images kept");
            return DocumentReport {
                updated: 0,
                status: DocumentStatus::WriteFailed,
                error: Some(e.to_string()),
                ..report
            };
        }

        info!(
            updated = job.updated,
            found = job.found,
            "document updated"
        );
        DocumentReport {
            status: DocumentStatus::Updated,
            ..report
        }
    }
}

/// URLs without a successful result, in input order.
fn failed_urls(urls: &[String], results: &[FetchResult]) -> Vec<String> {
    urls.iter()
        .filter(|url| {
            !results
                .iter()
                .any(|result| &result.url == *url && result.is_success())
        })
        .cloned()
        .collect()
}
