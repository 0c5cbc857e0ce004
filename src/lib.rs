//! Image Localizer Core Library
//!
//! This library rewrites Markdown documents so that remote image references
//! point at local copies. Every image is downloaded into a `resources` folder
//! next to the document that references it, and the reference is replaced by
//! a relative path.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - URL classification and image reference extraction
//! - [`download`] - HTTP image fetcher and bounded-concurrency coordinator
//! - [`rewrite`] - Substitution of fetched URLs with relative paths
//! - [`pipeline`] - Per-document orchestration and batch summary
//! - [`discovery`] - Recursive document discovery
//! - [`config`] - Run configuration and validation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod discovery;
pub mod download;
pub mod parser;
pub mod pipeline;
pub mod rewrite;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, DEFAULT_RESOURCES_DIR, LocalizerConfig};
pub use discovery::discover_documents;
pub use download::{
    DEFAULT_CONCURRENCY, DownloadCoordinator, FetchError, FetchMapping, FetchResult, HttpClient,
    ImageFetcher,
};
pub use parser::{
    ImageClassifier, RemoteReference, extract_image_urls, extract_references, is_image_url, is_url,
};
pub use pipeline::{BatchSummary, DocumentReport, DocumentStatus, Localizer};
pub use rewrite::{RewriteOutcome, relative_path, rewrite_document};
