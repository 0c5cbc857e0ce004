//! Run configuration for the localizer and its validation errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::download::filename::is_reserved_char;
use crate::download::{CoordinatorError, DEFAULT_CONCURRENCY, DEFAULT_MIN_FILENAME_LEN};
use crate::parser::ImageClassifier;

/// Default name of the per-document folder that receives downloaded images.
pub const DEFAULT_RESOURCES_DIR: &str = "resources";

/// Default document file extensions (without the dot).
pub const DEFAULT_DOCUMENT_EXTENSIONS: &[&str] = &["md"];

/// Fatal configuration problems, detected before any document is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The target directory does not exist.
    #[error("target directory '{}' does not exist\n  Suggestion: check the path and try again", path.display())]
    MissingRoot {
        /// The path that was given.
        path: PathBuf,
    },

    /// The target path exists but is not a directory.
    #[error("target '{}' is not a directory\n  Suggestion: pass the folder that contains your documents", path.display())]
    NotADirectory {
        /// The path that was given.
        path: PathBuf,
    },

    /// Concurrency limit out of range.
    #[error(transparent)]
    Concurrency(#[from] CoordinatorError),

    /// The resources directory name is empty, a path, or not safe inside a link.
    #[error(
        "invalid resources directory name '{name}': must be a single path segment without spaces, quotes, parentheses, '#' or '%'"
    )]
    InvalidResourcesDir {
        /// The rejected name.
        name: String,
    },

    /// No document extensions were configured.
    #[error("no document extensions configured")]
    NoExtensions,
}

/// Settings consumed by [`Localizer`](crate::pipeline::Localizer).
#[derive(Debug, Clone)]
pub struct LocalizerConfig {
    /// Maximum simultaneous downloads per document (1-100).
    pub concurrency: usize,
    /// URL-derived filenames shorter than this are replaced by a generated name.
    pub min_filename_len: usize,
    /// Name of the sibling folder that receives downloads.
    pub resources_dir: String,
    /// Document extensions matched during discovery (case-insensitive, no dot).
    pub extensions: Vec<String>,
    /// Count references without downloading or writing anything.
    pub dry_run: bool,
    /// Decides which referenced URLs are images.
    pub classifier: ImageClassifier,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            min_filename_len: DEFAULT_MIN_FILENAME_LEN,
            resources_dir: DEFAULT_RESOURCES_DIR.to_string(),
            extensions: DEFAULT_DOCUMENT_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            dry_run: false,
            classifier: ImageClassifier::default(),
        }
    }
}

impl LocalizerConfig {
    /// Checks every field that could make a run fail for all documents.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.concurrency) {
            return Err(CoordinatorError::InvalidConcurrency {
                value: self.concurrency,
            }
            .into());
        }
        let name = self.resources_dir.as_str();
        if name.is_empty() || name == "." || name == ".." || name.chars().any(is_reserved_char) {
            return Err(ConfigError::InvalidResourcesDir {
                name: name.to_string(),
            });
        }
        if self.extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(ConfigError::NoExtensions);
        }
        Ok(())
    }
}
