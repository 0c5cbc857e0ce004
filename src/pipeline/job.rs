//! A single document under processing and its IO errors.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::encoding::{TextEncoding, decode_document, encode_document};

/// Per-document failures. None of these stop the batch.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("unable to read {}: {source}", path.display())]
    Read {
        /// The document path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes are valid in neither supported encoding.
    #[error("unable to decode {} as UTF-8 or Big5", path.display())]
    Decode {
        /// The document path.
        path: PathBuf,
    },

    /// The rewritten text could not be persisted.
    #[error("error while writing {}: {source}", path.display())]
    Write {
        /// The document path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// One markup file being localized.
#[derive(Debug, Clone)]
pub struct DocumentJob {
    /// Absolute path of the document.
    pub path: PathBuf,
    /// Current text; replaced when the document is rewritten.
    pub text: String,
    /// Encoding the text was read with.
    pub encoding: TextEncoding,
    /// Directory that receives this document's images.
    pub resources_dir: PathBuf,
    /// Number of image references found.
    pub found: usize,
    /// Number of references rewritten to a local path.
    pub updated: usize,
}

impl DocumentJob {
    /// Reads and decodes the document at `path`.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Read`] if the file cannot be read,
    /// [`DocumentError::Decode`] if it is neither UTF-8 nor Big5.
    pub async fn load(path: &Path, resources_dir_name: &str) -> Result<Self, DocumentError> {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| DocumentError::Read {
                path: path.clone(),
                source,
            })?;
        let decoded = decode_document(&bytes).ok_or_else(|| DocumentError::Decode {
            path: path.clone(),
        })?;
        debug!(path = %path.display(), encoding = ?decoded.encoding, bytes = bytes.len(), "document loaded");

        let resources_dir = document_dir(&path).join(resources_dir_name);
        Ok(Self {
            path,
            text: decoded.text,
            encoding: decoded.encoding,
            resources_dir,
            found: 0,
            updated: 0,
        })
    }

    /// Directory containing the document; relative paths are computed from here.
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        document_dir(&self.path)
    }

    /// Writes the current text back to the document path.
    ///
    /// The text goes to a temporary sibling first and is renamed over the
    /// document, so a failed write leaves the original file intact.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Write`] if the file cannot be written.
    pub async fn persist(&self) -> Result<(), DocumentError> {
        let bytes = encode_document(&self.text, self.encoding);
        let staging = staging_path(&self.path);
        let to_write_error = |source| DocumentError::Write {
            path: self.path.clone(),
            source,
        };

        tokio::fs::write(&staging, bytes)
            .await
            .map_err(to_write_error)?;
        if let Err(source) = tokio::fs::rename(&staging, &self.path).await {
            debug!(staging = %staging.display(), "removing staging file after failed rename");
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(to_write_error(source));
        }
        Ok(())
    }
}

/// Hidden sibling of `path` used to stage a rewrite: `.name.<random>.tmp`.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "document".into(), |name| name.to_string_lossy());
    let suffix: u32 = rand::random();
    document_dir(path).join(format!(".{name}.{suffix:08x}.tmp"))
}

fn document_dir(path: &Path) -> PathBuf {
    path.parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
