//! Per-document reports and the batch summary aggregated from them.

use std::path::PathBuf;

use serde::Serialize;

/// How processing of one document ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// No qualifying image references; nothing downloaded or written.
    NoImages,
    /// At least one reference was rewritten and the document saved.
    Updated,
    /// References were found but none could be rewritten; file untouched.
    Unchanged,
    /// References were counted only (dry run).
    DryRun,
    /// The document could not be read or decoded.
    ReadFailed,
    /// The rewritten document could not be saved.
    WriteFailed,
}

impl DocumentStatus {
    /// True for statuses that represent a failure of the document as a whole.
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::ReadFailed | Self::WriteFailed)
    }
}

/// Outcome of processing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// The document path.
    pub path: PathBuf,
    /// Image references found.
    pub found: usize,
    /// References now pointing at a local file.
    pub updated: usize,
    /// How processing ended.
    pub status: DocumentStatus,
    /// URLs that could not be fetched.
    pub failed_urls: Vec<String>,
    /// Document-level error message, if any.
    pub error: Option<String>,
}

impl DocumentReport {
    pub(crate) fn new(path: PathBuf, status: DocumentStatus) -> Self {
        Self {
            path,
            found: 0,
            updated: 0,
            status,
            failed_urls: Vec::new(),
            error: None,
        }
    }
}

/// Totals across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Documents processed (including failed ones).
    pub documents: usize,
    /// Image references found across all documents.
    pub images_found: usize,
    /// References rewritten to local copies.
    pub images_updated: usize,
    /// Documents that could not be read or saved.
    pub failed_documents: usize,
}

impl BatchSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one document's counts.
    pub fn record(&mut self, report: &DocumentReport) {
        self.documents += 1;
        self.images_found += report.found;
        self.images_updated += report.updated;
        if report.status.is_failure() {
            self.failed_documents += 1;
        }
    }

    /// References that are still remote after the run.
    #[must_use]
    pub fn images_failed(&self) -> usize {
        self.images_found.saturating_sub(self.images_updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn report(found: usize, updated: usize, status: DocumentStatus) -> DocumentReport {
        DocumentReport {
            found,
            updated,
            ..DocumentReport::new(PathBuf::from("doc.md"), status)
        }
    }

    #[test]
    fn test_summary_accumulates_counts() {
        let mut summary = BatchSummary::new();
        summary.record(&report(3, 2, DocumentStatus::Updated));
        summary.record(&report(0, 0, DocumentStatus::NoImages));
        summary.record(&report(0, 0, DocumentStatus::ReadFailed));

        assert_eq!(summary.documents, 3);
        assert_eq!(summary.images_found, 3);
        assert_eq!(summary.images_updated, 2);
        assert_eq!(summary.images_failed(), 1);
        assert_eq!(summary.failed_documents, 1);
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let mut summary = BatchSummary::new();
        summary.record(&report(2, 2, DocumentStatus::Updated));
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["documents"], 1);
        assert_eq!(json["images_found"], 2);
        assert_eq!(json["images_updated"], 2);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::WriteFailed).unwrap();
        assert_eq!(json, "\"write_failed\"");
    }
}
