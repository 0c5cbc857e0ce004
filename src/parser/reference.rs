//! Extraction of remote image references from document text.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::classify::{ImageClassifier, ImageUrlFilter, is_url};
use super::syntax::{ReferenceSyntax, scan};

/// An image URL found in a document, with the syntax it was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReference {
    /// The remote URL exactly as written in the document.
    pub url: String,
    /// Markup form of the reference.
    pub syntax: ReferenceSyntax,
    /// Alt text for bracket-style references.
    pub alt_text: Option<String>,
}

/// Extracts image references using the default [`ImageClassifier`].
///
/// References are returned in order of first occurrence. A URL that appears
/// several times yields one entry per occurrence.
///
/// # Examples
///
/// ```
/// use localizer_core::parser::{ReferenceSyntax, extract_references};
///
/// let refs = extract_references("Intro ![alt](https://host/pic.jpg) outro");
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].url, "https://host/pic.jpg");
/// assert_eq!(refs[0].alt_text.as_deref(), Some("alt"));
/// assert_eq!(refs[0].syntax, ReferenceSyntax::Bracket);
/// ```
#[must_use]
pub fn extract_references(text: &str) -> Vec<RemoteReference> {
    extract_references_with(text, &ImageClassifier::default())
}

/// Extracts image references, classifying candidate URLs with `filter`.
#[tracing::instrument(skip(text, filter), fields(text_len = text.len()))]
#[must_use]
pub fn extract_references_with(text: &str, filter: &dyn ImageUrlFilter) -> Vec<RemoteReference> {
    let mut references = Vec::new();

    for found in scan(text) {
        trace!(url = %found.url, syntax = %found.syntax, "reference candidate");
        if !is_url(found.url) {
            debug!(url = %found.url, "skipping non-URL reference");
            continue;
        }
        if !filter.is_image_url(found.url) {
            debug!(url = %found.url, "skipping URL not classified as image");
            continue;
        }
        references.push(RemoteReference {
            url: found.url.to_string(),
            syntax: found.syntax,
            alt_text: found.alt_text.map(ToString::to_string),
        });
    }

    references
}

/// Convenience wrapper returning only the URLs of [`extract_references`].
#[must_use]
pub fn extract_image_urls(text: &str) -> Vec<String> {
    extract_references(text)
        .into_iter()
        .map(|reference| reference.url)
        .collect()
}

/// Distinct URLs of `references`, in order of first occurrence.
#[must_use]
pub fn unique_urls(references: &[RemoteReference]) -> Vec<String> {
    let mut seen = HashSet::new();
    references
        .iter()
        .filter(|reference| seen.insert(reference.url.as_str()))
        .map(|reference| reference.url.clone())
        .collect()
}
