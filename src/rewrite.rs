//! Rewriting of image references to point at downloaded local copies.
//!
//! Rewriting scans the text with the same matcher the extractor uses
//! ([`crate::parser::syntax::scan`]) and replaces only the URL span of each
//! matched reference. Alt text, other tag attributes, quote characters and
//! everything outside the reference are copied through byte for byte.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::download::FetchMapping;
use crate::parser::syntax::scan;

/// Result of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// The rewritten text.
    pub text: String,
    /// URLs for which at least one occurrence was replaced.
    pub rewritten_urls: HashSet<String>,
    /// Number of individual substitutions made.
    pub replacements: usize,
}

impl RewriteOutcome {
    /// True if any substitution changed the text.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Replaces every bracket- and tag-style occurrence of a mapped URL with the
/// path of its local copy, relative to `document_dir`.
///
/// URLs not in `mapping` are left as they are.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use localizer_core::download::FetchMapping;
/// use localizer_core::rewrite::rewrite_document;
///
/// let mut mapping = FetchMapping::new();
/// mapping.insert("https://host/a.png".to_string(), PathBuf::from("/notes/resources/a.png"));
///
/// let outcome = rewrite_document(
///     r#"<img src="https://host/a.png" width="10">"#,
///     &mapping,
///     Path::new("/notes"),
/// );
/// assert_eq!(outcome.text, r#"<img src="resources/a.png" width="10">"#);
/// ```
#[must_use]
pub fn rewrite_document(text: &str, mapping: &FetchMapping, document_dir: &Path) -> RewriteOutcome {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut relative_paths: HashMap<&str, String> = HashMap::new();
    let mut rewritten_urls = HashSet::new();
    let mut replacements = 0;

    for found in scan(text) {
        // Spans from the two syntaxes can only overlap in pathological input; first one wins.
        if found.url_span.start < cursor {
            continue;
        }
        let Some(local_path) = mapping.get(found.url) else {
            continue;
        };
        let relative = relative_paths
            .entry(found.url)
            .or_insert_with(|| relative_path(document_dir, local_path));
        if relative.as_str() == found.url {
            continue;
        }

        trace!(url = %found.url, syntax = %found.syntax, local = %relative, "rewriting reference");
        output.push_str(&text[cursor..found.url_span.start]);
        output.push_str(relative);
        cursor = found.url_span.end;
        rewritten_urls.insert(found.url.to_string());
        replacements += 1;
    }
    output.push_str(&text[cursor..]);

    debug!(
        replacements,
        urls = rewritten_urls.len(),
        "document rewrite complete"
    );

    RewriteOutcome {
        text: output,
        rewritten_urls,
        replacements,
    }
}

/// Path from `from_dir` to `target`, joined with `/` on every platform.
///
/// A relative `target` is taken to be relative to `from_dir` already.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use localizer_core::rewrite::relative_path;
///
/// assert_eq!(relative_path(Path::new("/a/b"), Path::new("/a/b/resources/x.png")), "resources/x.png");
/// assert_eq!(relative_path(Path::new("/a/b"), Path::new("/a/c/x.png")), "../c/x.png");
/// ```
#[must_use]
pub fn relative_path(from_dir: &Path, target: &Path) -> String {
    let target: PathBuf = if target.is_relative() {
        from_dir.join(target)
    } else {
        target.to_path_buf()
    };

    let from: Vec<Component<'_>> = normalized_components(from_dir);
    let to: Vec<Component<'_>> = normalized_components(&target);

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat_n("..".to_string(), from.len() - common).collect();
    parts.extend(
        to[common..]
            .iter()
            .map(|component| component.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

fn normalized_components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
