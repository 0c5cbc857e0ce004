//! Canonical definitions of the two image reference syntaxes.
//!
//! Extraction and rewriting both scan text through [`scan`], so every
//! reference the extractor reports is one the rewriter can find again.
//!
//! - Bracket style: `![alt](https://host/path.png)`
//! - Tag style: `<img class="x" src="https://host/path.png" width="10">`

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Bracket-style reference: `!`, `[alt]` (shortest match), `(`, an http(s) URL without `)`, `)`.
#[allow(clippy::expect_used)]
static BRACKET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[(?P<alt>.*?)\]\((?P<url>https?://[^)]+)\)")
        .expect("bracket reference regex is valid") // Static pattern, safe to panic
});

/// Tag-style reference: `<img ... src="url" ...>` with single or double quotes.
///
/// `src` must be preceded by whitespace so attributes like `data-src` are skipped.
#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i:<img)[^>]*?\s(?i:src)\s*=\s*(?:"(?P<dq>[^"]+)"|'(?P<sq>[^']+)')[^>]*>"#,
    )
    .expect("tag reference regex is valid") // Static pattern, safe to panic
});

/// Which markup form a reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSyntax {
    /// `![alt](url)`
    Bracket,
    /// `<img src="url">`
    Tag,
}

impl ReferenceSyntax {
    /// All syntaxes, in scan order.
    pub const ALL: [Self; 2] = [Self::Bracket, Self::Tag];

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Bracket => &BRACKET_PATTERN,
            Self::Tag => &TAG_PATTERN,
        }
    }
}

impl std::fmt::Display for ReferenceSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bracket => write!(f, "bracket"),
            Self::Tag => write!(f, "tag"),
        }
    }
}

/// One syntactic match, before any URL classification.
///
/// Ranges are byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxMatch<'t> {
    /// Syntax that produced the match.
    pub syntax: ReferenceSyntax,
    /// Whole matched span.
    pub span: Range<usize>,
    /// The captured URL.
    pub url: &'t str,
    /// Span of the URL inside the text.
    pub url_span: Range<usize>,
    /// Alt text (bracket style only).
    pub alt_text: Option<&'t str>,
}

/// Scans `text` for both syntaxes and returns matches ordered by position.
#[must_use]
pub fn scan(text: &str) -> Vec<SyntaxMatch<'_>> {
    let mut matches: Vec<SyntaxMatch<'_>> = ReferenceSyntax::ALL
        .iter()
        .flat_map(|&syntax| scan_syntax(text, syntax))
        .collect();
    matches.sort_by_key(|m| m.url_span.start);
    matches
}

/// Scans `text` for a single syntax, in order of occurrence.
#[must_use]
pub fn scan_syntax(text: &str, syntax: ReferenceSyntax) -> Vec<SyntaxMatch<'_>> {
    syntax
        .pattern()
        .captures_iter(text)
        .filter_map(|caps| to_match(syntax, &caps))
        .collect()
}

fn to_match<'t>(syntax: ReferenceSyntax, caps: &Captures<'t>) -> Option<SyntaxMatch<'t>> {
    let whole = caps.get(0)?;
    let url = match syntax {
        ReferenceSyntax::Bracket => caps.name("url")?,
        ReferenceSyntax::Tag => caps.name("dq").or_else(|| caps.name("sq"))?,
    };
    Some(SyntaxMatch {
        syntax,
        span: whole.range(),
        url: url.as_str(),
        url_span: url.range(),
        alt_text: caps.name("alt").map(|m| m.as_str()),
    })
}
