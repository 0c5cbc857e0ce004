//! Reference extraction from Markdown text.
//!
//! This module finds remote image references in raw document text without
//! building a Markdown tree. It recognizes two forms:
//!
//! - Bracket style: `![alt](https://example.com/pic.png)`
//! - Tag style: `<img src="https://example.com/pic.png" width="10">`
//!
//! Every captured URL must pass [`is_url`] and an [`ImageUrlFilter`] (by
//! default [`ImageClassifier`]) to be reported.
//!
//! # Example
//!
//! ```
//! use localizer_core::parser::extract_image_urls;
//!
//! let text = "![logo](https://example.com/logo.png)\n<img src='https://example.com/a.gif'>";
//! assert_eq!(
//!     extract_image_urls(text),
//!     vec!["https://example.com/logo.png", "https://example.com/a.gif"]
//! );
//! ```

mod classify;
mod reference;
pub mod syntax;

pub use classify::{
    DEFAULT_IMAGE_EXTENSIONS, DEFAULT_IMAGE_HOSTS, DEFAULT_IMAGE_SUBSTRINGS, ImageClassifier,
    ImageUrlFilter, URL_SCHEMES, is_image_url, is_url,
};
pub use reference::{
    RemoteReference, extract_image_urls, extract_references, extract_references_with,
    unique_urls,
};
pub use syntax::{ReferenceSyntax, SyntaxMatch};
