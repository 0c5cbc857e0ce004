//! Filename derivation and collision-safe path allocation for downloaded images.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tracing::debug;
use url::Url;

use super::constants::{DEFAULT_IMAGE_EXTENSION, MAX_COLLISION_SUFFIX};

/// Derives the local filename for `url` from its last path segment.
///
/// The segment is percent-decoded and sanitized. When the result is shorter
/// than `min_len` characters, a random name with [`DEFAULT_IMAGE_EXTENSION`]
/// is generated instead.
#[must_use]
pub fn candidate_filename(url: &Url, min_len: usize) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    let decoded = urlencoding::decode(segment).map_or_else(
        |_| segment.to_string(),
        std::borrow::Cow::into_owned,
    );
    let sanitized = sanitize_filename(&decoded);

    if sanitized.chars().count() < min_len || sanitized.trim_matches('_').is_empty() {
        let generated = generated_filename();
        debug!(segment = %segment, generated = %generated, "URL segment too short, using generated filename");
        return generated;
    }
    sanitized
}

/// Random 32-hex-digit filename with the default image extension.
#[must_use]
pub fn generated_filename() -> String {
    format!("{:032x}{DEFAULT_IMAGE_EXTENSION}", rand::random::<u128>())
}

/// True for characters that are invalid on common filesystems or that would
/// end a Markdown link destination or a quoted `src` value early.
///
/// Filesystem: `/ \ : * ? " < > |` and control characters.
/// Markup: whitespace, `( ) '`, and `# %` which renderers read as a fragment
/// or an escape.
#[must_use]
pub fn is_reserved_char(c: char) -> bool {
    matches!(
        c,
        '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '(' | ')' | '\'' | '#' | '%'
    ) || c.is_control()
        || c.is_whitespace()
}

/// Replaces every [reserved](is_reserved_char) character with `_`.
///
/// A name that would resolve to `.` or `..` has its dots replaced as well.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if is_reserved_char(c) { '_' } else { c })
        .collect();

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Splits `name.ext` into (`name`, `.ext`). Leading-dot names have no extension.
pub(crate) fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(pos) if pos > 0 => (&filename[..pos], &filename[pos..]),
        _ => (filename, ""),
    }
}

/// Name for the `index`-th collision candidate: `name.ext`, `name_1.ext`, `name_2.ext`, ...
pub(crate) fn numbered_filename(filename: &str, index: usize) -> String {
    if index == 0 {
        return filename.to_string();
    }
    let (stem, ext) = split_extension(filename);
    format!("{stem}_{index}{ext}")
}

/// Atomically claims the first unused name among `filename`, `name_1.ext`, `name_2.ext`, ...
///
/// Each candidate is opened with `create_new`, so two concurrent callers can
/// never be handed the same path. The returned file is empty and open for writing.
///
/// # Errors
///
/// Returns the underlying IO error if a candidate cannot be created for a
/// reason other than already existing, or `AlreadyExists` once every suffix
/// up to the limit is taken.
pub(crate) async fn reserve_unique_path(
    dir: &Path,
    filename: &str,
) -> std::io::Result<(PathBuf, File)> {
    for index in 0..=MAX_COLLISION_SUFFIX {
        let path = dir.join(numbered_filename(filename, index));
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }
    }
    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free name for {filename} in {}", dir.display()),
    ))
}
