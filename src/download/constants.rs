//! Constants for the download module (timeouts, naming, concurrency).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// URL-derived filenames shorter than this (in characters) are replaced by a generated name.
pub const DEFAULT_MIN_FILENAME_LEN: usize = 3;

/// Extension used for generated filenames.
pub const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

/// Highest numeric suffix tried before giving up on a unique name.
pub(crate) const MAX_COLLISION_SUFFIX: usize = 10_000;
