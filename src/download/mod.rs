//! Image download: filename allocation, HTTP fetch and bounded concurrency.
//!
//! This module turns a list of remote image URLs into local files inside a
//! resources directory.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large images)
//! - Filenames from the last URL path segment, with a generated fallback
//! - Collision-free naming (`image.jpg`, `image_1.jpg`, ...) that is safe
//!   under concurrent fetches
//! - Configurable timeouts (30s connect, 5min read by default)
//! - A semaphore-bounded coordinator returning only successful fetches
//!
//! # Example
//!
//! ```no_run
//! use localizer_core::download::{DEFAULT_MIN_FILENAME_LEN, HttpClient};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let file_path = client
//!     .fetch_image(
//!         "https://example.com/diagram.png",
//!         Path::new("./resources"),
//!         DEFAULT_MIN_FILENAME_LEN,
//!     )
//!     .await?;
//! println!("Downloaded: {}", file_path.display());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod coordinator;
mod error;
mod fetcher;
pub mod filename;

pub use client::HttpClient;
pub use constants::{DEFAULT_IMAGE_EXTENSION, DEFAULT_MIN_FILENAME_LEN};
pub use coordinator::{
    CoordinatorError, DEFAULT_CONCURRENCY, DownloadCoordinator, FetchMapping, into_mapping,
};
pub use error::FetchError;
pub use fetcher::{FetchResult, ImageFetcher};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, FetchError>` explicitly in function signatures.
