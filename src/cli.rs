//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use localizer_core::DEFAULT_CONCURRENCY;
use localizer_core::config::DEFAULT_RESOURCES_DIR;
use localizer_core::download::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_MIN_FILENAME_LEN, READ_TIMEOUT_SECS,
};

/// Download remote images referenced by Markdown files and rewrite the
/// references to local relative paths.
///
/// Every document under TARGET_DIR gets a sibling `resources` folder holding
/// the images it references.
#[derive(Parser, Debug)]
#[command(name = "localize-images")]
#[command(author, version, about)]
pub struct Args {
    /// Directory to scan recursively for documents
    #[arg(value_name = "TARGET_DIR")]
    pub target_dir: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum concurrent downloads per document (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Document extension to process (repeatable)
    #[arg(short = 'e', long = "extension", value_name = "EXT", default_values_t = [String::from("md")])]
    pub extensions: Vec<String>,

    /// Name of the folder created next to each document for its images
    #[arg(long, value_name = "NAME", default_value = DEFAULT_RESOURCES_DIR)]
    pub resources_dir: String,

    /// URL-derived filenames shorter than this get a generated name
    #[arg(long, default_value_t = DEFAULT_MIN_FILENAME_LEN)]
    pub min_filename_len: usize,

    /// Connection timeout in seconds (1-600)
    #[arg(long, value_name = "SECS", default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub connect_timeout: u64,

    /// Per-request read timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: u64,

    /// Count image references without downloading or modifying files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the batch summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
