//! CLI entry point for the image localizer.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use localizer_core::{
    BatchSummary, DocumentStatus, HttpClient, ImageClassifier, Localizer, LocalizerConfig,
    discover_documents,
};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");
    info!(target_dir = %args.target_dir.display(), "Image localizer starting");

    let config = LocalizerConfig {
        concurrency: usize::from(args.concurrency),
        min_filename_len: args.min_filename_len,
        resources_dir: args.resources_dir.clone(),
        extensions: args.extensions.clone(),
        dry_run: args.dry_run,
        classifier: ImageClassifier::default(),
    };

    let client = HttpClient::try_new_with_timeouts(args.connect_timeout, args.read_timeout)
        .context("failed to build HTTP client")?;

    let localizer = Localizer::new(config, Arc::new(client))?;

    let documents = discover_documents(&args.target_dir, &localizer.config().extensions)?;
    if documents.is_empty() {
        info!("No matching documents found");
    } else {
        info!(documents = documents.len(), "Discovered documents");
    }

    let progress = progress_bar(
        !args.quiet && !args.json && io::stderr().is_terminal(),
        documents.len(),
    );
    let summary = localizer
        .process_documents(&documents, |report| {
            if let Some(bar) = &progress {
                bar.set_message(report.path.display().to_string());
                bar.inc(1);
            }
            if report.status == DocumentStatus::Updated {
                debug!(
                    path = %report.path.display(),
                    updated = report.updated,
                    found = report.found,
                    "Document localized"
                );
            }
            for url in &report.failed_urls {
                warn!(path = %report.path.display(), url = %url, "Image left remote");
            }
        })
        .await;
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    print_summary(&summary, args.dry_run);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn progress_bar(enabled: bool, total: usize) -> Option<ProgressBar> {
    if !enabled || total == 0 {
        return None;
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    Some(bar)
}

fn print_summary(summary: &BatchSummary, dry_run: bool) {
    if dry_run {
        info!(
            documents = summary.documents,
            found = summary.images_found,
            "Dry run complete, no files modified"
        );
        return;
    }
    info!(
        documents = summary.documents,
        found = summary.images_found,
        updated = summary.images_updated,
        failed = summary.images_failed(),
        failed_documents = summary.failed_documents,
        "Localization complete"
    );
}
