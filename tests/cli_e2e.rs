//! End-to-end CLI tests for the localize-images binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::mock_image_host;

fn localize_images() -> Command {
    Command::cargo_bin("localize-images").expect("binary should be built")
}

/// --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    localize_images()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download remote images"))
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--dry-run"));
}

/// --version displays the binary name.
#[test]
fn test_binary_version_displays_version() {
    localize_images()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("localize-images"));
}

/// A missing TARGET_DIR is a usage error.
#[test]
fn test_binary_without_target_dir_fails() {
    localize_images()
        .assert()
        .failure()
        .stderr(predicate::str::contains("TARGET_DIR"));
}

/// Out-of-range concurrency is rejected before any work starts.
#[test]
fn test_binary_invalid_concurrency_fails() {
    let temp_dir = TempDir::new().expect("temp dir");
    localize_images()
        .args(["-c", "0"])
        .arg(temp_dir.path())
        .assert()
        .failure();
}

/// A target directory that does not exist exits non-zero with a message.
#[test]
fn test_binary_missing_directory_fails() {
    let temp_dir = TempDir::new().expect("temp dir");
    localize_images()
        .arg(temp_dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

/// An empty directory is processed successfully.
#[test]
fn test_binary_empty_directory_succeeds() {
    let temp_dir = TempDir::new().expect("temp dir");
    localize_images()
        .arg("-q")
        .arg(temp_dir.path())
        .assert()
        .success();
}

/// --json prints the batch summary on stdout.
#[test]
fn test_binary_json_summary_for_dry_run() {
    let temp_dir = TempDir::new().expect("temp dir");
    let doc = temp_dir.path().join("post.md");
    let text = "![a](https://example.com/a.png)\n<img src=\"https://example.com/b.jpg\">\n";
    std::fs::write(&doc, text).expect("write");

    let output = localize_images()
        .args(["--dry-run", "--json"])
        .arg(temp_dir.path())
        .env("RUST_LOG", "off")
        .output()
        .expect("run binary");

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(summary["documents"], 1);
    assert_eq!(summary["images_found"], 2);
    assert_eq!(summary["images_updated"], 0);
    assert_eq!(std::fs::read_to_string(&doc).expect("read"), text);
}

/// Failed downloads still exit 0; the reference stays remote.
#[tokio::test]
async fn test_binary_localizes_and_tolerates_failures() {
    let Some(server) = mock_image_host().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/ok.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().expect("temp dir");
    let doc = temp_dir.path().join("post.md");
    let base = server.uri();
    std::fs::write(&doc, format!("![a]({base}/ok.png)\n![b]({base}/gone.png)\n")).expect("write");

    let root = temp_dir.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        localize_images()
            .arg("--json")
            .arg(&root)
            .env("RUST_LOG", "off")
            .output()
            .expect("run binary")
    })
    .await
    .expect("join");

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(summary["images_found"], 2);
    assert_eq!(summary["images_updated"], 1);
    assert_eq!(
        std::fs::read_to_string(&doc).expect("read"),
        format!("![a](resources/ok.png)\n![b]({base}/gone.png)\n")
    );
}
