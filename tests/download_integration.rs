//! Integration tests for the download module.
//!
//! These tests verify the fetch and coordination flow against mock HTTP servers.

use std::sync::Arc;
use std::time::Duration;

use localizer_core::download::{
    DEFAULT_MIN_FILENAME_LEN, DownloadCoordinator, FetchError, HttpClient, ImageFetcher,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::mock_image_host;

/// Mounts `count` image endpoints at `/img/{i}.png`, each delayed by `delay`.
async fn mount_images(server: &MockServer, count: usize, delay: Duration) -> Vec<String> {
    let mut urls = Vec::with_capacity(count);
    for i in 0..count {
        let route = format!("/img/{i}.png");
        Mock::given(method("GET"))
            .and(path(route.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(format!("image {i}").into_bytes())
                    .set_delay(delay),
            )
            .mount(server)
            .await;
        urls.push(format!("{}{route}", server.uri()));
    }
    urls
}

#[tokio::test]
async fn test_fetch_preserves_content() {
    let Some(server) = mock_image_host().await else {
        return;
    };
    let content = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3];
    Mock::given(method("GET"))
        .and(path("/banner.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new();
    let file_path = client
        .fetch(
            &format!("{}/banner.png", server.uri()),
            temp_dir.path(),
            DEFAULT_MIN_FILENAME_LEN,
        )
        .await
        .expect("fetch should succeed");

    assert_eq!(file_path, temp_dir.path().join("banner.png"));
    assert_eq!(std::fs::read(&file_path).expect("read"), content);
}

#[tokio::test]
async fn test_fetch_decodes_percent_encoded_filename_to_link_safe_name() {
    let Some(server) = mock_image_host().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/my%20photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let file_path = HttpClient::new()
        .fetch(
            &format!("{}/my%20photo.jpg", server.uri()),
            temp_dir.path(),
            DEFAULT_MIN_FILENAME_LEN,
        )
        .await
        .expect("fetch should succeed");

    assert_eq!(
        file_path.file_name().and_then(|n| n.to_str()),
        Some("my_photo.jpg")
    );
}

#[tokio::test]
async fn test_fetch_min_filename_len_forces_generated_name() {
    let Some(server) = mock_image_host().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let file_path = HttpClient::new()
        .fetch(&format!("{}/logo.png", server.uri()), temp_dir.path(), 20)
        .await
        .expect("fetch should succeed");

    let name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .expect("utf-8 name");
    assert_ne!(name, "logo.png");
    assert_eq!(name.len(), 36, "generated name expected: {name}");
}

#[tokio::test]
async fn test_fetch_server_error_is_http_status() {
    let Some(server) = mock_image_host().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/broken.png"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let result = HttpClient::new()
        .fetch(
            &format!("{}/broken.png", server.uri()),
            temp_dir.path(),
            DEFAULT_MIN_FILENAME_LEN,
        )
        .await;

    assert!(
        matches!(result, Err(FetchError::HttpStatus { status: 503, .. })),
        "{result:?}"
    );
    assert!(!temp_dir.path().join("broken.png").exists());
}

#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = HttpClient::new_with_timeouts(2, 5);

    // Port 9 (discard) is not expected to accept HTTP connections locally.
    let result = client
        .fetch("http://127.0.0.1:9/pic.png", temp_dir.path(), DEFAULT_MIN_FILENAME_LEN)
        .await;

    assert!(
        matches!(result, Err(FetchError::Network { .. } | FetchError::Timeout { .. })),
        "{result:?}"
    );
}

#[tokio::test]
async fn test_coordinator_fetches_every_url() {
    let Some(server) = mock_image_host().await else {
        return;
    };
    let urls = mount_images(&server, 8, Duration::ZERO).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let coordinator = DownloadCoordinator::new(3).expect("valid concurrency");
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpClient::new());
    let mapping = coordinator
        .download_all(fetcher, &urls, temp_dir.path())
        .await
        .expect("coordinator runs");

    assert_eq!(mapping.len(), 8);
    for (i, url) in urls.iter().enumerate() {
        let local = mapping.get(url).expect("every URL mapped");
        assert_eq!(
            std::fs::read_to_string(local).expect("read"),
            format!("image {i}")
        );
    }
}

#[tokio::test]
async fn test_coordinator_runs_fetches_concurrently() {
    let Some(server) = mock_image_host().await else {
        return;
    };
    let urls = mount_images(&server, 4, Duration::from_millis(500)).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let coordinator = DownloadCoordinator::new(4).expect("valid concurrency");
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpClient::new());
    let started = std::time::Instant::now();
    let results = coordinator
        .fetch_all(fetcher, &urls, temp_dir.path())
        .await
        .expect("coordinator runs");

    assert!(results.iter().all(|r| r.is_success()));
    assert!(
        started.elapsed() < Duration::from_millis(1800),
        "four 500ms fetches with limit 4 took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_coordinator_mixed_results_keep_successes() {
    let Some(server) = mock_image_host().await else {
        return;
    };
    let mut urls = mount_images(&server, 2, Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    urls.push(format!("{}/gone.png", server.uri()));
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let coordinator = DownloadCoordinator::new(2).expect("valid concurrency");
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpClient::new());
    let results = coordinator
        .fetch_all(fetcher, &urls, temp_dir.path())
        .await
        .expect("coordinator runs");

    assert_eq!(results.len(), 3);
    assert_eq!(results.iter().filter(|r| r.is_success()).count(), 2);
    let failed = results.iter().find(|r| !r.is_success()).expect("one failure");
    assert_eq!(failed.url, urls[2]);
    assert!(matches!(
        failed.error(),
        Some(FetchError::HttpStatus { status: 404, .. })
    ));
}
