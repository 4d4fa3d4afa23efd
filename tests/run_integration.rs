//! Integration tests for full archive runs.
//!
//! These tests drive `ArchiveDownloader` against a mock archive that serves
//! both the metadata endpoint and the images.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use wallpaper_core::{
    ArchiveDownloader, ArchiveError, DownloadError, ItemOutcome, RunConfig, SkipReason, run,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const METADATA_PATH: &str = "/HPImageArchive.aspx";

fn record(url: &str, enddate: &str, copyright: &str) -> serde_json::Value {
    serde_json::json!({
        "url": url,
        "enddate": enddate,
        "copyright": copyright,
    })
}

async fn mount_metadata(server: &MockServer, days: u32, records: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(METADATA_PATH))
        .and(query_param("n", days.to_string()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "images": records })),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts an image at the upgraded path, requiring the UHD sizing parameters.
async fn mount_image(server: &MockServer, upgraded_path: &str, len: usize) {
    Mock::given(method("GET"))
        .and(path(upgraded_path))
        .and(query_param("w", "3840"))
        .and(query_param("h", "2160"))
        .and(query_param("rs", "1"))
        .and(query_param("c", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF; len]))
        .expect(1)
        .mount(server)
        .await;
}

fn config_for(server: &MockServer, output_dir: &Path, days: u32) -> RunConfig {
    RunConfig {
        api_base: server.uri(),
        ..RunConfig::new(output_dir, days)
    }
}

fn output_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("nested").join("walls")
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("output dir should exist")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_run_saves_large_and_skips_small_images() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = output_dir(&temp_dir);

    mount_metadata(
        &server,
        2,
        vec![
            record(
                "/az/hprichbg/rb/Aurora_1920x1080.jpg",
                "20240115",
                "Aurora over Norway (© Example Corp)",
            ),
            record(
                "/az/hprichbg/rb/Placeholder_1920x1080.jpg",
                "20240114",
                "Placeholder (© Nobody)",
            ),
        ],
    )
    .await;
    mount_image(&server, "/az/hprichbg/rb/Aurora_UHD.jpg", 500_000).await;
    mount_image(&server, "/az/hprichbg/rb/Placeholder_UHD.jpg", 50_000).await;

    let summary = run(config_for(&server, &dir, 2))
        .await
        .expect("run should complete");

    assert_eq!(summary.saved(), 1);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.total(), 2);
    assert_eq!(summary.output_dir(), dir.as_path());

    match &summary.outcomes()[0] {
        ItemOutcome::Saved { filename, bytes } => {
            assert_eq!(filename, "2024-01-15_Aurora_over_Norway.jpg");
            assert_eq!(*bytes, 500_000);
        }
        other => panic!("Expected Saved, got: {other:?}"),
    }
    match &summary.outcomes()[1] {
        ItemOutcome::Skipped { filename, reason } => {
            assert_eq!(filename, "2024-01-14_Placeholder.jpg");
            assert_eq!(
                *reason,
                SkipReason::TooSmall {
                    content_length: 50_000
                }
            );
        }
        other => panic!("Expected Skipped, got: {other:?}"),
    }

    assert_eq!(files_in(&dir), ["2024-01-15_Aurora_over_Norway.jpg"]);
    let saved = std::fs::metadata(dir.join("2024-01-15_Aurora_over_Norway.jpg")).unwrap();
    assert_eq!(saved.len(), 500_000);
}

#[tokio::test]
async fn test_run_metadata_failure_writes_nothing() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = output_dir(&temp_dir);

    Mock::given(method("GET"))
        .and(path(METADATA_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = run(config_for(&server, &dir, 5)).await;

    assert!(
        matches!(result, Err(ArchiveError::HttpStatus { status: 500, .. })),
        "Expected HttpStatus(500), got: {result:?}"
    );
    assert!(!dir.exists(), "output dir must not be created on fatal error");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "only the metadata request should be sent");
}

#[tokio::test]
async fn test_run_malformed_metadata_is_fatal() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = output_dir(&temp_dir);

    Mock::given(method("GET"))
        .and(path(METADATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })))
        .mount(&server)
        .await;

    let result = run(config_for(&server, &dir, 5)).await;

    assert!(matches!(result, Err(ArchiveError::Parse { .. })));
    assert!(!dir.exists());
}

#[tokio::test]
async fn test_run_attempts_at_most_returned_records() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = output_dir(&temp_dir);

    let records = (1..=3)
        .map(|i| {
            record(
                &format!("/img/Day{i}_1366x768.jpg"),
                &format!("2024030{i}"),
                &format!("Day {i} (© Example)"),
            )
        })
        .collect();
    mount_metadata(&server, 5, records).await;
    for i in 1..=3 {
        mount_image(&server, &format!("/img/Day{i}_UHD.jpg"), 200_000).await;
    }

    let summary = run(config_for(&server, &dir, 5)).await.unwrap();

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.saved(), 3);
    assert_eq!(
        files_in(&dir),
        [
            "2024-03-01_Day_1.jpg",
            "2024-03-02_Day_2.jpg",
            "2024-03-03_Day_3.jpg"
        ]
    );
}

#[tokio::test]
async fn test_run_isolates_per_item_failures() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = output_dir(&temp_dir);

    mount_metadata(
        &server,
        3,
        vec![
            record("/img/Slow_1920x1080.jpg", "20240105", "Slow (© A)"),
            record("/img/Gone_1920x1080.jpg", "20240104", "Gone (© B)"),
            record("/img/Good_1920x1080.jpg", "20240102", "Good (© D)"),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/Slow_UHD.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; 200_000])
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/Gone_UHD.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_image(&server, "/img/Good_UHD.jpg", 300_000).await;

    let config = RunConfig {
        download_timeout: Duration::from_millis(200),
        ..config_for(&server, &dir, 3)
    };
    let summary = ArchiveDownloader::new(config)
        .expect("downloader builds")
        .run()
        .await
        .expect("per-item failures must not abort the run");

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.saved(), 1);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.failed(), 1);

    let outcomes = summary.outcomes();
    assert!(
        matches!(
            &outcomes[0],
            ItemOutcome::Failed { target, error: DownloadError::Timeout { .. } }
                if target == "2024-01-05_Slow.jpg"
        ),
        "got {:?}",
        outcomes[0]
    );
    assert!(matches!(
        &outcomes[1],
        ItemOutcome::Skipped {
            reason: SkipReason::UnexpectedStatus { status: 404, .. },
            ..
        }
    ));
    assert!(outcomes[2].is_saved());

    assert_eq!(files_in(&dir), ["2024-01-02_Good.jpg"]);
}

#[tokio::test]
async fn test_run_invalid_end_date_aborts_before_any_download() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = output_dir(&temp_dir);

    mount_metadata(
        &server,
        2,
        vec![
            record("/img/Good_1920x1080.jpg", "20240104", "Good (© A)"),
            record("/img/BadDate_1920x1080.jpg", "2024-01-03", "Bad date (© B)"),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/Good_UHD.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 300_000]))
        .expect(0)
        .mount(&server)
        .await;

    let result = run(config_for(&server, &dir, 2)).await;

    match result {
        Err(ArchiveError::Parse { source, .. }) => {
            assert!(source.to_string().contains("2024-01-03"), "got {source}");
        }
        other => panic!("Expected Parse, got: {other:?}"),
    }
    assert!(!dir.exists(), "no output directory after a fatal error");
}

#[tokio::test]
async fn test_run_same_date_and_title_overwrites() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = output_dir(&temp_dir);

    mount_metadata(
        &server,
        2,
        vec![
            record("/img/First_1920x1080.jpg", "20240110", "Lighthouse (© A)"),
            record("/img/Second_1920x1080.jpg", "20240110", "Lighthouse (© B)"),
        ],
    )
    .await;
    mount_image(&server, "/img/First_UHD.jpg", 150_000).await;
    mount_image(&server, "/img/Second_UHD.jpg", 250_000).await;

    let summary = run(config_for(&server, &dir, 2)).await.unwrap();

    assert_eq!(summary.saved(), 2);
    assert_eq!(files_in(&dir), ["2024-01-10_Lighthouse.jpg"]);
    let len = std::fs::metadata(dir.join("2024-01-10_Lighthouse.jpg"))
        .unwrap()
        .len();
    assert_eq!(len, 250_000, "later record should win");
}

#[tokio::test]
async fn test_run_existing_output_dir_is_reused() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = temp_dir.path().to_path_buf();
    std::fs::write(dir.join("unrelated.txt"), b"keep me").unwrap();

    mount_metadata(
        &server,
        1,
        vec![record("/img/Only_1920x1080.jpg", "20240201", "Only one")],
    )
    .await;
    mount_image(&server, "/img/Only_UHD.jpg", 100_001).await;

    let summary = run(config_for(&server, &dir, 1)).await.unwrap();

    assert_eq!(summary.saved(), 1);
    assert_eq!(files_in(&dir), ["2024-02-01_Only_one.jpg", "unrelated.txt"]);
}

#[tokio::test]
async fn test_run_requests_8k_dimensions_for_8k_paths() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = output_dir(&temp_dir);

    mount_metadata(
        &server,
        1,
        vec![record("/img/Peak_8K_1920x1080.jpg", "20240301", "Peak (© X)")],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/Peak_8K_UHD.jpg"))
        .and(query_param("w", "7680"))
        .and(query_param("h", "4320"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 400_000]))
        .expect(1)
        .mount(&server)
        .await;

    let summary = run(config_for(&server, &dir, 1)).await.unwrap();
    assert_eq!(summary.saved(), 1);
}

#[tokio::test]
async fn test_run_empty_archive_creates_dir_and_saves_nothing() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dir = output_dir(&temp_dir);

    mount_metadata(&server, 3, Vec::new()).await;

    let summary = run(config_for(&server, &dir, 3)).await.unwrap();

    assert_eq!(summary.total(), 0);
    assert!(dir.is_dir());
    assert!(files_in(&dir).is_empty());
}
