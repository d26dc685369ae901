//! Integration tests for the harvester
//!
//! These tests use wiremock to serve listing pages and check the files a
//! harvest leaves in the output directory.

use forti_lists::config::{CategoryEntry, Config, FetchConfig, OutputConfig};
use forti_lists::crawler::{fetch_category, Orchestrator};
use forti_lists::extract::{ExtractError, Record, RecordExtractor};
use forti_lists::state::{FetchFailure, PageResult, SkipReason, TransportKind};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server_uri: &str, output_dir: &Path, categories: Vec<CategoryEntry>) -> Config {
    Config {
        fetch: FetchConfig {
            url_template: format!(
                "{}/encyclopedia?type=ips&risk={{category}}&page={{page}}",
                server_uri
            ),
            max_concurrent_requests: None,
            request_timeout: 5,
        },
        output: OutputConfig {
            directory: output_dir.display().to_string(),
        },
        categories,
        ..Config::default()
    }
}

fn category(id: u32, max_pages: u32) -> CategoryEntry {
    CategoryEntry { id, max_pages }
}

/// Listing page with `count` well-formed items
fn listing_html(category: u32, page: u32, count: usize) -> String {
    let items: String = (0..count)
        .map(|i| {
            format!(
                r#"<div class="article-item">
                    <a href="/encyclopedia/ips/{c}{p}{i}">
                        <div class="title">Signature {c}-{p}-{i}</div>
                    </a>
                </div>"#,
                c = category,
                p = page,
                i = i
            )
        })
        .collect();
    format!(
        "<html><head><title>IPS</title></head><body><section>{}</section></body></html>",
        items
    )
}

async fn mount_page(server: &MockServer, category: u32, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/encyclopedia"))
        .and(query_param("type", "ips"))
        .and(query_param("risk", category.to_string()))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer, category: u32, page: u32, count: usize) {
    mount_page(
        server,
        category,
        page,
        ResponseTemplate::new(200)
            .set_body_string(listing_html(category, page, count))
            .insert_header("content-type", "text/html"),
    )
    .await;
}

fn read_csv_rows(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read CSV")
        .lines()
        .map(str::to_string)
        .collect()
}

fn read_manifest(dir: &Path) -> BTreeMap<String, Vec<u32>> {
    let content =
        std::fs::read_to_string(dir.join("skipped.json")).expect("Failed to read manifest");
    serde_json::from_str(&content).expect("Manifest is not valid JSON")
}

#[tokio::test]
async fn test_full_harvest_without_failures() {
    let mock_server = MockServer::start().await;
    for cat in 1..=2 {
        for page in 1..=3 {
            mount_listing(&mock_server, cat, page, 2).await;
        }
    }

    let output = TempDir::new().unwrap();
    let config = create_test_config(
        &mock_server.uri(),
        output.path(),
        vec![category(1, 3), category(2, 3)],
    );

    let summary = Orchestrator::from_config(config)
        .expect("Failed to create orchestrator")
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(summary.total_records(), 12);
    assert_eq!(summary.total_skipped(), 0);
    assert!(summary.manifest_path.is_none());
    assert!(!output.path().join("skipped.json").exists());

    for cat in 1..=2 {
        let rows = read_csv_rows(&output.path().join(format!("forti_lists_{}.csv", cat)));
        assert_eq!(rows.len(), 7, "header plus six records");
        assert_eq!(rows[0], "title,link");
        assert_eq!(
            rows[1],
            format!("Signature {}-1-0,/encyclopedia/ips/{}10", cat, cat)
        );
    }
}

#[tokio::test]
async fn test_failed_pages_written_to_manifest() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, 1, 1).await;
    mount_page(&mock_server, 1, 2, ResponseTemplate::new(500)).await;
    mount_listing(&mock_server, 1, 3, 1).await;
    mount_page(&mock_server, 1, 4, ResponseTemplate::new(404)).await;
    mount_listing(&mock_server, 1, 5, 1).await;
    for page in 1..=2 {
        mount_listing(&mock_server, 2, page, 1).await;
    }

    let output = TempDir::new().unwrap();
    let config = create_test_config(
        &mock_server.uri(),
        output.path(),
        vec![category(1, 5), category(2, 2)],
    );

    let summary = Orchestrator::from_config(config)
        .unwrap()
        .run()
        .await
        .expect("Harvest failed");

    let manifest = read_manifest(output.path());
    assert_eq!(manifest.len(), 1, "category 2 had no failures");
    assert_eq!(manifest.get("1"), Some(&vec![2, 4]));
    assert_eq!(summary.total_skipped(), 2);
    assert_eq!(summary.categories[0].skipped_by_reason.get("status"), Some(&2));

    let rows = read_csv_rows(&output.path().join("forti_lists_1.csv"));
    assert_eq!(
        rows,
        vec![
            "title,link".to_string(),
            "Signature 1-1-0,/encyclopedia/ips/110".to_string(),
            "Signature 1-3-0,/encyclopedia/ips/130".to_string(),
            "Signature 1-5-0,/encyclopedia/ips/150".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_every_page_fetched_or_skipped_exactly_once() {
    let mock_server = MockServer::start().await;
    for page in [1, 3, 6] {
        mount_listing(&mock_server, 3, page, 2).await;
    }
    mount_page(&mock_server, 3, 2, ResponseTemplate::new(503)).await;
    mount_page(
        &mock_server,
        3,
        5,
        ResponseTemplate::new(200).set_body_string(
            r#"<div class="article-item"><span class="title">No link</span></div>"#,
        ),
    )
    .await;
    // page 4 is not mounted: wiremock answers 404

    let output = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), output.path(), vec![category(3, 6)]);

    let outcome = Orchestrator::from_config(config)
        .unwrap()
        .run_one(3)
        .await
        .expect("Harvest failed")
        .expect("Category is configured");

    let mut seen: Vec<u32> = outcome
        .fetched_pages
        .iter()
        .copied()
        .chain(outcome.skipped_pages())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);

    assert_eq!(outcome.fetched_pages, vec![1, 3, 6]);
    assert_eq!(outcome.skipped_pages(), vec![2, 4, 5]);
    assert_eq!(outcome.records.len(), 6);
    assert!(outcome
        .records
        .iter()
        .all(|r| !r.title.is_empty() && !r.link.is_empty()));

    assert!(matches!(
        outcome.skipped[0].reason,
        SkipReason::Fetch(FetchFailure::Status { status_code: 503 })
    ));
    assert!(matches!(
        outcome.skipped[2].reason,
        SkipReason::Extraction(ExtractError::MissingAnchor { .. })
    ));

    // run_one leaves the manifest to the full run
    assert!(!output.path().join("skipped.json").exists());
}

#[tokio::test]
async fn test_transport_failures_are_skipped() {
    let output = TempDir::new().unwrap();
    // Nothing listens on port 1
    let config = create_test_config("http://127.0.0.1:1", output.path(), vec![category(1, 2)]);

    let summary = Orchestrator::from_config(config)
        .unwrap()
        .run()
        .await
        .expect("Transport failures must not abort the run");

    assert_eq!(summary.total_records(), 0);
    assert_eq!(summary.categories[0].skipped_by_reason.get("transport"), Some(&2));
    assert_eq!(read_manifest(output.path()).get("1"), Some(&vec![1, 2]));
    assert_eq!(
        read_csv_rows(&output.path().join("forti_lists_1.csv")),
        vec!["title,link".to_string()]
    );
}

#[tokio::test]
async fn test_batch_order_independent_of_completion_order() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        1,
        1,
        ResponseTemplate::new(200)
            .set_body_string(listing_html(1, 1, 1))
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_listing(&mock_server, 1, 2, 1).await;
    mount_listing(&mock_server, 1, 3, 1).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), output.path(), vec![category(1, 3)]);

    let pages = fetch_category(&config, &config.categories[0])
        .await
        .expect("Failed to build client");
    let order: Vec<u32> = pages.iter().map(|p| p.page).collect();
    assert_eq!(order, vec![1, 2, 3]);
    match &pages[0].result {
        PageResult::Success { body } => assert!(body.contains("Signature 1-1-0")),
        other => panic!("page 1 should succeed, got {:?}", other),
    }

    Orchestrator::from_config(config)
        .unwrap()
        .run()
        .await
        .expect("Harvest failed");
    let rows = read_csv_rows(&output.path().join("forti_lists_1.csv"));
    assert!(rows[1].starts_with("Signature 1-1-0"));
    assert!(rows[2].starts_with("Signature 1-2-0"));
    assert!(rows[3].starts_with("Signature 1-3-0"));
}

#[tokio::test]
async fn test_concurrency_cap_serializes_requests() {
    let mock_server = MockServer::start().await;
    for page in 1..=3 {
        mount_page(
            &mock_server,
            1,
            page,
            ResponseTemplate::new(200)
                .set_body_string(listing_html(1, page, 1))
                .set_delay(Duration::from_millis(200)),
        )
        .await;
    }

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), output.path(), vec![category(1, 3)]);
    config.fetch.max_concurrent_requests = Some(1);

    let started = Instant::now();
    let pages = fetch_category(&config, &config.categories[0]).await.unwrap();
    let elapsed = started.elapsed();

    assert!(pages.iter().all(|p| p.result.is_success()));
    assert!(
        elapsed >= Duration::from_millis(600),
        "one request at a time should take at least 3 x 200ms, took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_zero_concurrency_cap_does_not_stall_batch() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, 1, 1).await;
    mount_listing(&mock_server, 1, 2, 1).await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), output.path(), vec![category(1, 2)]);
    config.fetch.max_concurrent_requests = Some(0);

    let pages = tokio::time::timeout(
        Duration::from_secs(5),
        fetch_category(&config, &config.categories[0]),
    )
    .await
    .expect("Batch with a zero cap never finished")
    .unwrap();

    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|p| p.result.is_success()));
}

#[tokio::test]
async fn test_request_timeout_skips_slow_page() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, 1, 2).await;
    mount_page(
        &mock_server,
        1,
        2,
        ResponseTemplate::new(200)
            .set_body_string(listing_html(1, 2, 2))
            .set_delay(Duration::from_secs(2)),
    )
    .await;
    mount_listing(&mock_server, 1, 3, 2).await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), output.path(), vec![category(1, 3)]);
    config.fetch.request_timeout = 1;

    let started = Instant::now();
    let outcome = Orchestrator::from_config(config)
        .unwrap()
        .run_one(1)
        .await
        .expect("Harvest failed")
        .expect("Category 1 is configured");
    let elapsed = started.elapsed();

    assert_eq!(outcome.fetched_pages, vec![1, 3]);
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].page, 2);
    assert!(
        matches!(
            &outcome.skipped[0].reason,
            SkipReason::Fetch(FetchFailure::Transport {
                kind: TransportKind::Timeout,
                ..
            })
        ),
        "expected a timeout, got {:?}",
        outcome.skipped[0].reason
    );
    assert!(
        elapsed < Duration::from_secs(2),
        "the client should give up before the delayed response, took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, 1, 3).await;
    mount_page(&mock_server, 1, 2, ResponseTemplate::new(502)).await;
    mount_listing(&mock_server, 1, 3, 2).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), output.path(), vec![category(1, 3)]);
    let orchestrator = Orchestrator::from_config(config).unwrap();

    orchestrator.run().await.expect("First run failed");
    let csv_first = std::fs::read(output.path().join("forti_lists_1.csv")).unwrap();
    let manifest_first = std::fs::read(output.path().join("skipped.json")).unwrap();

    orchestrator.run().await.expect("Second run failed");
    let csv_second = std::fs::read(output.path().join("forti_lists_1.csv")).unwrap();
    let manifest_second = std::fs::read(output.path().join("skipped.json")).unwrap();

    assert_eq!(csv_first, csv_second);
    assert_eq!(manifest_first, manifest_second);
}

#[tokio::test]
async fn test_clean_run_removes_stale_manifest() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, 1, 1).await;

    let output = TempDir::new().unwrap();
    std::fs::write(output.path().join("skipped.json"), "{\"1\": [1]}").unwrap();

    let config = create_test_config(&mock_server.uri(), output.path(), vec![category(1, 1)]);
    Orchestrator::from_config(config)
        .unwrap()
        .run()
        .await
        .expect("Harvest failed");

    assert!(!output.path().join("skipped.json").exists());
}

#[tokio::test]
async fn test_output_directory_is_created() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, 1, 1).await;

    let root = TempDir::new().unwrap();
    let nested = root.path().join("data").join("lists");
    let config = create_test_config(&mock_server.uri(), &nested, vec![category(1, 1)]);

    Orchestrator::from_config(config)
        .unwrap()
        .run()
        .await
        .expect("Harvest failed");

    assert!(nested.join("forti_lists_1.csv").exists());
}

/// Treats each `<li>` text as a title and its `data-href` as the link
struct ListItemExtractor;

impl RecordExtractor for ListItemExtractor {
    fn extract(&self, html: &str) -> Result<Vec<Record>, ExtractError> {
        Ok(html
            .split("<li data-href=\"")
            .skip(1)
            .filter_map(|chunk| {
                let (href, rest) = chunk.split_once("\">")?;
                let (title, _) = rest.split_once("</li>")?;
                Some(Record {
                    title: title.to_string(),
                    link: href.to_string(),
                })
            })
            .collect())
    }
}

#[tokio::test]
async fn test_custom_extractor_strategy() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        1,
        1,
        ResponseTemplate::new(200)
            .set_body_string(r#"<ul><li data-href="/a">Alpha</li><li data-href="/b">Beta</li></ul>"#),
    )
    .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), output.path(), vec![category(1, 1)]);

    let summary = Orchestrator::new(config, Box::new(ListItemExtractor))
        .expect("Config should be valid")
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(summary.total_records(), 2);
    assert_eq!(
        read_csv_rows(&output.path().join("forti_lists_1.csv")),
        vec![
            "title,link".to_string(),
            "Alpha,/a".to_string(),
            "Beta,/b".to_string(),
        ]
    );
}
