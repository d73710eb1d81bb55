//! Integration tests for the harvester
//!
//! These tests use wiremock to mock the upstream API and run the full
//! pipeline end-to-end against tempdir-backed CSV storage.

use feedharvest::config::{ClientConfig, Config, HarvestConfig, OutputConfig, ProxyConfig};
use feedharvest::harvest::harvest;
use feedharvest::storage::{CsvStore, TableReader};
use feedharvest::{CommentRecord, ItemRecord};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration against the given mock server base URL
fn create_test_config(base_url: &str, data_dir: &str, listings: Vec<String>) -> Config {
    Config {
        client: ClientConfig {
            user_agent: "TestHarvester/1.0".to_string(),
            request_timeout_secs: 5,
            snapshot_dir: None,
        },
        proxy: None,
        harvest: HarvestConfig {
            base_url: base_url.to_string(),
            listings,
            page_limit: 10,
            max_retries: 2,
            batch_size: 5,
        },
        output: OutputConfig {
            data_dir: data_dir.to_string(),
        },
    }
}

fn listing_body() -> String {
    r#"{
        "kind": "Listing",
        "data": {
            "children": [
                {"kind": "t3", "data": {"title": "A", "author": "alice", "permalink": "/r/news/comments/1/first-story/", "upvote_ratio": 0.97}},
                {"kind": "t3", "data": {"title": "A", "author": "mallory", "permalink": "/r/news/comments/9/dupe/", "upvote_ratio": 0.11}},
                {"kind": "t3", "data": {"title": "B", "author": "bob", "permalink": "/r/news/comments/2/second-story/", "upvote_ratio": 0.62}}
            ]
        }
    }"#
    .to_string()
}

fn detail_body(author: &str, comment_count: usize) -> String {
    let comments: Vec<String> = (0..comment_count)
        .map(|i| {
            format!(
                r#"{{"kind": "t1", "data": {{"author": "{}", "body": "comment {}", "ups": {}}}}}"#,
                author, i, i
            )
        })
        .collect();

    format!(
        r#"[
            {{"kind": "Listing", "data": {{"children": []}}}},
            {{"kind": "Listing", "data": {{"children": [{}, {{"kind": "more", "data": {{"count": 7}}}}]}}}}
        ]"#,
        comments.join(",")
    )
}

#[tokio::test]
async fn test_full_harvest_single_listing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/news.json"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/news/comments/1/first-story/.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_body("carol", 2)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/news/comments/2/second-story/.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_body("dave", 1)))
        .mount(&mock_server)
        .await;

    let data_dir = tempfile::tempdir().expect("tempdir");
    let config = create_test_config(
        &mock_server.uri(),
        data_dir.path().to_str().unwrap(),
        vec!["news".to_string()],
    );

    harvest(config).await.expect("harvest failed");

    let store = CsvStore::new(data_dir.path());

    // The duplicate title "A" collapses to a single row, first-seen wins
    let items: Vec<ItemRecord> = store.read_all("news").expect("items table");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "A");
    assert_eq!(items[0].author, "alice");
    assert_eq!(items[1].title, "B");

    // One comment table per item, named from the permalink slug
    let first: Vec<CommentRecord> = store.read_all("first-story").expect("first table");
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].author, "carol");
    assert_eq!(first[0].body, "comment 0");

    let second: Vec<CommentRecord> = store.read_all("second-story").expect("second table");
    assert_eq!(second.len(), 1);

    // The skipped duplicate's permalink was never fetched
    assert!(!store.table_path("dupe").exists());
}

#[tokio::test]
async fn test_listing_table_has_single_header_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body()))
        .mount(&mock_server)
        .await;

    // Detail pages 404; items are skipped but the run still completes
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let data_dir = tempfile::tempdir().expect("tempdir");
    let config = create_test_config(
        &mock_server.uri(),
        data_dir.path().to_str().unwrap(),
        vec!["news".to_string()],
    );

    harvest(config).await.expect("harvest failed");

    let store = CsvStore::new(data_dir.path());
    let content = std::fs::read_to_string(store.table_path("news")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "title,author,permalink,upvote_ratio");
    assert_eq!(lines.len(), 3); // header + 2 unique items
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("title,")).count(),
        1
    );
}

#[tokio::test]
async fn test_listing_fetch_recovers_after_transient_failures() {
    let mock_server = MockServer::start().await;

    // First two attempts fail, the third succeeds; max_retries = 2 allows it
    Mock::given(method("GET"))
        .and(path("/r/news.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_body("eve", 1)))
        .mount(&mock_server)
        .await;

    let data_dir = tempfile::tempdir().expect("tempdir");
    let config = create_test_config(
        &mock_server.uri(),
        data_dir.path().to_str().unwrap(),
        vec!["news".to_string()],
    );

    harvest(config).await.expect("harvest failed");

    let store = CsvStore::new(data_dir.path());
    let items: Vec<ItemRecord> = store.read_all("news").expect("items table");
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_unreachable_listing_is_skipped_without_failing_the_run() {
    let mock_server = MockServer::start().await;

    // "news" always 404s; "rust" works
    Mock::given(method("GET"))
        .and(path("/r/news.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/rust.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_body("frank", 1)))
        .mount(&mock_server)
        .await;

    let data_dir = tempfile::tempdir().expect("tempdir");
    let config = create_test_config(
        &mock_server.uri(),
        data_dir.path().to_str().unwrap(),
        vec!["news".to_string(), "rust".to_string()],
    );

    harvest(config).await.expect("harvest should not fail");

    let store = CsvStore::new(data_dir.path());
    assert!(!store.table_path("news").exists());
    let items: Vec<ItemRecord> = store.read_all("rust").expect("rust table");
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_zero_item_listing_does_not_abort_the_run() {
    let mock_server = MockServer::start().await;

    // "news" fetches fine but is not a parseable envelope, so it yields no
    // items and no table; "rust" must still be fully processed
    Mock::given(method("GET"))
        .and(path("/r/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/rust.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_body("grace", 1)))
        .mount(&mock_server)
        .await;

    let data_dir = tempfile::tempdir().expect("tempdir");
    let config = create_test_config(
        &mock_server.uri(),
        data_dir.path().to_str().unwrap(),
        vec!["news".to_string(), "rust".to_string()],
    );

    harvest(config).await.expect("harvest should not fail");

    let store = CsvStore::new(data_dir.path());
    assert!(!store.table_path("news").exists());
    let items: Vec<ItemRecord> = store.read_all("rust").expect("rust table");
    assert_eq!(items.len(), 2);
    let comments: Vec<CommentRecord> = store.read_all("first-story").expect("comments");
    assert_eq!(comments.len(), 1);
}

#[tokio::test]
async fn test_requests_route_through_forwarding_proxy() {
    let mock_server = MockServer::start().await;

    // The proxy endpoint receives every request with the original URL and
    // geolocation as query parameters
    Mock::given(method("GET"))
        .and(path("/v1/"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("country", "uk"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_body()))
        .mount(&mock_server)
        .await;

    let data_dir = tempfile::tempdir().expect("tempdir");
    let mut config = create_test_config(
        "https://www.reddit.com",
        data_dir.path().to_str().unwrap(),
        vec!["news".to_string()],
    );
    config.proxy = Some(ProxyConfig {
        base_url: format!("{}/v1/", mock_server.uri()),
        api_key: "test-key".to_string(),
        country: "uk".to_string(),
    });

    harvest(config).await.expect("harvest failed");

    let store = CsvStore::new(data_dir.path());
    let items: Vec<ItemRecord> = store.read_all("news").expect("items table");
    assert_eq!(items.len(), 2);
}
