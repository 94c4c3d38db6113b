//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small site and run the full search
//! cycle end-to-end through the HTTP link extractor.

use std::sync::Arc;
use std::time::Duration;
use wikipaths::config::RunConfig;
use wikipaths::crawler::{Coordinator, CrawlOutcome, HttpLinkExtractor};
use wikipaths::extract_domain;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves `body` as an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// Builds an HTML page linking to every href in `links`
fn html_with_links(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect::<Vec<_>>()
        .join("\n");
    format!("<html><body>\n{}\n</body></html>", anchors)
}

/// Creates a test configuration scoped to the mock server's host
fn create_test_config(base_url: &str, source: &str, sink: &str, threads: usize) -> RunConfig {
    // Scope to the server's host (e.g., "127.0.0.1" from "http://127.0.0.1:12345")
    let base = url::Url::parse(base_url).expect("Failed to parse base URL");
    let host = extract_domain(&base).expect("Failed to extract host");

    RunConfig::builder()
        .source(format!("{}{}", base_url, source))
        .sink(format!("{}{}", base_url, sink))
        .scoping_host(host)
        .thread_count(threads)
        .fetch_timeout(Duration::from_millis(500))
        .build()
        .expect("Failed to build config")
}

async fn run(config: RunConfig) -> CrawlOutcome {
    let extractor = HttpLinkExtractor::from_config(&config).expect("Failed to build client");
    let report = tokio::time::timeout(
        Duration::from_secs(10),
        Coordinator::new(config, Arc::new(extractor)).run(),
    )
    .await
    .expect("Search did not finish")
    .expect("Search failed");
    report.outcome
}

#[tokio::test]
async fn test_finds_path_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/wiki/A", &html_with_links(&["/wiki/B", "/wiki/C"])).await;
    mount_page(&mock_server, "/wiki/B", &html_with_links(&["/wiki/D"])).await;
    mount_page(&mock_server, "/wiki/C", &html_with_links(&["/wiki/A"])).await;

    let config = create_test_config(&base_url, "/wiki/A", "/wiki/D", 2);
    let outcome = run(config).await;

    let CrawlOutcome::Found { visits, path } = outcome else {
        panic!("Expected Found, got {:?}", outcome);
    };
    assert_eq!(visits, 2);
    assert_eq!(
        path,
        vec![
            format!("{}/wiki/A", base_url),
            format!("{}/wiki/B", base_url),
            format!("{}/wiki/D", base_url),
        ]
    );
}

#[tokio::test]
async fn test_closed_component_is_exhausted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/wiki/A", &html_with_links(&["/wiki/B", "/wiki/A#top"])).await;
    mount_page(&mock_server, "/wiki/B", &html_with_links(&["/wiki/A"])).await;

    let config = create_test_config(&base_url, "/wiki/A", "/wiki/Z", 3);
    let outcome = run(config).await;

    assert_eq!(outcome, CrawlOutcome::Exhausted { visits: 1 });
}

#[tokio::test]
async fn test_missing_page_is_dead_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/wiki/A", &html_with_links(&["/wiki/Missing", "/wiki/C"])).await;
    mount_page(&mock_server, "/wiki/C", &html_with_links(&["/wiki/D"])).await;

    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, "/wiki/A", "/wiki/D", 1);
    let outcome = run(config).await;

    assert_eq!(
        outcome,
        CrawlOutcome::Found {
            visits: 2,
            path: vec![
                format!("{}/wiki/A", base_url),
                format!("{}/wiki/C", base_url),
                format!("{}/wiki/D", base_url),
            ],
        }
    );
}

#[tokio::test]
async fn test_slow_page_is_dead_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/wiki/A", &html_with_links(&["/wiki/Slow"])).await;

    Mock::given(method("GET"))
        .and(path("/wiki/Slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_with_links(&["/wiki/D"]), "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, "/wiki/A", "/wiki/D", 1);
    let outcome = run(config).await;

    assert_eq!(outcome, CrawlOutcome::Exhausted { visits: 1 });
}

#[tokio::test]
async fn test_query_and_offsite_links_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/wiki/A",
        &html_with_links(&[
            "/w/index.php?title=D&action=edit",
            "https://en.wikipedia.org/wiki/D",
            "/wiki/B",
        ]),
    )
    .await;
    mount_page(&mock_server, "/wiki/B", &html_with_links(&[])).await;

    Mock::given(method("GET"))
        .and(path("/w/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html_with_links(&["/wiki/D"]), "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, "/wiki/A", "/wiki/D", 2);
    let outcome = run(config).await;

    assert_eq!(outcome, CrawlOutcome::Exhausted { visits: 1 });
}

#[tokio::test]
async fn test_each_page_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/wiki/A",
        &html_with_links(&["/wiki/B", "/wiki/C", "/wiki/B"]),
    )
    .await;
    mount_page(&mock_server, "/wiki/C", &html_with_links(&["/wiki/B", "/wiki/A"])).await;

    Mock::given(method("GET"))
        .and(path("/wiki/B"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html_with_links(&["/wiki/C"]), "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, "/wiki/A", "/wiki/Z", 4);
    let outcome = run(config).await;

    assert_eq!(outcome, CrawlOutcome::Exhausted { visits: 2 });
}
