//! Integration tests for the scanner
//!
//! These tests use wiremock to create mock HTTP servers and drive the real
//! HTTP fetcher and scan coordinator end-to-end.

use std::sync::Arc;
use std::time::Duration;
use sumi_sieve::config::OutputConfig;
use sumi_sieve::output::write_results;
use sumi_sieve::scanner::{
    classify, FetchOutcome, Fetcher, HttpFetcher, ScanCoordinator, TransportFailureKind,
    UserAgentPool,
};
use sumi_sieve::Category;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WIX_PAGE: &str = r#"<html><head>
    <meta name="generator" content="Wix.com Website Builder">
    <title>Studio</title>
</head><body></body></html>"#;

const WORDPRESS_PAGE: &str = r#"<html><head><title>Blog</title></head><body>
    <form id="commentform"><p class="comment-form-comment"><textarea></textarea></p></form>
</body></html>"#;

const PLAIN_PAGE: &str = "<html><head><title>Plain</title></head><body>hello</body></html>";

/// Mounts a GET route returning `status` with `body`
async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(5), 5).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_fetcher_returns_status_and_body() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, PLAIN_PAGE).await;
    mount_page(&mock_server, "/gone", 404, "not here").await;
    mount_page(&mock_server, "/broken", 503, "").await;

    let base = mock_server.uri();
    let fetcher = fetcher();

    let ok = fetcher.fetch(&format!("{}/", base), "TestAgent/1.0").await;
    assert_eq!(
        ok,
        FetchOutcome::Success {
            status_code: 200,
            body: PLAIN_PAGE.to_string()
        }
    );

    // Error statuses are responses, not transport failures
    let gone = fetcher.fetch(&format!("{}/gone", base), "TestAgent/1.0").await;
    assert!(matches!(gone, FetchOutcome::Success { status_code: 404, .. }));

    let broken = fetcher.fetch(&format!("{}/broken", base), "TestAgent/1.0").await;
    assert!(matches!(broken, FetchOutcome::Success { status_code: 503, .. }));
}

#[tokio::test]
async fn test_fetcher_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "SieveTest/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PLAIN_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = fetcher()
        .fetch(&format!("{}/ua", mock_server.uri()), "SieveTest/1.0")
        .await;

    assert!(matches!(outcome, FetchOutcome::Success { status_code: 200, .. }));
}

#[tokio::test]
async fn test_fetcher_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PLAIN_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(1), 5).unwrap();
    let url = format!("{}/slow", mock_server.uri());
    let outcome = fetcher.fetch(&url, "TestAgent/1.0").await;

    assert!(matches!(
        outcome,
        FetchOutcome::TransportFailure {
            kind: TransportFailureKind::Timeout,
            ..
        }
    ));

    let classification = classify(&url, &outcome);
    assert_eq!(classification.status_code, 0);
    assert_eq!(classification.category, Category::Error);
    assert!(classification.indicator.contains("Timeout"));
    assert_eq!(classification.title, "Connection Error");
}

#[tokio::test]
async fn test_fetcher_follows_redirects_within_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", 200, WIX_PAGE).await;

    let outcome = fetcher()
        .fetch(&format!("{}/old", mock_server.uri()), "TestAgent/1.0")
        .await;

    assert!(matches!(outcome, FetchOutcome::Success { status_code: 200, .. }));
}

#[tokio::test]
async fn test_fetcher_too_many_redirects() {
    let mock_server = MockServer::start().await;

    for hop in 0..6 {
        let next = format!("/hop/{}", hop + 1);
        Mock::given(method("GET"))
            .and(path(format!("/hop/{}", hop)))
            .respond_with(ResponseTemplate::new(302).insert_header("location", next.as_str()))
            .mount(&mock_server)
            .await;
    }

    let fetcher = HttpFetcher::new(Duration::from_secs(5), 2).unwrap();
    let outcome = fetcher
        .fetch(&format!("{}/hop/0", mock_server.uri()), "TestAgent/1.0")
        .await;

    assert!(matches!(
        outcome,
        FetchOutcome::TransportFailure {
            kind: TransportFailureKind::TooManyRedirects,
            ..
        }
    ));
}

#[tokio::test]
async fn test_full_scan_against_mock_server() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/wix", 200, WIX_PAGE).await;
    mount_page(&mock_server, "/wp", 200, WORDPRESS_PAGE).await;
    mount_page(&mock_server, "/accepted-wp", 202, WORDPRESS_PAGE).await;
    mount_page(&mock_server, "/accepted", 202, PLAIN_PAGE).await;
    mount_page(&mock_server, "/blocked", 403, "").await;
    mount_page(&mock_server, "/limited", 429, "").await;
    mount_page(&mock_server, "/gone", 404, "").await;
    mount_page(&mock_server, "/error", 500, "").await;
    mount_page(&mock_server, "/plain", 200, PLAIN_PAGE).await;

    let base = mock_server.uri();
    let routes = [
        "/wix",
        "/wp",
        "/accepted-wp",
        "/accepted",
        "/blocked",
        "/limited",
        "/gone",
        "/error",
        "/plain",
        "/wix",
    ];
    let targets: Vec<String> = routes.iter().map(|r| format!("{}{}", base, r)).collect();

    let coordinator = ScanCoordinator::new(
        Arc::new(fetcher()),
        UserAgentPool::seeded(vec!["SieveTest/1.0".to_string()], 9),
        3,
    );
    let snapshot = coordinator.run(&targets).await;

    assert_eq!(snapshot.total_recorded(), 9);
    assert_eq!(snapshot.scanned.len(), 9);
    assert_eq!(snapshot.counts.get(Category::Wix), 1);
    assert_eq!(snapshot.counts.get(Category::WordPress), 2);
    assert_eq!(snapshot.counts.get(Category::Protected), 3);
    assert_eq!(snapshot.counts.get(Category::Error), 2);
    assert_eq!(snapshot.counts.get(Category::Unclassified), 1);

    let wix = &snapshot.sites(Category::Wix)[0];
    assert_eq!(wix.url, format!("{}/wix", base));
    assert_eq!(wix.indicator, "Wix.com Website Builder");
    assert_eq!(wix.title, "Studio");

    let accepted_wp = snapshot
        .sites(Category::WordPress)
        .iter()
        .find(|c| c.status_code == 202)
        .expect("202 WordPress site should be recorded");
    assert!(accepted_wp.indicator.starts_with("WordPress with status 202"));

    let mut protected: Vec<u16> = snapshot
        .sites(Category::Protected)
        .iter()
        .map(|c| c.status_code)
        .collect();
    protected.sort_unstable();
    assert_eq!(protected, vec![202, 403, 429]);
}

#[tokio::test]
async fn test_duplicate_targets_fetched_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PLAIN_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PLAIN_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let targets = vec![
        format!("{}/a", base),
        format!("{}/b", base),
        format!("{}/a", base),
    ];

    let coordinator = ScanCoordinator::new(Arc::new(fetcher()), UserAgentPool::new(Vec::new()), 2);
    let snapshot = coordinator.run(&targets).await;

    assert_eq!(snapshot.total_recorded(), 2);
    assert_eq!(snapshot.scanned.len(), 2);
    assert_eq!(snapshot.counts.total(), 2);
}

#[tokio::test]
async fn test_unreachable_target_recorded_as_network_error() {
    // Bind then drop to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let coordinator = ScanCoordinator::new(Arc::new(fetcher()), UserAgentPool::new(Vec::new()), 1);
    let snapshot = coordinator
        .run(&[format!("http://127.0.0.1:{}/", port)])
        .await;

    let errors = snapshot.sites(Category::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_network_failure());
    assert!(errors[0].indicator.starts_with("Network error (ConnectionError)"));
}

#[tokio::test]
async fn test_scan_results_written_to_files() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/wix", 200, WIX_PAGE).await;
    mount_page(&mock_server, "/gone", 404, "").await;

    let base = mock_server.uri();
    let targets = vec![format!("{}/wix", base), format!("{}/gone", base)];

    let coordinator = ScanCoordinator::new(Arc::new(fetcher()), UserAgentPool::new(Vec::new()), 2);
    let snapshot = coordinator.run(&targets).await;

    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = OutputConfig {
        output_path: None,
        output_dir: temp_dir.path().to_path_buf(),
    };
    let written = write_results(&snapshot, &config).unwrap();
    assert_eq!(written.len(), 2);

    let wix = std::fs::read_to_string(temp_dir.path().join("wix_sites.txt")).unwrap();
    assert!(wix.contains(&format!("{}/wix", base)));

    let errors = std::fs::read_to_string(temp_dir.path().join("error_sites.txt")).unwrap();
    assert!(errors.contains(&format!("--- STATUS 404 ---\n{}/gone\n", base)));
}
