//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from fetch to files on disk.

use md_harvest::config::Config;
use md_harvest::crawler::crawl;
use md_harvest::output::FailureKind;
use md_harvest::{ConfigError, HarvestError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `output_dir`
fn create_test_config(output_dir: &Path, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawl.output_dir = output_dir.to_string_lossy().into_owned();
    config.crawl.max_depth = max_depth;
    config.crawl.timeout_secs = 5;
    config
}

fn html(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>{}</title></head><body><main>{}</main></body></html>",
            title, body
        ),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, page: ResponseTemplate, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(page)
        .expect(hits)
        .mount(server)
        .await;
}

/// Sorted file names in a directory
fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// The file stem prefix every page of a mock server gets (`127-0-0-1_PORT`)
fn stem_prefix(server: &MockServer) -> String {
    let port = url::Url::parse(&server.uri()).unwrap().port().unwrap();
    format!("127-0-0-1_{}", port)
}

#[tokio::test]
async fn test_external_links_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let port = url::Url::parse(&base_url).unwrap().port().unwrap();

    // Same server, but reached through another host name
    let external = format!("http://localhost:{}/c", port);

    mount_page(
        &mock_server,
        "/a",
        html("A", &format!(r#"<a href="/b">B</a> <a href="{}">C</a>"#, external)),
        1,
    )
    .await;
    mount_page(&mock_server, "/b", html("B", "<p>b</p>"), 1).await;
    mount_page(&mock_server, "/c", html("C", "<p>c</p>"), 0).await;

    let tmp = TempDir::new().unwrap();
    let config = create_test_config(tmp.path(), 1);
    let stats = crawl(&format!("{}/a", base_url), &config).await.unwrap();

    assert_eq!(stats.pages_written(), 2);
    assert!(stats.failures.is_empty());

    let prefix = stem_prefix(&mock_server);
    assert_eq!(
        file_names(tmp.path()),
        vec![format!("{}_a.md", prefix), format!("{}_b.md", prefix)]
    );
}

#[tokio::test]
async fn test_external_links_followed_when_allowed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let port = url::Url::parse(&base_url).unwrap().port().unwrap();
    let external = format!("http://localhost:{}/c", port);

    mount_page(
        &mock_server,
        "/a",
        html("A", &format!(r#"<a href="{}">C</a>"#, external)),
        1,
    )
    .await;
    mount_page(&mock_server, "/c", html("C", "<p>c</p>"), 1).await;

    let tmp = TempDir::new().unwrap();
    let mut config = create_test_config(tmp.path(), 1);
    config.crawl.allow_external = true;
    let stats = crawl(&format!("{}/a", base_url), &config).await.unwrap();

    assert_eq!(stats.pages_written(), 2);
    assert!(file_names(tmp.path()).contains(&format!("localhost_{}_c.md", port)));
}

#[tokio::test]
async fn test_depth_zero_writes_only_start_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html("Home", r#"<a href="/b">B</a>"#), 1).await;
    mount_page(&mock_server, "/b", html("B", "<p>b</p>"), 0).await;

    let tmp = TempDir::new().unwrap();
    let config = create_test_config(tmp.path(), 0);
    let stats = crawl(&base_url, &config).await.unwrap();

    assert_eq!(stats.pages_written(), 1);
    assert_eq!(stats.links_enqueued, 0);
    assert_eq!(file_names(tmp.path()).len(), 1);
}

#[tokio::test]
async fn test_page_file_content() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/guide",
        html(
            "Guide",
            r#"<h1>Guide</h1><p>Read <a href="/setup?utm_source=x">the setup</a>.</p>"#,
        ),
        1,
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let config = create_test_config(tmp.path(), 0);
    let stats = crawl(&format!("{}/guide", base_url), &config).await.unwrap();

    let file = tmp.path().join(format!("{}_guide.md", stem_prefix(&mock_server)));
    assert_eq!(stats.written, vec![file.clone()]);

    let content = fs::read_to_string(file).unwrap();
    assert_eq!(
        content,
        format!(
            "# Guide\n\nSource: {base}/guide\n\n# Guide\n\nRead [the setup]({base}/setup).\n",
            base = base_url
        )
    );
}

#[tokio::test]
async fn test_failed_pages_are_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(
            "Home",
            r#"<a href="/data">Data</a> <a href="/gone">Gone</a> <a href="/ok">Ok</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/data",
        ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
        1,
    )
    .await;
    mount_page(&mock_server, "/gone", ResponseTemplate::new(404), 1).await;
    mount_page(&mock_server, "/ok", html("Ok", "<p>ok</p>"), 1).await;

    let tmp = TempDir::new().unwrap();
    let config = create_test_config(tmp.path(), 1);
    let stats = crawl(&base_url, &config).await.unwrap();

    assert_eq!(stats.pages_written(), 2);
    assert_eq!(stats.failures.len(), 2);
    assert_eq!(stats.failures[0].kind, FailureKind::ContentType);
    assert_eq!(stats.failures[1].kind, FailureKind::HttpStatus);
    assert_eq!(stats.failures[1].detail, "HTTP 404");
}

#[tokio::test]
async fn test_redirect_target_not_fetched_twice() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/old",
        ResponseTemplate::new(301).insert_header("Location", "/new"),
        1,
    )
    .await;
    mount_page(&mock_server, "/new", html("New", r#"<a href="/new">Self</a>"#), 1).await;

    let tmp = TempDir::new().unwrap();
    let config = create_test_config(tmp.path(), 2);
    let stats = crawl(&format!("{}/old", base_url), &config).await.unwrap();

    assert_eq!(stats.pages_written(), 1);
    assert!(stats.failures.is_empty());
}

#[tokio::test]
async fn test_redirect_to_visited_page_not_written_again() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html("Home", r#"<a href="/b">B</a> <a href="/old">Old</a>"#),
        1,
    )
    .await;
    mount_page(&mock_server, "/b", html("B", "<p>b</p>"), 1).await;
    mount_page(
        &mock_server,
        "/old",
        ResponseTemplate::new(301).insert_header("Location", "/b"),
        1,
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let config = create_test_config(tmp.path(), 1);
    let stats = crawl(&base_url, &config).await.unwrap();

    let prefix = stem_prefix(&mock_server);
    assert_eq!(stats.pages_written(), 2);
    assert_eq!(stats.duplicate_redirects, 1);
    assert_eq!(
        file_names(tmp.path()),
        vec![format!("{}.md", prefix), format!("{}_b.md", prefix)]
    );
}

#[tokio::test]
async fn test_colliding_file_names_are_suffixed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html("Home", r#"<a href="/a?page=1">1</a> <a href="/a?page=2">2</a>"#),
        1,
    )
    .await;
    mount_page(&mock_server, "/a", html("A", "<p>a</p>"), 2).await;

    let tmp = TempDir::new().unwrap();
    let config = create_test_config(tmp.path(), 1);
    let stats = crawl(&base_url, &config).await.unwrap();

    let prefix = stem_prefix(&mock_server);
    assert_eq!(stats.pages_written(), 3);
    assert_eq!(
        file_names(tmp.path()),
        vec![
            format!("{}.md", prefix),
            format!("{}_a.md", prefix),
            format!("{}_a_2.md", prefix),
        ]
    );
}

#[tokio::test]
async fn test_unusable_output_dir_fails_before_fetching() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html("Home", "<p>x</p>"), 0).await;

    let tmp = TempDir::new().unwrap();
    let blocked = tmp.path().join("not-a-dir");
    fs::write(&blocked, "file").unwrap();

    let config = create_test_config(&blocked, 0);
    let result = crawl(&base_url, &config).await;

    assert!(matches!(result, Err(HarvestError::OutputDir { .. })));
}

#[tokio::test]
async fn test_invalid_start_url() {
    let tmp = TempDir::new().unwrap();
    let config = create_test_config(tmp.path(), 0);

    let result = crawl("ftp://example.com/file", &config).await;
    assert!(matches!(
        result,
        Err(HarvestError::Config(ConfigError::InvalidUrl(_)))
    ));

    let result = crawl("not a url", &config).await;
    assert!(matches!(
        result,
        Err(HarvestError::Config(ConfigError::InvalidUrl(_)))
    ));
}
