use std::time::Duration;

use unfurl_server::config::ExtractorConfig;
use unfurl_server::extractor::{ExtractError, ExtractOutcome, HtmlExtractor, MetadataExtractor};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<!doctype html>
<html>
<head>
  <title>Article Title</title>
  <meta name="description" content="Plain description">
  <meta property="og:title" content="OG Article">
  <meta property="og:site_name" content="Example News">
</head>
<body>
  <img src="/images/hero.jpg">
  <img src="thumb.png">
</body>
</html>"#;

fn local_config() -> ExtractorConfig {
    ExtractorConfig {
        fetch_timeout: Duration::from_secs(2),
        allow_private_hosts: true,
        ..Default::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn extracts_metadata_from_html_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(html(ARTICLE))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = HtmlExtractor::new(&local_config()).unwrap();
    let url = format!("{}/posts/1", server.uri());

    let raw = match extractor.extract(&url).await {
        ExtractOutcome::Found(raw) => raw,
        other => panic!("expected Found, got {other:?}"),
    };

    assert_eq!(raw.og.title.as_deref(), Some("OG Article"));
    assert_eq!(raw.og.site_name.as_deref(), Some("Example News"));
    assert!(raw.og.image.is_none());
    assert_eq!(raw.meta.title.as_deref(), Some("Article Title"));
    assert_eq!(raw.meta.description.as_deref(), Some("Plain description"));

    let images: Vec<String> = raw.images.into_iter().map(|i| i.url).collect();
    assert_eq!(
        images,
        vec![
            format!("{}/images/hero.jpg", server.uri()),
            format!("{}/posts/thumb.png", server.uri()),
        ]
    );
}

#[tokio::test]
async fn non_success_status_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let extractor = HtmlExtractor::new(&local_config()).unwrap();
    let outcome = extractor.extract(&format!("{}/missing", server.uri())).await;

    assert!(matches!(outcome, ExtractOutcome::NotFound), "{outcome:?}");
}

#[tokio::test]
async fn non_html_content_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(br#"{"title":"nope"}"#.to_vec(), "application/json"),
        )
        .mount(&server)
        .await;

    let extractor = HtmlExtractor::new(&local_config()).unwrap();
    let outcome = extractor.extract(&format!("{}/data.json", server.uri())).await;

    assert!(matches!(outcome, ExtractOutcome::NotFound), "{outcome:?}");
}

#[tokio::test]
async fn body_is_truncated_to_limit() {
    let server = MockServer::start().await;
    let padding = "x".repeat(4096);
    let page = format!(
        r#"<html><head><meta property="og:title" content="Early"></head>
        <body>{padding}<meta property="og:description" content="Late"></body></html>"#
    );
    Mock::given(method("GET"))
        .respond_with(html(&page))
        .mount(&server)
        .await;

    let config = ExtractorConfig {
        max_body_bytes: 512,
        ..local_config()
    };
    let extractor = HtmlExtractor::new(&config).unwrap();

    match extractor.extract(&server.uri()).await {
        ExtractOutcome::Found(raw) => {
            assert_eq!(raw.og.title.as_deref(), Some("Early"));
            assert!(raw.og.description.is_none());
        }
        other => panic!("expected Found, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_url_is_not_found() {
    let extractor = HtmlExtractor::new(&local_config()).unwrap();

    for url in ["", "NOT-A-URL", "ftp://example.com/file"] {
        let outcome = extractor.extract(url).await;
        assert!(matches!(outcome, ExtractOutcome::NotFound), "{url}: {outcome:?}");
    }
}

#[tokio::test]
async fn connection_failure_is_failed() {
    // Bind then drop a listener so the port is very likely closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let extractor = HtmlExtractor::new(&local_config()).unwrap();
    let outcome = extractor.extract(&format!("http://{addr}/")).await;

    assert!(
        matches!(outcome, ExtractOutcome::Failed(ExtractError::Fetch(_))),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn private_hosts_are_blocked_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(ARTICLE))
        .expect(0)
        .mount(&server)
        .await;

    let extractor = HtmlExtractor::new(&ExtractorConfig::default()).unwrap();
    let outcome = extractor.extract(&server.uri()).await;

    assert!(
        matches!(outcome, ExtractOutcome::Failed(ExtractError::Blocked(_))),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn hostnames_resolving_to_private_addresses_are_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(ARTICLE))
        .expect(0)
        .mount(&server)
        .await;
    let port = server.address().port();

    let extractor = HtmlExtractor::new(&ExtractorConfig::default()).unwrap();
    let outcome = extractor.extract(&format!("http://localhost:{port}/")).await;

    match outcome {
        ExtractOutcome::Failed(ExtractError::Blocked(host)) => assert_eq!(host, "localhost"),
        other => panic!("expected Blocked, got {other:?}"),
    }
}
