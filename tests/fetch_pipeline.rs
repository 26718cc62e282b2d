//! Integration tests for fetching a feed over HTTP and building its items.
//!
//! Each test starts its own mock server so tests stay independent.

use rss_items::feed::{FeedFetcher, FeedPipeline, FetchError, PipelineOptions, ERROR_ITEM_TITLE};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NEWS_FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/"><channel>
  <item><title>First</title><link>https://news.example.com/1</link><media:thumbnail url="https://img.example.com/1.jpg"/></item>
  <item><title>Second</title><link>https://news.example.com/2</link></item>
  <item><title>Third</title><link>https://news.example.com/3</link></item>
</channel></rss>"#;

async fn serve(status: u16, body: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss.xml"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("Content-Type", "application/rss+xml"),
        )
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_fetch_and_build() {
    let mock_server = serve(200, NEWS_FEED).await;
    let fetcher = FeedFetcher::new(reqwest::Client::new());

    let xml = fetcher
        .fetch(&format!("{}/rss.xml", mock_server.uri()))
        .await
        .unwrap();
    let items = FeedPipeline::new(PipelineOptions {
        max_items: Some(2),
        ..PipelineOptions::default()
    })
    .build_from_xml(&xml)
    .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].image_src, "https://img.example.com/1.jpg");
    assert_eq!(items[1].title, "Second");
}

#[tokio::test]
async fn test_failed_fetch_becomes_error_item() {
    let mock_server = serve(503, "unavailable").await;
    let fetcher = FeedFetcher::new(reqwest::Client::new());
    let pipeline = FeedPipeline::new(PipelineOptions::default());

    let err = fetcher
        .fetch(&format!("{}/rss.xml", mock_server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus(503)));

    let items = pipeline.error_items(&err.to_string()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, ERROR_ITEM_TITLE);
    assert!(items[0].item.excerpt.ends_with("HTTP error: status 503"));
}

#[tokio::test]
async fn test_fetched_html_page_is_malformed_feed() {
    let mock_server = serve(200, "<html><body><h1>Moved</h1></body></html>").await;
    let xml = FeedFetcher::new(reqwest::Client::new())
        .fetch(&format!("{}/rss.xml", mock_server.uri()))
        .await
        .unwrap();

    let result = FeedPipeline::new(PipelineOptions::default()).build_from_xml(&xml);
    assert!(result.is_err());
}
