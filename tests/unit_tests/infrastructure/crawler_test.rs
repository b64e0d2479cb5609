use std::time::Duration;

use httpmock::prelude::*;

use chatforge::application::ports::{CrawlerError, WebCrawler};
use chatforge::infrastructure::crawler::{ScraperWebCrawler, extract_links};
use url::Url;

fn crawler() -> ScraperWebCrawler {
    ScraperWebCrawler::new("chatforge-test/1.0", Duration::from_secs(5)).expect("crawler built")
}

async fn serve_site(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(
                    r#"<html><body><h1>Home</h1>
                    <a href="/about">About</a>
                    <a href="/brochure.pdf">Brochure</a>
                    <a href="/missing">Missing</a>
                    <a href="https://elsewhere.example/">Partner</a>
                    </body></html>"#,
                );
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/about");
            then.status(200)
                .header("content-type", "text/html")
                .body(r#"<html><body><p>About us</p><a href="/">Home</a></body></html>"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/brochure.pdf");
            then.status(200)
                .header("content-type", "application/pdf")
                .body("%PDF-1.7");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        })
        .await;
}

#[tokio::test]
async fn given_small_site_when_crawling_then_only_same_host_html_pages_are_returned() {
    let server = MockServer::start_async().await;
    serve_site(&server).await;

    let pages = crawler()
        .crawl(&server.url("/"), 10)
        .await
        .expect("crawled");

    let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls, vec![server.url("/"), server.url("/about")]);
    assert!(pages[1].html.contains("About us"));
}

#[tokio::test]
async fn given_oversized_page_when_crawling_then_it_is_skipped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .header("content-type", "text/html")
                .body(r#"<html><body><p>Welcome</p><a href="/catalog">Catalog</a></body></html>"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/catalog");
            then.status(200)
                .header("content-type", "text/html")
                .body(format!("<html><body>{}</body></html>", "<p>item</p>".repeat(500)));
        })
        .await;

    let pages = crawler()
        .with_max_page_bytes(1024)
        .crawl(&server.url("/"), 10)
        .await
        .expect("crawled");

    let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls, vec![server.url("/")]);
}

#[tokio::test]
async fn given_page_limit_when_crawling_then_stops_at_limit() {
    let server = MockServer::start_async().await;
    serve_site(&server).await;

    let pages = crawler()
        .crawl(&server.url("/"), 1)
        .await
        .expect("crawled");

    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn given_failing_start_page_when_crawling_then_nothing_is_crawled() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(503);
        })
        .await;

    let result = crawler().crawl(&server.url("/"), 5).await;

    assert!(matches!(result, Err(CrawlerError::NothingCrawled(_))));
}

#[tokio::test]
async fn given_non_http_url_when_crawling_then_url_is_rejected() {
    let result = crawler().crawl("ftp://files.example/", 5).await;

    assert!(matches!(result, Err(CrawlerError::InvalidUrl(_))));
}

#[test]
fn given_mixed_anchors_when_extracting_links_then_only_same_host_pages_without_fragments_remain() {
    let base = Url::parse("https://example.com/docs/").expect("valid base");
    let html = r##"
        <a href="intro">Intro</a>
        <a href="/pricing#plans">Pricing</a>
        <a href="https://other.org/">Elsewhere</a>
        <a href="mailto:hi@example.com">Mail</a>
    "##;

    let links: Vec<String> = extract_links(html, &base)
        .into_iter()
        .map(|u| u.to_string())
        .collect();

    assert_eq!(
        links,
        vec!["https://example.com/docs/intro", "https://example.com/pricing"]
    );
}
