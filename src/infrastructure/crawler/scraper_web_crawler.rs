use std::collections::{HashSet, VecDeque};
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use scraper::{Html, Selector};
use url::Url;

use crate::application::ports::{CrawledPage, CrawlerError, WebCrawler};

/// Upper bound on discovered links per requested page.
const FRONTIER_FACTOR: usize = 20;

/// Pages larger than this are skipped.
pub const DEFAULT_MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Same-host breadth-first crawler over plain HTTP fetches.
pub struct ScraperWebCrawler {
    client: Client,
    max_page_bytes: usize,
}

impl ScraperWebCrawler {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CrawlerError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| CrawlerError::FetchFailed(e.to_string()))?;

        Ok(Self {
            client,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
        })
    }

    pub fn with_max_page_bytes(mut self, max_page_bytes: usize) -> Self {
        self.max_page_bytes = max_page_bytes;
        self
    }

    async fn fetch_html(&self, url: &Url) -> Option<String> {
        let response = match self.client.get(url.clone()).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(url = %url, status = %response.status(), "Skipping non-success response");
            return None;
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("text/html") || ct.contains("application/xhtml"));
        if !is_html {
            tracing::debug!(url = %url, "Skipping non-HTML response");
            return None;
        }

        self.read_capped(url, response).await
    }

    /// Streams the body, giving up as soon as it exceeds `max_page_bytes`.
    async fn read_capped(&self, url: &Url, mut response: Response) -> Option<String> {
        if response
            .content_length()
            .is_some_and(|len| len > self.max_page_bytes as u64)
        {
            tracing::debug!(url = %url, "Skipping oversized page");
            return None;
        }

        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if body.len() + chunk.len() > self.max_page_bytes {
                        tracing::debug!(url = %url, "Skipping oversized page");
                        return None;
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Reading page body failed");
                    return None;
                }
            }
        }

        Some(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Absolute same-host http(s) links on the page, fragments removed.
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| url.host_str() == base.host_str())
        .map(|mut url| {
            url.set_fragment(None);
            url
        })
        .collect()
}

#[async_trait]
impl WebCrawler for ScraperWebCrawler {
    #[tracing::instrument(skip(self))]
    async fn crawl(
        &self,
        start_url: &str,
        max_pages: usize,
    ) -> Result<Vec<CrawledPage>, CrawlerError> {
        let mut start =
            Url::parse(start_url).map_err(|e| CrawlerError::InvalidUrl(e.to_string()))?;
        if !matches!(start.scheme(), "http" | "https") || start.host_str().is_none() {
            return Err(CrawlerError::InvalidUrl(start_url.to_string()));
        }
        start.set_fragment(None);

        let frontier_limit = max_pages.saturating_mul(FRONTIER_FACTOR).max(1);
        let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
        let mut queue = VecDeque::from([start]);
        let mut pages = Vec::new();

        while pages.len() < max_pages {
            let Some(url) = queue.pop_front() else {
                break;
            };

            let Some(html) = self.fetch_html(&url).await else {
                continue;
            };

            for link in extract_links(&html, &url) {
                if visited.len() >= frontier_limit {
                    break;
                }
                if visited.insert(link.to_string()) {
                    queue.push_back(link);
                }
            }

            tracing::debug!(url = %url, "Page crawled");
            pages.push(CrawledPage {
                url: url.to_string(),
                html,
            });
        }

        if pages.is_empty() {
            return Err(CrawlerError::NothingCrawled(start_url.to_string()));
        }

        tracing::info!(pages = pages.len(), "Crawl complete");
        Ok(pages)
    }
}
