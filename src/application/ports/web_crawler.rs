use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct CrawledPage {
    pub url: String,
    pub html: String,
}

#[async_trait]
pub trait WebCrawler: Send + Sync {
    /// Fetches `start_url` and same-host pages reachable from it, breadth
    /// first, stopping after `max_pages` HTML pages.
    async fn crawl(&self, start_url: &str, max_pages: usize)
    -> Result<Vec<CrawledPage>, CrawlerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("fetch failed: {0}")]
    FetchFailed(String),
    #[error("no pages could be crawled from {0}")]
    NothingCrawled(String),
}
