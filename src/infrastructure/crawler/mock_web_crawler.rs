use async_trait::async_trait;

use crate::application::ports::{CrawledPage, CrawlerError, WebCrawler};

/// Serves a fixed site regardless of the start URL.
pub struct MockWebCrawler {
    pages: Vec<CrawledPage>,
}

impl MockWebCrawler {
    pub fn new(pages: Vec<CrawledPage>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl WebCrawler for MockWebCrawler {
    async fn crawl(
        &self,
        start_url: &str,
        max_pages: usize,
    ) -> Result<Vec<CrawledPage>, CrawlerError> {
        if self.pages.is_empty() {
            return Err(CrawlerError::NothingCrawled(start_url.to_string()));
        }
        Ok(self.pages.iter().take(max_pages).cloned().collect())
    }
}
