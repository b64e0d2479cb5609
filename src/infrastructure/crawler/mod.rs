mod mock_web_crawler;
mod scraper_web_crawler;

pub use mock_web_crawler::MockWebCrawler;
pub use scraper_web_crawler::{DEFAULT_MAX_PAGE_BYTES, ScraperWebCrawler, extract_links};
