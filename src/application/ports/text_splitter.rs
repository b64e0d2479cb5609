use async_trait::async_trait;

use crate::domain::{Chunk, Document};

#[async_trait]
pub trait TextSplitter: Send + Sync {
    async fn split(&self, text: &str, document: &Document) -> Result<Vec<Chunk>, TextSplitterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextSplitterError {
    #[error("invalid splitter configuration: {0}")]
    InvalidConfiguration(String),
    #[error("splitting failed: {0}")]
    SplittingFailed(String),
}
