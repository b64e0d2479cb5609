use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

const MOCK_DIMENSIONS: usize = 384;

pub struct MockEmbedder {
    fail: bool,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed`/`embed_batch` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn dimensions() -> usize {
        MOCK_DIMENSIONS
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        let mut batch = self.embed_batch(&[text]).await?;
        batch
            .pop()
            .ok_or_else(|| EmbedderError::InvalidResponse("empty response".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbedderError::ApiRequestFailed(
                "mock embedder unavailable".to_string(),
            ));
        }

        Ok(texts
            .iter()
            .map(|_| Embedding::new(vec![0.1; MOCK_DIMENSIONS]))
            .collect())
    }
}
