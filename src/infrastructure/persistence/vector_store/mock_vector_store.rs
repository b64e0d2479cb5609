use crate::application::ports::{CollectionConfig, SearchResult, VectorStore, VectorStoreError};
use crate::domain::{ChatbotId, Chunk, DocumentId, Embedding};

/// Answers every search with a fixed hit list.
pub struct MockVectorStore {
    results: Vec<SearchResult>,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::with_results(Vec::new())
    }

    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self { results }
    }

    /// A single hit for `chatbot_id` with the given score.
    pub fn with_hit(chatbot_id: ChatbotId, text: &str, score: f32) -> Self {
        Self::with_results(vec![SearchResult {
            chunk: Chunk::new(
                text.to_string(),
                DocumentId::new(),
                chatbot_id,
                "handbook.pdf".to_string(),
                0,
            ),
            score,
        }])
    }
}

impl Default for MockVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VectorStore for MockVectorStore {
    async fn create_collection(
        &self,
        _config: &CollectionConfig,
    ) -> Result<bool, VectorStoreError> {
        Ok(true)
    }

    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        Ok(true)
    }

    async fn get_collection_vector_size(&self) -> Result<Option<u64>, VectorStoreError> {
        Ok(Some(384))
    }

    async fn delete_collection(&self) -> Result<(), VectorStoreError> {
        Ok(())
    }

    async fn upsert(
        &self,
        _chunks: &[Chunk],
        _embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        Ok(())
    }

    async fn search(
        &self,
        _chatbot_id: ChatbotId,
        _embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        Ok(self.results.iter().take(top_k).cloned().collect())
    }

    async fn delete_by_document(&self, _document_id: DocumentId) -> Result<(), VectorStoreError> {
        Ok(())
    }

    async fn delete_by_chatbot(&self, _chatbot_id: ChatbotId) -> Result<(), VectorStoreError> {
        Ok(())
    }
}

/// Fails every data operation, as an unreachable vector database would.
pub struct FailingVectorStore;

#[async_trait::async_trait]
impl VectorStore for FailingVectorStore {
    async fn create_collection(
        &self,
        _config: &CollectionConfig,
    ) -> Result<bool, VectorStoreError> {
        Err(VectorStoreError::ConnectionFailed("unreachable".to_string()))
    }

    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        Err(VectorStoreError::ConnectionFailed("unreachable".to_string()))
    }

    async fn get_collection_vector_size(&self) -> Result<Option<u64>, VectorStoreError> {
        Err(VectorStoreError::ConnectionFailed("unreachable".to_string()))
    }

    async fn delete_collection(&self) -> Result<(), VectorStoreError> {
        Err(VectorStoreError::ConnectionFailed("unreachable".to_string()))
    }

    async fn upsert(
        &self,
        _chunks: &[Chunk],
        _embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        Err(VectorStoreError::UpsertFailed("unreachable".to_string()))
    }

    async fn search(
        &self,
        _chatbot_id: ChatbotId,
        _embedding: &Embedding,
        _top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        Err(VectorStoreError::SearchFailed("unreachable".to_string()))
    }

    async fn delete_by_document(&self, _document_id: DocumentId) -> Result<(), VectorStoreError> {
        Err(VectorStoreError::DeleteFailed("unreachable".to_string()))
    }

    async fn delete_by_chatbot(&self, _chatbot_id: ChatbotId) -> Result<(), VectorStoreError> {
        Err(VectorStoreError::DeleteFailed("unreachable".to_string()))
    }
}
