use async_trait::async_trait;

use super::{CollectionConfig, SearchResult, VectorStoreError};
use crate::domain::{ChatbotId, Chunk, DocumentId, Embedding};

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError>;

    async fn collection_exists(&self) -> Result<bool, VectorStoreError>;

    async fn get_collection_vector_size(&self) -> Result<Option<u64>, VectorStoreError>;

    async fn delete_collection(&self) -> Result<(), VectorStoreError>;

    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError>;

    /// Top-k nearest chunks belonging to one chatbot, best first.
    async fn search(
        &self,
        chatbot_id: ChatbotId,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError>;

    async fn delete_by_document(&self, document_id: DocumentId) -> Result<(), VectorStoreError>;

    async fn delete_by_chatbot(&self, chatbot_id: ChatbotId) -> Result<(), VectorStoreError>;
}
