use std::cmp::Ordering;

use tokio::sync::RwLock;

use crate::application::ports::{CollectionConfig, SearchResult, VectorStore, VectorStoreError};
use crate::domain::{ChatbotId, Chunk, DocumentId, Embedding};

/// Brute-force cosine search over points held in memory.
#[derive(Default)]
pub struct InMemoryVectorStore {
    dimensions: RwLock<Option<u64>>,
    points: RwLock<Vec<(Chunk, Embedding)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.points.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.points.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError> {
        let mut dimensions = self.dimensions.write().await;
        if dimensions.is_some() {
            return Ok(false);
        }
        *dimensions = Some(config.vector_dimensions);
        Ok(true)
    }

    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        Ok(self.dimensions.read().await.is_some())
    }

    async fn get_collection_vector_size(&self) -> Result<Option<u64>, VectorStoreError> {
        Ok(*self.dimensions.read().await)
    }

    async fn delete_collection(&self) -> Result<(), VectorStoreError> {
        *self.dimensions.write().await = None;
        self.points.write().await.clear();
        Ok(())
    }

    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::UpsertFailed(
                "chunks and embeddings count mismatch".to_string(),
            ));
        }

        let mut points = self.points.write().await;
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            points.retain(|(existing, _)| existing.id != chunk.id);
            points.push((chunk.clone(), embedding.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        chatbot_id: ChatbotId,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let points = self.points.read().await;
        let mut results: Vec<SearchResult> = points
            .iter()
            .filter(|(chunk, _)| chunk.chatbot_id == chatbot_id)
            .map(|(chunk, stored)| SearchResult {
                chunk: chunk.clone(),
                score: stored.cosine_similarity(embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(top_k);
        Ok(results)
    }

    async fn delete_by_document(&self, document_id: DocumentId) -> Result<(), VectorStoreError> {
        self.points
            .write()
            .await
            .retain(|(chunk, _)| chunk.document_id != document_id);
        Ok(())
    }

    async fn delete_by_chatbot(&self, chatbot_id: ChatbotId) -> Result<(), VectorStoreError> {
        self.points
            .write()
            .await
            .retain(|(chunk, _)| chunk.chatbot_id != chatbot_id);
        Ok(())
    }
}
