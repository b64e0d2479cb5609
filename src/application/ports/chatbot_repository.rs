use async_trait::async_trait;

use crate::domain::{AnalyticsDelta, Chatbot, ChatbotId, DocumentId, TrainingSource};

use super::RepositoryError;

#[async_trait]
pub trait ChatbotRepository: Send + Sync {
    async fn create(&self, chatbot: &Chatbot) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: ChatbotId) -> Result<Option<Chatbot>, RepositoryError>;

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Chatbot>, RepositoryError>;

    /// Writes name, settings and deployment status. Analytics and training
    /// sources have their own operations.
    async fn update(&self, chatbot: &Chatbot) -> Result<(), RepositoryError>;

    async fn delete(&self, id: ChatbotId) -> Result<(), RepositoryError>;

    async fn increment_analytics(
        &self,
        id: ChatbotId,
        delta: AnalyticsDelta,
    ) -> Result<(), RepositoryError>;

    /// Inserts a new source. Fails with `ConstraintViolation` when the
    /// document id is already recorded for the chatbot.
    async fn record_pending_source(
        &self,
        id: ChatbotId,
        source: &TrainingSource,
    ) -> Result<(), RepositoryError>;

    /// Overwrites status, chunk count and error of an existing source.
    /// Returns `NotFound` once the source or its chatbot has been removed;
    /// never re-creates it.
    async fn update_training_source(
        &self,
        id: ChatbotId,
        source: &TrainingSource,
    ) -> Result<(), RepositoryError>;

    async fn remove_training_source(
        &self,
        id: ChatbotId,
        document_id: DocumentId,
    ) -> Result<Option<TrainingSource>, RepositoryError>;
}
