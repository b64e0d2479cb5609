use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{
    ChatbotRepository, RepositoryError, SessionRepository, VectorStore, VectorStoreError,
};
use crate::domain::{
    Chatbot, ChatbotId, ChatbotSettings, DeploymentStatus, DocumentId, MAX_COMPLETION_TOKENS,
    MAX_TEMPERATURE, MIN_TEMPERATURE, TrainingSource,
};

const MAX_NAME_LENGTH: usize = 120;

#[derive(Debug, Clone, Default)]
pub struct ChatbotUpdate {
    pub name: Option<String>,
    pub settings: Option<ChatbotSettings>,
}

/// Chatbot lifecycle: creation, configuration, deployment, and the cleanup
/// of vectors and transcripts that goes with removal.
pub struct ChatbotManagementService<V>
where
    V: VectorStore,
{
    chatbot_repository: Arc<dyn ChatbotRepository>,
    session_repository: Arc<dyn SessionRepository>,
    vector_store: Arc<V>,
}

impl<V> ChatbotManagementService<V>
where
    V: VectorStore,
{
    pub fn new(
        chatbot_repository: Arc<dyn ChatbotRepository>,
        session_repository: Arc<dyn SessionRepository>,
        vector_store: Arc<V>,
    ) -> Self {
        Self {
            chatbot_repository,
            session_repository,
            vector_store,
        }
    }

    pub async fn create_chatbot(
        &self,
        owner_id: &str,
        name: &str,
        settings: ChatbotSettings,
    ) -> Result<Chatbot, ManagementError> {
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(ManagementError::InvalidInput(
                "owner_id must not be empty".to_string(),
            ));
        }
        let name = validate_name(name)?;
        validate_settings(&settings)?;

        let chatbot = Chatbot::new(owner_id.to_string(), name, settings);
        self.chatbot_repository.create(&chatbot).await?;

        tracing::info!(chatbot_id = %chatbot.id, owner_id, "Chatbot created");
        Ok(chatbot)
    }

    pub async fn get_chatbot(&self, id: ChatbotId) -> Result<Chatbot, ManagementError> {
        self.chatbot_repository
            .get_by_id(id)
            .await?
            .ok_or(ManagementError::NotFound(id))
    }

    pub async fn list_chatbots(&self, owner_id: &str) -> Result<Vec<Chatbot>, ManagementError> {
        Ok(self.chatbot_repository.list_by_owner(owner_id).await?)
    }

    pub async fn update_chatbot(
        &self,
        id: ChatbotId,
        update: ChatbotUpdate,
    ) -> Result<Chatbot, ManagementError> {
        let mut chatbot = self.get_chatbot(id).await?;

        if let Some(name) = update.name {
            chatbot.name = validate_name(&name)?;
        }
        if let Some(settings) = update.settings {
            validate_settings(&settings)?;
            chatbot.settings = settings;
        }
        chatbot.updated_at = Utc::now();

        self.chatbot_repository.update(&chatbot).await?;
        Ok(chatbot)
    }

    pub async fn set_status(
        &self,
        id: ChatbotId,
        status: DeploymentStatus,
    ) -> Result<Chatbot, ManagementError> {
        let mut chatbot = self.get_chatbot(id).await?;
        if chatbot.status == status {
            return Ok(chatbot);
        }

        chatbot.status = status;
        chatbot.updated_at = Utc::now();
        self.chatbot_repository.update(&chatbot).await?;

        tracing::info!(chatbot_id = %id, status = %status, "Deployment status changed");
        Ok(chatbot)
    }

    pub async fn record_pending_source(
        &self,
        id: ChatbotId,
        source: &TrainingSource,
    ) -> Result<(), ManagementError> {
        self.get_chatbot(id).await?;
        Ok(self
            .chatbot_repository
            .record_pending_source(id, source)
            .await?)
    }

    pub async fn update_training_source(
        &self,
        id: ChatbotId,
        source: &TrainingSource,
    ) -> Result<(), ManagementError> {
        match self
            .chatbot_repository
            .update_training_source(id, source)
            .await
        {
            Err(RepositoryError::NotFound(_)) => {
                Err(ManagementError::TrainingSourceNotFound(source.document_id))
            }
            other => Ok(other?),
        }
    }

    /// Vectors go first so a failure leaves the source listed and retryable.
    pub async fn remove_training_source(
        &self,
        id: ChatbotId,
        document_id: DocumentId,
    ) -> Result<TrainingSource, ManagementError> {
        let chatbot = self.get_chatbot(id).await?;
        if chatbot.training_source(document_id).is_none() {
            return Err(ManagementError::TrainingSourceNotFound(document_id));
        }

        self.vector_store.delete_by_document(document_id).await?;

        self.chatbot_repository
            .remove_training_source(id, document_id)
            .await?
            .ok_or(ManagementError::TrainingSourceNotFound(document_id))
    }

    pub async fn delete_chatbot(&self, id: ChatbotId) -> Result<(), ManagementError> {
        self.get_chatbot(id).await?;

        self.vector_store.delete_by_chatbot(id).await?;
        let sessions = self
            .session_repository
            .delete_sessions_for_chatbot(id)
            .await?;
        self.chatbot_repository.delete(id).await?;

        tracing::info!(chatbot_id = %id, sessions, "Chatbot deleted");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, ManagementError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ManagementError::InvalidInput(
            "name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ManagementError::InvalidInput(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_settings(settings: &ChatbotSettings) -> Result<(), ManagementError> {
    if let Some(t) = settings.temperature {
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&t) {
            return Err(ManagementError::InvalidInput(format!(
                "temperature must be between {MIN_TEMPERATURE} and {MAX_TEMPERATURE}"
            )));
        }
    }
    if let Some(t) = settings.max_tokens {
        if !(1..=MAX_COMPLETION_TOKENS).contains(&t) {
            return Err(ManagementError::InvalidInput(format!(
                "max_tokens must be between 1 and {MAX_COMPLETION_TOKENS}"
            )));
        }
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("chatbot not found: {0}")]
    NotFound(ChatbotId),
    #[error("training source not found: {0}")]
    TrainingSourceNotFound(DocumentId),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("vector store: {0}")]
    VectorStore(#[from] VectorStoreError),
}
