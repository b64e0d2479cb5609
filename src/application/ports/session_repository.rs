use async_trait::async_trait;

use crate::domain::{ChatSession, ChatbotId, Message, SessionId};

use super::RepositoryError;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &ChatSession) -> Result<(), RepositoryError>;

    async fn get_session(&self, id: SessionId) -> Result<Option<ChatSession>, RepositoryError>;

    async fn list_sessions(&self, chatbot_id: ChatbotId)
    -> Result<Vec<ChatSession>, RepositoryError>;

    async fn append_message(&self, message: &Message) -> Result<(), RepositoryError>;

    /// Newest `limit` messages of the session, returned oldest first.
    async fn recent_messages(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError>;

    async fn delete_session(&self, id: SessionId) -> Result<(), RepositoryError>;

    async fn delete_sessions_for_chatbot(&self, chatbot_id: ChatbotId)
    -> Result<u64, RepositoryError>;
}
