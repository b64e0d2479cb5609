use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{JobRepository, LlmClient, SessionRepository, VectorStore};
use crate::application::services::{ChatbotManagementService, ChatbotService, IngestionMessage};
use crate::presentation::config::Settings;

pub struct AppState<L, V>
where
    L: LlmClient,
    V: VectorStore,
{
    pub chatbot_service: Arc<ChatbotService<L, V>>,
    pub management_service: Arc<ChatbotManagementService<V>>,
    pub session_repository: Arc<dyn SessionRepository>,
    pub job_repository: Arc<dyn JobRepository>,
    pub ingestion_sender: mpsc::Sender<IngestionMessage>,
    pub settings: Arc<Settings>,
}

impl<L, V> Clone for AppState<L, V>
where
    L: LlmClient,
    V: VectorStore,
{
    fn clone(&self) -> Self {
        Self {
            chatbot_service: Arc::clone(&self.chatbot_service),
            management_service: Arc::clone(&self.management_service),
            session_repository: Arc::clone(&self.session_repository),
            job_repository: Arc::clone(&self.job_repository),
            ingestion_sender: self.ingestion_sender.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}
