use chrono::{DateTime, Utc};

use super::{
    ChatbotAnalytics, ChatbotId, ChatbotSettings, DeploymentStatus, DocumentId, TrainingSource,
    TrainingSourceKind,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Chatbot {
    pub id: ChatbotId,
    pub owner_id: String,
    pub name: String,
    pub settings: ChatbotSettings,
    pub analytics: ChatbotAnalytics,
    pub status: DeploymentStatus,
    pub training_sources: Vec<TrainingSource>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chatbot {
    pub fn new(owner_id: String, name: String, settings: ChatbotSettings) -> Self {
        let now = Utc::now();
        Self {
            id: ChatbotId::new(),
            owner_id,
            name,
            settings,
            analytics: ChatbotAnalytics::default(),
            status: DeploymentStatus::Draft,
            training_sources: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn training_documents(&self) -> impl Iterator<Item = &TrainingSource> {
        self.training_sources
            .iter()
            .filter(|s| s.kind == TrainingSourceKind::Document)
    }

    pub fn training_websites(&self) -> impl Iterator<Item = &TrainingSource> {
        self.training_sources
            .iter()
            .filter(|s| s.kind == TrainingSourceKind::Website)
    }

    pub fn training_source(&self, document_id: DocumentId) -> Option<&TrainingSource> {
        self.training_sources
            .iter()
            .find(|s| s.document_id == document_id)
    }
}
