use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{
    ChatbotRepository, JobRepository, RepositoryError, SessionRepository,
};
use crate::domain::{
    AnalyticsDelta, ChatSession, Chatbot, ChatbotId, DocumentId, Job, JobId, JobStatus, Message,
    SessionId, TrainingSource,
};

#[derive(Default)]
pub struct InMemoryChatbotRepository {
    chatbots: RwLock<HashMap<ChatbotId, Chatbot>>,
}

impl InMemoryChatbotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn chatbot_not_found(id: ChatbotId) -> RepositoryError {
    RepositoryError::NotFound(format!("chatbot {id}"))
}

#[async_trait::async_trait]
impl ChatbotRepository for InMemoryChatbotRepository {
    async fn create(&self, chatbot: &Chatbot) -> Result<(), RepositoryError> {
        let mut chatbots = self.chatbots.write().await;
        if chatbots.contains_key(&chatbot.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "chatbot {} already exists",
                chatbot.id
            )));
        }
        chatbots.insert(chatbot.id, chatbot.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: ChatbotId) -> Result<Option<Chatbot>, RepositoryError> {
        Ok(self.chatbots.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Chatbot>, RepositoryError> {
        let mut owned: Vec<Chatbot> = self
            .chatbots
            .read()
            .await
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(&self, chatbot: &Chatbot) -> Result<(), RepositoryError> {
        let mut chatbots = self.chatbots.write().await;
        let stored = chatbots
            .get_mut(&chatbot.id)
            .ok_or_else(|| chatbot_not_found(chatbot.id))?;

        stored.name = chatbot.name.clone();
        stored.settings = chatbot.settings.clone();
        stored.status = chatbot.status;
        stored.updated_at = chatbot.updated_at;
        Ok(())
    }

    async fn delete(&self, id: ChatbotId) -> Result<(), RepositoryError> {
        self.chatbots
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| chatbot_not_found(id))
    }

    async fn increment_analytics(
        &self,
        id: ChatbotId,
        delta: AnalyticsDelta,
    ) -> Result<(), RepositoryError> {
        let mut chatbots = self.chatbots.write().await;
        let stored = chatbots.get_mut(&id).ok_or_else(|| chatbot_not_found(id))?;
        stored.analytics.apply(delta, Utc::now());
        Ok(())
    }

    async fn record_pending_source(
        &self,
        id: ChatbotId,
        source: &TrainingSource,
    ) -> Result<(), RepositoryError> {
        let mut chatbots = self.chatbots.write().await;
        let stored = chatbots.get_mut(&id).ok_or_else(|| chatbot_not_found(id))?;

        if stored.training_source(source.document_id).is_some() {
            return Err(RepositoryError::ConstraintViolation(format!(
                "training source {} already exists",
                source.document_id
            )));
        }
        stored.training_sources.push(source.clone());
        Ok(())
    }

    async fn update_training_source(
        &self,
        id: ChatbotId,
        source: &TrainingSource,
    ) -> Result<(), RepositoryError> {
        let mut chatbots = self.chatbots.write().await;
        let stored = chatbots.get_mut(&id).ok_or_else(|| chatbot_not_found(id))?;

        let existing = stored
            .training_sources
            .iter_mut()
            .find(|s| s.document_id == source.document_id)
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("training source {}", source.document_id))
            })?;
        existing.name = source.name.clone();
        existing.status = source.status;
        existing.chunk_count = source.chunk_count;
        existing.error_message = source.error_message.clone();
        Ok(())
    }

    async fn remove_training_source(
        &self,
        id: ChatbotId,
        document_id: DocumentId,
    ) -> Result<Option<TrainingSource>, RepositoryError> {
        let mut chatbots = self.chatbots.write().await;
        let Some(stored) = chatbots.get_mut(&id) else {
            return Ok(None);
        };

        let position = stored
            .training_sources
            .iter()
            .position(|s| s.document_id == document_id);
        Ok(position.map(|i| stored.training_sources.remove(i)))
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, ChatSession>>,
    messages: RwLock<HashMap<SessionId, Vec<Message>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "session {} already exists",
                session.id
            )));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<ChatSession>, RepositoryError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn list_sessions(
        &self,
        chatbot_id: ChatbotId,
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        let mut sessions: Vec<ChatSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.chatbot_id == chatbot_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    async fn append_message(&self, message: &Message) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&message.session_id).ok_or_else(|| {
            RepositoryError::ConstraintViolation(format!(
                "session {} does not exist",
                message.session_id
            ))
        })?;
        session.updated_at = message.created_at;

        self.messages
            .write()
            .await
            .entry(message.session_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn recent_messages(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.read().await;
        let Some(all) = messages.get(&session_id) else {
            return Ok(Vec::new());
        };
        let skip = all.len().saturating_sub(limit);
        Ok(all[skip..].to_vec())
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("session {id}")))?;
        self.messages.write().await.remove(&id);
        Ok(())
    }

    async fn delete_sessions_for_chatbot(
        &self,
        chatbot_id: ChatbotId,
    ) -> Result<u64, RepositoryError> {
        let mut sessions = self.sessions.write().await;
        let doomed: Vec<SessionId> = sessions
            .values()
            .filter(|s| s.chatbot_id == chatbot_id)
            .map(|s| s.id)
            .collect();

        let mut messages = self.messages.write().await;
        for id in &doomed {
            sessions.remove(id);
            messages.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        self.jobs.write().await.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("job {id}")))?;
        job.status = status;
        job.error_message = error_message.map(str::to_string);
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn list_by_chatbot(&self, chatbot_id: ChatbotId) -> Result<Vec<Job>, RepositoryError> {
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|j| j.chatbot_id == chatbot_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}
