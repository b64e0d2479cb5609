use std::sync::Arc;

use crate::application::ports::{
    ChatbotRepository, CompletionRequest, Embedder, LlmClient, LlmClientError, RepositoryError,
    SearchResult, SessionRepository, VectorStore,
};
use crate::domain::{
    AnalyticsDelta, ChatSession, Chatbot, ChatbotId, Message, MessageRole, ModelParameters,
    SessionId,
};

use super::greeting::is_greeting;
use super::prompt_builder::PromptBuilder;
use super::response_formatter::format_response;

/// Retrieval knobs shared by every chatbot.
#[derive(Debug, Clone)]
pub struct RagOptions {
    pub top_k: usize,
    pub similarity_threshold: f32,
    pub max_context_tokens: usize,
    pub history_limit: usize,
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub chatbot_id: ChatbotId,
    pub session_id: Option<SessionId>,
    pub visitor_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub session_id: SessionId,
    pub answer: String,
    pub sources: Vec<SourceChunk>,
    pub is_greeting: bool,
}

#[derive(Debug, Clone)]
pub struct SourceChunk {
    pub text: String,
    pub source: String,
    pub score: f32,
}

pub struct ChatbotService<L, V>
where
    L: LlmClient,
    V: VectorStore,
{
    embedder: Arc<dyn Embedder>,
    llm_client: Arc<L>,
    vector_store: Arc<V>,
    chatbot_repository: Arc<dyn ChatbotRepository>,
    session_repository: Arc<dyn SessionRepository>,
    defaults: ModelParameters,
    options: RagOptions,
}

impl<L, V> ChatbotService<L, V>
where
    L: LlmClient,
    V: VectorStore,
{
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm_client: Arc<L>,
        vector_store: Arc<V>,
        chatbot_repository: Arc<dyn ChatbotRepository>,
        session_repository: Arc<dyn SessionRepository>,
        defaults: ModelParameters,
        options: RagOptions,
    ) -> Self {
        Self {
            embedder,
            llm_client,
            vector_store,
            chatbot_repository,
            session_repository,
            defaults,
            options,
        }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(chatbot_id = %request.chatbot_id, session_id = tracing::field::Empty)
    )]
    pub async fn generate_response(
        &self,
        request: ChatRequest,
    ) -> Result<ChatResponse, ChatbotServiceError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(ChatbotServiceError::InvalidMessage);
        }

        let chatbot = self
            .chatbot_repository
            .get_by_id(request.chatbot_id)
            .await?
            .ok_or(ChatbotServiceError::ChatbotNotFound(request.chatbot_id))?;

        if !chatbot.status.accepts_chat() {
            return Err(ChatbotServiceError::Unavailable(chatbot.id));
        }

        let session = self
            .resolve_session(&chatbot, request.session_id, request.visitor_id)
            .await?;
        tracing::Span::current().record("session_id", tracing::field::display(session.id));

        let greeting = is_greeting(message);
        let parameters = chatbot.settings.resolve(&self.defaults);

        tracing::debug!(
            message_chars = message.chars().count(),
            greeting,
            model = %parameters.model,
            temperature = parameters.temperature,
            "Generating chat response"
        );

        let context = if greeting {
            Vec::new()
        } else {
            self.retrieve_context(chatbot.id, message).await
        };

        let history = if chatbot.settings.use_history {
            self.fetch_history(session.id).await
        } else {
            Vec::new()
        };

        let prompt = PromptBuilder::new(&chatbot.name, self.options.max_context_tokens)
            .custom_prompt(chatbot.settings.custom_prompt.as_deref())
            .welcome_message(chatbot.settings.welcome_message.as_deref())
            .build(context, &history, message, greeting);

        let completion = CompletionRequest {
            parameters,
            messages: prompt.messages,
        };

        let raw_answer = self
            .llm_client
            .complete(&completion)
            .await
            .map_err(ChatbotServiceError::Completion)?;

        let answer = if chatbot.settings.format_markdown {
            format_response(&raw_answer)
        } else {
            raw_answer
        };

        self.record_exchange(chatbot.id, session.id, message, &answer)
            .await;

        let sources = prompt
            .used_context
            .into_iter()
            .map(|r| SourceChunk {
                text: r.chunk.text,
                source: r.chunk.source,
                score: r.score,
            })
            .collect();

        tracing::info!(greeting, "Chat response generated");

        Ok(ChatResponse {
            session_id: session.id,
            answer,
            sources,
            is_greeting: greeting,
        })
    }

    async fn resolve_session(
        &self,
        chatbot: &Chatbot,
        session_id: Option<SessionId>,
        visitor_id: Option<String>,
    ) -> Result<ChatSession, ChatbotServiceError> {
        if let Some(id) = session_id {
            if let Some(existing) = self.session_repository.get_session(id).await? {
                if existing.chatbot_id != chatbot.id {
                    return Err(ChatbotServiceError::SessionMismatch(id));
                }
                return Ok(existing);
            }
        }

        let mut session = ChatSession::new(chatbot.id, visitor_id);
        // Keep the visitor's key when the widget presents one we no longer know.
        if let Some(id) = session_id {
            session.id = id;
        }
        self.session_repository.create_session(&session).await?;

        if let Err(e) = self
            .chatbot_repository
            .increment_analytics(chatbot.id, AnalyticsDelta::new_session())
            .await
        {
            tracing::warn!(error = %e, "Failed to increment session analytics");
        }

        Ok(session)
    }

    async fn retrieve_context(&self, chatbot_id: ChatbotId, message: &str) -> Vec<SearchResult> {
        let embedding = match self.embedder.embed(message).await {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "Query embedding failed, continuing without context");
                return Vec::new();
            }
        };

        match self
            .vector_store
            .search(chatbot_id, &embedding, self.options.top_k)
            .await
        {
            Ok(results) => {
                let relevant: Vec<SearchResult> = results
                    .into_iter()
                    .filter(|r| r.score >= self.options.similarity_threshold)
                    .collect();
                tracing::debug!(hits = relevant.len(), "Vector search complete");
                relevant
            }
            Err(e) => {
                tracing::warn!(error = %e, "Vector search failed, continuing without context");
                Vec::new()
            }
        }
    }

    async fn fetch_history(&self, session_id: SessionId) -> Vec<Message> {
        if self.options.history_limit == 0 {
            return Vec::new();
        }

        self.session_repository
            .recent_messages(session_id, self.options.history_limit)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "History fetch failed, continuing without history");
                Vec::new()
            })
    }

    async fn record_exchange(
        &self,
        chatbot_id: ChatbotId,
        session_id: SessionId,
        question: &str,
        answer: &str,
    ) {
        let user_message = Message::new(session_id, MessageRole::User, question.to_string());
        let assistant_message = Message::new(session_id, MessageRole::Assistant, answer.to_string());

        for message in [&user_message, &assistant_message] {
            if let Err(e) = self.session_repository.append_message(message).await {
                tracing::warn!(error = %e, role = %message.role, "Failed to persist chat message");
            }
        }

        if let Err(e) = self
            .chatbot_repository
            .increment_analytics(chatbot_id, AnalyticsDelta::exchange())
            .await
        {
            tracing::warn!(error = %e, "Failed to increment message analytics");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatbotServiceError {
    #[error("message must not be empty")]
    InvalidMessage,
    #[error("chatbot not found: {0}")]
    ChatbotNotFound(ChatbotId),
    #[error("chatbot {0} is paused")]
    Unavailable(ChatbotId),
    #[error("session {0} belongs to another chatbot")]
    SessionMismatch(SessionId),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
}
