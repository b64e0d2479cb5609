use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, VectorStore};
use crate::domain::{ChatSession, Message, SessionId};
use crate::presentation::state::AppState;

use super::chatbots::parse_chatbot_id;
use super::error::{ApiError, parse_id};

/// Default and upper bound for `?limit=` on the transcript endpoint.
pub const MAX_TRANSCRIPT_MESSAGES: usize = 500;

#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub chatbot_id: String,
    pub visitor_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChatSession> for SessionResponse {
    fn from(s: ChatSession) -> Self {
        Self {
            id: s.id.to_string(),
            chatbot_id: s.chatbot_id.to_string(),
            visitor_id: s.visitor_id,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub role: String,
    pub content: String,
    pub created_at: String,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id.to_string(),
            role: m.role.as_api_role().to_string(),
            content: m.content,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_sessions_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let chatbot_id = parse_chatbot_id(&chatbot_id)?;
    state.management_service.get_chatbot(chatbot_id).await?;

    let sessions = state.session_repository.list_sessions(chatbot_id).await?;
    Ok(Json(
        sessions
            .into_iter()
            .map(SessionResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Returns the newest `limit` messages of the session, oldest first.
/// Longer transcripts are cut from the front; a `limit` outside
/// `1..=MAX_TRANSCRIPT_MESSAGES` is rejected rather than clamped.
#[tracing::instrument(skip(state))]
pub async fn session_messages_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(session_id): Path<String>,
    Query(query): Query<TranscriptQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let id = parse_id(&session_id, "session", SessionId::parse)?;
    let limit = query.limit.unwrap_or(MAX_TRANSCRIPT_MESSAGES);
    if !(1..=MAX_TRANSCRIPT_MESSAGES).contains(&limit) {
        return Err(ApiError::bad_request(format!(
            "limit must be between 1 and {MAX_TRANSCRIPT_MESSAGES}"
        )));
    }

    state
        .session_repository
        .get_session(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Session not found: {session_id}")))?;

    let messages = state
        .session_repository
        .recent_messages(id, limit)
        .await?;

    Ok(Json(
        messages
            .into_iter()
            .map(MessageResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn delete_session_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let id = parse_id(&session_id, "session", SessionId::parse)?;
    state.session_repository.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
