use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, VectorStore};
use crate::application::services::{ChatRequest, ChatResponse};
use crate::domain::SessionId;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::chatbots::parse_chatbot_id;
use super::error::{ApiError, parse_id};

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,
    pub session_id: Option<String>,
    pub visitor_id: Option<String>,
}

#[derive(Serialize)]
pub struct SourceResponse {
    pub text: String,
    pub source: String,
    pub score: f32,
}

#[derive(Serialize)]
pub struct ChatResponseBody {
    pub session_id: String,
    pub answer: String,
    pub sources: Vec<SourceResponse>,
    pub is_greeting: bool,
}

impl From<ChatResponse> for ChatResponseBody {
    fn from(r: ChatResponse) -> Self {
        Self {
            session_id: r.session_id.to_string(),
            answer: r.answer,
            sources: r
                .sources
                .into_iter()
                .map(|s| SourceResponse {
                    text: s.text,
                    source: s.source,
                    score: s.score,
                })
                .collect(),
            is_greeting: r.is_greeting,
        }
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn chat_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
    Json(body): Json<ChatRequestBody>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let chatbot_id = parse_chatbot_id(&chatbot_id)?;
    let session_id = body
        .session_id
        .as_deref()
        .map(|raw| parse_id(raw, "session", SessionId::parse))
        .transpose()?;

    tracing::debug!(prompt = %sanitize_prompt(&body.message), "Chat request received");

    let response = state
        .chatbot_service
        .generate_response(ChatRequest {
            chatbot_id,
            session_id,
            visitor_id: body.visitor_id,
            message: body.message,
        })
        .await?;

    Ok(Json(ChatResponseBody::from(response)))
}
