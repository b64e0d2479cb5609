use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, VectorStore};
use crate::application::services::ChatbotUpdate;
use crate::domain::{
    Chatbot, ChatbotAnalytics, ChatbotId, ChatbotSettings, DeploymentStatus, TrainingSource,
};
use crate::presentation::state::AppState;

use super::error::{ApiError, parse_id};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotSettingsDto {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub custom_prompt: Option<String>,
    pub welcome_message: Option<String>,
    pub format_markdown: Option<bool>,
    pub use_history: Option<bool>,
}

impl From<ChatbotSettingsDto> for ChatbotSettings {
    fn from(dto: ChatbotSettingsDto) -> Self {
        let defaults = ChatbotSettings::default();
        Self {
            model: dto.model,
            temperature: dto.temperature,
            max_tokens: dto.max_tokens,
            custom_prompt: dto.custom_prompt,
            welcome_message: dto.welcome_message,
            format_markdown: dto.format_markdown.unwrap_or(defaults.format_markdown),
            use_history: dto.use_history.unwrap_or(defaults.use_history),
        }
    }
}

impl From<&ChatbotSettings> for ChatbotSettingsDto {
    fn from(settings: &ChatbotSettings) -> Self {
        Self {
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            custom_prompt: settings.custom_prompt.clone(),
            welcome_message: settings.welcome_message.clone(),
            format_markdown: Some(settings.format_markdown),
            use_history: Some(settings.use_history),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateChatbotRequest {
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub settings: ChatbotSettingsDto,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChatbotRequest {
    pub name: Option<String>,
    pub settings: Option<ChatbotSettingsDto>,
}

#[derive(Debug, Deserialize)]
pub struct ListChatbotsQuery {
    pub owner_id: String,
}

#[derive(Serialize)]
pub struct AnalyticsResponse {
    pub total_sessions: u64,
    pub total_messages: u64,
    pub total_responses: u64,
    pub last_active_at: Option<String>,
}

impl From<&ChatbotAnalytics> for AnalyticsResponse {
    fn from(a: &ChatbotAnalytics) -> Self {
        Self {
            total_sessions: a.total_sessions,
            total_messages: a.total_messages,
            total_responses: a.total_responses,
            last_active_at: a.last_active_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Serialize)]
pub struct TrainingSourceResponse {
    pub document_id: String,
    pub name: String,
    pub status: String,
    pub chunk_count: u64,
    pub error_message: Option<String>,
    pub created_at: String,
}

impl From<&TrainingSource> for TrainingSourceResponse {
    fn from(s: &TrainingSource) -> Self {
        Self {
            document_id: s.document_id.to_string(),
            name: s.name.clone(),
            status: s.status.as_str().to_string(),
            chunk_count: s.chunk_count,
            error_message: s.error_message.clone(),
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct ChatbotResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub status: String,
    pub settings: ChatbotSettingsDto,
    pub analytics: AnalyticsResponse,
    pub training_documents: Vec<TrainingSourceResponse>,
    pub training_websites: Vec<TrainingSourceResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Chatbot> for ChatbotResponse {
    fn from(c: &Chatbot) -> Self {
        Self {
            id: c.id.to_string(),
            owner_id: c.owner_id.clone(),
            name: c.name.clone(),
            status: c.status.as_str().to_string(),
            settings: ChatbotSettingsDto::from(&c.settings),
            analytics: AnalyticsResponse::from(&c.analytics),
            training_documents: c.training_documents().map(Into::into).collect(),
            training_websites: c.training_websites().map(Into::into).collect(),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

pub(crate) fn parse_chatbot_id(raw: &str) -> Result<ChatbotId, ApiError> {
    parse_id(raw, "chatbot", ChatbotId::parse)
}

#[tracing::instrument(skip(state, request), fields(owner_id = %request.owner_id))]
pub async fn create_chatbot_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Json(request): Json<CreateChatbotRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let chatbot = state
        .management_service
        .create_chatbot(&request.owner_id, &request.name, request.settings.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ChatbotResponse::from(&chatbot))))
}

#[tracing::instrument(skip(state))]
pub async fn list_chatbots_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Query(query): Query<ListChatbotsQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let chatbots = state
        .management_service
        .list_chatbots(&query.owner_id)
        .await?;

    Ok(Json(
        chatbots
            .iter()
            .map(ChatbotResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn get_chatbot_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let id = parse_chatbot_id(&chatbot_id)?;
    let chatbot = state.management_service.get_chatbot(id).await?;
    Ok(Json(ChatbotResponse::from(&chatbot)))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_chatbot_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
    Json(request): Json<UpdateChatbotRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let id = parse_chatbot_id(&chatbot_id)?;
    let update = ChatbotUpdate {
        name: request.name,
        settings: request.settings.map(Into::into),
    };

    let chatbot = state.management_service.update_chatbot(id, update).await?;
    Ok(Json(ChatbotResponse::from(&chatbot)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_chatbot_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let id = parse_chatbot_id(&chatbot_id)?;
    state.management_service.delete_chatbot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
pub async fn deploy_chatbot_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    set_status(&state, &chatbot_id, DeploymentStatus::Deployed).await
}

#[tracing::instrument(skip(state))]
pub async fn pause_chatbot_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    set_status(&state, &chatbot_id, DeploymentStatus::Paused).await
}

async fn set_status<L, V>(
    state: &AppState<L, V>,
    chatbot_id: &str,
    status: DeploymentStatus,
) -> Result<Json<ChatbotResponse>, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let id = parse_chatbot_id(chatbot_id)?;
    let chatbot = state.management_service.set_status(id, status).await?;
    Ok(Json(ChatbotResponse::from(&chatbot)))
}
