use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::{LlmClient, VectorStore};
use crate::domain::{Job, JobId};
use crate::presentation::state::AppState;

use super::chatbots::parse_chatbot_id;
use super::error::{ApiError, parse_id};

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub id: String,
    pub chatbot_id: String,
    pub status: String,
    pub document_id: Option<String>,
    pub job_type: String,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id.to_string(),
            chatbot_id: job.chatbot_id.to_string(),
            status: job.status.as_str().to_string(),
            document_id: job.document_id.map(|id| id.to_string()),
            job_type: job.job_type,
            error_message: job.error_message,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let id = parse_id(&job_id, "job", JobId::parse)?;

    let job = state
        .job_repository
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Job not found: {job_id}")))?;

    Ok(Json(JobStatusResponse::from(job)))
}

/// Newest first.
#[tracing::instrument(skip(state))]
pub async fn list_jobs_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let chatbot_id = parse_chatbot_id(&chatbot_id)?;
    state.management_service.get_chatbot(chatbot_id).await?;

    let jobs = state.job_repository.list_by_chatbot(chatbot_id).await?;
    Ok(Json(
        jobs.into_iter()
            .map(JobStatusResponse::from)
            .collect::<Vec<_>>(),
    ))
}
