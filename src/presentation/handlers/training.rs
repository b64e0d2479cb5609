use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::TrySendError;
use url::Url;

use crate::application::ports::{LlmClient, VectorStore};
use crate::application::services::{IngestionMessage, IngestionPayload};
use crate::domain::{
    ChatbotId, ContentType, DOCUMENT_INGESTION_JOB, Document, DocumentId, Job, JobStatus,
    TrainingSource, TrainingSourceKind, TrainingStatus, WEBSITE_CRAWL_JOB,
};
use crate::presentation::state::AppState;

use super::chatbots::{TrainingSourceResponse, parse_chatbot_id};
use super::error::{ApiError, parse_id};

const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct TrainingAcceptedResponse {
    pub job_id: String,
    pub document_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AddWebsiteRequest {
    pub url: String,
    pub max_pages: Option<usize>,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_document_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let chatbot_id = parse_chatbot_id(&chatbot_id)?;
    state.management_service.get_chatbot(chatbot_id).await?;

    let field = loop {
        match multipart.next_field().await {
            Ok(Some(f)) if f.name() == Some(FILE_FIELD) || f.file_name().is_some() => break f,
            Ok(Some(_)) => continue,
            Ok(None) => {
                tracing::warn!("Upload request with no file");
                return Err(ApiError::bad_request("No file uploaded"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                return Err(ApiError::bad_request(format!(
                    "Failed to read multipart: {e}"
                )));
            }
        }
    };

    let filename = field.file_name().unwrap_or("upload").to_string();
    let declared_type = field.content_type().map(str::to_string);

    let content_type = ContentType::detect(&filename, declared_type.as_deref()).ok_or_else(|| {
        tracing::warn!(filename = %filename, content_type = ?declared_type, "Unsupported file type");
        ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Unsupported file type: {filename}"),
        )
    })?;

    let data = field.bytes().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read file bytes");
        ApiError::new(e.status(), format!("Failed to read file: {e}"))
    })?;

    if data.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    tracing::debug!(filename = %filename, bytes = data.len(), "File received");

    let document = Document::new(chatbot_id, filename.clone(), content_type, data.len() as u64);
    let document_id = document.id;
    let source = TrainingSource::pending(document_id, TrainingSourceKind::Document, filename);

    let job = enqueue(
        &state,
        chatbot_id,
        source,
        DOCUMENT_INGESTION_JOB,
        IngestionPayload::File {
            document,
            data: data.to_vec(),
        },
    )
    .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(TrainingAcceptedResponse {
            job_id: job.id.to_string(),
            document_id: document_id.to_string(),
            message: "Document ingestion started".to_string(),
        }),
    ))
}

#[tracing::instrument(skip(state, request))]
pub async fn add_website_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path(chatbot_id): Path<String>,
    Json(request): Json<AddWebsiteRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let chatbot_id = parse_chatbot_id(&chatbot_id)?;
    state.management_service.get_chatbot(chatbot_id).await?;

    let url = Url::parse(request.url.trim())
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .ok_or_else(|| ApiError::bad_request(format!("Invalid website URL: {}", request.url)))?;

    let limit = state.settings.crawler.max_pages;
    let max_pages = request.max_pages.unwrap_or(limit).clamp(1, limit.max(1));

    let document_id = DocumentId::new();
    let source = TrainingSource::pending(
        document_id,
        TrainingSourceKind::Website,
        url.to_string(),
    );

    let job = enqueue(
        &state,
        chatbot_id,
        source,
        WEBSITE_CRAWL_JOB,
        IngestionPayload::Website {
            url: url.to_string(),
            max_pages,
        },
    )
    .await?;

    tracing::info!(url = %url, max_pages, "Website crawl enqueued");

    Ok((
        StatusCode::ACCEPTED,
        Json(TrainingAcceptedResponse {
            job_id: job.id.to_string(),
            document_id: document_id.to_string(),
            message: "Website crawl started".to_string(),
        }),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn remove_document_handler<L, V>(
    State(state): State<AppState<L, V>>,
    Path((chatbot_id, document_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let chatbot_id = parse_chatbot_id(&chatbot_id)?;
    let document_id = parse_id(&document_id, "document", DocumentId::parse)?;

    let removed = state
        .management_service
        .remove_training_source(chatbot_id, document_id)
        .await?;

    Ok(Json(TrainingSourceResponse::from(&removed)))
}

/// Records the job and pending source, then hands the work to the ingestion
/// worker without waiting for queue space.
async fn enqueue<L, V>(
    state: &AppState<L, V>,
    chatbot_id: ChatbotId,
    mut source: TrainingSource,
    job_type: &str,
    payload: IngestionPayload,
) -> Result<Job, ApiError>
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let job = Job::new(chatbot_id, Some(source.document_id), job_type);
    state.job_repository.create(&job).await?;
    state
        .management_service
        .record_pending_source(chatbot_id, &source)
        .await?;

    let message = IngestionMessage {
        job_id: job.id,
        chatbot_id,
        source: source.clone(),
        payload,
    };

    if let Err(e) = state.ingestion_sender.try_send(message) {
        let reason = match e {
            TrySendError::Full(_) => "Ingestion queue is full",
            TrySendError::Closed(_) => "Ingestion worker is unavailable",
        };
        tracing::error!(job_id = %job.id, reason, "Failed to enqueue ingestion job");

        if let Err(e) = state
            .job_repository
            .update_status(job.id, JobStatus::Failed, Some(reason))
            .await
        {
            tracing::warn!(error = %e, "Failed to mark rejected job as failed");
        }
        source.status = TrainingStatus::Failed;
        source.error_message = Some(reason.to_string());
        if let Err(e) = state
            .management_service
            .update_training_source(chatbot_id, &source)
            .await
        {
            tracing::warn!(error = %e, "Failed to mark rejected training source as failed");
        }

        return Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, reason));
    }

    tracing::info!(job_id = %job.id, document_id = %source.document_id, job_type, "Ingestion job enqueued");
    Ok(job)
}
