use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::RepositoryError;
use crate::application::services::{ChatbotServiceError, ManagementError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An HTTP status plus the message sent back as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(what) => ApiError::not_found(format!("Not found: {what}")),
            RepositoryError::ConstraintViolation(msg) => ApiError::new(StatusCode::CONFLICT, msg),
            other => {
                tracing::error!(error = %other, "Repository failure");
                ApiError::internal("Storage failure")
            }
        }
    }
}

impl From<ManagementError> for ApiError {
    fn from(e: ManagementError) -> Self {
        match e {
            ManagementError::InvalidInput(msg) => ApiError::bad_request(msg),
            ManagementError::NotFound(id) => ApiError::not_found(format!("Chatbot not found: {id}")),
            ManagementError::TrainingSourceNotFound(id) => {
                ApiError::not_found(format!("Training source not found: {id}"))
            }
            ManagementError::Repository(e) => e.into(),
            ManagementError::VectorStore(e) => {
                tracing::error!(error = %e, "Vector store failure");
                ApiError::internal("Vector store failure")
            }
        }
    }
}

impl From<ChatbotServiceError> for ApiError {
    fn from(e: ChatbotServiceError) -> Self {
        match e {
            ChatbotServiceError::InvalidMessage => ApiError::bad_request(e.to_string()),
            ChatbotServiceError::ChatbotNotFound(id) => {
                ApiError::not_found(format!("Chatbot not found: {id}"))
            }
            ChatbotServiceError::Unavailable(_) | ChatbotServiceError::SessionMismatch(_) => {
                ApiError::new(StatusCode::CONFLICT, e.to_string())
            }
            ChatbotServiceError::Repository(e) => e.into(),
            ChatbotServiceError::Completion(e) => {
                tracing::error!(error = %e, "Completion failed");
                ApiError::internal("Failed to generate a response")
            }
        }
    }
}

pub(crate) fn parse_id<I>(
    raw: &str,
    label: &str,
    parse: fn(&str) -> Result<I, uuid::Error>,
) -> Result<I, ApiError> {
    parse(raw).map_err(|_| ApiError::bad_request(format!("Invalid {label} ID: {raw}")))
}
