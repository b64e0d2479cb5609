use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{LlmClient, VectorStore};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    add_website_handler, chat_handler, create_chatbot_handler, delete_chatbot_handler,
    delete_session_handler, deploy_chatbot_handler, get_chatbot_handler, health_handler,
    job_status_handler, list_chatbots_handler, list_jobs_handler, list_sessions_handler, pause_chatbot_handler,
    remove_document_handler, session_messages_handler, update_chatbot_handler,
    upload_document_handler,
};
use crate::presentation::state::AppState;

/// Multipart framing on top of the raw file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router<L, V>(state: AppState<L, V>) -> Router
where
    L: LlmClient + 'static,
    V: VectorStore + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let upload_limit = state.settings.ingestion.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/v1/chatbots",
            post(create_chatbot_handler::<L, V>).get(list_chatbots_handler::<L, V>),
        )
        .route(
            "/api/v1/chatbots/{chatbot_id}",
            get(get_chatbot_handler::<L, V>)
                .patch(update_chatbot_handler::<L, V>)
                .delete(delete_chatbot_handler::<L, V>),
        )
        .route(
            "/api/v1/chatbots/{chatbot_id}/deploy",
            post(deploy_chatbot_handler::<L, V>),
        )
        .route(
            "/api/v1/chatbots/{chatbot_id}/pause",
            post(pause_chatbot_handler::<L, V>),
        )
        .route(
            "/api/v1/chatbots/{chatbot_id}/documents",
            post(upload_document_handler::<L, V>).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/chatbots/{chatbot_id}/documents/{document_id}",
            delete(remove_document_handler::<L, V>),
        )
        .route(
            "/api/v1/chatbots/{chatbot_id}/websites",
            post(add_website_handler::<L, V>),
        )
        .route(
            "/api/v1/chatbots/{chatbot_id}/chat",
            post(chat_handler::<L, V>),
        )
        .route(
            "/api/v1/chatbots/{chatbot_id}/sessions",
            get(list_sessions_handler::<L, V>),
        )
        .route(
            "/api/v1/chatbots/{chatbot_id}/jobs",
            get(list_jobs_handler::<L, V>),
        )
        .route(
            "/api/v1/sessions/{session_id}",
            delete(delete_session_handler::<L, V>),
        )
        .route(
            "/api/v1/sessions/{session_id}/messages",
            get(session_messages_handler::<L, V>),
        )
        .route("/api/v1/jobs/{job_id}", get(job_status_handler::<L, V>))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
