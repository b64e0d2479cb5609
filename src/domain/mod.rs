mod chatbot;
mod chatbot_analytics;
mod chatbot_settings;
mod chunk;
mod deployment_status;
mod document;
mod embedding;
mod ids;
mod job;
mod job_status;
mod message;
mod message_role;
mod session;
mod training_source;

pub use chatbot::Chatbot;
pub use chatbot_analytics::{AnalyticsDelta, ChatbotAnalytics};
pub use chatbot_settings::{
    ChatbotSettings, MAX_COMPLETION_TOKENS, MAX_TEMPERATURE, MIN_TEMPERATURE, ModelParameters,
};
pub use chunk::Chunk;
pub use deployment_status::DeploymentStatus;
pub use document::{ContentType, Document};
pub use embedding::Embedding;
pub use ids::{ChatbotId, ChunkId, DocumentId, JobId, MessageId, SessionId};
pub use job::{DOCUMENT_INGESTION_JOB, Job, WEBSITE_CRAWL_JOB};
pub use job_status::JobStatus;
pub use message::Message;
pub use message_role::MessageRole;
pub use session::ChatSession;
pub use training_source::{TrainingSource, TrainingSourceKind, TrainingStatus};
