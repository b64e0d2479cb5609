use super::{ChatbotId, DocumentId, JobId, JobStatus};
use chrono::{DateTime, Utc};

pub const DOCUMENT_INGESTION_JOB: &str = "document_ingestion";
pub const WEBSITE_CRAWL_JOB: &str = "website_crawl";

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub chatbot_id: ChatbotId,
    pub document_id: Option<DocumentId>,
    pub status: JobStatus,
    pub job_type: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(chatbot_id: ChatbotId, document_id: Option<DocumentId>, job_type: &str) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            chatbot_id,
            document_id,
            status: JobStatus::Queued,
            job_type: job_type.to_string(),
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}
