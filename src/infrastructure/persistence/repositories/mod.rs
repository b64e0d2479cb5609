mod in_memory_repository;
mod pg_chatbot_repository;
mod pg_job_repository;
mod pg_session_repository;

pub use in_memory_repository::{
    InMemoryChatbotRepository, InMemoryJobRepository, InMemorySessionRepository,
};
pub use pg_chatbot_repository::PgChatbotRepository;
pub use pg_job_repository::PgJobRepository;
pub use pg_session_repository::PgSessionRepository;
