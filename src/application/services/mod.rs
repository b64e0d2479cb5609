mod chatbot_management_service;
mod chatbot_service;
mod greeting;
mod ingestion_service;
mod ingestion_worker;
mod prompt_builder;
mod response_formatter;
mod token_counter;

pub use chatbot_management_service::{ChatbotManagementService, ChatbotUpdate, ManagementError};
pub use chatbot_service::{
    ChatRequest, ChatResponse, ChatbotService, ChatbotServiceError, RagOptions, SourceChunk,
};
pub use greeting::is_greeting;
pub use ingestion_service::{IngestionError, IngestionService};
pub use ingestion_worker::{
    IngestionMessage, IngestionPayload, IngestionWorker, IngestionWorkerError,
};
pub use prompt_builder::{AssembledPrompt, PromptBuilder};
pub use response_formatter::format_response;
pub use token_counter::count_tokens;
