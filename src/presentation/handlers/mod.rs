mod chat;
mod chatbots;
mod error;
mod health;
mod job_status;
mod sessions;
mod training;

pub use chat::chat_handler;
pub use chatbots::{
    create_chatbot_handler, delete_chatbot_handler, deploy_chatbot_handler, get_chatbot_handler,
    list_chatbots_handler, pause_chatbot_handler, update_chatbot_handler,
};
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use job_status::{job_status_handler, list_jobs_handler};
pub use sessions::{delete_session_handler, list_sessions_handler, session_messages_handler};
pub use training::{add_website_handler, remove_document_handler, upload_document_handler};
