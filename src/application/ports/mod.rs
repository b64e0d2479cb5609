mod chatbot_repository;
mod collection_config;
mod embedder;
mod file_loader;
mod job_repository;
mod llm_client;
mod repository_error;
mod search_result;
mod session_repository;
mod text_splitter;
mod vector_store;
mod vector_store_error;
mod web_crawler;

pub use chatbot_repository::ChatbotRepository;
pub use collection_config::{
    CHATBOT_ID_FIELD, CollectionConfig, DOCUMENT_ID_FIELD, DistanceMetric, PayloadFieldType,
    PayloadIndex,
};
pub use embedder::{Embedder, EmbedderError};
pub use file_loader::{FileLoader, FileLoaderError};
pub use job_repository::JobRepository;
pub use llm_client::{CompletionRequest, LlmClient, LlmClientError, PromptMessage};
pub use repository_error::RepositoryError;
pub use search_result::SearchResult;
pub use session_repository::SessionRepository;
pub use text_splitter::{TextSplitter, TextSplitterError};
pub use vector_store::VectorStore;
pub use vector_store_error::VectorStoreError;
pub use web_crawler::{CrawledPage, CrawlerError, WebCrawler};
