mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ChunkingSettings, CrawlerSettings, DatabaseSettings, ENVIRONMENT_VAR, EmbeddingsSettings,
    IngestionSettings, LlmSettings, LoggingSettings, QdrantSettings, RagSettings, ServerSettings,
    Settings, SettingsError,
};
