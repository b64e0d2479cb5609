mod pg_pool;
mod repositories;
mod vector_store;

pub use pg_pool::{create_pool, run_migrations};

pub use repositories::{
    InMemoryChatbotRepository, InMemoryJobRepository, InMemorySessionRepository,
    PgChatbotRepository, PgJobRepository, PgSessionRepository,
};

pub use vector_store::{FailingVectorStore, InMemoryVectorStore, MockVectorStore, QdrantAdapter};
