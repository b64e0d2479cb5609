use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use chatforge::application::ports::{
    ChatbotRepository, CollectionConfig, JobRepository, SessionRepository, VectorStore,
};
use chatforge::application::services::{
    ChatbotManagementService, ChatbotService, IngestionService, IngestionWorker,
};
use chatforge::infrastructure::crawler::ScraperWebCrawler;
use chatforge::infrastructure::llm::{OpenAiClient, OpenAiEmbedder};
use chatforge::infrastructure::observability::init_tracing;
use chatforge::infrastructure::persistence::{
    PgChatbotRepository, PgJobRepository, PgSessionRepository, QdrantAdapter, create_pool,
    run_migrations,
};
use chatforge::infrastructure::text_processing::{CompositeFileLoader, RecursiveCharacterSplitter};
use chatforge::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(&settings.tracing_config()).context("failed to initialize tracing")?;

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    if settings.database.run_migrations {
        run_migrations(&pool).await?;
    }

    let chatbot_repository: Arc<dyn ChatbotRepository> =
        Arc::new(PgChatbotRepository::new(pool.clone()));
    let session_repository: Arc<dyn SessionRepository> =
        Arc::new(PgSessionRepository::new(pool.clone()));
    let job_repository: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool));

    let vector_store = Arc::new(
        QdrantAdapter::new(&settings.qdrant.url, settings.qdrant.collection_name.clone()).await?,
    );
    ensure_collection(vector_store.as_ref(), settings.embeddings.dimension).await?;

    let embedder = Arc::new(OpenAiEmbedder::new(
        &settings.embeddings.base_url,
        settings.embeddings.api_key.clone(),
        settings.embeddings.model.clone(),
        settings.embeddings.timeout(),
    )?);
    let llm_client = Arc::new(OpenAiClient::new(
        &settings.llm.base_url,
        settings.llm.api_key.clone(),
        settings.llm.timeout(),
    )?);

    let text_splitter = Arc::new(RecursiveCharacterSplitter::new(
        settings.chunking.chunk_size,
        settings.chunking.chunk_overlap,
    )?);
    let crawler = Arc::new(ScraperWebCrawler::new(
        &settings.crawler.user_agent,
        settings.crawler.timeout(),
    )?
    .with_max_page_bytes(settings.crawler.max_page_bytes));

    let ingestion_service = Arc::new(IngestionService::new(
        Arc::new(CompositeFileLoader::with_default_adapters()),
        embedder.clone(),
        Arc::clone(&vector_store),
        text_splitter,
    ));

    let (ingestion_sender, ingestion_receiver) =
        mpsc::channel(settings.ingestion.queue_capacity.max(1));
    let worker = IngestionWorker::new(
        ingestion_receiver,
        ingestion_service,
        crawler,
        Arc::clone(&job_repository),
        Arc::clone(&chatbot_repository),
    );
    tokio::spawn(worker.run());

    let chatbot_service = Arc::new(ChatbotService::new(
        embedder,
        llm_client,
        Arc::clone(&vector_store),
        Arc::clone(&chatbot_repository),
        Arc::clone(&session_repository),
        settings.model_defaults(),
        settings.rag_options(),
    ));
    let management_service = Arc::new(ChatbotManagementService::new(
        chatbot_repository,
        Arc::clone(&session_repository),
        vector_store,
    ));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;

    let state = AppState {
        chatbot_service,
        management_service,
        session_repository,
        job_repository,
        ingestion_sender,
        settings: Arc::new(settings),
    };

    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// A collection created for a different embedding model cannot be searched
/// with this one.
async fn ensure_collection<V: VectorStore>(vector_store: &V, dimension: u64) -> anyhow::Result<()> {
    match vector_store.get_collection_vector_size().await? {
        Some(existing) if existing != dimension => anyhow::bail!(
            "vector collection has dimension {existing}, embeddings are configured for {dimension}"
        ),
        Some(_) => Ok(()),
        None => {
            vector_store
                .create_collection(&CollectionConfig::new(dimension))
                .await?;
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
