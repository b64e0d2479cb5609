use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::application::ports::{
    ChatbotRepository, CrawlerError, FileLoader, JobRepository, RepositoryError, TextSplitter,
    VectorStore, WebCrawler,
};
use crate::domain::{
    ChatbotId, ContentType, Document, DocumentId, JobId, JobStatus, TrainingSource,
    TrainingStatus,
};

use super::ingestion_service::{IngestionError, IngestionService};

pub enum IngestionPayload {
    File { document: Document, data: Vec<u8> },
    Website { url: String, max_pages: usize },
}

pub struct IngestionMessage {
    pub job_id: JobId,
    pub chatbot_id: ChatbotId,
    /// The training source entry recorded as pending when the job was queued.
    pub source: TrainingSource,
    pub payload: IngestionPayload,
}

pub struct IngestionWorker<F, V, T: ?Sized>
where
    F: FileLoader,
    V: VectorStore,
    T: TextSplitter,
{
    receiver: mpsc::Receiver<IngestionMessage>,
    ingestion_service: Arc<IngestionService<F, V, T>>,
    crawler: Arc<dyn WebCrawler>,
    job_repository: Arc<dyn JobRepository>,
    chatbot_repository: Arc<dyn ChatbotRepository>,
}

impl<F, V, T: ?Sized> IngestionWorker<F, V, T>
where
    F: FileLoader + 'static,
    V: VectorStore + 'static,
    T: TextSplitter + 'static,
{
    pub fn new(
        receiver: mpsc::Receiver<IngestionMessage>,
        ingestion_service: Arc<IngestionService<F, V, T>>,
        crawler: Arc<dyn WebCrawler>,
        job_repository: Arc<dyn JobRepository>,
        chatbot_repository: Arc<dyn ChatbotRepository>,
    ) -> Self {
        Self {
            receiver,
            ingestion_service,
            crawler,
            job_repository,
            chatbot_repository,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Ingestion worker started");
        while let Some(msg) = self.receiver.recv().await {
            let span = tracing::info_span!(
                "ingestion_job",
                job_id = %msg.job_id,
                chatbot_id = %msg.chatbot_id,
                document_id = %msg.source.document_id,
                source = %msg.source.name,
            );

            if let Err(e) = self.process_job(msg).instrument(span).await {
                tracing::error!(error = %e, "Ingestion job failed");
            }
        }
        tracing::info!("Ingestion worker stopped: channel closed");
    }

    /// Runs one job to a terminal state. Exposed for tests that drive the
    /// worker without a channel.
    ///
    /// The training source may be removed while the job is queued or
    /// running. Its status is only ever updated in place, and vectors stored
    /// for a source that disappeared during ingestion are discarded.
    pub async fn process_job(&self, msg: IngestionMessage) -> Result<usize, IngestionWorkerError> {
        let IngestionMessage {
            job_id,
            chatbot_id,
            mut source,
            payload,
        } = msg;

        self.update_status(job_id, JobStatus::Processing, None)
            .await?;
        source.status = TrainingStatus::Processing;
        if !self.record_source(chatbot_id, &source).await {
            return self.abandon(job_id, &source, false).await;
        }

        let result = match payload {
            IngestionPayload::File { document, data } => {
                self.update_status(job_id, JobStatus::Embedding, None)
                    .await?;
                self.ingestion_service
                    .ingest(&document, &data)
                    .await
                    .map_err(IngestionWorkerError::Ingestion)
            }
            IngestionPayload::Website { url, max_pages } => {
                self.ingest_website(job_id, chatbot_id, &source, &url, max_pages)
                    .await
            }
        };

        match &result {
            Ok(chunks) => {
                source.status = TrainingStatus::Completed;
                source.chunk_count = *chunks as u64;
                source.error_message = None;
                if !self.record_source(chatbot_id, &source).await {
                    return self.abandon(job_id, &source, true).await;
                }
                self.update_status(job_id, JobStatus::Completed, None)
                    .await?;
                tracing::info!(chunks, "Ingestion completed");
            }
            Err(IngestionWorkerError::SourceRemoved) => {
                return self.abandon(job_id, &source, true).await;
            }
            Err(e) => {
                let error_msg = e.to_string();
                source.status = TrainingStatus::Failed;
                source.error_message = Some(error_msg.clone());
                if !self.record_source(chatbot_id, &source).await {
                    return self.abandon(job_id, &source, true).await;
                }
                self.update_status(job_id, JobStatus::Failed, Some(&error_msg))
                    .await?;
            }
        }

        result
    }

    /// Fails the job of a removed source, dropping any vectors it stored.
    async fn abandon(
        &self,
        job_id: JobId,
        source: &TrainingSource,
        discard_vectors: bool,
    ) -> Result<usize, IngestionWorkerError> {
        tracing::warn!(document_id = %source.document_id, "Training source removed during ingestion");

        if discard_vectors {
            if let Err(e) = self.ingestion_service.discard(source.document_id).await {
                tracing::error!(error = %e, "Failed to discard vectors of removed source");
            }
        }

        let reason = IngestionWorkerError::SourceRemoved.to_string();
        self.update_status(job_id, JobStatus::Failed, Some(&reason))
            .await?;
        Err(IngestionWorkerError::SourceRemoved)
    }

    /// Every crawled page is stored under the training source's document id,
    /// so removing the source removes the whole site.
    async fn ingest_website(
        &self,
        job_id: JobId,
        chatbot_id: ChatbotId,
        source: &TrainingSource,
        url: &str,
        max_pages: usize,
    ) -> Result<usize, IngestionWorkerError> {
        self.update_status(job_id, JobStatus::Crawling, None)
            .await?;

        let pages = self
            .crawler
            .crawl(url, max_pages)
            .await
            .map_err(IngestionWorkerError::Crawling)?;
        tracing::debug!(pages = pages.len(), "Crawl finished");

        if !self.source_exists(chatbot_id, source.document_id).await {
            return Err(IngestionWorkerError::SourceRemoved);
        }

        self.update_status(job_id, JobStatus::Embedding, None)
            .await?;

        let mut total_chunks = 0;
        let mut last_error = None;
        let mut ingested_pages = 0;

        for page in pages {
            let document = Document::new(
                chatbot_id,
                page.url.clone(),
                ContentType::Html,
                page.html.len() as u64,
            )
            .with_id(source.document_id);

            match self
                .ingestion_service
                .ingest(&document, page.html.as_bytes())
                .await
            {
                Ok(chunks) => {
                    total_chunks += chunks;
                    ingested_pages += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e, page = %page.url, "Skipping page");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if ingested_pages == 0 => Err(IngestionWorkerError::Ingestion(e)),
            _ => Ok(total_chunks),
        }
    }

    /// Returns false once the source or its chatbot is gone.
    async fn record_source(&self, chatbot_id: ChatbotId, source: &TrainingSource) -> bool {
        match self
            .chatbot_repository
            .update_training_source(chatbot_id, source)
            .await
        {
            Ok(()) => true,
            Err(RepositoryError::NotFound(_)) => false,
            Err(e) => {
                tracing::warn!(error = %e, status = %source.status, "Failed to update training source");
                true
            }
        }
    }

    async fn source_exists(&self, chatbot_id: ChatbotId, document_id: DocumentId) -> bool {
        match self.chatbot_repository.get_by_id(chatbot_id).await {
            Ok(chatbot) => chatbot.is_some_and(|c| c.training_source(document_id).is_some()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to check training source");
                true
            }
        }
    }

    async fn update_status(
        &self,
        job_id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), IngestionWorkerError> {
        tracing::debug!(status = %status, "Job status transition");
        self.job_repository
            .update_status(job_id, status, error_message)
            .await
            .map_err(IngestionWorkerError::Repository)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionWorkerError {
    #[error("{0}")]
    Ingestion(IngestionError),
    #[error("crawling: {0}")]
    Crawling(CrawlerError),
    #[error("repository: {0}")]
    Repository(RepositoryError),
    #[error("training source removed")]
    SourceRemoved,
}
