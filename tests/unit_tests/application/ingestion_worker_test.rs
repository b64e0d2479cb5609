use std::sync::Arc;

use tokio::sync::mpsc;

use chatforge::application::ports::{
    ChatbotRepository, CrawledPage, FileLoader, FileLoaderError, JobRepository, VectorStore,
};
use chatforge::application::services::{
    ChatbotManagementService, IngestionMessage, IngestionPayload, IngestionService,
    IngestionWorker, IngestionWorkerError,
};
use chatforge::domain::{
    Chatbot, ChatbotSettings, ContentType, DOCUMENT_INGESTION_JOB, Document, Embedding, Job,
    JobStatus, TrainingSource, TrainingSourceKind, TrainingStatus, WEBSITE_CRAWL_JOB,
};
use chatforge::infrastructure::crawler::MockWebCrawler;
use chatforge::infrastructure::llm::MockEmbedder;
use chatforge::infrastructure::persistence::{
    InMemoryChatbotRepository, InMemoryJobRepository, InMemorySessionRepository,
    InMemoryVectorStore,
};
use chatforge::infrastructure::text_processing::{MockFileLoader, RecursiveCharacterSplitter};

type TestWorker = IngestionWorker<MockFileLoader, InMemoryVectorStore, RecursiveCharacterSplitter>;

const FAQ: &str = "Orders ship within two business days.\n\nWe do not ship to PO boxes.";

struct Fixture {
    worker: TestWorker,
    sender: mpsc::Sender<IngestionMessage>,
    chatbots: Arc<InMemoryChatbotRepository>,
    jobs: Arc<InMemoryJobRepository>,
    vector_store: Arc<InMemoryVectorStore>,
    chatbot: Chatbot,
}

async fn fixture(pages: Vec<CrawledPage>) -> Fixture {
    let chatbots = Arc::new(InMemoryChatbotRepository::new());
    let jobs = Arc::new(InMemoryJobRepository::new());
    let vector_store = Arc::new(InMemoryVectorStore::new());

    let chatbot = Chatbot::new(
        "owner-1".to_string(),
        "Shop Bot".to_string(),
        ChatbotSettings::default(),
    );
    chatbots.create(&chatbot).await.expect("chatbot stored");

    let ingestion_service = Arc::new(IngestionService::new(
        Arc::new(MockFileLoader),
        Arc::new(MockEmbedder::new()),
        Arc::clone(&vector_store),
        Arc::new(RecursiveCharacterSplitter::new(50, 0).expect("valid splitter")),
    ));

    let (sender, receiver) = mpsc::channel(4);
    let worker = IngestionWorker::new(
        receiver,
        ingestion_service,
        Arc::new(MockWebCrawler::new(pages)),
        jobs.clone(),
        chatbots.clone(),
    );

    Fixture {
        worker,
        sender,
        chatbots,
        jobs,
        vector_store,
        chatbot,
    }
}

impl Fixture {
    async fn file_message(&self, filename: &str, content: &str) -> IngestionMessage {
        let document = Document::new(
            self.chatbot.id,
            filename.to_string(),
            ContentType::Text,
            content.len() as u64,
        );
        let source = TrainingSource::pending(
            document.id,
            TrainingSourceKind::Document,
            filename.to_string(),
        );
        let job = Job::new(self.chatbot.id, Some(document.id), DOCUMENT_INGESTION_JOB);
        self.jobs.create(&job).await.expect("job stored");
        self.chatbots
            .record_pending_source(self.chatbot.id, &source)
            .await
            .expect("source stored");

        IngestionMessage {
            job_id: job.id,
            chatbot_id: self.chatbot.id,
            source,
            payload: IngestionPayload::File {
                document,
                data: content.as_bytes().to_vec(),
            },
        }
    }

    async fn website_message(&self, url: &str) -> IngestionMessage {
        let source = TrainingSource::pending(
            chatforge::domain::DocumentId::new(),
            TrainingSourceKind::Website,
            url.to_string(),
        );
        let job = Job::new(self.chatbot.id, Some(source.document_id), WEBSITE_CRAWL_JOB);
        self.jobs.create(&job).await.expect("job stored");
        self.chatbots
            .record_pending_source(self.chatbot.id, &source)
            .await
            .expect("source stored");

        IngestionMessage {
            job_id: job.id,
            chatbot_id: self.chatbot.id,
            source,
            payload: IngestionPayload::Website {
                url: url.to_string(),
                max_pages: 10,
            },
        }
    }

    async fn job(&self, msg_job_id: chatforge::domain::JobId) -> Job {
        self.jobs
            .get_by_id(msg_job_id)
            .await
            .expect("lookup")
            .expect("job exists")
    }

    async fn source(&self, document_id: chatforge::domain::DocumentId) -> TrainingSource {
        self.chatbots
            .get_by_id(self.chatbot.id)
            .await
            .expect("lookup")
            .expect("chatbot exists")
            .training_source(document_id)
            .cloned()
            .expect("source recorded")
    }
}

impl Fixture {
    fn management(&self) -> ChatbotManagementService<InMemoryVectorStore> {
        ChatbotManagementService::new(
            self.chatbots.clone(),
            Arc::new(InMemorySessionRepository::new()),
            Arc::clone(&self.vector_store),
        )
    }

    async fn assert_abandoned(&self, job_id: chatforge::domain::JobId) {
        let job = self.job(job_id).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("training source removed"));
        assert!(self.vector_store.is_empty().await);
    }
}

/// Removes the training source while its text is being extracted, the way a
/// `DELETE /documents/{id}` racing the worker would.
struct RemovingFileLoader {
    chatbots: Arc<InMemoryChatbotRepository>,
}

#[async_trait::async_trait]
impl FileLoader for RemovingFileLoader {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        self.chatbots
            .remove_training_source(document.chatbot_id, document.id)
            .await
            .map_err(|e| FileLoaderError::ExtractionFailed(e.to_string()))?;
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}

fn page(url: &str, body: &str) -> CrawledPage {
    CrawledPage {
        url: url.to_string(),
        html: format!("<html><body><p>{body}</p></body></html>"),
    }
}

#[tokio::test]
async fn given_file_job_when_processed_then_job_and_source_complete_with_chunk_count() {
    let f = fixture(Vec::new()).await;
    let msg = f.file_message("faq.txt", FAQ).await;
    let (job_id, document_id) = (msg.job_id, msg.source.document_id);

    let chunks = f.worker.process_job(msg).await.expect("processed");

    assert_eq!(chunks, 2);
    assert_eq!(f.job(job_id).await.status, JobStatus::Completed);
    let source = f.source(document_id).await;
    assert_eq!(source.status, TrainingStatus::Completed);
    assert_eq!(source.chunk_count, 2);
    assert!(source.error_message.is_none());
}

#[tokio::test]
async fn given_empty_file_when_processed_then_job_and_source_fail_with_reason() {
    let f = fixture(Vec::new()).await;
    let msg = f.file_message("blank.txt", "   ").await;
    let (job_id, document_id) = (msg.job_id, msg.source.document_id);

    let result = f.worker.process_job(msg).await;

    assert!(matches!(result, Err(IngestionWorkerError::Ingestion(_))));
    let job = f.job(job_id).await;
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error_message.expect("reason recorded").contains("blank.txt"));
    let source = f.source(document_id).await;
    assert_eq!(source.status, TrainingStatus::Failed);
    assert!(source.error_message.is_some());
    assert!(f.vector_store.is_empty().await);
}

#[tokio::test]
async fn given_website_job_when_processed_then_pages_share_the_source_document_id() {
    let f = fixture(vec![
        page("https://shop.example/", "Welcome to the shop."),
        page("https://shop.example/about", "We are a family business."),
    ])
    .await;
    let msg = f.website_message("https://shop.example/").await;
    let (job_id, document_id) = (msg.job_id, msg.source.document_id);

    let chunks = f.worker.process_job(msg).await.expect("processed");

    assert!(chunks >= 2);
    assert_eq!(f.job(job_id).await.status, JobStatus::Completed);
    let source = f.source(document_id).await;
    assert_eq!(source.kind, TrainingSourceKind::Website);
    assert_eq!(source.status, TrainingStatus::Completed);

    let hits = f
        .vector_store
        .search(
            f.chatbot.id,
            &Embedding::new(vec![0.1; MockEmbedder::dimensions()]),
            50,
        )
        .await
        .expect("search");
    assert_eq!(hits.len(), chunks);
    assert!(hits.iter().all(|h| h.chunk.document_id == document_id));
    assert!(hits.iter().any(|h| h.chunk.source == "https://shop.example/about"));
}

#[tokio::test]
async fn given_unreachable_site_when_processed_then_job_fails_with_crawl_error() {
    let f = fixture(Vec::new()).await;
    let msg = f.website_message("https://down.example/").await;
    let job_id = msg.job_id;

    let result = f.worker.process_job(msg).await;

    assert!(matches!(result, Err(IngestionWorkerError::Crawling(_))));
    assert_eq!(f.job(job_id).await.status, JobStatus::Failed);
}

#[tokio::test]
async fn given_queued_messages_when_worker_runs_then_all_are_processed_until_channel_closes() {
    let f = fixture(Vec::new()).await;
    let first = f.file_message("a.txt", FAQ).await;
    let second = f.file_message("b.txt", "Gift cards never expire.").await;
    let (first_job, second_job) = (first.job_id, second.job_id);

    f.sender.send(first).await.expect("queued");
    f.sender.send(second).await.expect("queued");

    let Fixture {
        worker,
        sender,
        jobs,
        ..
    } = f;
    drop(sender);
    worker.run().await;

    for job_id in [first_job, second_job] {
        let job = jobs.get_by_id(job_id).await.expect("lookup").expect("exists");
        assert_eq!(job.status, JobStatus::Completed);
    }
}

#[tokio::test]
async fn given_source_removed_while_queued_when_processed_then_it_stays_removed() {
    let f = fixture(Vec::new()).await;
    let msg = f.file_message("faq.txt", FAQ).await;
    let (job_id, document_id) = (msg.job_id, msg.source.document_id);
    f.management()
        .remove_training_source(f.chatbot.id, document_id)
        .await
        .expect("removed");

    let result = f.worker.process_job(msg).await;

    assert!(matches!(result, Err(IngestionWorkerError::SourceRemoved)));
    let chatbot = f
        .chatbots
        .get_by_id(f.chatbot.id)
        .await
        .expect("lookup")
        .expect("chatbot exists");
    assert!(chatbot.training_source(document_id).is_none());
    f.assert_abandoned(job_id).await;
}

#[tokio::test]
async fn given_chatbot_deleted_while_queued_when_processed_then_no_vectors_are_stored() {
    let f = fixture(Vec::new()).await;
    let msg = f.file_message("faq.txt", FAQ).await;
    let job_id = msg.job_id;
    f.management()
        .delete_chatbot(f.chatbot.id)
        .await
        .expect("deleted");

    let result = f.worker.process_job(msg).await;

    assert!(matches!(result, Err(IngestionWorkerError::SourceRemoved)));
    assert!(f.chatbots.get_by_id(f.chatbot.id).await.expect("lookup").is_none());
    f.assert_abandoned(job_id).await;
}

#[tokio::test]
async fn given_source_removed_during_ingestion_when_processed_then_stored_vectors_are_discarded() {
    let f = fixture(Vec::new()).await;
    let msg = f.file_message("faq.txt", FAQ).await;
    let (job_id, document_id) = (msg.job_id, msg.source.document_id);
    let ingestion_service = Arc::new(IngestionService::new(
        Arc::new(RemovingFileLoader {
            chatbots: f.chatbots.clone(),
        }),
        Arc::new(MockEmbedder::new()),
        Arc::clone(&f.vector_store),
        Arc::new(RecursiveCharacterSplitter::new(50, 0).expect("valid splitter")),
    ));
    let (_sender, receiver) = mpsc::channel(1);
    let worker = IngestionWorker::new(
        receiver,
        ingestion_service,
        Arc::new(MockWebCrawler::new(Vec::new())),
        f.jobs.clone(),
        f.chatbots.clone(),
    );

    let result = worker.process_job(msg).await;

    assert!(matches!(result, Err(IngestionWorkerError::SourceRemoved)));
    let chatbot = f
        .chatbots
        .get_by_id(f.chatbot.id)
        .await
        .expect("lookup")
        .expect("chatbot exists");
    assert!(chatbot.training_source(document_id).is_none());
    f.assert_abandoned(job_id).await;
}
