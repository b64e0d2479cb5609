use std::sync::Arc;

use chatforge::application::ports::{EmbedderError, FileLoaderError, VectorStore};
use chatforge::application::services::{IngestionError, IngestionService};
use chatforge::domain::{ChatbotId, ContentType, Document, Embedding};
use chatforge::infrastructure::llm::MockEmbedder;
use chatforge::infrastructure::persistence::InMemoryVectorStore;
use chatforge::infrastructure::text_processing::{MockFileLoader, RecursiveCharacterSplitter};

type TestIngestionService =
    IngestionService<MockFileLoader, InMemoryVectorStore, RecursiveCharacterSplitter>;

fn service(
    embedder: Arc<MockEmbedder>,
    vector_store: Arc<InMemoryVectorStore>,
    chunk_size: usize,
) -> TestIngestionService {
    IngestionService::new(
        Arc::new(MockFileLoader),
        embedder,
        vector_store,
        Arc::new(RecursiveCharacterSplitter::new(chunk_size, 0).expect("valid splitter")),
    )
}

fn text_document(chatbot_id: ChatbotId, name: &str, text: &str) -> Document {
    Document::new(
        chatbot_id,
        name.to_string(),
        ContentType::Text,
        text.len() as u64,
    )
}

#[tokio::test]
async fn given_text_document_when_ingesting_then_every_chunk_is_stored_for_the_chatbot() {
    let embedder = Arc::new(MockEmbedder::new());
    let vector_store = Arc::new(InMemoryVectorStore::new());
    let service = service(embedder, Arc::clone(&vector_store), 60);
    let chatbot_id = ChatbotId::new();
    let text = "Shipping is free on orders over fifty dollars.\n\n\
Returns are accepted within thirty days of delivery.\n\n\
Gift cards never expire and can be used online.";
    let document = text_document(chatbot_id, "policies.txt", text);

    let chunks = service
        .ingest(&document, text.as_bytes())
        .await
        .expect("ingested");

    assert_eq!(chunks, 3);
    assert_eq!(vector_store.len().await, 3);

    let hits = vector_store
        .search(chatbot_id, &Embedding::new(vec![0.1; MockEmbedder::dimensions()]), 10)
        .await
        .expect("search");
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.chunk.source == "policies.txt"));
    assert!(hits.iter().all(|h| h.chunk.document_id == document.id));
}

#[tokio::test]
async fn given_blank_document_when_ingesting_then_fails_with_no_text_found() {
    let vector_store = Arc::new(InMemoryVectorStore::new());
    let service = service(Arc::new(MockEmbedder::new()), Arc::clone(&vector_store), 60);
    let document = text_document(ChatbotId::new(), "empty.txt", "  \n ");

    let result = service.ingest(&document, b"  \n ").await;

    assert!(matches!(
        result,
        Err(IngestionError::FileLoading(FileLoaderError::NoTextFound(_)))
    ));
    assert!(vector_store.is_empty().await);
}

#[tokio::test]
async fn given_failing_embedder_when_ingesting_then_nothing_is_stored() {
    let vector_store = Arc::new(InMemoryVectorStore::new());
    let service = service(
        Arc::new(MockEmbedder::failing()),
        Arc::clone(&vector_store),
        60,
    );
    let text = "A short paragraph that still needs an embedding.";
    let document = text_document(ChatbotId::new(), "notes.txt", text);

    let result = service.ingest(&document, text.as_bytes()).await;

    assert!(matches!(
        result,
        Err(IngestionError::Embedding(EmbedderError::ApiRequestFailed(_)))
    ));
    assert!(vector_store.is_empty().await);
}

#[tokio::test]
async fn given_many_chunks_when_ingesting_then_embeddings_are_requested_in_batches() {
    let embedder = Arc::new(MockEmbedder::new());
    let vector_store = Arc::new(InMemoryVectorStore::new());
    let service = service(Arc::clone(&embedder), Arc::clone(&vector_store), 20);
    let text = (0..600)
        .map(|i| format!("word{i}"))
        .collect::<Vec<_>>()
        .join(" ");
    let document = text_document(ChatbotId::new(), "long.txt", &text);

    let chunks = service
        .ingest(&document, text.as_bytes())
        .await
        .expect("ingested");

    assert!(chunks > 96);
    assert_eq!(embedder.calls(), chunks.div_ceil(96));
    assert_eq!(vector_store.len().await, chunks);
}
