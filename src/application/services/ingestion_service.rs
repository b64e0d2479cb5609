use std::sync::Arc;

use crate::application::ports::{
    Embedder, EmbedderError, FileLoader, FileLoaderError, TextSplitter, TextSplitterError,
    VectorStore, VectorStoreError,
};
use crate::domain::{Document, DocumentId};

/// Keeps each embeddings request well under provider input-array limits.
const EMBED_BATCH_SIZE: usize = 96;

pub struct IngestionService<F, V, T: ?Sized>
where
    F: FileLoader,
    V: VectorStore,
    T: TextSplitter,
{
    file_loader: Arc<F>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<V>,
    text_splitter: Arc<T>,
}

impl<F, V, T: ?Sized> IngestionService<F, V, T>
where
    F: FileLoader,
    V: VectorStore,
    T: TextSplitter,
{
    pub fn new(
        file_loader: Arc<F>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<V>,
        text_splitter: Arc<T>,
    ) -> Self {
        Self {
            file_loader,
            embedder,
            vector_store,
            text_splitter,
        }
    }

    /// Load, chunk, embed and upsert one document. Returns the number of
    /// chunks stored; a document without text yields zero chunks.
    #[tracing::instrument(
        skip(self, document, data),
        fields(document_id = %document.id, chatbot_id = %document.chatbot_id, bytes = data.len())
    )]
    pub async fn ingest(&self, document: &Document, data: &[u8]) -> Result<usize, IngestionError> {
        let text = self.file_loader.extract_text(data, document).await?;

        let chunks = self.text_splitter.split(&text, document).await?;
        if chunks.is_empty() {
            tracing::info!("Document produced no chunks");
            return Ok(0);
        }

        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            if embeddings.len() != batch.len() {
                return Err(IngestionError::Embedding(EmbedderError::InvalidResponse(
                    format!(
                        "expected {} embeddings, received {}",
                        batch.len(),
                        embeddings.len()
                    ),
                )));
            }

            self.vector_store.upsert(batch, &embeddings).await?;
        }

        tracing::info!(chunks = chunks.len(), "Document ingested");
        Ok(chunks.len())
    }

    /// Drops every vector stored under the document id.
    pub async fn discard(&self, document_id: DocumentId) -> Result<(), IngestionError> {
        self.vector_store.delete_by_document(document_id).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("storage: {0}")]
    Storage(#[from] VectorStoreError),
}
