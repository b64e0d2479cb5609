use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, DeletePointsBuilder,
    Distance, FieldType, Filter, PointId, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder, VectorsConfig,
};
use qdrant_client::{Payload, Qdrant};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{
    CHATBOT_ID_FIELD, CollectionConfig, DOCUMENT_ID_FIELD, DistanceMetric, PayloadFieldType,
    SearchResult, VectorStore, VectorStoreError,
};
use crate::domain::{ChatbotId, Chunk, ChunkId, DocumentId, Embedding};

const TEXT_FIELD: &str = "text";
const SOURCE_FIELD: &str = "source";
const OFFSET_FIELD: &str = "offset";

/// One shared collection for every tenant; isolation comes from the
/// `chatbot_id` payload filter on every search.
pub struct QdrantAdapter {
    client: Arc<Qdrant>,
    collection_name: String,
}

impl QdrantAdapter {
    pub async fn new(url: &str, collection_name: String) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            collection_name,
        })
    }

    pub fn with_client(client: Arc<Qdrant>, collection_name: String) -> Self {
        Self {
            client,
            collection_name,
        }
    }

    fn map_distance_metric(metric: &DistanceMetric) -> Distance {
        match metric {
            DistanceMetric::Cosine => Distance::Cosine,
            DistanceMetric::DotProduct => Distance::Dot,
        }
    }

    fn map_field_type(field_type: &PayloadFieldType) -> FieldType {
        match field_type {
            PayloadFieldType::Keyword => FieldType::Keyword,
            PayloadFieldType::Integer => FieldType::Integer,
        }
    }

    fn keyword_filter(field: &str, value: String) -> Filter {
        Filter::must([Condition::matches(field, value)])
    }

    async fn delete_matching(&self, filter: Filter) -> Result<(), VectorStoreError> {
        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection_name)
                    .points(filter)
                    .wait(true),
            )
            .await
            .map_err(|e| VectorStoreError::DeleteFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for QdrantAdapter {
    #[instrument(skip(self, config), fields(collection = %self.collection_name))]
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError> {
        if self.collection_exists().await? {
            info!(collection = %self.collection_name, "collection already exists");
            return Ok(false);
        }

        let vectors_config = VectorsConfig::from(VectorParamsBuilder::new(
            config.vector_dimensions,
            Self::map_distance_metric(&config.distance_metric),
        ));

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(vectors_config),
            )
            .await
            .map_err(|e| VectorStoreError::CollectionCreationFailed(e.to_string()))?;

        info!(collection = %self.collection_name, "collection_created");

        for index in &config.payload_indexes {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    &self.collection_name,
                    &index.field_name,
                    Self::map_field_type(&index.field_type),
                ))
                .await
                .map_err(|e| VectorStoreError::PayloadIndexFailed(e.to_string()))?;

            info!(field = %index.field_name, "payload_index_applied");
        }

        Ok(true)
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        self.client
            .collection_exists(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn get_collection_vector_size(&self) -> Result<Option<u64>, VectorStoreError> {
        if !self.collection_exists().await? {
            return Ok(None);
        }

        let collection_info = self
            .client
            .collection_info(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        let vector_size = collection_info
            .result
            .and_then(|result| result.config)
            .and_then(|config| config.params)
            .and_then(|params| params.vectors_config)
            .and_then(|vectors_config| match vectors_config.config {
                Some(qdrant_client::qdrant::vectors_config::Config::Params(params)) => {
                    Some(params.size)
                }
                _ => None,
            });

        Ok(vector_size)
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn delete_collection(&self) -> Result<(), VectorStoreError> {
        if !self.collection_exists().await? {
            return Ok(());
        }

        self.client
            .delete_collection(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::CollectionDeletionFailed(e.to_string()))?;

        info!(collection = %self.collection_name, "collection_deleted");
        Ok(())
    }

    #[instrument(skip(self, chunks, embeddings), fields(collection = %self.collection_name, count = chunks.len()))]
    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::UpsertFailed(
                "chunks and embeddings count mismatch".to_string(),
            ));
        }
        if chunks.is_empty() {
            return Ok(());
        }

        let points = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                let payload = Payload::try_from(serde_json::json!({
                    CHATBOT_ID_FIELD: chunk.chatbot_id.to_string(),
                    DOCUMENT_ID_FIELD: chunk.document_id.to_string(),
                    TEXT_FIELD: chunk.text,
                    SOURCE_FIELD: chunk.source,
                    OFFSET_FIELD: chunk.offset as u64,
                }))
                .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))?;

                Ok(PointStruct::new(
                    PointId::from(chunk.id.to_string()),
                    embedding.values.clone(),
                    payload,
                ))
            })
            .collect::<Result<Vec<_>, VectorStoreError>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points).wait(true))
            .await
            .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))?;

        info!(count = chunks.len(), "points_upserted");
        Ok(())
    }

    #[instrument(skip(self, embedding), fields(collection = %self.collection_name, chatbot_id = %chatbot_id, top_k = top_k))]
    async fn search(
        &self,
        chatbot_id: ChatbotId,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection_name,
                    embedding.values.clone(),
                    top_k as u64,
                )
                .filter(Self::keyword_filter(
                    CHATBOT_ID_FIELD,
                    chatbot_id.to_string(),
                ))
                .with_payload(true),
            )
            .await
            .map_err(|e| VectorStoreError::SearchFailed(e.to_string()))?;

        let results: Vec<SearchResult> = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;

                let document_id = Uuid::parse_str(payload.get(DOCUMENT_ID_FIELD)?.as_str()?).ok()?;
                let owner = Uuid::parse_str(payload.get(CHATBOT_ID_FIELD)?.as_str()?).ok()?;

                let chunk_id = match point.id?.point_id_options? {
                    qdrant_client::qdrant::point_id::PointIdOptions::Uuid(uuid) => {
                        Uuid::parse_str(&uuid).ok()?
                    }
                    qdrant_client::qdrant::point_id::PointIdOptions::Num(_) => return None,
                };

                let text = payload.get(TEXT_FIELD)?.as_str()?.to_string();
                let source = payload
                    .get(SOURCE_FIELD)
                    .and_then(|v| v.as_str())
                    .cloned()
                    .unwrap_or_default();
                let offset = payload
                    .get(OFFSET_FIELD)
                    .and_then(|v| v.as_integer())
                    .unwrap_or_default() as usize;

                let chunk = Chunk {
                    id: ChunkId::from_uuid(chunk_id),
                    text,
                    document_id: DocumentId::from_uuid(document_id),
                    chatbot_id: ChatbotId::from_uuid(owner),
                    source,
                    offset,
                };

                Some(SearchResult {
                    chunk,
                    score: point.score,
                })
            })
            .collect();

        Ok(results)
    }

    #[instrument(skip(self), fields(collection = %self.collection_name, document_id = %document_id))]
    async fn delete_by_document(&self, document_id: DocumentId) -> Result<(), VectorStoreError> {
        self.delete_matching(Self::keyword_filter(
            DOCUMENT_ID_FIELD,
            document_id.to_string(),
        ))
        .await?;
        info!("document_points_deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %self.collection_name, chatbot_id = %chatbot_id))]
    async fn delete_by_chatbot(&self, chatbot_id: ChatbotId) -> Result<(), VectorStoreError> {
        self.delete_matching(Self::keyword_filter(
            CHATBOT_ID_FIELD,
            chatbot_id.to_string(),
        ))
        .await?;
        info!("chatbot_points_deleted");
        Ok(())
    }
}
