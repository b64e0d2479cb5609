pub const CHATBOT_ID_FIELD: &str = "chatbot_id";
pub const DOCUMENT_ID_FIELD: &str = "document_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Cosine,
    DotProduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFieldType {
    Keyword,
    Integer,
}

#[derive(Debug, Clone)]
pub struct PayloadIndex {
    pub field_name: String,
    pub field_type: PayloadFieldType,
}

#[derive(Debug, Clone)]
pub struct CollectionConfig {
    pub vector_dimensions: u64,
    pub distance_metric: DistanceMetric,
    pub payload_indexes: Vec<PayloadIndex>,
}

impl CollectionConfig {
    /// Cosine collection with keyword indexes on the fields every search and
    /// delete filters by.
    pub fn new(vector_dimensions: u64) -> Self {
        Self {
            vector_dimensions,
            distance_metric: DistanceMetric::Cosine,
            payload_indexes: [CHATBOT_ID_FIELD, DOCUMENT_ID_FIELD]
                .into_iter()
                .map(|field| PayloadIndex {
                    field_name: field.to_string(),
                    field_type: PayloadFieldType::Keyword,
                })
                .collect(),
        }
    }
}
