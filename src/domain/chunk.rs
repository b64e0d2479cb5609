use super::{ChatbotId, ChunkId, DocumentId};

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub document_id: DocumentId,
    pub chatbot_id: ChatbotId,
    /// Filename or URL the chunk was cut from.
    pub source: String,
    pub offset: usize,
}

impl Chunk {
    pub fn new(
        text: String,
        document_id: DocumentId,
        chatbot_id: ChatbotId,
        source: String,
        offset: usize,
    ) -> Self {
        Self {
            id: ChunkId::new(),
            text,
            document_id,
            chatbot_id,
            source,
            offset,
        }
    }
}
