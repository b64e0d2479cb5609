mod in_memory_vector_store;
mod mock_vector_store;
mod qdrant_adapter;

pub use in_memory_vector_store::InMemoryVectorStore;
pub use mock_vector_store::{FailingVectorStore, MockVectorStore};
pub use qdrant_adapter::QdrantAdapter;
