mod mock_embedder;
mod mock_llm_client;
mod openai_client;
mod openai_embedder;

pub use mock_embedder::MockEmbedder;
pub use mock_llm_client::MockLlmClient;
pub use openai_client::OpenAiClient;
pub use openai_embedder::OpenAiEmbedder;
