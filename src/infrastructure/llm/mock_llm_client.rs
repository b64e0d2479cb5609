use std::sync::Mutex;

use crate::application::ports::{CompletionRequest, LlmClient, LlmClientError};

/// Returns a canned answer and remembers every request it was given.
pub struct MockLlmClient {
    answer: String,
    fail: bool,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::with_answer("Mock answer")
    }

    pub fn with_answer(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmClientError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if self.fail {
            return Err(LlmClientError::ApiRequestFailed(
                "mock llm unavailable".to_string(),
            ));
        }
        Ok(self.answer.clone())
    }
}
