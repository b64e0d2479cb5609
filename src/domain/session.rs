use chrono::{DateTime, Utc};

use super::{ChatbotId, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub id: SessionId,
    pub chatbot_id: ChatbotId,
    pub visitor_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(chatbot_id: ChatbotId, visitor_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            chatbot_id,
            visitor_id,
            created_at: now,
            updated_at: now,
        }
    }
}
