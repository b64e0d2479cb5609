use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatbotAnalytics {
    pub total_sessions: u64,
    pub total_messages: u64,
    pub total_responses: u64,
    pub last_active_at: Option<DateTime<Utc>>,
}

/// Additive counter update, the equivalent of a document-level `$inc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsDelta {
    pub sessions: u64,
    pub messages: u64,
    pub responses: u64,
}

impl AnalyticsDelta {
    pub fn new_session() -> Self {
        Self {
            sessions: 1,
            ..Self::default()
        }
    }

    pub fn exchange() -> Self {
        Self {
            messages: 1,
            responses: 1,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sessions == 0 && self.messages == 0 && self.responses == 0
    }
}

impl ChatbotAnalytics {
    pub fn apply(&mut self, delta: AnalyticsDelta, at: DateTime<Utc>) {
        self.total_sessions = self.total_sessions.saturating_add(delta.sessions);
        self.total_messages = self.total_messages.saturating_add(delta.messages);
        self.total_responses = self.total_responses.saturating_add(delta.responses);
        self.last_active_at = Some(at);
    }
}
