use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, SessionRepository};
use crate::domain::{ChatSession, ChatbotId, Message, MessageId, MessageRole, SessionId};
use crate::infrastructure::persistence::pg_pool::map_sqlx_error;

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    chatbot_id: Uuid,
    visitor_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SessionRow> for ChatSession {
    fn from(r: SessionRow) -> Self {
        ChatSession {
            id: SessionId::from_uuid(r.id),
            chatbot_id: ChatbotId::from_uuid(r.chatbot_id),
            visitor_id: r.visitor_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    session_id: Uuid,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(r: MessageRow) -> Result<Self, Self::Error> {
        let role = r
            .role
            .parse::<MessageRole>()
            .map_err(RepositoryError::QueryFailed)?;

        Ok(Message {
            id: MessageId::from_uuid(r.id),
            session_id: SessionId::from_uuid(r.session_id),
            role,
            content: r.content,
            created_at: r.created_at,
        })
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id, chatbot_id = %session.chatbot_id))]
    async fn create_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chat_sessions (id, chatbot_id, visitor_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.id.as_uuid())
        .bind(session.chatbot_id.as_uuid())
        .bind(&session.visitor_id)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn get_session(&self, id: SessionId) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, chatbot_id, visitor_id, created_at, updated_at
            FROM chat_sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ChatSession::from))
    }

    #[instrument(skip(self), fields(chatbot_id = %chatbot_id))]
    async fn list_sessions(
        &self,
        chatbot_id: ChatbotId,
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, chatbot_id, visitor_id, created_at, updated_at
            FROM chat_sessions
            WHERE chatbot_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(chatbot_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ChatSession::from).collect())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id, session_id = %message.session_id))]
    async fn append_message(&self, message: &Message) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO messages (id, session_id, role, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.session_id.as_uuid())
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("UPDATE chat_sessions SET updated_at = $1 WHERE id = $2")
            .bind(message.created_at)
            .bind(message.session_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %session_id, limit = limit))]
    async fn recent_messages(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, session_id, role, content, created_at
            FROM (
                SELECT id, session_id, role, content, created_at
                FROM messages
                WHERE session_id = $1
                ORDER BY created_at DESC
                LIMIT $2
            ) recent
            ORDER BY created_at ASC
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Message::try_from).collect()
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn delete_session(&self, id: SessionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("session {id}")));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(chatbot_id = %chatbot_id))]
    async fn delete_sessions_for_chatbot(
        &self,
        chatbot_id: ChatbotId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE chatbot_id = $1")
            .bind(chatbot_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
