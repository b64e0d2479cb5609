use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{ChatbotRepository, RepositoryError};
use crate::domain::{
    AnalyticsDelta, Chatbot, ChatbotAnalytics, ChatbotId, ChatbotSettings, DeploymentStatus,
    DocumentId, TrainingSource, TrainingSourceKind, TrainingStatus,
};
use crate::infrastructure::persistence::pg_pool::map_sqlx_error;

const CHATBOT_COLUMNS: &str = "id, owner_id, name, status, model, temperature, max_tokens, \
     custom_prompt, welcome_message, format_markdown, use_history, total_sessions, \
     total_messages, total_responses, last_active_at, created_at, updated_at";

const TRAINING_SOURCE_COLUMNS: &str =
    "chatbot_id, document_id, kind, name, status, chunk_count, error_message, created_at";

pub struct PgChatbotRepository {
    pool: PgPool,
}

impl PgChatbotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn training_sources_for(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<TrainingSource>>, RepositoryError> {
        let rows = sqlx::query_as::<_, TrainingSourceRow>(&format!(
            "SELECT {TRAINING_SOURCE_COLUMNS} FROM training_sources \
             WHERE chatbot_id = ANY($1) ORDER BY created_at ASC"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut grouped: HashMap<Uuid, Vec<TrainingSource>> = HashMap::new();
        for row in rows {
            let chatbot_id = row.chatbot_id;
            grouped
                .entry(chatbot_id)
                .or_default()
                .push(TrainingSource::try_from(row)?);
        }
        Ok(grouped)
    }

    async fn hydrate(&self, rows: Vec<ChatbotRow>) -> Result<Vec<Chatbot>, RepositoryError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut sources = self.training_sources_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let training_sources = sources.remove(&row.id).unwrap_or_default();
                row.into_chatbot(training_sources)
            })
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct ChatbotRow {
    id: Uuid,
    owner_id: String,
    name: String,
    status: String,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<i32>,
    custom_prompt: Option<String>,
    welcome_message: Option<String>,
    format_markdown: bool,
    use_history: bool,
    total_sessions: i64,
    total_messages: i64,
    total_responses: i64,
    last_active_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChatbotRow {
    fn into_chatbot(
        self,
        training_sources: Vec<TrainingSource>,
    ) -> Result<Chatbot, RepositoryError> {
        let status = self
            .status
            .parse::<DeploymentStatus>()
            .map_err(RepositoryError::QueryFailed)?;

        Ok(Chatbot {
            id: ChatbotId::from_uuid(self.id),
            owner_id: self.owner_id,
            name: self.name,
            settings: ChatbotSettings {
                model: self.model,
                temperature: self.temperature,
                max_tokens: self.max_tokens.and_then(|t| u32::try_from(t).ok()),
                custom_prompt: self.custom_prompt,
                welcome_message: self.welcome_message,
                format_markdown: self.format_markdown,
                use_history: self.use_history,
            },
            analytics: ChatbotAnalytics {
                total_sessions: self.total_sessions.max(0) as u64,
                total_messages: self.total_messages.max(0) as u64,
                total_responses: self.total_responses.max(0) as u64,
                last_active_at: self.last_active_at,
            },
            status,
            training_sources,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TrainingSourceRow {
    chatbot_id: Uuid,
    document_id: Uuid,
    kind: String,
    name: String,
    status: String,
    chunk_count: i64,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TrainingSourceRow> for TrainingSource {
    type Error = RepositoryError;

    fn try_from(r: TrainingSourceRow) -> Result<Self, Self::Error> {
        Ok(TrainingSource {
            document_id: DocumentId::from_uuid(r.document_id),
            kind: r
                .kind
                .parse::<TrainingSourceKind>()
                .map_err(RepositoryError::QueryFailed)?,
            name: r.name,
            status: r
                .status
                .parse::<TrainingStatus>()
                .map_err(RepositoryError::QueryFailed)?,
            chunk_count: r.chunk_count.max(0) as u64,
            error_message: r.error_message,
            created_at: r.created_at,
        })
    }
}

fn as_integer(max_tokens: Option<u32>) -> Result<Option<i32>, RepositoryError> {
    max_tokens
        .map(|t| {
            i32::try_from(t).map_err(|_| {
                RepositoryError::ConstraintViolation(format!("max_tokens {t} out of range"))
            })
        })
        .transpose()
}

fn as_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ChatbotRepository for PgChatbotRepository {
    #[instrument(skip(self, chatbot), fields(chatbot_id = %chatbot.id))]
    async fn create(&self, chatbot: &Chatbot) -> Result<(), RepositoryError> {
        let settings = &chatbot.settings;

        sqlx::query(&format!(
            "INSERT INTO chatbots ({CHATBOT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)"
        ))
        .bind(chatbot.id.as_uuid())
        .bind(&chatbot.owner_id)
        .bind(&chatbot.name)
        .bind(chatbot.status.as_str())
        .bind(&settings.model)
        .bind(settings.temperature)
        .bind(as_integer(settings.max_tokens)?)
        .bind(&settings.custom_prompt)
        .bind(&settings.welcome_message)
        .bind(settings.format_markdown)
        .bind(settings.use_history)
        .bind(as_bigint(chatbot.analytics.total_sessions))
        .bind(as_bigint(chatbot.analytics.total_messages))
        .bind(as_bigint(chatbot.analytics.total_responses))
        .bind(chatbot.analytics.last_active_at)
        .bind(chatbot.created_at)
        .bind(chatbot.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(chatbot_id = %id))]
    async fn get_by_id(&self, id: ChatbotId) -> Result<Option<Chatbot>, RepositoryError> {
        let row = sqlx::query_as::<_, ChatbotRow>(&format!(
            "SELECT {CHATBOT_COLUMNS} FROM chatbots WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Chatbot>, RepositoryError> {
        let rows = sqlx::query_as::<_, ChatbotRow>(&format!(
            "SELECT {CHATBOT_COLUMNS} FROM chatbots WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self, chatbot), fields(chatbot_id = %chatbot.id))]
    async fn update(&self, chatbot: &Chatbot) -> Result<(), RepositoryError> {
        let settings = &chatbot.settings;

        let result = sqlx::query(
            r#"
            UPDATE chatbots
            SET name = $1, status = $2, model = $3, temperature = $4, max_tokens = $5,
                custom_prompt = $6, welcome_message = $7, format_markdown = $8,
                use_history = $9, updated_at = $10
            WHERE id = $11
            "#,
        )
        .bind(&chatbot.name)
        .bind(chatbot.status.as_str())
        .bind(&settings.model)
        .bind(settings.temperature)
        .bind(as_integer(settings.max_tokens)?)
        .bind(&settings.custom_prompt)
        .bind(&settings.welcome_message)
        .bind(settings.format_markdown)
        .bind(settings.use_history)
        .bind(chatbot.updated_at)
        .bind(chatbot.id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("chatbot {}", chatbot.id)));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(chatbot_id = %id))]
    async fn delete(&self, id: ChatbotId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chatbots WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("chatbot {id}")));
        }
        Ok(())
    }

    /// Single-statement increment, so concurrent exchanges never lose counts.
    #[instrument(skip(self), fields(chatbot_id = %id))]
    async fn increment_analytics(
        &self,
        id: ChatbotId,
        delta: AnalyticsDelta,
    ) -> Result<(), RepositoryError> {
        if delta.is_empty() {
            return Ok(());
        }

        let result = sqlx::query(
            r#"
            UPDATE chatbots
            SET total_sessions = total_sessions + $1,
                total_messages = total_messages + $2,
                total_responses = total_responses + $3,
                last_active_at = $4
            WHERE id = $5
            "#,
        )
        .bind(as_bigint(delta.sessions))
        .bind(as_bigint(delta.messages))
        .bind(as_bigint(delta.responses))
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("chatbot {id}")));
        }
        Ok(())
    }

    #[instrument(skip(self, source), fields(chatbot_id = %id, document_id = %source.document_id))]
    async fn record_pending_source(
        &self,
        id: ChatbotId,
        source: &TrainingSource,
    ) -> Result<(), RepositoryError> {
        sqlx::query(&format!(
            "INSERT INTO training_sources ({TRAINING_SOURCE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        ))
        .bind(id.as_uuid())
        .bind(source.document_id.as_uuid())
        .bind(source.kind.as_str())
        .bind(&source.name)
        .bind(source.status.as_str())
        .bind(as_bigint(source.chunk_count))
        .bind(&source.error_message)
        .bind(source.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self, source), fields(chatbot_id = %id, document_id = %source.document_id, status = %source.status))]
    async fn update_training_source(
        &self,
        id: ChatbotId,
        source: &TrainingSource,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE training_sources
            SET name = $1, status = $2, chunk_count = $3, error_message = $4
            WHERE chatbot_id = $5 AND document_id = $6
            "#,
        )
        .bind(&source.name)
        .bind(source.status.as_str())
        .bind(as_bigint(source.chunk_count))
        .bind(&source.error_message)
        .bind(id.as_uuid())
        .bind(source.document_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "training source {}",
                source.document_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(chatbot_id = %id, document_id = %document_id))]
    async fn remove_training_source(
        &self,
        id: ChatbotId,
        document_id: DocumentId,
    ) -> Result<Option<TrainingSource>, RepositoryError> {
        let row = sqlx::query_as::<_, TrainingSourceRow>(&format!(
            "DELETE FROM training_sources WHERE chatbot_id = $1 AND document_id = $2 \
             RETURNING {TRAINING_SOURCE_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(document_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(TrainingSource::try_from).transpose()
    }
}
