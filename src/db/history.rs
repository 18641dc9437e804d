use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{HistoryEntry, Recommendation, RecommendationRequest},
};

/// Durable record of past recommendation sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persists one session
    async fn save(&self, entry: &HistoryEntry) -> AppResult<()>;

    /// All sessions of a user, most recent first
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<HistoryEntry>>;

    /// A single session, if it belongs to `user_id`
    async fn get(&self, user_id: &str, id: Uuid) -> AppResult<Option<HistoryEntry>>;
}

type HistoryRow = (
    Uuid,
    String,
    Json<RecommendationRequest>,
    Json<Vec<Recommendation>>,
    DateTime<Utc>,
);

fn entry_from_row((id, user_id, request, results, created_at): HistoryRow) -> HistoryEntry {
    HistoryEntry {
        id,
        user_id,
        request: request.0,
        results: results.0,
        created_at,
    }
}

/// Postgres-backed history in the `recommendation_history` table
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl HistoryStore for PgHistoryStore {
    async fn save(&self, entry: &HistoryEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recommendation_history (id, user_id, request, results, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.user_id)
        .bind(Json(&entry.request))
        .bind(Json(&entry.results))
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<HistoryEntry>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, request, results, created_at
            FROM recommendation_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    async fn get(&self, user_id: &str, id: Uuid) -> AppResult<Option<HistoryEntry>> {
        let row: Option<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, request, results, created_at
            FROM recommendation_history
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(entry_from_row))
    }
}

/// Process-local history; contents are lost on restart
#[derive(Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn save(&self, entry: &HistoryEntry) -> AppResult<()> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<HistoryEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, user_id: &str, id: Uuid) -> AppResult<Option<HistoryEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|entry| entry.id == id && entry.user_id == user_id)
            .cloned())
    }
}
