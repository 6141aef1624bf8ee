use super::model::ProcessedVideoRecord;
use crate::infrastructure::db::pool::DbPool;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Append-only log of finished composites.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert(&self, record: &ProcessedVideoRecord) -> Result<()>;

    /// Newest first, at most `limit` records.
    async fn list_recent(&self, limit: i64) -> Result<Vec<ProcessedVideoRecord>>;
}

pub struct PgHistoryRepository {
    pool: DbPool,
}

impl PgHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryRepository {
    async fn insert(&self, record: &ProcessedVideoRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO recent_videos (id, url, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(record.id)
        .bind(&record.url)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to insert video record: {}", e))?;

        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ProcessedVideoRecord>> {
        let records = sqlx::query_as::<_, ProcessedVideoRecord>(
            "SELECT id, url, created_at FROM recent_videos ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

/// Largest page `/recent-videos` can ask for, so the memory store keeps no more.
pub const RETAINED_RECORDS: usize = 20;

/// Process-local history, used when no database is configured. Only the
/// newest `RETAINED_RECORDS` are kept.
#[derive(Default)]
pub struct MemoryHistoryRepository {
    records: RwLock<Vec<ProcessedVideoRecord>>,
}

impl MemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryRepository {
    async fn insert(&self, record: &ProcessedVideoRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(RETAINED_RECORDS);
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ProcessedVideoRecord>> {
        let records = self.records.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(records.iter().take(limit).cloned().collect())
    }
}
