use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::sync::OnceCell;

use super::{AnswerStore, StoreError};
use crate::models::QaRecord;

const MAX_CONNECTIONS: u32 = 10;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS qa_records (
    question   TEXT PRIMARY KEY,
    answer     TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// PostgreSQL store. Connections are opened lazily so an unreachable
/// database degrades requests instead of blocking startup.
pub struct PgStore {
    pool: PgPool,
    schema: OnceCell<()>,
}

impl PgStore {
    /// Builds the pool without connecting. Fails only on a malformed URL.
    pub fn connect_lazy(database_url: &str, connect_timeout: Duration) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(connect_timeout)
            .test_before_acquire(true)
            .connect_lazy(database_url)?;
        Ok(Self {
            pool,
            schema: OnceCell::new(),
        })
    }

    // Table is created on first successful use and retried until then
    async fn ready(&self) -> Result<&PgPool, StoreError> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
                tracing::info!("qa_records table ready");
                Ok::<(), StoreError>(())
            })
            .await?;
        Ok(&self.pool)
    }
}

#[async_trait]
impl AnswerStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let pool = self.ready().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    async fn find_answer(&self, question: &str) -> Result<Option<String>, StoreError> {
        let pool = self.ready().await?;
        let row: Option<(String,)> =
            sqlx::query_as("SELECT answer FROM qa_records WHERE question = $1")
                .bind(question)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(answer,)| answer))
    }

    async fn insert(&self, record: &QaRecord) -> Result<bool, StoreError> {
        let pool = self.ready().await?;
        let result = sqlx::query(
            "INSERT INTO qa_records (question, answer) VALUES ($1, $2)
             ON CONFLICT (question) DO NOTHING",
        )
        .bind(&record.question)
        .bind(&record.answer)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let pool = self.ready().await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM qa_records")
            .fetch_one(pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn list(&self, limit: usize) -> Result<Vec<QaRecord>, StoreError> {
        let pool = self.ready().await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT question, answer FROM qa_records ORDER BY created_at, question LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(question, answer)| QaRecord { question, answer })
            .collect())
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let pool = self.ready().await?;
        let result = sqlx::query("DELETE FROM qa_records").execute(pool).await?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("postgres pool closed");
    }
}
