//! Answer store: persistent question → answer records.
//!
//! Lookups are by exact normalized question. Writes keep the first record
//! for a key; nothing is updated in place.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::QaRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// Short backend name for logs and diagnostics.
    fn backend(&self) -> &'static str;

    /// Round trip to the backend.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Stored answer for a normalized question, if any.
    async fn find_answer(&self, question: &str) -> Result<Option<String>, StoreError>;

    /// Insert a record. Returns `false` when the key already existed.
    async fn insert(&self, record: &QaRecord) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Up to `limit` records in insertion order.
    async fn list(&self, limit: usize) -> Result<Vec<QaRecord>, StoreError>;

    /// Delete every record, returning how many were removed.
    async fn clear(&self) -> Result<u64, StoreError>;

    /// Release backend resources at shutdown.
    async fn close(&self) {}
}
