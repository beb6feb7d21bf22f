use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{AnswerStore, StoreError};
use crate::models::QaRecord;

// Stored record with its insertion sequence
struct Entry {
    answer: String,
    seq: u64,
}

/// In-process store used when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, Entry>,
    next_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnswerStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_answer(&self, question: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(question).map(|e| e.answer.clone()))
    }

    async fn insert(&self, record: &QaRecord) -> Result<bool, StoreError> {
        let mut inserted = false;
        self.records
            .entry(record.question.clone())
            .or_insert_with(|| {
                inserted = true;
                Entry {
                    answer: record.answer.clone(),
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                }
            });
        Ok(inserted)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.len() as u64)
    }

    async fn list(&self, limit: usize) -> Result<Vec<QaRecord>, StoreError> {
        let mut rows: Vec<(u64, QaRecord)> = self
            .records
            .iter()
            .map(|e| (e.seq, QaRecord::new(e.key().clone(), e.answer.clone())))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().take(limit).map(|(_, r)| r).collect())
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let removed = self.records.len() as u64;
        self.records.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_insert_wins() {
        let store = MemoryStore::new();
        assert!(store.insert(&QaRecord::new("q", "first")).await.unwrap());
        assert!(!store.insert(&QaRecord::new("q", "second")).await.unwrap());
        assert_eq!(store.find_answer("q").await.unwrap().as_deref(), Some("first"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order_and_limit() {
        let store = MemoryStore::new();
        for q in ["c", "a", "b"] {
            store.insert(&QaRecord::new(q, q.to_uppercase())).await.unwrap();
        }
        let listed = store.list(2).await.unwrap();
        assert_eq!(listed, vec![QaRecord::new("c", "C"), QaRecord::new("a", "A")]);
    }

    #[tokio::test]
    async fn clear_reports_removed_count() {
        let store = MemoryStore::new();
        store.insert(&QaRecord::new("x", "1")).await.unwrap();
        store.insert(&QaRecord::new("y", "2")).await.unwrap();
        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(store.find_answer("x").await.unwrap(), None);
    }
}
