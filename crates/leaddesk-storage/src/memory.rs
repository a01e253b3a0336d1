//! In-memory lead store for testing.
//!
//! Stores all records in a `Vec` behind a `RwLock`. It is not persistent;
//! all data is lost when the process exits. Use it for tests and
//! local development without a database.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{LeadRecord, LeadStore, StorageError};

/// An in-memory lead store backed by a `Vec` in insertion order.
///
/// Cloning shares the underlying data.
///
/// # Examples
///
/// ```
/// # use leaddesk_storage::{LeadStore, MemoryStore};
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new();
/// assert!(store.list_newest_first().await.unwrap().is_empty());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<LeadRecord>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl LeadStore for MemoryStore {
    async fn insert(&self, record: &LeadRecord) -> Result<(), StorageError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(StorageError::Duplicate {
                id: record.id.clone(),
            });
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<LeadRecord>, StorageError> {
        let records = self.records.read().await;
        // Reverse first so the stable sort keeps later inserts ahead on ties.
        let mut out: Vec<LeadRecord> = records.iter().rev().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Option<LeadRecord>, StorageError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<Option<LeadRecord>, StorageError> {
        let mut records = self.records.write().await;
        let removed = records
            .iter()
            .position(|r| r.id == id)
            .map(|idx| records.remove(idx));
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
