//! Lead persistence for `LeadDesk`.
//!
//! This crate defines the [`LeadStore`] trait, a small document-store
//! interface over a single collection of [`LeadRecord`]s. It knows nothing
//! about HTTP, uploads, or notifications; the service layer in
//! `leaddesk-core` drives it.
//!
//! Two implementations are provided:
//!
//! - [`MongoStore`] — production default, backed by `MongoDB` (feature `mongo-backend`)
//! - [`MemoryStore`] — in-memory, for testing and local development

mod error;
mod memory;
#[cfg(feature = "mongo-backend")]
mod mongo_backend;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use error::StorageError;
pub use memory::MemoryStore;
#[cfg(feature = "mongo-backend")]
pub use mongo_backend::MongoStore;

/// One persisted lead.
///
/// `id` and `created_at` are assigned once, before the first insert, and
/// never change afterwards. There is no update operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub linkedin: Option<String>,
    pub naukri: Option<String>,
    /// Filename of the stored resume, relative to the upload directory.
    pub resume: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A pluggable lead storage backend.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait LeadStore: Send + Sync + 'static {
    /// Persist a new lead.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Duplicate`] if the id is already taken, or
    /// [`StorageError::Insert`] if the underlying backend fails.
    async fn insert(&self, record: &LeadRecord) -> Result<(), StorageError>;

    /// Return every lead, newest `created_at` first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::List`] if the underlying backend fails.
    async fn list_newest_first(&self) -> Result<Vec<LeadRecord>, StorageError>;

    /// Fetch one lead by id. Returns `Ok(None)` if no such lead exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn get(&self, id: &str) -> Result<Option<LeadRecord>, StorageError>;

    /// Remove one lead by id and return what was removed.
    ///
    /// Returns `Ok(None)` when nothing matched; the collection is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Delete`] if the underlying backend fails.
    async fn delete(&self, id: &str) -> Result<Option<LeadRecord>, StorageError>;

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connect`] if the backend does not answer.
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
