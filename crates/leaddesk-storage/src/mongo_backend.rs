//! `MongoDB` lead store, the production default.
//!
//! Leads live in a single `leads` collection. Each document keeps the
//! lead id in `_id` and the creation timestamp in `date` as a native BSON
//! datetime, so the newest-first listing is a plain `{date: -1}` sort on
//! the server side.
//!
//! The client owns its own connection pool; one [`MongoStore`] is built at
//! startup and shared by every request.

use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::{LeadRecord, LeadStore, StorageError};

const COLLECTION: &str = "leads";
const DUPLICATE_KEY: i32 = 11000;

/// On-disk shape of a lead document.
#[derive(Debug, Serialize, Deserialize)]
struct LeadDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    contact: String,
    #[serde(default)]
    linkedin: Option<String>,
    #[serde(default)]
    naukri: Option<String>,
    #[serde(default)]
    resume: Option<String>,
    date: bson::DateTime,
}

impl From<&LeadRecord> for LeadDocument {
    fn from(r: &LeadRecord) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            contact: r.contact.clone(),
            linkedin: r.linkedin.clone(),
            naukri: r.naukri.clone(),
            resume: r.resume.clone(),
            date: bson::DateTime::from_millis(r.created_at.timestamp_millis()),
        }
    }
}

impl TryFrom<LeadDocument> for LeadRecord {
    type Error = StorageError;

    fn try_from(d: LeadDocument) -> Result<Self, Self::Error> {
        let millis = d.date.timestamp_millis();
        let Some(created_at) = DateTime::<Utc>::from_timestamp_millis(millis) else {
            tracing::warn!(lead_id = %d.id, millis, "lead document has an out-of-range date");
            return Err(StorageError::Corrupt {
                reason: format!("lead '{}' has an out-of-range date", d.id),
            });
        };
        Ok(Self {
            id: d.id,
            name: d.name,
            contact: d.contact,
            linkedin: d.linkedin,
            naukri: d.naukri,
            resume: d.resume,
            created_at,
        })
    }
}

/// A lead store backed by a `MongoDB` collection.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    leads: Collection<LeadDocument>,
}

impl std::fmt::Debug for MongoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoStore")
            .field("database", &self.db.name())
            .finish_non_exhaustive()
    }
}

impl MongoStore {
    /// Connect to `MongoDB` using a connection string.
    ///
    /// The database named in the URI is used; `fallback_db` applies when the
    /// URI names none.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connect`] if the URI is invalid or the client
    /// cannot be constructed.
    pub async fn connect(uri: &str, fallback_db: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StorageError::Connect {
                reason: e.to_string(),
            })?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(fallback_db));
        let leads = db.collection::<LeadDocument>(COLLECTION);
        Ok(Self { db, leads })
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

#[async_trait::async_trait]
impl LeadStore for MongoStore {
    async fn insert(&self, record: &LeadRecord) -> Result<(), StorageError> {
        self.leads
            .insert_one(LeadDocument::from(record))
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StorageError::Duplicate {
                        id: record.id.clone(),
                    }
                } else {
                    StorageError::Insert {
                        id: record.id.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<LeadRecord>, StorageError> {
        let cursor = self
            .leads
            .find(doc! {})
            .sort(doc! { "date": -1 })
            .await
            .map_err(|e| StorageError::List {
                reason: e.to_string(),
            })?;
        let docs: Vec<LeadDocument> =
            cursor
                .try_collect()
                .await
                .map_err(|e: mongodb::error::Error| StorageError::List {
                    reason: e.to_string(),
                })?;
        docs.into_iter().map(LeadRecord::try_from).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<LeadRecord>, StorageError> {
        self.leads
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| StorageError::Read {
                id: id.to_owned(),
                reason: e.to_string(),
            })?
            .map(LeadRecord::try_from)
            .transpose()
    }

    async fn delete(&self, id: &str) -> Result<Option<LeadRecord>, StorageError> {
        self.leads
            .find_one_and_delete(doc! { "_id": id })
            .await
            .map_err(|e| StorageError::Delete {
                id: id.to_owned(),
                reason: e.to_string(),
            })?
            .map(LeadRecord::try_from)
            .transpose()
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::Connect {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn document_conversion_keeps_millisecond_timestamp() {
        let record = LeadRecord {
            id: "abc".to_owned(),
            name: "Asha Rao".to_owned(),
            contact: "9000000001".to_owned(),
            linkedin: Some("https://linkedin.com/in/asha".to_owned()),
            naukri: None,
            resume: Some("1700000000000-cv.pdf".to_owned()),
            created_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        };
        let doc = LeadDocument::from(&record);
        assert_eq!(doc.date.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(LeadRecord::try_from(doc).unwrap(), record);
    }

    #[test]
    fn document_serializes_id_as_underscore_id() {
        let record = LeadRecord {
            id: "abc".to_owned(),
            name: "n".to_owned(),
            contact: "1".to_owned(),
            linkedin: None,
            naukri: None,
            resume: None,
            created_at: Utc::now(),
        };
        let doc = bson::to_document(&LeadDocument::from(&record)).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), "abc");
        assert!(doc.get_datetime("date").is_ok());
        assert!(doc.get("id").is_none());
    }

    #[test]
    fn out_of_range_date_is_corrupt() {
        let doc = LeadDocument {
            id: "far-future".to_owned(),
            name: "n".to_owned(),
            contact: "1".to_owned(),
            linkedin: None,
            naukri: None,
            resume: None,
            date: bson::DateTime::from_millis(i64::MAX),
        };
        let err = LeadRecord::try_from(doc).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }), "{err:?}");
        assert!(err.to_string().contains("far-future"));
    }
}
