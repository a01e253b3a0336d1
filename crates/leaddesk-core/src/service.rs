//! Lead service: the intake pipeline and the admin operations.
//!
//! Submission runs upload → persist → notify, in that order and without a
//! transaction. A failed upload is logged and the lead is stored without a
//! resume. A failed insert fails the submission but leaves any file that was
//! already written. Notification runs on its own task once the record is
//! persisted; its outcome is only ever logged.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use leaddesk_storage::{LeadRecord, LeadStore};

use crate::error::LeadError;
use crate::lead::LeadSubmission;
use crate::notify::{LeadNotification, Notifier};
use crate::uploads::UploadStore;

/// Long-lived handles for lead operations, built once at startup.
pub struct LeadService {
    store: Arc<dyn LeadStore>,
    uploads: UploadStore,
    notifier: Arc<dyn Notifier>,
}

impl LeadService {
    #[must_use]
    pub fn new(
        store: Arc<dyn LeadStore>,
        uploads: UploadStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            uploads,
            notifier,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn LeadStore> {
        &self.store
    }

    /// Accept a new lead.
    ///
    /// Returns the persisted record. The notification is dispatched in the
    /// background before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::Storage`] if the record could not be persisted.
    pub async fn submit(&self, submission: LeadSubmission) -> Result<LeadRecord, LeadError> {
        let (record, _notification) = self.submit_tracked(submission).await?;
        Ok(record)
    }

    /// Like [`submit`](Self::submit), but also hands back the notification
    /// task so callers (tests, mostly) can wait for it.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::Storage`] if the record could not be persisted.
    pub async fn submit_tracked(
        &self,
        submission: LeadSubmission,
    ) -> Result<(LeadRecord, JoinHandle<()>), LeadError> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let resume = match submission.resume {
            Some(upload) => match self
                .uploads
                .save(&upload.original_name, &upload.bytes, now.timestamp_millis())
                .await
            {
                Ok(file_name) => {
                    info!(lead_id = %id, file = %file_name, size = upload.bytes.len(), "resume stored");
                    Some(file_name)
                }
                Err(e) => {
                    warn!(lead_id = %id, error = %e, "resume upload failed, storing lead without it");
                    None
                }
            },
            None => None,
        };

        let record = LeadRecord {
            id,
            name: submission.name,
            contact: submission.contact,
            linkedin: submission.linkedin,
            naukri: submission.naukri,
            resume,
            created_at: now,
        };

        if let Err(e) = self.store.insert(&record).await {
            error!(lead_id = %record.id, error = %e, "failed to save lead");
            return Err(e.into());
        }
        info!(lead_id = %record.id, backend = self.store.backend_name(), "lead saved");

        let handle = self.dispatch_notification(LeadNotification::from(&record));
        Ok((record, handle))
    }

    fn dispatch_notification(&self, note: LeadNotification) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            match notifier.notify(&note).await {
                Ok(()) => info!(
                    lead_id = %note.lead_id,
                    notifier = notifier.name(),
                    "lead notification sent"
                ),
                Err(e) => error!(
                    lead_id = %note.lead_id,
                    notifier = notifier.name(),
                    error = %e,
                    "failed to send lead notification"
                ),
            }
        })
    }

    /// All leads, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::Storage`] if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<LeadRecord>, LeadError> {
        Ok(self.store.list_newest_first().await?)
    }

    /// One lead by id.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::NotFound`] if no lead has this id, or
    /// [`LeadError::Storage`] if the store cannot be read.
    pub async fn get(&self, id: &str) -> Result<LeadRecord, LeadError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| LeadError::NotFound { id: id.to_owned() })
    }

    /// Permanently delete one lead. Its resume file, if any, stays on disk.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::NotFound`] if no lead has this id, or
    /// [`LeadError::Storage`] if the store fails.
    pub async fn delete(&self, id: &str) -> Result<LeadRecord, LeadError> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| LeadError::NotFound { id: id.to_owned() })?;
        info!(lead_id = %removed.id, "lead deleted");
        Ok(removed)
    }
}

impl std::fmt::Debug for LeadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadService")
            .field("store", &self.store.backend_name())
            .field("uploads", &self.uploads.dir())
            .field("notifier", &self.notifier.name())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Mutex;

    use leaddesk_storage::{MemoryStore, StorageError};

    use super::*;
    use crate::error::NotifyError;
    use crate::lead::ResumeUpload;

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<LeadNotification>>,
    }

    #[async_trait::async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn notify(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
            self.seen.lock().await.push(lead.clone());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait::async_trait]
    impl Notifier for FailingNotifier {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn notify(&self, _lead: &LeadNotification) -> Result<(), NotifyError> {
            Err(NotifyError::Delivery {
                reason: "relay down".to_owned(),
            })
        }
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl LeadStore for BrokenStore {
        async fn insert(&self, record: &LeadRecord) -> Result<(), StorageError> {
            Err(StorageError::Insert {
                id: record.id.clone(),
                reason: "connection reset".to_owned(),
            })
        }

        async fn list_newest_first(&self) -> Result<Vec<LeadRecord>, StorageError> {
            Err(StorageError::List {
                reason: "connection reset".to_owned(),
            })
        }

        async fn get(&self, id: &str) -> Result<Option<LeadRecord>, StorageError> {
            Err(StorageError::Read {
                id: id.to_owned(),
                reason: "connection reset".to_owned(),
            })
        }

        async fn delete(&self, id: &str) -> Result<Option<LeadRecord>, StorageError> {
            Err(StorageError::Delete {
                id: id.to_owned(),
                reason: "connection reset".to_owned(),
            })
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    fn submission(resume: Option<ResumeUpload>) -> LeadSubmission {
        LeadSubmission {
            name: "Meera Iyer".to_owned(),
            contact: "9988776655".to_owned(),
            linkedin: None,
            naukri: None,
            resume,
        }
    }

    fn cv() -> ResumeUpload {
        ResumeUpload {
            original_name: "meera cv.pdf".to_owned(),
            bytes: b"%PDF-1.7 resume".to_vec(),
        }
    }

    #[tokio::test]
    async fn submit_without_resume_persists_and_notifies() {
        let tmp = tempfile::tempdir().unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = LeadService::new(
            Arc::new(MemoryStore::new()),
            UploadStore::new(tmp.path()),
            notifier.clone(),
        );

        let (record, handle) = service.submit_tracked(submission(None)).await.unwrap();
        handle.await.unwrap();

        assert_eq!(record.resume, None);
        assert_eq!(service.get(&record.id).await.unwrap(), record);
        let seen = notifier.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].lead_id, record.id);
        assert!(!seen[0].has_resume);
    }

    #[tokio::test]
    async fn submit_with_resume_stores_file() {
        let tmp = tempfile::tempdir().unwrap();
        let service = LeadService::new(
            Arc::new(MemoryStore::new()),
            UploadStore::new(tmp.path()),
            Arc::new(RecordingNotifier::default()),
        );

        let record = service.submit(submission(Some(cv()))).await.unwrap();
        let file = record.resume.expect("resume stored");
        assert_eq!(
            file,
            format!("{}-meera_cv.pdf", record.created_at.timestamp_millis())
        );
        let bytes = tokio::fs::read(tmp.path().join(&file)).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.7 resume");
    }

    #[tokio::test]
    async fn upload_failure_still_saves_lead() {
        let tmp = tempfile::tempdir().unwrap();
        let service = LeadService::new(
            Arc::new(MemoryStore::new()),
            UploadStore::new(tmp.path().join("does-not-exist")),
            Arc::new(RecordingNotifier::default()),
        );

        let record = service.submit(submission(Some(cv()))).await.unwrap();
        assert_eq!(record.resume, None);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_submission() {
        let tmp = tempfile::tempdir().unwrap();
        let service = LeadService::new(
            Arc::new(MemoryStore::new()),
            UploadStore::new(tmp.path()),
            Arc::new(FailingNotifier),
        );

        let (record, handle) = service.submit_tracked(submission(None)).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(service.get(&record.id).await.is_ok());
    }

    #[tokio::test]
    async fn storage_failure_keeps_uploaded_file() {
        let tmp = tempfile::tempdir().unwrap();
        let service = LeadService::new(
            Arc::new(BrokenStore),
            UploadStore::new(tmp.path()),
            Arc::new(RecordingNotifier::default()),
        );

        let err = service.submit(submission(Some(cv()))).await.unwrap_err();
        assert!(matches!(err, LeadError::Storage(StorageError::Insert { .. })));

        let mut entries = tokio::fs::read_dir(tmp.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn identical_submissions_get_distinct_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let service = LeadService::new(
            Arc::new(MemoryStore::new()),
            UploadStore::new(tmp.path()),
            Arc::new(RecordingNotifier::default()),
        );

        let a = service.submit(submission(Some(cv()))).await.unwrap();
        let b = service.submit(submission(Some(cv()))).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.resume, b.resume);
    }

    #[tokio::test]
    async fn get_and_delete_unknown_id_are_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let service = LeadService::new(
            Arc::new(MemoryStore::new()),
            UploadStore::new(tmp.path()),
            Arc::new(RecordingNotifier::default()),
        );

        assert!(matches!(
            service.get("nope").await,
            Err(LeadError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete("nope").await,
            Err(LeadError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_removes_record_but_keeps_file() {
        let tmp = tempfile::tempdir().unwrap();
        let service = LeadService::new(
            Arc::new(MemoryStore::new()),
            UploadStore::new(tmp.path()),
            Arc::new(RecordingNotifier::default()),
        );

        let record = service.submit(submission(Some(cv()))).await.unwrap();
        let file = record.resume.clone().unwrap();
        service.delete(&record.id).await.unwrap();

        assert!(service.list().await.unwrap().is_empty());
        assert!(tmp.path().join(file).exists());
    }
}
