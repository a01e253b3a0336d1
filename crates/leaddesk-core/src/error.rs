//! Error types for `leaddesk-core`.
//!
//! Each error variant carries enough context to diagnose the problem without
//! a debugger. Mail credentials and the admin key never appear in errors.

use leaddesk_storage::StorageError;

/// Errors from the resume upload directory.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The upload directory could not be created.
    #[error("failed to create upload directory '{path}': {reason}")]
    CreateDir { path: String, reason: String },

    /// Writing an uploaded file failed.
    #[error("failed to write upload '{path}': {reason}")]
    Write { path: String, reason: String },

    /// Every candidate filename was already taken.
    #[error("no free upload filename for '{name}' after {attempts} attempts")]
    Exhausted { name: String, attempts: u32 },
}

/// Errors from the notification transport.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// A configured sender or recipient address is not a valid mailbox.
    #[error("invalid mail address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The SMTP relay could not be configured.
    #[error("invalid SMTP relay '{host}': {reason}")]
    Relay { host: String, reason: String },

    /// The message could not be assembled.
    #[error("failed to build notification message: {reason}")]
    Message { reason: String },

    /// The SMTP server rejected or failed to deliver the message.
    #[error("mail delivery failed: {reason}")]
    Delivery { reason: String },
}

/// Errors from lead operations.
#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    /// A required intake field was absent or blank.
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    /// No lead with this id exists.
    #[error("lead '{id}' not found")]
    NotFound { id: String },

    /// The lead store failed.
    #[error("lead storage error: {0}")]
    Storage(#[from] StorageError),
}
