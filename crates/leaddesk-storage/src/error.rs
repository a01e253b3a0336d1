//! Storage error types.
//!
//! Every error variant carries enough context to diagnose the problem
//! without a debugger. Connection strings are never included because they
//! usually embed credentials.

/// Errors that can occur during lead storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to connect to the storage backend.
    #[error("failed to connect to lead storage: {reason}")]
    Connect { reason: String },

    /// Failed to insert a lead record.
    #[error("failed to insert lead '{id}': {reason}")]
    Insert { id: String, reason: String },

    /// Failed to read one lead record.
    #[error("failed to read lead '{id}': {reason}")]
    Read { id: String, reason: String },

    /// Failed to list lead records.
    #[error("failed to list leads: {reason}")]
    List { reason: String },

    /// Failed to delete a lead record.
    #[error("failed to delete lead '{id}': {reason}")]
    Delete { id: String, reason: String },

    /// A record with the same id already exists.
    #[error("lead '{id}' already exists")]
    Duplicate { id: String },

    /// A stored document could not be decoded into a lead record.
    #[error("corrupt lead document: {reason}")]
    Corrupt { reason: String },
}
