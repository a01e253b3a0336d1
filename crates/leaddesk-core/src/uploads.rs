//! Resume upload directory.
//!
//! Files are stored flat under one directory as `<unix-ms>-<name>`, where
//! `<name>` is the client's filename reduced to a safe character set. Each
//! file is opened with create-new semantics; if the name is taken (two
//! uploads of the same file in the same millisecond) the timestamp is bumped
//! by one and the open retried, so concurrent identical uploads never share
//! a file.
//!
//! Files are never removed here. A lead that fails to persist, or is later
//! deleted, leaves its resume behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::UploadError;

const MAX_ATTEMPTS: u32 = 64;
const MAX_NAME_LEN: usize = 120;
const FALLBACK_NAME: &str = "resume";

/// Handle to the directory holding uploaded resumes.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a handle. Call [`ensure_dir`](Self::ensure_dir) before use.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::CreateDir`] if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UploadError::CreateDir {
                path: self.dir.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Write an uploaded file and return the stored filename.
    ///
    /// `now_ms` is the Unix timestamp in milliseconds used as the prefix.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Write`] on I/O failure, or
    /// [`UploadError::Exhausted`] if no free filename was found.
    pub async fn save(
        &self,
        original_name: &str,
        bytes: &[u8],
        now_ms: i64,
    ) -> Result<String, UploadError> {
        let safe = sanitize_file_name(original_name);
        let mut stamp = now_ms;

        for _ in 0..MAX_ATTEMPTS {
            let file_name = format!("{stamp}-{safe}");
            let path = self.dir.join(&file_name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    if let Err(e) = write_all(&mut file, bytes).await {
                        drop(file);
                        let _ = tokio::fs::remove_file(&path).await;
                        return Err(UploadError::Write {
                            path: path.display().to_string(),
                            reason: e.to_string(),
                        });
                    }
                    return Ok(file_name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    stamp = stamp.saturating_add(1);
                }
                Err(e) => {
                    return Err(UploadError::Write {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(UploadError::Exhausted {
            name: safe,
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Absolute location of a stored file.
    #[cfg(test)]
    fn path_of(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

async fn write_all(file: &mut tokio::fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

/// Reduce a client-supplied filename to a safe, flat name.
///
/// Keeps only the last path component, replaces anything outside
/// `[A-Za-z0-9._-]` with `_`, and caps the length.
#[must_use]
pub fn sanitize_file_name(original: &str) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let mut cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.len() > MAX_NAME_LEN {
        // ASCII only at this point, so any byte index is a char boundary.
        cleaned = cleaned.split_off(cleaned.len() - MAX_NAME_LEN);
    }

    if cleaned.trim_matches('.').is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        cleaned
    }
}
