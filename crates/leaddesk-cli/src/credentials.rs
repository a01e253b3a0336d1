//! Saved admin key at `~/.leaddesk/admin-key`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const DIR_NAME: &str = ".leaddesk";
const FILE_NAME: &str = "admin-key";

/// Returns the user's home directory.
fn home_dir() -> Result<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .context("cannot determine home directory (HOME / USERPROFILE not set)")
}

/// Path of the saved key under `home`.
pub fn key_path_in(home: &Path) -> PathBuf {
    home.join(DIR_NAME).join(FILE_NAME)
}

/// Path of the saved key for the current user.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn key_path() -> Result<PathBuf> {
    Ok(key_path_in(&home_dir()?))
}

/// Write `key` to `path`, owner-readable only on Unix.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save(path: &Path, key: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    std::fs::write(path, key.trim())
        .with_context(|| format!("failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

/// Read the key at `path`. `None` if there is no file or it is blank.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let key = raw.trim();
    Ok((!key.is_empty()).then(|| key.to_owned()))
}

/// Delete the key at `path`. Returns whether a file was removed.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn remove(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
    }
}

/// Explicit key first (flag or `LEADDESK_ADMIN_KEY`), then the saved one.
///
/// # Errors
///
/// Returns an error if the saved key exists but cannot be read.
pub fn resolve(explicit: Option<String>, saved_at: &Path) -> Result<Option<String>> {
    match explicit.filter(|k| !k.trim().is_empty()) {
        Some(key) => Ok(Some(key)),
        None => load(saved_at),
    }
}
