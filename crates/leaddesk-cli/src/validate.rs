//! Intake form checks applied before anything is sent.
//!
//! The server stores whatever it is given, so these are the only format
//! rules a lead goes through.

use anyhow::{Result, bail};

/// Longest accepted phone number.
pub const MAX_CONTACT_DIGITS: usize = 10;

/// Name: ASCII letters and whitespace only, at least one letter.
///
/// # Errors
///
/// Returns an error describing the rule that failed.
pub fn name(value: &str) -> Result<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("name is required");
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        bail!("name may contain only letters and spaces");
    }
    Ok(trimmed)
}

/// Contact: 1 to [`MAX_CONTACT_DIGITS`] ASCII digits.
///
/// # Errors
///
/// Returns an error describing the rule that failed.
pub fn contact(value: &str) -> Result<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("contact is required");
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        bail!("contact must be numeric");
    }
    if trimmed.len() > MAX_CONTACT_DIGITS {
        bail!("contact must be at most {MAX_CONTACT_DIGITS} digits");
    }
    Ok(trimmed)
}
