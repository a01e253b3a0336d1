//! Lead intake and admin projection types.
//!
//! [`LeadForm`] is what arrives from the intake form, field by field.
//! [`LeadSubmission`] is a form that passed the presence check.
//! [`LeadView`] is what admins see: placeholders for missing optional
//! fields and a full download URL for the resume.
//!
//! Format rules (letters-only names, short numeric contacts) are enforced
//! by the intake client only; the server accepts any non-blank value.

use chrono::{DateTime, Utc};
use serde::Serialize;

use leaddesk_storage::LeadRecord;

use crate::error::LeadError;

/// Placeholder for an absent `LinkedIn` or Naukri profile.
pub const NOT_PROVIDED: &str = "Not provided";

/// Placeholder for a lead without a resume.
pub const NO_RESUME: &str = "No resume uploaded";

/// Path prefix under which uploaded resumes are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// An uploaded resume file, still in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    /// Filename as sent by the client (untrusted).
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Raw intake form fields, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadForm {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub linkedin: Option<String>,
    pub naukri: Option<String>,
    pub resume: Option<ResumeUpload>,
}

/// A lead that passed the presence check and is ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    pub name: String,
    pub contact: String,
    pub linkedin: Option<String>,
    pub naukri: Option<String>,
    pub resume: Option<ResumeUpload>,
}

impl LeadForm {
    /// Check required fields and normalise optional ones.
    ///
    /// Blank optional fields become `None`, as does an empty resume part
    /// (what browsers send when no file was picked).
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::MissingField`] if `name` or `contact` is absent
    /// or blank.
    pub fn into_submission(self) -> Result<LeadSubmission, LeadError> {
        let name = required(self.name, "name")?;
        let contact = required(self.contact, "contact")?;
        let resume = self
            .resume
            .filter(|r| !(r.bytes.is_empty() && r.original_name.trim().is_empty()));

        Ok(LeadSubmission {
            name,
            contact,
            linkedin: optional(self.linkedin),
            naukri: optional(self.naukri),
            resume,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, LeadError> {
    optional(value).ok_or(LeadError::MissingField { field })
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Admin-facing projection of a stored lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadView {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub linkedin: String,
    pub naukri: String,
    /// Full download URL, or [`NO_RESUME`].
    pub resume: String,
    pub created_at: DateTime<Utc>,
}

impl LeadView {
    /// Project a record for admin clients.
    ///
    /// `base_url` is the scheme and authority the client reached us on,
    /// e.g. `https://api.example.com`, without a trailing slash.
    #[must_use]
    pub fn from_record(record: LeadRecord, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            id: record.id,
            name: record.name,
            contact: record.contact,
            linkedin: record.linkedin.unwrap_or_else(|| NOT_PROVIDED.to_owned()),
            naukri: record.naukri.unwrap_or_else(|| NOT_PROVIDED.to_owned()),
            resume: record.resume.map_or_else(
                || NO_RESUME.to_owned(),
                |file| format!("{base}{UPLOADS_ROUTE}/{file}"),
            ),
            created_at: record.created_at,
        }
    }
}
