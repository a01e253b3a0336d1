//! Admin-side view of leads: client-side search, filtering and stats.
//!
//! The admin API returns every lead in one response, so all narrowing
//! happens here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Placeholder the server uses for leads without a resume.
pub const NO_RESUME: &str = "No resume uploaded";

/// One lead as returned by `/api/admin/leads`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub linkedin: String,
    pub naukri: String,
    pub resume: String,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    pub fn has_resume(&self) -> bool {
        self.resume != NO_RESUME
    }
}

/// List filters.
#[derive(Debug, Default)]
pub struct Filter<'a> {
    /// Case-insensitive match on name, plain substring match on contact.
    pub search: Option<&'a str>,
    pub with_resume: bool,
}

impl Filter<'_> {
    pub fn matches(&self, lead: &Lead) -> bool {
        if self.with_resume && !lead.has_resume() {
            return false;
        }
        match self.search.map(str::trim).filter(|s| !s.is_empty()) {
            None => true,
            Some(term) => {
                lead.name.to_lowercase().contains(&term.to_lowercase())
                    || lead.contact.contains(term)
            }
        }
    }

    pub fn apply<'l>(&self, leads: &'l [Lead]) -> Vec<&'l Lead> {
        leads.iter().filter(|l| self.matches(l)).collect()
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub today: usize,
    pub with_resume: usize,
}

impl Stats {
    /// Count `leads`, treating `today` as a UTC calendar date.
    pub fn compute(leads: &[Lead], today: NaiveDate) -> Self {
        Self {
            total: leads.len(),
            today: leads
                .iter()
                .filter(|l| l.created_at.date_naive() == today)
                .count(),
            with_resume: leads.iter().filter(|l| l.has_resume()).count(),
        }
    }
}
