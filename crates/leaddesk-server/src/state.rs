//! Shared application state for `LeadDesk` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. The lead service inside it owns the store
//! connection, the upload directory handle and the mail transport, so no
//! handler reaches for process-wide globals.

use leaddesk_core::admin_key::AdminKey;
use leaddesk_core::service::LeadService;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Intake pipeline and admin lead operations.
    pub leads: LeadService,
    /// Admin secret (None if not configured).
    pub admin_key: Option<AdminKey>,
    /// Fixed base for resume download URLs (None: derive from the request).
    pub public_base_url: Option<String>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("leads", &self.leads)
            .field("admin_key_configured", &self.admin_key.is_some())
            .finish_non_exhaustive()
    }
}
