//! `LeadDesk` HTTP server.
//!
//! Wires the core lead service, the storage backend, and the HTTP routes
//! into an Axum application: the public intake endpoint at `/api/leads`,
//! the key-gated admin API at `/api/admin/*`, and resume downloads under
//! `/uploads`.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
