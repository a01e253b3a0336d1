//! Admin gate for `LeadDesk`.
//!
//! Every admin route is wrapped in [`admin_gate`]. It reads the
//! `x-admin-api-key` header and compares it with the configured secret.
//! A server without a configured secret answers 500 rather than 401, so a
//! deployment mistake is not mistaken for a wrong key.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use leaddesk_core::admin_key::ADMIN_KEY_HEADER;

use crate::error::AppError;
use crate::state::AppState;

/// Middleware that validates the admin key header.
///
/// On success the request continues unchanged; nothing is added to its
/// extensions because there is only one admin identity.
pub async fn admin_gate(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let Some(expected) = state.admin_key.as_ref() else {
        return AppError::Misconfigured("ADMIN_API_KEY not set".to_owned()).into_response();
    };

    let presented = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .map(HeaderValue::as_bytes);

    match presented {
        Some(key) if expected.matches(key) => next.run(req).await,
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "admin key mismatch");
            AppError::Unauthorized.into_response()
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "admin key missing");
            AppError::Unauthorized.into_response()
        }
    }
}
