//! HTTP error types for `LeadDesk` server.
//!
//! Maps domain errors from `leaddesk-core` into HTTP responses. Every error
//! produces a JSON body `{"error": "<message>"}`. Internal failures are
//! logged with full detail and reach the client only as a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use leaddesk_core::error::LeadError;

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or wrong admin key.
    #[error("unauthorized")]
    Unauthorized,
    /// The server is missing required configuration.
    #[error("misconfigured: {0}")]
    Misconfigured(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Client sent invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Request body exceeded the configured limit.
    #[error("payload too large")]
    PayloadTooLarge,
    /// Internal failure. The first field is shown to the client, the second
    /// is only logged.
    #[error("internal error: {1}")]
    Internal(&'static str, String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized: Invalid API Key".to_owned(),
            ),
            Self::Misconfigured(msg) => {
                tracing::error!(error = %msg, "server misconfiguration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Server misconfiguration: {msg}"),
                )
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Upload too large".to_owned(),
            ),
            Self::Internal(public, detail) => {
                tracing::error!(error = %detail, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, public.to_owned())
            }
        };

        (status, axum::Json(ErrorBody { error: message })).into_response()
    }
}

impl AppError {
    /// Map a lead error, using `context` as the client-facing message for
    /// storage failures.
    #[must_use]
    pub fn from_lead(err: LeadError, context: &'static str) -> Self {
        match err {
            LeadError::MissingField { field } => {
                Self::BadRequest(format!("Missing required field: {field}"))
            }
            LeadError::NotFound { .. } => Self::NotFound("Lead not found".to_owned()),
            LeadError::Storage(_) => Self::Internal(context, err.to_string()),
        }
    }
}

impl From<LeadError> for AppError {
    fn from(err: LeadError) -> Self {
        Self::from_lead(err, "Server error")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use leaddesk_storage::StorageError;

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_has_fixed_message() {
        let (status, body) = body_of(AppError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized: Invalid API Key");
    }

    #[tokio::test]
    async fn storage_failure_hides_detail() {
        let err = LeadError::Storage(StorageError::List {
            reason: "mongodb://user:pw@db timed out".to_owned(),
        });
        let (status, body) = body_of(AppError::from_lead(err, "Error fetching leads")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error fetching leads");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let err = LeadError::NotFound { id: "x".to_owned() };
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Lead not found");
    }

    #[tokio::test]
    async fn missing_field_maps_to_400() {
        let err = LeadError::MissingField { field: "contact" };
        let (status, _) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
