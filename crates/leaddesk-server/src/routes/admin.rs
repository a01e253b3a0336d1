//! Admin routes: `/api/admin/*`
//!
//! Every route here sits behind [`admin_gate`](crate::middleware::admin_gate).
//! Leads are returned in their admin projection: placeholders for missing
//! optional fields and full download URLs for resumes. Searching and
//! filtering happen client-side over the full list.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::http::header::HOST;
use axum::middleware as axum_mw;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use leaddesk_core::lead::LeadView;

use crate::error::AppError;
use crate::middleware::admin_gate;
use crate::state::AppState;

/// Build the `/api/admin` router.
///
/// - `GET    /verify`      — key check for clients
/// - `GET    /leads`       — all leads, newest first
/// - `GET    /leads/{id}`  — one lead
/// - `DELETE /leads/{id}`  — delete one lead
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/verify", get(verify))
        .route("/leads", get(list_leads))
        .route("/leads/{id}", get(get_lead).delete(delete_lead))
        .route_layer(axum_mw::from_fn_with_state(state, admin_gate))
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Reaching this handler means the gate accepted the key.
async fn verify() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Admin access verified",
    })
}

/// List every lead, newest first.
async fn list_leads(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<LeadView>>, AppError> {
    let base = base_url(&state, &headers);
    let records = state
        .leads
        .list()
        .await
        .map_err(|e| AppError::from_lead(e, "Error fetching leads"))?;

    Ok(Json(
        records
            .into_iter()
            .map(|r| LeadView::from_record(r, &base))
            .collect(),
    ))
}

/// Fetch one lead.
async fn get_lead(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<LeadView>, AppError> {
    let record = state
        .leads
        .get(&id)
        .await
        .map_err(|e| AppError::from_lead(e, "Error fetching lead details"))?;
    Ok(Json(LeadView::from_record(record, &base_url(&state, &headers))))
}

/// Permanently delete one lead.
async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .leads
        .delete(&id)
        .await
        .map_err(|e| AppError::from_lead(e, "Error deleting lead"))?;
    Ok(Json(MessageResponse {
        message: "Lead deleted successfully",
    }))
}

/// `<scheme>://<host>` the client used to reach us.
///
/// The configured public base wins. Otherwise the scheme comes from the
/// first `X-Forwarded-Proto` value (we expect to sit behind one proxy) and
/// the authority from `Host`.
fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.public_base_url {
        return base.clone();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| *v == "http" || *v == "https")
        .unwrap_or("http");

    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("localhost");

    format!("{scheme}://{host}")
}
