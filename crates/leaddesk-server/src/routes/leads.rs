//! Lead intake routes: `/api/leads`, `/api/contact`
//!
//! Accepts the intake form as `multipart/form-data` with text fields
//! `name`, `contact`, `linkedin`, `naukri` and an optional file field
//! `resume`. Unknown fields are ignored.

use std::sync::Arc;

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use leaddesk_core::lead::{LeadForm, ResumeUpload};

use crate::error::AppError;
use crate::state::AppState;

/// Build the intake router, mounted at the application root.
///
/// - `POST /api/leads` — submit a lead
/// - `POST /api/contact` — legacy path, permanently redirected
pub fn router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/leads",
            post(submit_lead).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/contact", post(legacy_contact))
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: &'static str,
    pub lead_id: String,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Accept one intake form submission.
async fn submit_lead(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = read_form(&mut multipart).await?;
    let submission = form.into_submission()?;
    let record = state.leads.submit(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Lead saved successfully",
            lead_id: record.id,
        }),
    ))
}

/// Old clients post to `/api/contact`; 308 keeps the method and body.
async fn legacy_contact() -> Redirect {
    Redirect::permanent("/api/leads")
}

async fn read_form(multipart: &mut Multipart) -> Result<LeadForm, AppError> {
    let mut form = LeadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "name" => form.name = Some(text(field).await?),
            "contact" => form.contact = Some(text(field).await?),
            "linkedin" => form.linkedin = Some(text(field).await?),
            "naukri" => form.naukri = Some(text(field).await?),
            "resume" if form.resume.is_none() => {
                let original_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.resume = Some(ResumeUpload {
                    original_name,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(format!("Malformed form data: {}", err.body_text()))
    }
}
