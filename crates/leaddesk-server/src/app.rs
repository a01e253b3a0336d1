//! Router assembly.
//!
//! Kept out of `main.rs` so integration tests drive the exact router the
//! binary serves.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::http::header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use leaddesk_core::admin_key::ADMIN_KEY_HEADER;
use leaddesk_core::lead::UPLOADS_ROUTE;

use crate::config::HttpOptions;
use crate::routes;
use crate::state::AppState;

/// Build the full application router.
pub fn build_router(state: Arc<AppState>, http: &HttpOptions, upload_dir: &Path) -> Router {
    Router::new()
        .merge(routes::probes::router())
        .merge(routes::leads::router(http.max_upload_bytes))
        .nest("/api/admin", routes::admin::router(Arc::clone(&state)))
        .nest_service(UPLOADS_ROUTE, ServeDir::new(upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&http.allowed_origins))
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}

/// CORS for the public form and the admin dashboard.
///
/// `*` anywhere in the list allows any origin. Entries that are not valid
/// header values are skipped with a warning.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let list: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(ADMIN_KEY_HEADER)])
}
