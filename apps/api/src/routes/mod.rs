pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::rate_limit::limit_uploads;
use crate::state::AppState;

/// Headroom over the file limit for the other form fields and multipart framing,
/// so oversized files reach the handler's own size check.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/applications",
            post(handlers::handle_generate_application)
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(middleware::from_fn_with_state(state.clone(), limit_uploads)),
        )
        .with_state(state)
}
