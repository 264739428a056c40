//! Route definitions for the MediaVault HTTP API.
//!
//! Upload and folder routes are mounted under `/upload`; `/health` sits at
//! the root. The router receives `AppState` and passes it to all handlers
//! via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Multipart framing allowance on top of the configured upload size.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit =
        usize::try_from(state.config.upload.max_upload_size_bytes).unwrap_or(usize::MAX);
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/upload", upload_routes())
        .route("/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(
            body_limit.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Upload, file, and folder endpoints.
fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::upload::upload))
        .route("/files/{id}", get(handlers::upload::get_file))
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder).put(handlers::folder::update_folder),
        )
        .route("/actions/bulk-delete", post(handlers::folder::bulk_delete))
}
