//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state
        .repositories
        .health_check()
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Database health check failed");
            false
        });
    let storage = state.storage.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, "Storage health check failed");
        false
    });

    let status = if database && storage { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        storage,
    })
}
