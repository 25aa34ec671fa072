//! Liveness endpoint reporting database reachability.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::config::{API_VERSION, SERVICE_NAME};

/// Health check payload
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    #[schema(example = "smrtmart-api")]
    pub service: &'static str,
    #[schema(example = "1.0.0")]
    pub version: &'static str,
    #[schema(example = "connected")]
    pub database: String,
}

/// Service and database health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, database) = match state.database.ping().await {
        Ok(()) => ("healthy", StatusCode::OK, "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed to reach the database");
            (
                "unhealthy",
                StatusCode::SERVICE_UNAVAILABLE,
                "disconnected".to_string(),
            )
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            service: SERVICE_NAME,
            version: API_VERSION,
            database,
        }),
    )
}
