//! Health check endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub gateway: String,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let gateway_status = match state.gateway.health().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!(error = %e, "Gateway health check failed");
            "unhealthy"
        }
    };

    let overall_status = if gateway_status == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        overall_status,
        Json(HealthResponse {
            status: gateway_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            gateway: gateway_status.to_string(),
        }),
    )
}

/// Liveness probe (just returns 200 if the server is running)
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe; ready once the gateway answers
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.gateway.health().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
