use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status of the service: "ok" or "degraded"
    pub status: String,

    /// Storage connection status
    pub database_connection: bool,

    /// API version
    pub version: String,
}

/// Check the health of the API and its storage
pub async fn check_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database_connection = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check failed to reach storage: {}", e);
            false
        }
    };

    let health = HealthResponse {
        status: if database_connection { "ok" } else { "degraded" }.to_string(),
        database_connection,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let status = if database_connection {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}
