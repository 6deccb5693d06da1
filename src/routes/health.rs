use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub store: String,
    pub cache: String,
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let store_ok = state.store.health_check().await.is_ok();
    let cache_status = match &state.cache {
        Some(cache) if cache.health_check().await.is_ok() => "ok",
        Some(_) => "error",
        None => "disabled",
    };

    // The store is critical, the cache only degrades reads
    let (status, status_code) = match (store_ok, cache_status) {
        (false, _) => ("unhealthy", StatusCode::SERVICE_UNAVAILABLE),
        (true, "error") => ("degraded", StatusCode::OK),
        (true, _) => ("healthy", StatusCode::OK),
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                store: if store_ok { "ok" } else { "error" }.to_string(),
                cache: cache_status.to_string(),
            },
        }),
    )
}
