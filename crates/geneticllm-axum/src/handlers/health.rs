//! Liveness and readiness endpoints. Never gated.

use axum::Json;
use serde::Serialize;

/// Version reported by the health endpoints.
pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: API_VERSION,
    })
}

/// `GET /ready`
pub async fn ready() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready",
        version: API_VERSION,
    })
}
