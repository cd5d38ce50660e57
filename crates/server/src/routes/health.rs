//! Health check endpoint

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// GET /health - Report that the server is up
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
