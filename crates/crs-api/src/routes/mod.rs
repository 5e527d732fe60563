//! API routes

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod projects;
pub mod reports;
pub mod scans;
pub mod suggestions;

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
