// src/routes/health.rs
//! Liveness endpoints for the telemetry service.
//!
//! `/health` is used by container orchestrators and CI to verify the process
//! answers HTTP requests; `/` is a small service banner. Neither touches the
//! database.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct BannerResponse {
    message: &'static str,
    version: &'static str,
}

/// Handle `GET /health`.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Handle `GET /`.
async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Agricultural sensor telemetry API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create a subrouter containing the liveness routes.
///
/// Generic over the application state so it merges cleanly with the gateway
/// router regardless of the state type.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}
