//! Health check endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Services;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Build health route
pub fn routes(services: Services) -> Router<()> {
    Router::new()
        .route("/health", get(health))
        .with_state(services)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unavailable", body = HealthResponse)
    )
)]
pub async fn health(State(services): State<Services>) -> impl IntoResponse {
    let (status, body) = match services.ping().await {
        Ok(()) => (
            StatusCode::OK,
            HealthResponse {
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
                database: "ok",
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                HealthResponse {
                    status: "degraded",
                    version: env!("CARGO_PKG_VERSION"),
                    database: "unavailable",
                },
            )
        }
    };
    (status, Json(body))
}
