//! HTTP API module - REST endpoints

mod error;
mod images;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ImagesConfig;
use crate::gemini::ImageGenerator;
use crate::images::ImageStore;
pub use error::{ApiError, ErrorResponse};
pub use images::{DeleteResponse, GenerateRequest, ImageResponse};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub images: ImageStore,
    pub generator: Arc<dyn ImageGenerator>,
    pub limits: ImagesConfig,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .merge(images::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Root endpoint
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Nano Banana Image Generator API",
        status: "running",
    })
}

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
    status: &'static str,
}

/// Health check endpoint
///
/// Reports liveness only; the store and the provider are not consulted.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}
