//! Image generation, listing and deletion endpoints
//!
//! POST   /api/generate-image  - Generate and store an image
//! GET    /api/images          - Most recent images, newest first
//! DELETE /api/images/{id}     - Delete one image

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::images::{generate_image, GeneratedImage, ImageError};

/// Build the images router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/generate-image", post(generate))
        .route("/api/images", get(list_images))
        .route("/api/images/{image_id}", delete(delete_image))
}

/// Generation request
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// A generated image as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    pub id: String,
    pub prompt: String,
    pub image_url: String,
    pub created_at: String,
    pub success: bool,
}

impl From<GeneratedImage> for ImageResponse {
    fn from(image: GeneratedImage) -> Self {
        Self {
            image_url: image.data_uri(),
            created_at: image
                .created_at
                .to_rfc3339_opts(SecondsFormat::Micros, false),
            id: image.id,
            prompt: image.prompt,
            success: true,
        }
    }
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

/// Deletion acknowledgment
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: &'static str,
}

async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Json(req) = payload?;

    let image = generate_image(state.generator.as_ref(), &state.images, &req.prompt).await?;

    Ok(Json(image.into()))
}

async fn list_images(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<ImageResponse>>, ApiError> {
    let Query(params) = params?;
    let limit = state.limits.clamp(params.limit);

    let images = state.images.recent(limit).await?;

    Ok(Json(images.into_iter().map(ImageResponse::from).collect()))
}

async fn delete_image(
    State(state): State<AppState>,
    image_id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(image_id) = image_id?;

    if state.images.delete(&image_id).await? == 0 {
        return Err(ImageError::NotFound.into());
    }

    Ok(Json(DeleteResponse {
        success: true,
        message: "Image deleted successfully",
    }))
}
