//! HTTP error mapping
//!
//! Every handler error leaves as `{"detail": "..."}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::images::ImageError;

/// Errors returned from API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    Path(#[from] PathRejection),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ApiError {
    /// Status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Image(e) => match e {
                ImageError::EmptyPrompt => StatusCode::UNPROCESSABLE_ENTITY,
                ImageError::NotFound => StatusCode::NOT_FOUND,
                ImageError::NotConfigured
                | ImageError::Generation(_)
                | ImageError::NoImages
                | ImageError::DuplicateId(_)
                | ImageError::InvalidTimestamp(_)
                | ImageError::Save(_)
                | ImageError::Fetch(_)
                | ImageError::Delete(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Query(rejection) => rejection.status(),
            ApiError::Path(rejection) => rejection.status(),
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::Query(rejection) => rejection.body_text(),
            ApiError::Path(rejection) => rejection.body_text(),
            ApiError::Image(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            error!("Request failed: {}", detail);
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
