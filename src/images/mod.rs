//! Generated image storage and generation module
//!
//! Provides:
//! - The `generated_images` collection (insert, newest-first listing, delete)
//! - The prompt-to-stored-image pipeline

mod gen;
mod store;

use thiserror::Error;

use crate::gemini::GenerationError;

pub use gen::{enrich_prompt, generate_image, PROMPT_PREFIX};
pub use store::{GeneratedImage, ImageStore};

/// Image operation errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("API key not configured")]
    NotConfigured,

    #[error("Failed to generate image: {0}")]
    Generation(#[source] GenerationError),

    #[error("No images were generated")]
    NoImages,

    #[error("Image not found")]
    NotFound,

    #[error("image id already exists: {0}")]
    DuplicateId(String),

    #[error("Failed to fetch images: stored timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("Failed to generate image: {0}")]
    Save(#[source] sqlx::Error),

    #[error("Failed to fetch images: {0}")]
    Fetch(#[source] sqlx::Error),

    #[error("Failed to delete image: {0}")]
    Delete(#[source] sqlx::Error),
}

impl From<GenerationError> for ImageError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::NotConfigured => ImageError::NotConfigured,
            other => ImageError::Generation(other),
        }
    }
}
