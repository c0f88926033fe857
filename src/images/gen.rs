//! Prompt-to-image pipeline
//!
//! 1. Validate and enrich the prompt
//! 2. Ask the generator for images
//! 3. Persist the first image
//!
//! Nothing is stored unless every step succeeds.

use tracing::{debug, info};

use super::{GeneratedImage, ImageError, ImageStore};
use crate::gemini::ImageGenerator;

/// Instruction prepended to every user prompt
pub const PROMPT_PREFIX: &str = "Create a high-quality, detailed image: ";

/// Wrap a user prompt in the generation instruction
pub fn enrich_prompt(prompt: &str) -> String {
    format!("{}{}", PROMPT_PREFIX, prompt)
}

/// Generate an image for `prompt` and store it
pub async fn generate_image(
    generator: &dyn ImageGenerator,
    store: &ImageStore,
    prompt: &str,
) -> Result<GeneratedImage, ImageError> {
    if prompt.trim().is_empty() {
        return Err(ImageError::EmptyPrompt);
    }

    if !generator.is_configured() {
        return Err(ImageError::NotConfigured);
    }

    info!("Generating image for prompt ({} chars)", prompt.len());

    let generation = generator.generate(&enrich_prompt(prompt)).await?;

    if let Some(text) = &generation.text {
        debug!("Generator text: {}", text);
    }

    let first = generation
        .images
        .into_iter()
        .next()
        .ok_or(ImageError::NoImages)?;

    debug!("Using generated {} image", first.mime_type);

    let image = GeneratedImage::new(prompt, first.data);
    store.insert(&image).await?;

    info!("Image {} generated and stored", image.id);
    Ok(image)
}
