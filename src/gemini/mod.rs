//! Gemini image generation client
//!
//! Provides:
//! - The `ImageGenerator` seam the request handlers depend on
//! - `GeminiClient`, which calls the Generative Language `generateContent`
//!   endpoint with image output enabled

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ProviderConfig;

/// Instruction sent alongside every prompt
pub const SYSTEM_INSTRUCTION: &str =
    "You are an expert image generator that creates high-quality images based on text prompts.";

/// Generation client errors
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(StatusCode),

    #[error("invalid image payload: {0}")]
    InvalidImage(#[from] base64::DecodeError),
}

/// One image returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPart {
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

/// Provider output for a single prompt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub images: Vec<GeneratedPart>,
    pub text: Option<String>,
}

/// Something that turns a prompt into images
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Whether the credential needed to call the provider is present
    fn is_configured(&self) -> bool;

    /// Generate images for an already-enriched prompt
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError>;
}

// -- Wire types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        default,
        alias = "inline_data",
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default, alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateRequest {
    fn new(prompt: &str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(SYSTEM_INSTRUCTION)],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompt)],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        }
    }
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

impl GenerateResponse {
    /// Collect image and text parts across all candidates
    fn into_generation(self) -> Result<Generation, GenerationError> {
        let mut generation = Generation::default();
        let mut texts = Vec::new();

        for part in self.candidates.into_iter().flat_map(|c| c.content.parts) {
            if let Some(inline) = part.inline_data {
                if inline.data.is_empty() {
                    continue;
                }
                BASE64.decode(inline.data.as_bytes())?;
                generation.images.push(GeneratedPart {
                    mime_type: inline.mime_type.unwrap_or_else(|| "image/png".to_string()),
                    data: inline.data,
                });
            } else if let Some(text) = part.text {
                texts.push(text);
            }
        }

        if !texts.is_empty() {
            generation.text = Some(texts.join("\n"));
        }

        Ok(generation)
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(GenerationError::NotConfigured)?;

        let request = GenerateRequest::new(prompt);

        debug!("Sending image generation request to Gemini: {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API error: {} - {}", status, body);
            return Err(GenerationError::Api(status));
        }

        let generation = response.json::<GenerateResponse>().await?.into_generation()?;

        debug!(
            "Gemini returned {} image(s){}",
            generation.images.len(),
            if generation.text.is_some() {
                " with text"
            } else {
                ""
            }
        );

        Ok(generation)
    }
}
