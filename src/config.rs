//! Layered server configuration
//!
//! Sources, lowest to highest precedence:
//! 1. Compiled defaults
//! 2. Optional TOML file
//! 3. `IMAGED_*` environment variables (`__` separates nested keys)
//! 4. `GEMINI_API_KEY`, mapped onto `provider.api_key`
//!
//! CLI flags are applied on top by the binary.

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Default Generative Language API endpoint
pub const DEFAULT_PROVIDER_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image-capable model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// SQLite connection string or file path. None = in-memory
    pub database_url: Option<String>,
    pub provider: ProviderConfig,
    pub images: ImagesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8001)),
            database_url: None,
            provider: ProviderConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

impl Config {
    /// Build the figment for all configuration sources
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed("IMAGED_").split("__"))
            .merge(
                Env::raw()
                    .only(&["GEMINI_API_KEY"])
                    .map(|_| "provider.api_key".into()),
            )
    }

    /// Load configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(file).extract()
    }
}

/// Generation provider settings
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 120,
        }
    }
}

// Keeps the API key out of logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Listing limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ImagesConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl ImagesConfig {
    /// Resolve a requested limit into the range the store is queried with
    pub fn clamp(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(0, self.max_limit.max(0))
    }
}
