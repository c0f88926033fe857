//! imaged - prompt-to-image generation service
//!
//! Accepts text prompts over HTTP, forwards them to an image-capable
//! Gemini model, stores the results in SQLite and serves them back.

pub mod api;
pub mod config;
pub mod db;
pub mod gemini;
pub mod images;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

pub use config::Config;
use db::Database;
use gemini::{GeminiClient, ImageGenerator};
use images::ImageStore;

/// The imaged server instance
pub struct Server {
    config: Config,
    db: Arc<Database>,
    generator: Arc<dyn ImageGenerator>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: Config) -> Result<Self> {
        let generator = Arc::new(GeminiClient::new(&config.provider)?);
        Self::with_generator(config, generator).await
    }

    /// Create a server backed by a specific image generator
    pub async fn with_generator(
        config: Config,
        generator: Arc<dyn ImageGenerator>,
    ) -> Result<Self> {
        let db = Database::new(config.database_url.as_deref()).await?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        if !generator.is_configured() {
            warn!("Image provider API key not set; generation requests will fail");
        }

        Ok(Self {
            config,
            db: Arc::new(db),
            generator,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Get the database handle
    pub fn db(&self) -> Arc<Database> {
        self.db.clone()
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(api::AppState {
            images: ImageStore::new(self.db.pool().clone()),
            generator: self.generator.clone(),
            limits: self.config.images,
        })
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("imaged listening on {}", local_addr);

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("imaged shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}
