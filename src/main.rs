//! imaged - prompt-to-image generation service daemon

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use imaged::{Config, Server};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prompt-to-image generation service
#[derive(Parser, Debug)]
#[command(name = "imaged", version, about = "Prompt-to-image generation service")]
struct Args {
    /// Address to listen on (overrides configuration)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// SQLite connection string or database file path (overrides configuration)
    #[arg(short, long)]
    database: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "imaged=info,tower_http=debug".into());
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(database) = args.database {
        config.database_url = Some(database);
    }

    info!(
        "Starting imaged (model {}, database {})",
        config.provider.model,
        config.database_url.as_deref().unwrap_or("in-memory")
    );

    let server = Arc::new(Server::new(config).await?);

    let signal_server = server.clone();
    let shutdown = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal_server.shutdown();
        }
    });

    server.run().await?;
    shutdown.abort();

    Ok(())
}
