//! Database module - SQLite pool and schema

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;


/// Database handle wrapping SQLite connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    ///
    /// `url` may be a `sqlite:` connection string or a plain file path.
    /// If None, uses an in-memory database (for testing)
    pub async fn new(url: Option<&str>) -> Result<Self> {
        let pool = match url {
            Some(url) => {
                let conn_str = if url.starts_with("sqlite:") {
                    url.to_string()
                } else {
                    format!("sqlite:{}?mode=rwc", url)
                };

                let options = SqliteConnectOptions::from_str(&conn_str)?
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal);

                SqlitePoolOptions::new()
                    .max_connections(10)
                    .connect_with(options)
                    .await?
            }
            None => {
                // Every in-memory connection is its own database, so pin one
                let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await?
            }
        };

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        // created_at holds UTC microseconds since the epoch
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS generated_images (
                id TEXT PRIMARY KEY,
                prompt TEXT NOT NULL CHECK (length(prompt) > 0),
                image_data TEXT NOT NULL CHECK (length(image_data) > 0),
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_generated_images_created_at ON generated_images(created_at)",
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations complete");
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
