//! Generated image persistence
//!
//! One flat collection keyed by id. Listing is newest-first by
//! `created_at`, with insertion order breaking ties.

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::ImageError;

/// A persisted generation result
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub id: String,
    pub prompt: String,
    /// Base64-encoded image bytes
    pub image_data: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedImage {
    /// Create a record with a fresh id and the current time
    ///
    /// The timestamp is truncated to the stored precision so the record
    /// compares equal to what a later query returns.
    pub fn new(prompt: impl Into<String>, image_data: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            image_data: image_data.into(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Inline data URI for display
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.image_data)
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: String,
    prompt: String,
    image_data: String,
    created_at: i64,
}

impl ImageRow {
    fn into_image(self) -> Result<GeneratedImage, ImageError> {
        let created_at = DateTime::from_timestamp_micros(self.created_at)
            .ok_or(ImageError::InvalidTimestamp(self.created_at))?;

        Ok(GeneratedImage {
            id: self.id,
            prompt: self.prompt,
            image_data: self.image_data,
            created_at,
        })
    }
}

/// Generated image store
#[derive(Clone)]
pub struct ImageStore {
    pool: SqlitePool,
}

impl ImageStore {
    /// Create a new image store with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new record; fails if the id is already taken
    pub async fn insert(&self, image: &GeneratedImage) -> Result<(), ImageError> {
        let result = sqlx::query(
            "INSERT INTO generated_images (id, prompt, image_data, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&image.id)
        .bind(&image.prompt)
        .bind(&image.image_data)
        .bind(image.created_at.timestamp_micros())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!(
                    "Stored image {} ({} base64 bytes)",
                    image.id,
                    image.image_data.len()
                );
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(ImageError::DuplicateId(image.id.clone()))
            }
            Err(e) => Err(ImageError::Save(e)),
        }
    }

    /// Up to `limit` records, newest first. Non-positive limits yield nothing
    pub async fn recent(&self, limit: i64) -> Result<Vec<GeneratedImage>, ImageError> {
        // SQLite treats a negative LIMIT as unbounded
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let rows: Vec<ImageRow> = sqlx::query_as(
            r#"
            SELECT id, prompt, image_data, created_at
            FROM generated_images
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(ImageError::Fetch)?;

        rows.into_iter().map(ImageRow::into_image).collect()
    }

    /// Delete by id, returning the number of records removed (0 or 1)
    pub async fn delete(&self, id: &str) -> Result<u64, ImageError> {
        let result = sqlx::query("DELETE FROM generated_images WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(ImageError::Delete)?;

        if result.rows_affected() > 0 {
            debug!("Deleted image {}", id);
        }
        Ok(result.rows_affected())
    }
}
