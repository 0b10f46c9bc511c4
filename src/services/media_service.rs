//! Domain service for the media catalog.

use thiserror::Error;

use crate::entities::media::{self, MediaType};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media {0} not found")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for MediaError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for MediaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Input for a new catalog entry; the file is already placed on disk.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub media_type: MediaType,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
}

/// Domain service trait for the media catalog. No update or delete
/// operations are exposed.
#[async_trait::async_trait]
pub trait MediaService: Send + Sync {
    /// Persists a catalog entry and returns the stored record.
    async fn create(&self, new: NewMedia) -> Result<media::Model, MediaError>;

    /// All media, newest first, optionally restricted to one type.
    async fn list(&self, type_filter: Option<MediaType>) -> Result<Vec<media::Model>, MediaError>;

    /// One record by id.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::NotFound`] for an unknown id.
    async fn get(&self, id: i32) -> Result<media::Model, MediaError>;
}
