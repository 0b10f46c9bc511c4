//! `SeaORM` implementation of the `MediaService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::entities::media::{self, MediaType};
use crate::services::media_service::{MediaError, MediaService, NewMedia};

const DEFAULT_DESCRIPTION: &str = "No description";

pub struct SeaOrmMediaService {
    store: Store,
}

impl SeaOrmMediaService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MediaService for SeaOrmMediaService {
    async fn create(&self, new: NewMedia) -> Result<media::Model, MediaError> {
        if new.title.trim().is_empty() {
            return Err(MediaError::Validation("Title is required".to_string()));
        }

        let description = new.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION);

        let model = self
            .store
            .insert_media(
                new.user_id,
                &new.title,
                description,
                new.media_type,
                &new.file_path,
                new.thumbnail_path.as_deref(),
            )
            .await?;

        Ok(model)
    }

    async fn list(&self, type_filter: Option<MediaType>) -> Result<Vec<media::Model>, MediaError> {
        let rows = self.store.list_media(type_filter).await?;
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<media::Model, MediaError> {
        self.store
            .get_media(id)
            .await?
            .ok_or(MediaError::NotFound(id))
    }
}
