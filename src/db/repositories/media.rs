use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::media::{self, MediaType};

pub struct MediaRepository {
    conn: DatabaseConnection,
}

impl MediaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        user_id: i32,
        title: &str,
        description: &str,
        media_type: MediaType,
        file_path: &str,
        thumbnail_path: Option<&str>,
    ) -> Result<media::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = media::ActiveModel {
            user_id: Set(user_id),
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            media_type: Set(media_type),
            file_path: Set(file_path.to_string()),
            thumbnail_path: Set(thumbnail_path.map(ToString::to_string)),
            created_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert media record")?;

        Ok(model)
    }

    pub async fn list(&self, type_filter: Option<MediaType>) -> Result<Vec<media::Model>> {
        let mut query = media::Entity::find().order_by_desc(media::Column::CreatedAt);

        if let Some(media_type) = type_filter {
            query = query.filter(media::Column::MediaType.eq(media_type));
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list media")?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<media::Model>> {
        let row = media::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query media by ID")?;

        Ok(row)
    }
}
