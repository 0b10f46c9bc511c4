use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MediaDto};
use crate::entities::media::MediaType;
use crate::services::{NewMedia, PlacementError};

#[derive(Deserialize)]
pub struct MediaListQuery {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

/// One buffered multipart file part.
struct UploadedFile {
    field_name: String,
    original_name: String,
    content_type: Option<String>,
    bytes: axum::body::Bytes,
}

/// POST /api/upload
/// Multipart form: `file`, `user_id`, `title`, `type`, optional
/// `description` and `thumbnail_path`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaDto>>), ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut user_id: Option<i32> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut declared_type: Option<MediaType> = None;
    let mut thumbnail_path: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read file part: {e}")))?;
                file = Some(UploadedFile {
                    field_name: name,
                    original_name,
                    content_type,
                    bytes,
                });
            }
            "user_id" => {
                let text = read_text_field(field).await?;
                let id = text
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| ApiError::validation("user_id must be an integer"))?;
                user_id = Some(id);
            }
            "title" => title = Some(read_text_field(field).await?),
            "description" => description = Some(read_text_field(field).await?),
            "type" => {
                let text = read_text_field(field).await?;
                let parsed = MediaType::parse(text.trim()).ok_or_else(|| {
                    ApiError::validation("type must be \"image\" or \"video\"")
                })?;
                declared_type = Some(parsed);
            }
            "thumbnail_path" => thumbnail_path = Some(read_text_field(field).await?),
            _ => {}
        }
    }

    let file = file.ok_or(PlacementError::MissingFile)?;
    let user_id = user_id.ok_or_else(|| ApiError::validation("user_id is required"))?;
    let title = title.ok_or_else(|| ApiError::validation("title is required"))?;
    let declared_type =
        declared_type.ok_or_else(|| ApiError::validation("type is required"))?;

    let placed = state
        .placement()
        .place(
            &file.field_name,
            &file.original_name,
            file.content_type.as_deref(),
            declared_type,
            &file.bytes,
        )
        .await?;

    let media = state
        .media()
        .create(NewMedia {
            user_id,
            title,
            description,
            media_type: declared_type,
            file_path: placed.relative_path,
            thumbnail_path,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MediaDto::from(media))),
    ))
}

/// GET /api/media
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MediaListQuery>,
) -> Result<Json<ApiResponse<Vec<MediaDto>>>, ApiError> {
    let type_filter = match query.media_type.as_deref() {
        None => None,
        Some(raw) => Some(MediaType::parse(raw).ok_or_else(|| {
            ApiError::validation("type must be \"image\" or \"video\"")
        })?),
    };

    let rows = state.media().list(type_filter).await?;
    let media = rows.into_iter().map(MediaDto::from).collect();

    Ok(Json(ApiResponse::success(media)))
}

/// GET /api/media/{id}
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MediaDto>>, ApiError> {
    let media = state.media().get(id).await?;

    Ok(Json(ApiResponse::success(MediaDto::from(media))))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::validation(format!("Failed to read form field: {e}")))
}
