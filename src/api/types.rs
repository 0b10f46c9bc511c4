use serde::Serialize;

use crate::db::{DailyVisitsRow, User};
use crate::entities::media::{self, MediaType};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Public user fields; the password hash never leaves the repository.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub reason: String,
    pub approved: bool,
    pub registered_at: String,
    pub is_admin: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            reason: user.reason,
            approved: user.approved,
            registered_at: user.registered_at,
            is_admin: user.is_admin,
        }
    }
}

/// Stub body for the current-user endpoint; no session means no identity.
#[derive(Debug, Serialize)]
pub struct CurrentUserDto {
    pub user: Option<UserDto>,
}

#[derive(Debug, Serialize)]
pub struct MediaDto {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub created_at: String,
}

impl From<media::Model> for MediaDto {
    fn from(model: media::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            media_type: model.media_type,
            file_path: model.file_path,
            thumbnail_path: model.thumbnail_path,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailyVisitsDto {
    pub visit_date: String,
    pub total_visits: i64,
}

impl From<DailyVisitsRow> for DailyVisitsDto {
    fn from(row: DailyVisitsRow) -> Self {
        Self {
            visit_date: row.visit_date,
            total_visits: row.total_visits,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WeeklyStatsDto {
    #[serde(rename = "totalVisits")]
    pub total_visits: i64,
    pub pages: Vec<DailyVisitsDto>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
