//! Domain service for daily visit counters.

use thiserror::Error;

use crate::db::DailyVisitsRow;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for StatsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for StatsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Weekly dashboard aggregate: the 7 most recent days plus their grand total.
#[derive(Debug, Clone, Default)]
pub struct WeeklyStats {
    pub total_visits: i64,
    pub pages: Vec<DailyVisitsRow>,
}

#[async_trait::async_trait]
pub trait StatsService: Send + Sync {
    /// Counts one visit for `page` on today's (server-local) date.
    async fn record_visit(&self, page: &str) -> Result<(), StatsError>;

    /// Aggregates the dashboard page's visits over its 7 most recent days.
    /// When the configured policy is fail-open, store failures yield an
    /// empty result instead of an error.
    async fn weekly(&self) -> Result<WeeklyStats, StatsError>;
}
