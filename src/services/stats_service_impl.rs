//! `SeaORM` implementation of the `StatsService` trait.

use async_trait::async_trait;
use tracing::warn;

use crate::config::StatsConfig;
use crate::db::Store;
use crate::services::stats_service::{StatsError, StatsService, WeeklyStats};

const WEEKLY_WINDOW_DAYS: u64 = 7;

pub struct SeaOrmStatsService {
    store: Store,
    config: StatsConfig,
}

impl SeaOrmStatsService {
    #[must_use]
    pub const fn new(store: Store, config: StatsConfig) -> Self {
        Self { store, config }
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

#[async_trait]
impl StatsService for SeaOrmStatsService {
    async fn record_visit(&self, page: &str) -> Result<(), StatsError> {
        if page.trim().is_empty() {
            return Err(StatsError::Validation(
                "Page name is required".to_string(),
            ));
        }

        self.store.record_visit(page, &today()).await?;
        Ok(())
    }

    async fn weekly(&self) -> Result<WeeklyStats, StatsError> {
        let result = self
            .store
            .daily_visit_totals(&self.config.dashboard_page, WEEKLY_WINDOW_DAYS)
            .await;

        let pages = match result {
            Ok(rows) => rows,
            Err(e) if self.config.fail_open => {
                warn!("Weekly stats query failed, returning zeros: {e}");
                return Ok(WeeklyStats::default());
            }
            Err(e) => return Err(e.into()),
        };

        let total_visits = pages.iter().map(|row| row.total_visits).sum();

        Ok(WeeklyStats {
            total_visits,
            pages,
        })
    }
}
