use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, ExprTrait as _, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::prelude::Stats;
use crate::entities::stats;

/// One aggregated day of visits, as returned by the weekly query.
#[derive(Debug, Clone, FromQueryResult)]
pub struct DailyVisitsRow {
    pub visit_date: String,
    pub total_visits: i64,
}

pub struct StatsRepository {
    conn: DatabaseConnection,
}

impl StatsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Record one visit for (page, date): insert with count 1, or bump the
    /// existing row's counter in the same statement. The unique index on
    /// (page, visit_date) makes this safe under concurrent requests.
    pub async fn upsert_visit(&self, page: &str, date: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = stats::ActiveModel {
            page: Set(page.to_string()),
            visit_count: Set(1),
            visit_date: Set(date.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        Stats::insert(active)
            .on_conflict(
                OnConflict::columns([stats::Column::Page, stats::Column::VisitDate])
                    .value(
                        stats::Column::VisitCount,
                        Expr::col(stats::Column::VisitCount).add(1),
                    )
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .context("Failed to upsert visit counter")?;

        Ok(())
    }

    /// Ensure a zero-count row exists for (page, date). Never touches an
    /// existing counter.
    pub async fn seed_day(&self, page: &str, date: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = stats::ActiveModel {
            page: Set(page.to_string()),
            visit_count: Set(0),
            visit_date: Set(date.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let result = Stats::insert(active)
            .on_conflict(
                OnConflict::columns([stats::Column::Page, stats::Column::VisitDate])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e).context("Failed to seed visit counter"),
        }
    }

    /// Visits for one page grouped by day, newest day first, capped at `limit`.
    pub async fn daily_totals(&self, page: &str, limit: u64) -> Result<Vec<DailyVisitsRow>> {
        let rows = Stats::find()
            .select_only()
            .column(stats::Column::VisitDate)
            .column_as(stats::Column::VisitCount.sum(), "total_visits")
            .filter(stats::Column::Page.eq(page))
            .group_by(stats::Column::VisitDate)
            .order_by_desc(stats::Column::VisitDate)
            .limit(limit)
            .into_model::<DailyVisitsRow>()
            .all(&self.conn)
            .await
            .context("Failed to query daily visit totals")?;

        Ok(rows)
    }
}
