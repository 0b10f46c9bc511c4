use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::media::{self, MediaType};

pub mod migrator;
pub mod repositories;

pub use repositories::stats::DailyVisitsRow;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 10, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn media_repo(&self) -> repositories::media::MediaRepository {
        repositories::media::MediaRepository::new(self.conn.clone())
    }

    fn stats_repo(&self) -> repositories::stats::StatsRepository {
        repositories::stats::StatsRepository::new(self.conn.clone())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_email_with_hash(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_email_with_hash(email).await
    }

    pub async fn user_email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        reason: &str,
        is_admin: bool,
    ) -> Result<User> {
        self.user_repo()
            .create(email, password_hash, name, reason, is_admin)
            .await
    }

    pub async fn list_users_newest_first(&self) -> Result<Vec<User>> {
        self.user_repo().list_newest_first().await
    }

    pub async fn insert_media(
        &self,
        user_id: i32,
        title: &str,
        description: &str,
        media_type: MediaType,
        file_path: &str,
        thumbnail_path: Option<&str>,
    ) -> Result<media::Model> {
        self.media_repo()
            .insert(
                user_id,
                title,
                description,
                media_type,
                file_path,
                thumbnail_path,
            )
            .await
    }

    pub async fn list_media(&self, type_filter: Option<MediaType>) -> Result<Vec<media::Model>> {
        self.media_repo().list(type_filter).await
    }

    pub async fn get_media(&self, id: i32) -> Result<Option<media::Model>> {
        self.media_repo().get(id).await
    }

    pub async fn record_visit(&self, page: &str, date: &str) -> Result<()> {
        self.stats_repo().upsert_visit(page, date).await
    }

    pub async fn seed_visit_day(&self, page: &str, date: &str) -> Result<()> {
        self.stats_repo().seed_day(page, date).await
    }

    pub async fn daily_visit_totals(&self, page: &str, limit: u64) -> Result<Vec<DailyVisitsRow>> {
        self.stats_repo().daily_totals(page, limit).await
    }
}
