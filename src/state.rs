use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, MediaService, PlacementService, SeaOrmAuthService, SeaOrmMediaService,
    SeaOrmStatsService, StatsService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub media_service: Arc<dyn MediaService>,

    pub stats_service: Arc<dyn StatsService>,

    pub placement: Arc<PlacementService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config.auth.clone()))
            as Arc<dyn AuthService>;

        let media_service =
            Arc::new(SeaOrmMediaService::new(store.clone())) as Arc<dyn MediaService>;

        let stats_service = Arc::new(SeaOrmStatsService::new(store.clone(), config.stats.clone()))
            as Arc<dyn StatsService>;

        let placement = Arc::new(PlacementService::new(&config.storage.upload_root));

        Ok(Self {
            config,
            store,
            auth_service,
            media_service,
            stats_service,
            placement,
        })
    }
}
