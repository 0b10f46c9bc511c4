use sea_orm_migration::prelude::*;

mod m20260412_initial;
mod m20260518_stats_unique_day;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260412_initial::Migration),
            Box::new(m20260518_stats_unique_day::Migration),
        ]
    }
}
