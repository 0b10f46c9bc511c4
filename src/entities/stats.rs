use sea_orm::entity::prelude::*;

/// One row per page per calendar day; uniqueness enforced by a migration index.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub page: String,

    pub visit_count: i32,

    /// Server-local calendar day, `YYYY-MM-DD`.
    pub visit_date: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
