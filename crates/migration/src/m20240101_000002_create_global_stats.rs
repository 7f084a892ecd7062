//! Create `global_stats` table.
//! Holds a single row keyed by a well-known id.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GlobalStats::Table)
                    .if_not_exists()
                    .col(string_len(GlobalStats::Id, 64).primary_key())
                    .col(big_integer(GlobalStats::AllTimeGet).not_null().default(0))
                    .col(big_integer(GlobalStats::AllTimePost).not_null().default(0))
                    .col(string_len(GlobalStats::TodayDate, 10).not_null())
                    .col(big_integer(GlobalStats::TodayGet).not_null().default(0))
                    .col(big_integer(GlobalStats::TodayPost).not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(GlobalStats::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum GlobalStats {
    Table,
    Id,
    AllTimeGet,
    AllTimePost,
    TodayDate,
    TodayGet,
    TodayPost,
}
