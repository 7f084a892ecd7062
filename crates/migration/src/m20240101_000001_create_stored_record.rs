//! Create `stored_record` table.
//! One row per key; `created_at` drives expiry.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StoredRecord::Table)
                    .if_not_exists()
                    .col(text(StoredRecord::Key).primary_key())
                    .col(text(StoredRecord::Payload).not_null())
                    .col(timestamp_with_time_zone(StoredRecord::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StoredRecord::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum StoredRecord {
    Table,
    Key,
    Payload,
    CreatedAt,
}
