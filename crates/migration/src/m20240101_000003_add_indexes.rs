use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // StoredRecord: the reaper deletes by created_at range
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stored_record_created_at")
                    .table(StoredRecord::Table)
                    .col(StoredRecord::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_stored_record_created_at")
                    .table(StoredRecord::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum StoredRecord {
    Table,
    CreatedAt,
}
