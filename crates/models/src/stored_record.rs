use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stored_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert the record, or replace payload and `created_at` of the existing one, in one statement.
pub async fn upsert(
    db: &DatabaseConnection,
    key: &str,
    payload: &str,
    created_at: DateTimeWithTimeZone,
) -> Result<(), ModelError> {
    if key.is_empty() || payload.is_empty() {
        return Err(ModelError::Validation("key and payload required".into()));
    }
    let am = ActiveModel {
        key: Set(key.to_string()),
        payload: Set(payload.to_string()),
        created_at: Set(created_at),
    };
    Entity::insert(am)
        .on_conflict(
            OnConflict::column(Column::Key)
                .update_columns([Column::Payload, Column::CreatedAt])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Find a record created strictly after `cutoff`.
pub async fn find_live(
    db: &DatabaseConnection,
    key: &str,
    cutoff: DateTimeWithTimeZone,
) -> Result<Option<Model>, ModelError> {
    let found = Entity::find_by_id(key.to_string())
        .filter(Column::CreatedAt.gt(cutoff))
        .one(db)
        .await?;
    Ok(found)
}

/// Delete every record created at or before `cutoff`; returns the number removed.
pub async fn purge_expired(
    db: &DatabaseConnection,
    cutoff: DateTimeWithTimeZone,
) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::CreatedAt.lte(cutoff))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
