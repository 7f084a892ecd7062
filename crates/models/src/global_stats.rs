use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Id of the single stats row.
pub const WELL_KNOWN_ID: &str = "global_stats";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "global_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub all_time_get: i64,
    pub all_time_post: i64,
    pub today_date: String,
    pub today_get: i64,
    pub today_post: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find(db: &DatabaseConnection) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(WELL_KNOWN_ID.to_string()).one(db).await?)
}

/// Create the zeroed row for `today` unless it already exists.
pub async fn ensure(db: &DatabaseConnection, today: &str) -> Result<(), ModelError> {
    let am = ActiveModel {
        id: Set(WELL_KNOWN_ID.to_string()),
        all_time_get: Set(0),
        all_time_post: Set(0),
        today_date: Set(today.to_string()),
        today_get: Set(0),
        today_post: Set(0),
    };
    Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Id).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Add a counter delta in place.
///
/// Runs as a single UPDATE so concurrent writers never overwrite each other. When the stored
/// day differs from `today` the day counters restart from the delta.
pub async fn merge_delta(
    db: &DatabaseConnection,
    get: i64,
    post: i64,
    today: &str,
) -> Result<u64, ModelError> {
    let same_day = Expr::col(Column::TodayDate).eq(today.to_string());
    let res = Entity::update_many()
        .col_expr(Column::AllTimeGet, Expr::col(Column::AllTimeGet).add(get))
        .col_expr(Column::AllTimePost, Expr::col(Column::AllTimePost).add(post))
        .col_expr(
            Column::TodayGet,
            Expr::case(same_day.clone(), Expr::col(Column::TodayGet).add(get))
                .finally(get)
                .into(),
        )
        .col_expr(
            Column::TodayPost,
            Expr::case(same_day, Expr::col(Column::TodayPost).add(post))
                .finally(post)
                .into(),
        )
        .col_expr(Column::TodayDate, Expr::value(today.to_string()))
        .filter(Column::Id.eq(WELL_KNOWN_ID))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
