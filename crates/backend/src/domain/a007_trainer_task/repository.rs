use contracts::domain::a002_category::aggregate::CategoryId;
use contracts::domain::a007_trainer_task::aggregate::{clamp_weight, AssignmentChange, TrainerTask};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a007_trainer_task")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trainer_id: String,
    pub category_id: String,
    pub weight: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TrainerTask {
    fn from(m: Model) -> Self {
        TrainerTask {
            id: Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4()),
            trainer_id: m.trainer_id,
            category_id: CategoryId(Uuid::parse_str(&m.category_id).unwrap_or_default()),
            weight: m.weight,
        }
    }
}

fn to_active(task: &TrainerTask) -> ActiveModel {
    ActiveModel {
        id: Set(task.id.to_string()),
        trainer_id: Set(task.trainer_id.clone()),
        category_id: Set(task.category_id.value().to_string()),
        weight: Set(task.weight),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<TrainerTask>> {
    Ok(Entity::find()
        .all(get_connection())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn list_by_category(category_id: &str) -> anyhow::Result<Vec<TrainerTask>> {
    Ok(Entity::find()
        .filter(Column::CategoryId.eq(category_id))
        .all(get_connection())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Построчное применение изменений доски в одной транзакции.
/// Остальные назначения (в том числе неактивных тренеров) не трогаются.
pub async fn apply_changes(changes: &[AssignmentChange]) -> anyhow::Result<()> {
    let txn = get_connection().begin().await?;
    for change in changes {
        match change {
            AssignmentChange::Removed {
                trainer_id,
                category_id,
            } => {
                Entity::delete_many()
                    .filter(Column::TrainerId.eq(trainer_id.as_str()))
                    .filter(Column::CategoryId.eq(category_id.as_str()))
                    .exec(&txn)
                    .await?;
            }
            AssignmentChange::Upserted(a) => {
                let updated = Entity::update_many()
                    .col_expr(Column::Weight, Expr::value(clamp_weight(a.weight)))
                    .filter(Column::TrainerId.eq(a.trainer_id.as_str()))
                    .filter(Column::CategoryId.eq(a.category_id.as_str()))
                    .exec(&txn)
                    .await?;
                if updated.rows_affected == 0 {
                    let category_id = CategoryId(Uuid::parse_str(&a.category_id)?);
                    let task = TrainerTask::new(a.trainer_id.clone(), category_id, a.weight);
                    Entity::insert(to_active(&task)).exec(&txn).await?;
                }
            }
        }
    }
    txn.commit().await?;
    Ok(())
}
