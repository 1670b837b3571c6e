use contracts::domain::a002_category::aggregate::CategoryId;
use contracts::domain::a003_inquiry::aggregate::{Inquiry, InquiryId};
use contracts::domain::a003_inquiry::status::InquiryStatus;
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_inquiry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub body: String,
    pub author_id: String,
    pub category_id: String,
    pub trainer_id: Option<String>,
    pub status: String,
    pub answer: Option<String>,
    pub reopen_count: i32,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_activity_at: chrono::DateTime<chrono::Utc>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Inquiry {
    fn from(m: Model) -> Self {
        let metadata =
            EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let status = InquiryStatus::from_str(&m.status).unwrap_or_else(|_| {
            tracing::warn!("Inquiry {} has unknown status '{}'", m.id, m.status);
            InquiryStatus::Opened
        });

        Inquiry {
            base: BaseAggregate::restore(
                InquiryId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            body: m.body,
            author_id: m.author_id,
            category_id: CategoryId(Uuid::parse_str(&m.category_id).unwrap_or_default()),
            trainer_id: m.trainer_id,
            status,
            answer: m.answer,
            reopen_count: m.reopen_count,
            closed_at: m.closed_at,
            last_activity_at: m.last_activity_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Inquiry) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        body: Set(aggregate.body.clone()),
        author_id: Set(aggregate.author_id.clone()),
        category_id: Set(aggregate.category_id.value().to_string()),
        trainer_id: Set(aggregate.trainer_id.clone()),
        status: Set(aggregate.status.as_str().to_string()),
        answer: Set(aggregate.answer.clone()),
        reopen_count: Set(aggregate.reopen_count),
        closed_at: Set(aggregate.closed_at),
        last_activity_at: Set(aggregate.last_activity_at),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Ограничения выборки, которые выгодно отдать SQLite.
/// Поиск, сортировка и счётчики по статусам делаются в `list`.
#[derive(Debug, Clone, Default)]
pub struct InquiryFilter {
    pub author_id: Option<String>,
    pub trainer_id: Option<String>,
    /// Вместе с `trainer_id`: добавить обращения без тренера
    pub include_unassigned: bool,
    pub ids: Option<Vec<String>>,
    pub category_id: Option<String>,
}

pub async fn insert(aggregate: &Inquiry) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Inquiry) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Inquiry>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result
        .map(Inquiry::from)
        .filter(|i| !i.base.metadata.is_deleted))
}

pub async fn list_filtered(filter: &InquiryFilter) -> anyhow::Result<Vec<Inquiry>> {
    let mut condition = Condition::all().add(Column::IsDeleted.eq(false));

    if let Some(author_id) = &filter.author_id {
        condition = condition.add(Column::AuthorId.eq(author_id.as_str()));
    }
    if let Some(trainer_id) = &filter.trainer_id {
        let mut by_trainer = Condition::any().add(Column::TrainerId.eq(trainer_id.as_str()));
        if filter.include_unassigned {
            by_trainer = by_trainer.add(Column::TrainerId.is_null());
        }
        condition = condition.add(by_trainer);
    } else if filter.include_unassigned {
        condition = condition.add(Column::TrainerId.is_null());
    }
    if let Some(ids) = &filter.ids {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        condition = condition.add(Column::Id.is_in(ids.iter().cloned()));
    }
    if let Some(category_id) = &filter.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id.as_str()));
    }

    let items = Entity::find()
        .filter(condition)
        .order_by_desc(Column::LastActivityAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Inquiry::from)
        .collect();
    Ok(items)
}

/// Текущая нагрузка тренеров: обращения в работе (не закрытые)
pub async fn count_open_by_trainers(
    trainer_ids: &[String],
) -> anyhow::Result<HashMap<String, usize>> {
    let active: Vec<&str> = InquiryStatus::ALL
        .iter()
        .filter(|s| s.is_active())
        .map(|s| s.as_str())
        .collect();

    let rows = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::TrainerId.is_in(trainer_ids.iter().cloned()))
        .filter(Column::Status.is_in(active))
        .all(conn())
        .await?;

    let mut loads: HashMap<String, usize> = HashMap::new();
    for row in rows {
        if let Some(trainer_id) = row.trainer_id {
            *loads.entry(trainer_id).or_default() += 1;
        }
    }
    Ok(loads)
}
