use chrono::{DateTime, Utc};
use contracts::domain::a001_section::aggregate::SectionId;
use contracts::domain::a002_category::aggregate::{Category, CategoryId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue::NotSet, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    /// Отдел по умолчанию для маршрутизации
    pub section_id: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(row: Model) -> Self {
        let id = Uuid::parse_str(&row.id).unwrap_or_else(|_| {
            tracing::warn!("a002_category row has malformed id '{}'", row.id);
            Uuid::nil()
        });
        // битая ссылка на отдел равносильна её отсутствию
        let section_id = row
            .section_id
            .as_deref()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(SectionId);
        let metadata =
            EntityMetadata::restore(row.created_at, row.updated_at, row.is_deleted, row.version);
        Category {
            base: BaseAggregate::restore(
                CategoryId(id),
                row.code,
                row.description,
                row.comment,
                metadata,
            ),
            section_id,
            is_active: row.is_active,
        }
    }
}

impl From<&Category> for ActiveModel {
    fn from(c: &Category) -> Self {
        let meta = &c.base.metadata;
        ActiveModel {
            id: Set(c.base.id.value().to_string()),
            code: Set(c.base.code.clone()),
            description: Set(c.base.description.clone()),
            comment: Set(c.base.comment.clone()),
            section_id: Set(c.section_id.map(|s| s.value().to_string())),
            is_active: Set(c.is_active),
            is_deleted: Set(meta.is_deleted),
            created_at: Set(Some(meta.created_at)),
            updated_at: Set(Some(meta.updated_at)),
            version: Set(meta.version),
        }
    }
}

/// Категории по алфавиту; `active_only` скрывает выключенные
pub async fn list_all(active_only: bool) -> anyhow::Result<Vec<Category>> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));
    if active_only {
        query = query.filter(Column::IsActive.eq(true));
    }
    let mut categories: Vec<Category> = query
        .all(get_connection())
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    categories.sort_by_cached_key(|c| c.base.description.to_lowercase());
    Ok(categories)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Category>> {
    let row = Entity::find_by_id(id.to_string())
        .one(get_connection())
        .await?;
    Ok(row.map(Category::from))
}

pub async fn insert(category: &Category) -> anyhow::Result<Uuid> {
    ActiveModel::from(category).insert(get_connection()).await?;
    Ok(category.base.id.value())
}

pub async fn update(category: &Category) -> anyhow::Result<()> {
    let mut row = ActiveModel::from(category);
    row.created_at = NotSet;
    row.update(get_connection()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Id.eq(id.to_string()))
        .exec(get_connection())
        .await?;
    Ok(result.rows_affected > 0)
}
