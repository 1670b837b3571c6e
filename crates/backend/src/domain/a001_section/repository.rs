use chrono::{DateTime, Utc};
use contracts::domain::a001_section::aggregate::{Section, SectionId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue::NotSet, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_section")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Section {
    fn from(row: Model) -> Self {
        let id = Uuid::parse_str(&row.id).unwrap_or_else(|_| {
            tracing::warn!("a001_section row has malformed id '{}'", row.id);
            Uuid::nil()
        });
        let metadata =
            EntityMetadata::restore(row.created_at, row.updated_at, row.is_deleted, row.version);
        Section {
            base: BaseAggregate::restore(
                SectionId(id),
                row.code,
                row.description,
                row.comment,
                metadata,
            ),
            is_active: row.is_active,
        }
    }
}

impl From<&Section> for ActiveModel {
    fn from(s: &Section) -> Self {
        let meta = &s.base.metadata;
        ActiveModel {
            id: Set(s.base.id.value().to_string()),
            code: Set(s.base.code.clone()),
            description: Set(s.base.description.clone()),
            comment: Set(s.base.comment.clone()),
            is_active: Set(s.is_active),
            is_deleted: Set(meta.is_deleted),
            created_at: Set(Some(meta.created_at)),
            updated_at: Set(Some(meta.updated_at)),
            version: Set(meta.version),
        }
    }
}

fn live() -> Select<Entity> {
    Entity::find().filter(Column::IsDeleted.eq(false))
}

/// Все неудалённые отделы по алфавиту
pub async fn list_all() -> anyhow::Result<Vec<Section>> {
    let mut sections: Vec<Section> = live()
        .all(get_connection())
        .await?
        .into_iter()
        .map(Section::from)
        .collect();
    sections.sort_by_cached_key(|s| s.base.description.to_lowercase());
    Ok(sections)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Section>> {
    let row = Entity::find_by_id(id.to_string())
        .one(get_connection())
        .await?;
    Ok(row.map(Section::from))
}

pub async fn get_by_code(code: &str) -> anyhow::Result<Option<Section>> {
    let row = live()
        .filter(Column::Code.eq(code))
        .one(get_connection())
        .await?;
    Ok(row.map(Section::from))
}

pub async fn insert(section: &Section) -> anyhow::Result<Uuid> {
    ActiveModel::from(section).insert(get_connection()).await?;
    Ok(section.base.id.value())
}

pub async fn update(section: &Section) -> anyhow::Result<()> {
    let mut row = ActiveModel::from(section);
    row.created_at = NotSet;
    row.update(get_connection()).await?;
    Ok(())
}

/// `false`, если такого отдела нет
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
