use contracts::domain::a003_inquiry::aggregate::InquiryId;
use contracts::domain::a005_rating::aggregate::Rating;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_rating")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub inquiry_id: String,
    pub user_id: String,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Rating {
    fn from(m: Model) -> Self {
        Rating {
            id: Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4()),
            inquiry_id: InquiryId(Uuid::parse_str(&m.inquiry_id).unwrap_or_default()),
            user_id: m.user_id,
            score: m.score,
            comment: m.comment,
            created_at: m.created_at,
        }
    }
}

fn to_active(r: &Rating) -> ActiveModel {
    ActiveModel {
        id: Set(r.id.to_string()),
        inquiry_id: Set(r.inquiry_id.value().to_string()),
        user_id: Set(r.user_id.clone()),
        score: Set(r.score),
        comment: Set(r.comment.clone()),
        created_at: Set(r.created_at),
    }
}

pub async fn get_by_inquiry(inquiry_id: &str) -> anyhow::Result<Option<Rating>> {
    Ok(Entity::find()
        .filter(Column::InquiryId.eq(inquiry_id))
        .one(get_connection())
        .await?
        .map(Into::into))
}

/// Одна оценка на обращение: существующая запись перезаписывается
pub async fn upsert(rating: &Rating) -> anyhow::Result<()> {
    let exists = Entity::find_by_id(rating.id.to_string())
        .one(get_connection())
        .await?
        .is_some();
    if exists {
        to_active(rating).update(get_connection()).await?;
    } else {
        to_active(rating).insert(get_connection()).await?;
    }
    Ok(())
}

pub async fn list_all() -> anyhow::Result<Vec<Rating>> {
    Ok(Entity::find()
        .all(get_connection())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}
