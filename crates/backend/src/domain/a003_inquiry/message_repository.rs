use contracts::domain::a003_inquiry::message::InquiryMessage;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_inquiry_message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub inquiry_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn insert(inquiry_id: &str, author_id: &str, body: &str) -> anyhow::Result<Model> {
    let active = ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        inquiry_id: Set(inquiry_id.to_string()),
        author_id: Set(author_id.to_string()),
        body: Set(body.to_string()),
        created_at: Set(chrono::Utc::now()),
    };
    Ok(active.insert(get_connection()).await?)
}

/// Переписка в хронологическом порядке, имена авторов из `names`
pub async fn list_by_inquiry(
    inquiry_id: &str,
    names: &HashMap<String, String>,
) -> anyhow::Result<Vec<InquiryMessage>> {
    let rows = Entity::find()
        .filter(Column::InquiryId.eq(inquiry_id))
        .order_by_asc(Column::CreatedAt)
        .all(get_connection())
        .await?;
    Ok(rows.into_iter().map(|m| to_message(m, names)).collect())
}

pub fn to_message(m: Model, names: &HashMap<String, String>) -> InquiryMessage {
    InquiryMessage {
        author_name: names
            .get(&m.author_id)
            .cloned()
            .unwrap_or_else(|| m.author_id.clone()),
        id: m.id,
        inquiry_id: m.inquiry_id,
        author_id: m.author_id,
        body: m.body,
        created_at: m.created_at,
    }
}
