use contracts::domain::a001_section::aggregate::SectionId;
use contracts::domain::a003_inquiry::aggregate::InquiryId;
use contracts::domain::a004_follow_up::aggregate::{FollowUp, FollowUpStatus};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_follow_up")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub inquiry_id: String,
    pub section_id: String,
    pub author_id: String,
    pub body: String,
    pub status: String,
    pub answer: Option<String>,
    pub answered_by: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub answered_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FollowUp {
    fn from(m: Model) -> Self {
        FollowUp {
            id: Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4()),
            inquiry_id: InquiryId(Uuid::parse_str(&m.inquiry_id).unwrap_or_default()),
            section_id: SectionId(Uuid::parse_str(&m.section_id).unwrap_or_default()),
            author_id: m.author_id,
            body: m.body,
            status: FollowUpStatus::from_str(&m.status).unwrap_or_default(),
            answer: m.answer,
            answered_by: m.answered_by,
            created_at: m.created_at,
            answered_at: m.answered_at,
        }
    }
}

fn to_active(f: &FollowUp) -> ActiveModel {
    ActiveModel {
        id: Set(f.id.to_string()),
        inquiry_id: Set(f.inquiry_id.value().to_string()),
        section_id: Set(f.section_id.value().to_string()),
        author_id: Set(f.author_id.clone()),
        body: Set(f.body.clone()),
        status: Set(f.status.as_str().to_string()),
        answer: Set(f.answer.clone()),
        answered_by: Set(f.answered_by.clone()),
        created_at: Set(f.created_at),
        answered_at: Set(f.answered_at),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn insert(follow_up: &FollowUp) -> anyhow::Result<()> {
    to_active(follow_up).insert(conn()).await?;
    Ok(())
}

pub async fn update(follow_up: &FollowUp) -> anyhow::Result<()> {
    to_active(follow_up).update(conn()).await?;
    Ok(())
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<FollowUp>> {
    Ok(Entity::find_by_id(id.to_string())
        .one(conn())
        .await?
        .map(Into::into))
}

pub async fn list_by_inquiry(inquiry_id: &str) -> anyhow::Result<Vec<FollowUp>> {
    Ok(Entity::find()
        .filter(Column::InquiryId.eq(inquiry_id))
        .order_by_asc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Входящие раздела: сначала новые
pub async fn list_filtered(
    section_id: Option<&str>,
    status: Option<FollowUpStatus>,
) -> anyhow::Result<Vec<FollowUp>> {
    let mut query = Entity::find();
    if let Some(section_id) = section_id {
        query = query.filter(Column::SectionId.eq(section_id));
    }
    if let Some(status) = status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    Ok(query
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Обращения, по которым есть запрос в раздел
pub async fn inquiry_ids_for_section(section_id: &str) -> anyhow::Result<Vec<String>> {
    let mut ids: Vec<String> = Entity::find()
        .filter(Column::SectionId.eq(section_id))
        .all(conn())
        .await?
        .into_iter()
        .map(|m| m.inquiry_id)
        .collect();
    ids.sort();
    ids.dedup();
    Ok(ids)
}

pub async fn list_all() -> anyhow::Result<Vec<FollowUp>> {
    list_filtered(None, None).await
}
