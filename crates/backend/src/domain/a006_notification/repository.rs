use chrono::{DateTime, Utc};
use contracts::domain::a006_notification::aggregate::{Notification, NotificationKind};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a006_notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub inquiry_id: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Notification {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: Uuid::parse_str(&m.id)?,
            user_id: m.user_id,
            kind: m.kind.parse::<NotificationKind>().map_err(anyhow::Error::msg)?,
            title: m.title,
            body: m.body,
            inquiry_id: m.inquiry_id,
            is_read: m.is_read,
            created_at: m.created_at,
        })
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn insert(n: &Notification) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(n.id.to_string()),
        user_id: Set(n.user_id.clone()),
        kind: Set(n.kind.as_str().to_string()),
        title: Set(n.title.clone()),
        body: Set(n.body.clone()),
        inquiry_id: Set(n.inquiry_id.clone()),
        is_read: Set(n.is_read),
        created_at: Set(n.created_at),
    };
    active.insert(conn()).await?;
    Ok(())
}

/// Уведомления пользователя, новые сверху
pub async fn list_for_user(user_id: &str, unread_only: bool) -> anyhow::Result<Vec<Notification>> {
    let mut query = Entity::find().filter(Column::UserId.eq(user_id));
    if unread_only {
        query = query.filter(Column::IsRead.eq(false));
    }
    query
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Notification::try_from)
        .collect()
}

pub async fn count_unread(user_id: &str) -> anyhow::Result<u64> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .count(conn())
        .await?)
}

pub async fn mark_read(user_id: &str, id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::IsRead, Expr::value(true))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::UserId.eq(user_id))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn mark_all_read(user_id: &str) -> anyhow::Result<u64> {
    let result = Entity::update_many()
        .col_expr(Column::IsRead, Expr::value(true))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_read_before(before: DateTime<Utc>) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::IsRead.eq(true))
        .filter(Column::CreatedAt.lt(before))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}
